//! The host window: frame loop and scene switching.

use std::thread;
use std::time::Instant;

use anyhow::{Context as _, Result};
use runtime::{Context, EventBus, Renderer, RuntimeConfig};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::renderer::LogRenderer;
use crate::scenes::build_context;
use crate::world::{SceneId, World};

/// Frames between two `info` summaries of the log renderer.
const SUMMARY_EVERY: u64 = 120;

/// What a finished host run amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSummary {
    pub frames: u64,
    pub scenes_visited: u32,
    pub final_score: u64,
}

/// Owns the current scene's context and drives it frame by frame.
pub struct Host {
    client: ClientConfig,
    runtime: RuntimeConfig,
    events: EventBus,
    renderer: LogRenderer,
}

impl Host {
    pub fn new(client: ClientConfig, runtime: RuntimeConfig, events: EventBus) -> Self {
        Self {
            client,
            runtime,
            events,
            renderer: LogRenderer::new(SUMMARY_EVERY),
        }
    }

    /// Runs the frame loop on the calling thread until `shutdown` flips to
    /// `true` or the configured run time is over.
    ///
    /// Each frame updates the current context, draws its state and, if the
    /// state asks for another scene, closes the context and hands its state
    /// to the next one. The last context is closed before returning.
    pub fn run(mut self, shutdown: watch::Receiver<bool>) -> Result<HostSummary> {
        let screen = self.client.screen;
        self.renderer.surface_created();
        self.renderer.surface_changed(screen.width, screen.height);

        let mut current = self.open(SceneId::Menu)?;
        current
            .start_context(None)
            .context("Failed to start the first scene")?;

        let started = Instant::now();
        let mut frames = 0_u64;
        let mut scenes_visited = 1_u32;

        while !*shutdown.borrow() {
            if self.client.run_for.is_some_and(|limit| started.elapsed() >= limit) {
                info!("Configured run time elapsed");
                break;
            }

            // A context waiting on a stuck runner only gets drawn.
            if current.is_running() {
                current.update_context()?;
            }
            current
                .state()
                .read(|world| self.renderer.draw_frame(world, &screen))?;
            frames += 1;

            if let Some(next) = current.state().read(|world| world.next_scene)? {
                if let Some(upcoming) = self.switch(&mut current, next)? {
                    current = upcoming;
                    scenes_visited += 1;
                }
            }

            thread::sleep(self.client.frame_interval);
        }

        let final_score = current.state().read(|world| world.score)?;
        current
            .close_context()
            .context("Failed to close the last scene")?;

        Ok(HostSummary {
            frames,
            scenes_visited,
            final_score,
        })
    }

    fn open(&self, scene: SceneId) -> Result<Context<World>> {
        build_context(scene, self.client.screen, &self.runtime, &self.events)
            .with_context(|| format!("Failed to build scene {scene}"))
    }

    /// Closes `current` and starts `next` from its state.
    ///
    /// Returns `None` while a runner of `current` is still out; the close is
    /// retried on a later frame.
    fn switch(
        &self,
        current: &mut Context<World>,
        next: SceneId,
    ) -> Result<Option<Context<World>>> {
        info!(from = %current.name(), to = %next, "Switching scene");

        if let Err(e) = current.close_context() {
            if current.has_outstanding_runners() {
                warn!(error = %e, "Previous scene still has runners out, retrying");
                return Ok(None);
            }
            warn!(error = %e, "Previous scene did not close cleanly");
        }

        let mut upcoming = self.open(next)?;
        upcoming
            .hand_off_from(current)
            .with_context(|| format!("Failed to start scene {next}"))?;
        Ok(Some(upcoming))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use runtime::Screen;

    use super::*;

    fn quick_config(run_for: Duration) -> ClientConfig {
        ClientConfig {
            frame_interval: Duration::from_millis(1),
            run_for: Some(run_for),
            screen: Screen::new(160, 120),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn runs_until_the_configured_time() {
        let (_tx, rx) = watch::channel(false);
        let host = Host::new(
            quick_config(Duration::from_millis(200)),
            RuntimeConfig::default(),
            EventBus::new(),
        );

        let summary = host.run(rx).unwrap();
        assert!(summary.frames > 0);
        assert!(summary.scenes_visited >= 1);
    }

    #[test]
    fn stops_immediately_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let host = Host::new(
            quick_config(Duration::from_secs(60)),
            RuntimeConfig::default(),
            EventBus::new(),
        );

        let summary = host.run(rx).unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.scenes_visited, 1);
    }

    #[test]
    fn menu_hands_over_to_the_level() {
        let (_tx, rx) = watch::channel(false);
        let events = EventBus::with_capacity(256);
        let mut lifecycle = events.subscribe();
        let host = Host::new(
            quick_config(Duration::from_secs(3)),
            RuntimeConfig::default(),
            events,
        );

        let summary = host.run(rx).unwrap();
        assert!(summary.scenes_visited >= 2, "{summary:?}");

        let mut contexts = Vec::new();
        while let Ok(event) = lifecycle.try_recv() {
            if let runtime::LifecycleEvent::ContextStarted { context, .. } = event {
                contexts.push(context);
            }
        }
        assert_eq!(&contexts[..2], ["menu", "level"]);
    }
}
