//! Motion-trigger orchestrator — turns sensor edges into a reaction.
//!
//! Each edge, while the motion sensor is enabled, plays the next sound in
//! round-robin order, switches every LED on, captures a silent photo, and
//! switches the LEDs off again after a delay. The three LED and capture
//! actions run as independent tasks; the edge loop never waits for them.
//! Overlapping edges each get their own reaction.

use std::convert::identity;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pumpkinpi_domain::led::{Led, LedStatus};
use pumpkinpi_domain::photo::Photo;
use pumpkinpi_domain::sound::Sound;

use crate::device_state::DeviceState;
use crate::ports::{CommandRunner, Edge, EventPublisher, FileSystem, OutputPin};
use crate::services::led_service::LedService;
use crate::services::photo_service::PhotoService;
use crate::services::sound_service::SoundService;

/// Handles to the actions started for one edge.
///
/// Dropping it detaches the tasks; they still run to completion.
#[derive(Debug)]
pub struct Reaction {
    /// Sound whose playback was started, if any.
    pub sound: Option<Sound>,
    pub leds_on: JoinHandle<Vec<Led>>,
    pub capture: JoinHandle<Option<Photo>>,
    pub leds_off: JoinHandle<Vec<Led>>,
}

pub struct MotionOrchestrator<P, E, R, L> {
    state: Arc<DeviceState<P>>,
    sounds: Arc<SoundService<P, R>>,
    leds: Arc<LedService<P, E>>,
    photos: Arc<PhotoService<P, E, R, L>>,
    cursor: AtomicUsize,
    led_off_delay: Duration,
}

impl<P, E, R, L> MotionOrchestrator<P, E, R, L>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    pub fn new(
        state: Arc<DeviceState<P>>,
        sounds: Arc<SoundService<P, R>>,
        leds: Arc<LedService<P, E>>,
        photos: Arc<PhotoService<P, E, R, L>>,
        led_off_delay: Duration,
    ) -> Self {
        Self {
            state,
            sounds,
            leds,
            photos,
            cursor: AtomicUsize::new(0),
            led_off_delay,
        }
    }

    /// React to one sensor edge.
    ///
    /// Returns `None`, with no side effect at all, when the motion sensor is
    /// disabled. Never fails: every action logs its own errors.
    pub fn handle_edge(&self, edge: &Edge) -> Option<Reaction> {
        if !self.state.motion_sensor_enabled() {
            tracing::debug!(at = %edge.at, "motion sensor disabled, edge ignored");
            return None;
        }
        tracing::info!(at = %edge.at, "motion detected");

        let sound = self.play_next_sound();

        let leds = Arc::clone(&self.leds);
        let leds_on = tokio::spawn(async move { leds.set_all(LedStatus::On).await });

        let photos = Arc::clone(&self.photos);
        let capture = tokio::spawn(async move {
            match photos.capture(true).await {
                Ok(photo) => Some(photo),
                Err(err) => {
                    tracing::warn!(error = ?err, "motion capture failed");
                    None
                }
            }
        });

        let leds = Arc::clone(&self.leds);
        let delay = self.led_off_delay;
        let leds_off = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            leds.set_all(LedStatus::Off).await
        });

        Some(Reaction {
            sound,
            leds_on,
            capture,
            leds_off,
        })
    }

    /// Consume edges until the channel closes.
    pub fn spawn(self: Arc<Self>, mut edges: mpsc::Receiver<Edge>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("motion orchestrator armed");
            while let Some(edge) = edges.recv().await {
                let _ = self.handle_edge(&edge);
            }
            tracing::info!("motion orchestrator stopped");
        })
    }

    fn play_next_sound(&self) -> Option<Sound> {
        let count = self.sounds.sound_count();
        if count == 0 {
            tracing::warn!("no sounds in catalog, skipping playback");
            return None;
        }
        let index = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some((current + 1) % count)
            })
            .unwrap_or_else(identity)
            % count;
        let id = self.sounds.sound_at(index)?.id.clone();
        match self.sounds.play(&id) {
            Ok(sound) => Some(sound),
            Err(err) => {
                tracing::warn!(sound = %id, error = ?err, "unable to play motion sound");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, MemoryFs, RecordingPin, ScriptedRunner, SpyPublisher};
    use pumpkinpi_domain::event::Topic;
    use pumpkinpi_domain::feature::MOTION_SENSOR;

    type TestOrchestrator = MotionOrchestrator<RecordingPin, SpyPublisher, ScriptedRunner, MemoryFs>;

    fn orchestrator(h: &Harness) -> Arc<TestOrchestrator> {
        Arc::new(MotionOrchestrator::new(
            Arc::clone(&h.state),
            Arc::clone(&h.sounds),
            Arc::clone(&h.leds),
            Arc::clone(&h.photos),
            Duration::from_secs(2),
        ))
    }

    fn played(h: &Harness) -> Vec<String> {
        h.runner
            .spawned()
            .into_iter()
            .map(|(_, args)| args[0].rsplit('/').next().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn should_react_to_edge_when_enabled() {
        let h = Harness::new();
        h.features.set_enabled(MOTION_SENSOR, true).await.unwrap();
        h.publisher.clear();
        let orchestrator = orchestrator(&h);

        let reaction = orchestrator.handle_edge(&Edge::now()).unwrap();

        assert_eq!(reaction.sound.map(|s| s.id), Some("evil-laugh.wav".to_string()));
        assert_eq!(reaction.leds_on.await.unwrap().len(), 2);
        assert!(h.leds.list_leds().iter().all(|led| led.status.is_on()));
        assert!(reaction.capture.await.unwrap().is_some());
        assert_eq!(h.runner.runs().len(), 1);

        let off = reaction.leds_off.await.unwrap();
        assert_eq!(off.len(), 2);
        assert!(h.leds.list_leds().iter().all(|led| !led.status.is_on()));

        let topics = h.publisher.topics();
        assert_eq!(topics.iter().filter(|t| **t == Topic::LedUpdate).count(), 4);
        assert_eq!(topics.iter().filter(|t| **t == Topic::PhotoUpdate).count(), 1);
        assert_eq!(played(&h), vec!["evil-laugh.wav"]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_switch_leds_off_after_delay_even_when_capture_fails() {
        let h = Harness::new();
        h.features.set_enabled(MOTION_SENSOR, true).await.unwrap();
        h.runner.create_files(false);
        let orchestrator = orchestrator(&h);

        let reaction = orchestrator.handle_edge(&Edge::now()).unwrap();
        reaction.leds_on.await.unwrap();
        assert!(reaction.capture.await.unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(h.leds.list_leds().iter().all(|led| led.status.is_on()));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(h.leds.list_leds().iter().all(|led| !led.status.is_on()));
        assert!(reaction.leds_off.is_finished());
    }

    #[tokio::test]
    async fn should_ignore_edge_when_disabled() {
        let h = Harness::new();
        let orchestrator = orchestrator(&h);

        assert!(orchestrator.handle_edge(&Edge::now()).is_none());
        tokio::task::yield_now().await;

        assert!(h.publisher.events().is_empty());
        assert!(h.runner.spawned().is_empty());
        assert!(h.runner.runs().is_empty());
        assert!(h.pin("led1").levels().is_empty());
        assert!(h.pin("led2").levels().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_advance_sound_round_robin_and_wrap() {
        let h = Harness::new();
        h.features.set_enabled(MOTION_SENSOR, true).await.unwrap();
        let orchestrator = orchestrator(&h);

        for _ in 0..5 {
            let reaction = orchestrator.handle_edge(&Edge::now()).unwrap();
            reaction.leds_off.await.unwrap();
        }

        assert_eq!(
            played(&h),
            vec!["evil-laugh.wav", "ghost.wav", "scream.wav", "smile.wav", "evil-laugh.wav"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_consume_edges_until_channel_closes() {
        let h = Harness::new();
        h.features.set_enabled(MOTION_SENSOR, true).await.unwrap();
        let orchestrator = orchestrator(&h);
        let (tx, rx) = mpsc::channel(4);

        let task = Arc::clone(&orchestrator).spawn(rx);
        tx.send(Edge::now()).await.unwrap();
        tx.send(Edge::now()).await.unwrap();
        drop(tx);
        task.await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(played(&h), vec!["evil-laugh.wav", "ghost.wav"]);
        assert_eq!(h.runner.runs().len(), 2);
        assert!(h.leds.list_leds().iter().all(|led| !led.status.is_on()));
    }

    #[tokio::test]
    async fn should_check_enablement_fresh_on_every_edge() {
        let h = Harness::new();
        let orchestrator = orchestrator(&h);

        assert!(orchestrator.handle_edge(&Edge::now()).is_none());
        h.features.set_enabled(MOTION_SENSOR, true).await.unwrap();
        assert!(orchestrator.handle_edge(&Edge::now()).is_some());
        h.features.set_enabled(MOTION_SENSOR, false).await.unwrap();
        assert!(orchestrator.handle_edge(&Edge::now()).is_none());
    }
}
