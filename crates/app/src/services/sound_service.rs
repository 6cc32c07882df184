//! Sound service — play catalog sounds through an external player.

use std::sync::Arc;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::id::catalog_key;
use pumpkinpi_domain::sound::Sound;

use crate::device_state::{DeviceState, not_found};
use crate::ports::CommandRunner;

/// Application service for the sound catalog.
pub struct SoundService<P, R> {
    state: Arc<DeviceState<P>>,
    sounds: Vec<Sound>,
    runner: R,
    player: String,
}

impl<P, R> SoundService<P, R>
where
    P: Send + Sync,
    R: CommandRunner,
{
    /// `player` is the program invoked with the sound file as its only argument.
    pub fn new(
        state: Arc<DeviceState<P>>,
        sounds: Vec<Sound>,
        runner: R,
        player: impl Into<String>,
    ) -> Self {
        Self {
            state,
            sounds,
            runner,
            player: player.into(),
        }
    }

    #[must_use]
    pub fn list_sounds(&self) -> Vec<Sound> {
        self.sounds.clone()
    }

    /// Look up a sound by id (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] when the id is not in the catalog.
    pub fn get_sound(&self, id: &str) -> Result<Sound, PumpkinError> {
        let key = catalog_key(id);
        self.sounds
            .iter()
            .find(|sound| sound.id == key)
            .cloned()
            .ok_or_else(|| not_found("sound", id))
    }

    /// Start playing a sound and return without waiting for it.
    ///
    /// Failing to start the player is logged, not returned: playback is
    /// unacknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] for an unknown id; the player is
    /// not started in that case.
    pub fn play(&self, id: &str) -> Result<Sound, PumpkinError> {
        let sound = self.get_sound(id)?;
        let path = self.state.sounds_dir().join(&sound.file);
        let args = [path.to_string_lossy().into_owned()];
        match self.runner.spawn(&self.player, &args) {
            Ok(()) => tracing::info!(sound = %sound.id, "playing sound"),
            Err(err) => tracing::warn!(sound = %sound.id, error = ?err, "unable to start sound player"),
        }
        Ok(sound)
    }

    #[must_use]
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Sound at catalog position `index`.
    #[must_use]
    pub fn sound_at(&self, index: usize) -> Option<&Sound> {
        self.sounds.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[test]
    fn should_spawn_player_with_sound_path() {
        let h = Harness::new();

        let sound = h.sounds.play("Ghost.wav").unwrap();

        assert_eq!(sound.id, "ghost.wav");
        assert_eq!(
            h.runner.spawned(),
            vec![("aplay".to_string(), vec!["/srv/sounds/ghost.wav".to_string()])]
        );
    }

    #[test]
    fn should_not_spawn_player_for_unknown_sound() {
        let h = Harness::new();

        let result = h.sounds.play("moo.wav");

        assert!(matches!(result, Err(PumpkinError::NotFound(_))));
        assert!(h.runner.spawned().is_empty());
    }

    #[test]
    fn should_return_sound_when_player_cannot_start() {
        let h = Harness::new();
        h.runner.fail_spawns(true);

        let sound = h.sounds.play("scream.wav").unwrap();

        assert_eq!(sound.id, "scream.wav");
    }

    #[test]
    fn should_expose_catalog_by_position() {
        let h = Harness::new();
        assert_eq!(h.sounds.sound_count(), 4);
        assert_eq!(h.sounds.sound_at(0).map(|s| s.id.as_str()), Some("evil-laugh.wav"));
        assert!(h.sounds.sound_at(4).is_none());
        assert_eq!(h.sounds.list_sounds().len(), 4);
    }
}
