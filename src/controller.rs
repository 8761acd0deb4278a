use crate::Error;
use crate::config::PlayerConfig;
use crate::media::{MediaCommand, MediaElement};
use crate::reconcile::PlaybackReconciler;
use crate::state::{PlayerState, clamp_percentage, clamp_volume};
use std::time::Duration;

/// Owns the player state and the bound media element.
///
/// Each operation computes the next [`PlayerState`] with a pure transition,
/// writes whatever the element needs, and then lets the reconciler issue
/// play/pause if the intended `playing` flag moved. Every error returned
/// here is non-fatal: the controller stays usable and its state valid.
#[derive(Debug)]
pub struct PlayerController<M> {
    media: M,
    config: PlayerConfig,
    state: PlayerState,
    reconciler: PlaybackReconciler,
}

impl<M: MediaElement> PlayerController<M> {
    /// Bind to `media`, applying the configured starting volume.
    ///
    /// The element is assumed paused at mount, so nothing is issued until
    /// the first change of `playing`.
    pub fn new(media: M, config: PlayerConfig) -> Self {
        media.set_volume(config.volume());
        let state = PlayerState::with_initial_volume(media.volume())
            .mute_toggled(media.muted(), media.volume());

        Self {
            media,
            config,
            state,
            reconciler: PlaybackReconciler::new(false),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Flip the intended playback state.
    pub fn toggle_play(&mut self) -> Result<(), Error> {
        self.commit(self.state.toggled_play())
    }

    /// Position report from the element.
    ///
    /// With no usable duration the previous percentage is kept and
    /// [`Error::UnknownDuration`] is returned.
    pub fn on_time_advance(
        &mut self,
        current_time: Duration,
        duration: Option<Duration>,
    ) -> Result<(), Error> {
        let next = self
            .state
            .time_advanced(current_time, duration)
            .ok_or(Error::UnknownDuration)?;
        self.commit(next)
    }

    /// Pull position and duration off the element after it reported progress.
    pub fn handle_time_update(&mut self) -> Result<(), Error> {
        let current_time = self.media.current_time();
        let duration = self.media.duration();
        self.on_time_advance(current_time, duration)
    }

    /// Jump to `percentage` of the media.
    ///
    /// The stored percentage becomes the requested value even when the
    /// element refuses the write; that refusal is still returned.
    pub fn seek_to(&mut self, percentage: f64) -> Result<(), Error> {
        let clamped = clamp_percentage(percentage).ok_or(Error::SeekOutOfRange(percentage))?;
        if clamped != percentage {
            log::debug!("seek to {percentage}% clamped to {clamped}%");
        }

        let duration = self
            .media
            .duration()
            .filter(|d| !d.is_zero())
            .ok_or(Error::UnknownDuration)?;

        let written = self.media.seek(duration.mul_f64(clamped / 100.0));
        if let Err(err) = &written {
            log::warn!("seek to {clamped}% failed: {err}");
        }
        self.commit(self.state.seeked(clamped))?;
        written
    }

    /// Select the configured speed closest to `multiplier`.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), Error> {
        let speed = self.config.snap_speed(multiplier);
        self.media.set_playback_rate(speed)?;
        self.commit(self.state.with_speed(speed))
    }

    /// Write the output level and mirror what the element ended up using.
    pub fn set_volume(&mut self, level: f64) -> Result<(), Error> {
        let Some(level) = clamp_volume(level) else {
            log::debug!("ignoring volume {level}");
            return Ok(());
        };
        self.media.set_volume(level);
        self.commit(self.state.with_volume(self.media.volume()))
    }

    /// Volume slider input. Moving the slider above zero while muted unmutes
    /// first, so the change is audible and visible.
    pub fn adjust_volume(&mut self, level: f64) -> Result<(), Error> {
        if self.state.muted() && level > 0.0 {
            self.toggle_mute()?;
        }
        self.set_volume(level)
    }

    pub fn toggle_mute(&mut self) -> Result<(), Error> {
        let muted = !self.media.muted();
        self.media.set_muted(muted);
        self.commit(self.state.mute_toggled(muted, self.media.volume()))
    }

    /// Ask for fullscreen. State is never touched.
    pub fn request_expand(&mut self) -> Result<(), Error> {
        self.media.request_fullscreen().map_err(|err| {
            log::warn!("fullscreen request failed: {err}");
            match err {
                Error::PlaybackRejected { .. } => err,
                other => Error::rejected(MediaCommand::Fullscreen, other),
            }
        })
    }

    /// The element reached the end of the stream and stopped by itself.
    pub fn on_ended(&mut self) {
        self.reconciler.settle(false);
        self.state = self.state.ended();
    }

    fn commit(&mut self, next: PlayerState) -> Result<(), Error> {
        self.state = next;
        if let Err(err) = self.reconciler.reconcile(next.playing(), &self.media) {
            log::warn!("{err}");
            self.state = self.state.with_playing(self.reconciler.applied());
            return Err(err);
        }
        Ok(())
    }
}
