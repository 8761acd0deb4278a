//! Player state and its pure transitions.
//!
//! Every transition takes the old state by value and returns the next one,
//! carrying forward the fields it does not touch. Nothing here talks to the
//! media element; the controller applies effects around these functions.

use std::time::Duration;

/// Volume a freshly mounted player starts with.
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Playback rate a freshly mounted player starts with.
pub const DEFAULT_SPEED: f64 = 1.0;

/// UI-side mirror of the media element.
///
/// `playing` reflects intent and may briefly disagree with the element while
/// the host starts or stops playback. `volume` is the stored level and is
/// kept even while `muted`; use [`PlayerState::displayed_volume`] for what
/// the volume slider should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    playing: bool,
    percentage: f64,
    volume: f64,
    muted: bool,
    speed: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            playing: false,
            percentage: 0.0,
            volume: DEFAULT_VOLUME,
            muted: false,
            speed: DEFAULT_SPEED,
        }
    }
}

impl PlayerState {
    /// Mount-time state with a custom starting volume.
    pub fn with_initial_volume(volume: f64) -> Self {
        Self {
            volume: clamp_volume(volume).unwrap_or(DEFAULT_VOLUME),
            ..Self::default()
        }
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Playhead position in `[0, 100]`.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Stored volume level in `[0, 1]`, independent of mute.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Currently selected playback rate.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Level the volume slider shows: zero while muted.
    pub fn displayed_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub(crate) fn with_playing(self, playing: bool) -> Self {
        Self { playing, ..self }
    }

    pub(crate) fn toggled_play(self) -> Self {
        self.with_playing(!self.playing)
    }

    /// Recompute the playhead from a position report.
    ///
    /// Returns `None` when the ratio is undefined (duration unknown or zero),
    /// in which case the caller keeps the previous state.
    pub(crate) fn time_advanced(
        self,
        current_time: Duration,
        duration: Option<Duration>,
    ) -> Option<Self> {
        let duration = duration.filter(|d| !d.is_zero())?;
        let percentage = current_time.as_secs_f64() / duration.as_secs_f64() * 100.0;
        let percentage = clamp_percentage(percentage)?;
        Some(Self { percentage, ..self })
    }

    /// `percentage` must already be clamped.
    pub(crate) fn seeked(self, percentage: f64) -> Self {
        Self { percentage, ..self }
    }

    /// `volume` is the effective level read back from the media element.
    pub(crate) fn with_volume(self, volume: f64) -> Self {
        Self {
            volume: clamp_volume(volume).unwrap_or(self.volume),
            ..self
        }
    }

    /// Mute flipped on the element. Unmuting refreshes the stored level from
    /// the element so the slider comes back to what is actually audible.
    pub(crate) fn mute_toggled(self, muted: bool, effective_volume: f64) -> Self {
        let next = Self { muted, ..self };
        if muted {
            next
        } else {
            next.with_volume(effective_volume)
        }
    }

    pub(crate) fn with_speed(self, speed: f64) -> Self {
        Self { speed, ..self }
    }

    pub(crate) fn ended(self) -> Self {
        Self {
            playing: false,
            percentage: 100.0,
            ..self
        }
    }
}

/// Clamp into `[0, 100]`. Non-finite input has no meaningful position.
pub fn clamp_percentage(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// Clamp into `[0, 1]`. Non-finite input is rejected.
pub fn clamp_volume(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_defaults() {
        let state = PlayerState::default();
        assert!(!state.playing());
        assert_eq!(state.percentage(), 0.0);
        assert_eq!(state.volume(), 0.5);
        assert!(!state.muted());
        assert_eq!(state.speed(), 1.0);
    }

    #[test]
    fn toggling_play_keeps_other_fields() {
        let state = PlayerState::default().seeked(42.0).with_volume(0.8);
        let next = state.toggled_play();
        assert!(next.playing());
        assert_eq!(next.percentage(), 42.0);
        assert_eq!(next.volume(), 0.8);
        assert_eq!(next.toggled_play(), state);
    }

    #[test]
    fn time_advance_computes_percentage() {
        let state = PlayerState::default()
            .time_advanced(Duration::from_secs(30), Some(Duration::from_secs(120)))
            .unwrap();
        assert_eq!(state.percentage(), 25.0);
    }

    #[test]
    fn time_advance_with_zero_duration_is_skipped() {
        let state = PlayerState::default().seeked(10.0);
        assert!(
            state
                .time_advanced(Duration::from_secs(30), Some(Duration::ZERO))
                .is_none()
        );
        assert!(state.time_advanced(Duration::from_secs(30), None).is_none());
    }

    #[test]
    fn time_advance_past_the_end_clamps() {
        let state = PlayerState::default()
            .time_advanced(Duration::from_secs(61), Some(Duration::from_secs(60)))
            .unwrap();
        assert_eq!(state.percentage(), 100.0);
    }

    #[test]
    fn muting_hides_volume_without_losing_it() {
        let state = PlayerState::default().with_volume(0.8);
        let muted = state.mute_toggled(true, 0.8);
        assert_eq!(muted.displayed_volume(), 0.0);
        assert_eq!(muted.volume(), 0.8);

        let unmuted = muted.mute_toggled(false, 0.8);
        assert_eq!(unmuted.displayed_volume(), 0.8);
    }

    #[test]
    fn unmute_takes_the_element_volume() {
        let state = PlayerState::default()
            .with_volume(0.8)
            .mute_toggled(true, 0.8)
            .mute_toggled(false, 0.3);
        assert_eq!(state.volume(), 0.3);
    }

    #[test]
    fn volume_rejects_nan() {
        let state = PlayerState::default().with_volume(f64::NAN);
        assert_eq!(state.volume(), DEFAULT_VOLUME);
        assert_eq!(PlayerState::default().with_volume(3.0).volume(), 1.0);
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_percentage(-5.0), Some(0.0));
        assert_eq!(clamp_percentage(150.0), Some(100.0));
        assert_eq!(clamp_percentage(f64::INFINITY), None);
        assert_eq!(clamp_volume(-0.1), Some(0.0));
        assert_eq!(clamp_volume(f64::NAN), None);
    }

    #[test]
    fn ending_stops_at_the_end() {
        let state = PlayerState::default().toggled_play().ended();
        assert!(!state.playing());
        assert_eq!(state.percentage(), 100.0);
    }
}
