use crate::state::{DEFAULT_SPEED, DEFAULT_VOLUME, clamp_volume};

/// Which controls the widget exposes.
///
/// Each preset adds to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlSet {
    /// Play/pause, seek bar and a speed selector.
    Basic,
    /// Adds a volume slider.
    WithVolume,
    /// Adds a mute toggle and a fullscreen trigger.
    #[default]
    Full,
}

impl ControlSet {
    pub fn default_speeds(self) -> &'static [f64] {
        match self {
            ControlSet::Basic => &[1.0, 2.0, 3.0, 4.0, 5.0],
            ControlSet::WithVolume | ControlSet::Full => &[1.0, 2.0, 3.0, 4.0],
        }
    }

    pub fn has_volume(self) -> bool {
        !matches!(self, ControlSet::Basic)
    }

    pub fn has_mute(self) -> bool {
        matches!(self, ControlSet::Full)
    }

    pub fn has_fullscreen(self) -> bool {
        matches!(self, ControlSet::Full)
    }
}

/// Widget configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    controls: ControlSet,
    speeds: Vec<f64>,
    initial_volume: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new(ControlSet::default())
    }
}

impl PlayerConfig {
    pub fn new(controls: ControlSet) -> Self {
        Self {
            controls,
            speeds: controls.default_speeds().to_vec(),
            initial_volume: DEFAULT_VOLUME,
        }
    }

    /// Replace the speed options. Non-positive or non-finite entries are
    /// dropped; an empty list leaves the current options in place.
    pub fn speeds(mut self, speeds: impl IntoIterator<Item = f64>) -> Self {
        let mut speeds: Vec<f64> = speeds
            .into_iter()
            .filter(|s| s.is_finite() && *s > 0.0)
            .collect();
        speeds.sort_by(f64::total_cmp);
        speeds.dedup();
        if speeds.is_empty() {
            log::warn!("ignoring empty speed list");
        } else {
            self.speeds = speeds;
        }
        self
    }

    /// Volume the player applies to the element at mount.
    pub fn initial_volume(mut self, volume: f64) -> Self {
        self.initial_volume = clamp_volume(volume).unwrap_or(DEFAULT_VOLUME);
        self
    }

    pub fn control_set(&self) -> ControlSet {
        self.controls
    }

    pub fn speed_options(&self) -> &[f64] {
        &self.speeds
    }

    pub fn volume(&self) -> f64 {
        self.initial_volume
    }

    /// Closest configured speed to `requested`.
    pub fn snap_speed(&self, requested: f64) -> f64 {
        if !requested.is_finite() {
            return self
                .speeds
                .iter()
                .copied()
                .find(|s| *s == DEFAULT_SPEED)
                .unwrap_or(self.speeds[0]);
        }
        self.speeds
            .iter()
            .copied()
            .min_by(|a, b| (a - requested).abs().total_cmp(&(b - requested).abs()))
            .unwrap_or(DEFAULT_SPEED)
    }
}
