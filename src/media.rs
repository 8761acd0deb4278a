use crate::Error;
use std::fmt;
use std::time::Duration;

/// Commands the widget issues to the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCommand {
    Play,
    Pause,
    Fullscreen,
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaCommand::Play => "play",
            MediaCommand::Pause => "pause",
            MediaCommand::Fullscreen => "fullscreen",
        })
    }
}

/// The host capability the player drives.
///
/// The media element is the single owner of true playback position, rate
/// and volume. The player only mirrors these values, so every getter here
/// reads the live value rather than something cached by the caller.
pub trait MediaElement {
    /// Start playback.
    fn play(&self) -> Result<(), Error>;

    /// Stop playback, keeping the current position.
    fn pause(&self) -> Result<(), Error>;

    /// Ask the host to present the media fullscreen.
    fn request_fullscreen(&self) -> Result<(), Error>;

    /// Current playback position.
    fn current_time(&self) -> Duration;

    /// Jump to an absolute position.
    fn seek(&self, position: Duration) -> Result<(), Error>;

    /// Total media duration, `None` until the metadata has been loaded.
    fn duration(&self) -> Option<Duration>;

    /// Effective output volume in `[0, 1]`.
    fn volume(&self) -> f64;

    fn set_volume(&self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&self, rate: f64) -> Result<(), Error>;
}
