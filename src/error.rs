use crate::media::MediaCommand;
use gstreamer as gst;

/// Errors raised by the media backend and the player controller.
///
/// Pipeline construction errors are fatal to the `Video` that raised them.
/// Everything a controller operation returns is non-fatal: the widget keeps
/// running and the caller decides whether to surface it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Glib(#[from] glib::Error),
    #[error("{0}")]
    Bool(#[from] glib::BoolError),
    #[error("failed to change pipeline state: {0}")]
    StateChange(#[from] gst::StateChangeError),
    #[error("failed to cast gstreamer element")]
    Cast,
    #[error("failed to read stream caps")]
    Caps,
    #[error("invalid framerate: {0}")]
    Framerate(f64),
    /// Position arrived before the duration metadata was known.
    #[error("media duration is not known yet")]
    UnknownDuration,
    /// The host declined a play, pause or fullscreen request.
    #[error("{command} was rejected: {reason}")]
    PlaybackRejected {
        command: MediaCommand,
        reason: String,
    },
    #[error("seek percentage {0} is not a valid position")]
    SeekOutOfRange(f64),
}

impl Error {
    pub(crate) fn rejected(command: MediaCommand, reason: impl ToString) -> Self {
        Self::PlaybackRejected {
            command,
            reason: reason.to_string(),
        }
    }
}
