use crate::Error;
use crate::media::{MediaCommand, MediaElement};

/// Keeps the element's play/pause actuation in step with the intended
/// `playing` flag.
///
/// A command is issued only when `playing` differs from the last value
/// successfully applied, so unrelated state updates never reach the element.
#[derive(Debug, Clone)]
pub struct PlaybackReconciler {
    applied: bool,
}

impl PlaybackReconciler {
    /// `applied` is the value the element already reflects at mount.
    pub fn new(applied: bool) -> Self {
        Self { applied }
    }

    /// Last `playing` value the element accepted.
    pub fn applied(&self) -> bool {
        self.applied
    }

    /// Issue play or pause if `playing` changed since the last call.
    ///
    /// On rejection the applied value is left untouched, so the caller can
    /// roll its intent back to [`PlaybackReconciler::applied`].
    pub fn reconcile<M>(&mut self, playing: bool, media: &M) -> Result<Option<MediaCommand>, Error>
    where
        M: MediaElement + ?Sized,
    {
        if playing == self.applied {
            return Ok(None);
        }

        let command = if playing {
            MediaCommand::Play
        } else {
            MediaCommand::Pause
        };
        let result = match command {
            MediaCommand::Play => media.play(),
            _ => media.pause(),
        };

        match result {
            Ok(()) => {
                log::debug!("reconciled playback: {command}");
                self.applied = playing;
                Ok(Some(command))
            }
            Err(err @ Error::PlaybackRejected { .. }) => Err(err),
            Err(err) => Err(Error::rejected(command, err)),
        }
    }

    /// Record a change the host made on its own, such as reaching the end.
    pub(crate) fn settle(&mut self, playing: bool) {
        self.applied = playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMedia;

    #[test]
    fn fires_only_on_change() {
        let media = FakeMedia::default();
        let mut reconciler = PlaybackReconciler::new(false);

        assert_eq!(reconciler.reconcile(false, &media).unwrap(), None);
        assert_eq!(
            reconciler.reconcile(true, &media).unwrap(),
            Some(MediaCommand::Play)
        );
        assert_eq!(reconciler.reconcile(true, &media).unwrap(), None);
        assert_eq!(
            reconciler.reconcile(false, &media).unwrap(),
            Some(MediaCommand::Pause)
        );
        assert_eq!(media.commands(), vec![MediaCommand::Play, MediaCommand::Pause]);
    }

    #[test]
    fn rejection_keeps_applied_value() {
        let media = FakeMedia::default();
        media.reject(MediaCommand::Play);
        let mut reconciler = PlaybackReconciler::new(false);

        let err = reconciler.reconcile(true, &media).unwrap_err();
        assert!(matches!(
            err,
            Error::PlaybackRejected {
                command: MediaCommand::Play,
                ..
            }
        ));
        assert!(!reconciler.applied());
    }

    #[test]
    fn settle_suppresses_redundant_pause() {
        let media = FakeMedia::default();
        let mut reconciler = PlaybackReconciler::new(true);
        reconciler.settle(false);
        assert_eq!(reconciler.reconcile(false, &media).unwrap(), None);
        assert!(media.commands().is_empty());
    }
}
