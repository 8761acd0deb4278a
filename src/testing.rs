use crate::Error;
use crate::media::{MediaCommand, MediaElement};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// In-memory media element that records what the player asked of it.
#[derive(Debug)]
pub(crate) struct FakeMedia {
    pub(crate) paused: Cell<bool>,
    pub(crate) position: Cell<Duration>,
    pub(crate) duration: Cell<Option<Duration>>,
    pub(crate) volume: Cell<f64>,
    /// Highest volume the host accepts.
    pub(crate) max_volume: Cell<f64>,
    pub(crate) muted: Cell<bool>,
    pub(crate) rate: Cell<f64>,
    pub(crate) reject_seeks: Cell<bool>,
    /// Set once playback runs off the end; cleared by a seek.
    pub(crate) ended: Cell<bool>,
    commands: RefCell<Vec<MediaCommand>>,
    rejected: RefCell<Vec<MediaCommand>>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            paused: Cell::new(true),
            position: Cell::new(Duration::ZERO),
            duration: Cell::new(Some(Duration::from_secs(200))),
            volume: Cell::new(0.5),
            max_volume: Cell::new(1.0),
            muted: Cell::new(false),
            rate: Cell::new(1.0),
            reject_seeks: Cell::new(false),
            ended: Cell::new(false),
            commands: RefCell::new(Vec::new()),
            rejected: RefCell::new(Vec::new()),
        }
    }
}

impl FakeMedia {
    pub(crate) fn reject(&self, command: MediaCommand) {
        self.rejected.borrow_mut().push(command);
    }

    /// Run to the end of the stream, leaving the element paused.
    pub(crate) fn finish(&self) {
        if let Some(duration) = self.duration.get() {
            self.position.set(duration);
        }
        self.paused.set(true);
        self.ended.set(true);
    }

    pub(crate) fn commands(&self) -> Vec<MediaCommand> {
        self.commands.borrow().clone()
    }

    fn issue(&self, command: MediaCommand) -> Result<(), Error> {
        if self.rejected.borrow().contains(&command) {
            return Err(Error::rejected(command, "blocked by host policy"));
        }
        self.commands.borrow_mut().push(command);
        Ok(())
    }
}

impl MediaElement for FakeMedia {
    fn play(&self) -> Result<(), Error> {
        self.issue(MediaCommand::Play)?;
        if self.ended.replace(false) {
            self.position.set(Duration::ZERO);
        }
        self.paused.set(false);
        Ok(())
    }

    fn pause(&self) -> Result<(), Error> {
        self.issue(MediaCommand::Pause)?;
        self.paused.set(true);
        Ok(())
    }

    fn request_fullscreen(&self) -> Result<(), Error> {
        self.issue(MediaCommand::Fullscreen)
    }

    fn current_time(&self) -> Duration {
        self.position.get()
    }

    fn seek(&self, position: Duration) -> Result<(), Error> {
        if self.reject_seeks.get() {
            return Err(Error::Bool(glib::bool_error!("seek rejected")));
        }
        self.position.set(position);
        self.ended.set(false);
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration.get()
    }

    fn volume(&self) -> f64 {
        self.volume.get()
    }

    fn set_volume(&self, volume: f64) {
        self.volume.set(volume.min(self.max_volume.get()));
    }

    fn muted(&self) -> bool {
        self.muted.get()
    }

    fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    fn playback_rate(&self) -> f64 {
        self.rate.get()
    }

    fn set_playback_rate(&self, rate: f64) -> Result<(), Error> {
        self.rate.set(rate);
        Ok(())
    }
}
