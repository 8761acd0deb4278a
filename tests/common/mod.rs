#![allow(dead_code)]

use gpui_video_widget::{Error, MediaCommand, MediaElement};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Media element double that records every play/pause/fullscreen call.
#[derive(Debug)]
pub struct RecordingMedia {
    pub position: Cell<Duration>,
    pub duration: Cell<Option<Duration>>,
    pub volume: Cell<f64>,
    pub muted: Cell<bool>,
    pub rate: Cell<f64>,
    pub paused: Cell<bool>,
    /// Set once playback runs off the end; cleared by a seek.
    pub ended: Cell<bool>,
    pub blocked: RefCell<Vec<MediaCommand>>,
    pub issued: RefCell<Vec<MediaCommand>>,
}

impl Default for RecordingMedia {
    fn default() -> Self {
        Self {
            position: Cell::new(Duration::ZERO),
            duration: Cell::new(Some(Duration::from_secs(596))),
            volume: Cell::new(0.5),
            muted: Cell::new(false),
            rate: Cell::new(1.0),
            paused: Cell::new(true),
            ended: Cell::new(false),
            blocked: RefCell::new(Vec::new()),
            issued: RefCell::new(Vec::new()),
        }
    }
}

impl RecordingMedia {
    pub fn issued(&self) -> Vec<MediaCommand> {
        self.issued.borrow().clone()
    }

    /// Run to the end of the stream; an ended element reports paused.
    pub fn finish(&self) {
        if let Some(duration) = self.duration.get() {
            self.position.set(duration);
        }
        self.paused.set(true);
        self.ended.set(true);
    }

    fn issue(&self, command: MediaCommand) -> Result<(), Error> {
        if self.blocked.borrow().contains(&command) {
            return Err(Error::PlaybackRejected {
                command,
                reason: "autoplay blocked".to_string(),
            });
        }
        self.issued.borrow_mut().push(command);
        Ok(())
    }
}

impl MediaElement for RecordingMedia {
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
        self.volume.set(volume);
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
