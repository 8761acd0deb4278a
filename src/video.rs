use crate::Error;
use crate::media::{MediaCommand, MediaElement};
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_app::prelude::*;
use gstreamer_video as gst_video;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Something the pipeline reported on its bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaNotice {
    /// Playback reached the end of the stream.
    Ended,
    /// The duration became known or changed.
    DurationChanged,
    Error(String),
}

#[derive(Debug)]
pub(crate) struct Frame(gst::Sample);

impl Frame {
    pub fn empty() -> Self {
        Self(gst::Sample::builder().build())
    }

    pub fn readable(&self) -> Option<gst::BufferMap<'_, gst::buffer::Readable>> {
        self.0.buffer().and_then(|x| x.map_readable().ok())
    }
}

#[derive(Debug)]
pub(crate) struct Internal {
    pub(crate) bus: gst::Bus,
    pub(crate) source: gst::Pipeline,
    pub(crate) alive: Arc<AtomicBool>,
    pub(crate) worker: Option<std::thread::JoinHandle<()>>,

    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) framerate: f64,
    pub(crate) speed: f64,

    pub(crate) frame: Arc<Mutex<Frame>>,
    pub(crate) upload_frame: Arc<AtomicBool>,
    pub(crate) time_advanced: Arc<AtomicBool>,
    pub(crate) is_eos: bool,
    pub(crate) fullscreen_requested: bool,
}

impl Internal {
    /// A flushing seek also leaves the end-of-stream condition.
    pub(crate) fn seek(&mut self, position: Duration) -> Result<(), Error> {
        self.source.seek(
            self.speed,
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::SeekType::Set,
            gst::ClockTime::from_nseconds(position.as_nanos() as u64),
            gst::SeekType::None,
            gst::ClockTime::NONE,
        )?;
        self.is_eos = false;
        Ok(())
    }

    pub(crate) fn set_speed(&mut self, speed: f64) -> Result<(), Error> {
        let position = self
            .source
            .query_position::<gst::ClockTime>()
            .ok_or_else(|| glib::bool_error!("playback position is not known"))?;
        self.source.seek(
            speed,
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::SeekType::Set,
            position,
            gst::SeekType::End,
            gst::ClockTime::ZERO,
        )?;
        self.speed = speed;
        Ok(())
    }

    pub(crate) fn set_paused(&mut self, paused: bool) -> Result<(), Error> {
        let (command, target) = if paused {
            (MediaCommand::Pause, gst::State::Paused)
        } else {
            (MediaCommand::Play, gst::State::Playing)
        };

        if !paused && self.is_eos {
            self.seek(Duration::ZERO)
                .map_err(|err| Error::rejected(command, err))?;
        }

        self.source
            .set_state(target)
            .map_err(|err| Error::rejected(command, err))?;
        Ok(())
    }

    pub(crate) fn paused(&self) -> bool {
        self.source.state(gst::ClockTime::ZERO).1 == gst::State::Paused
    }
}

/// A video loaded from a URI (e.g., a local file path or HTTP stream).
///
/// Cloning is cheap and shares the same pipeline.
#[derive(Debug, Clone)]
pub struct Video(pub(crate) Arc<RwLock<Internal>>);

impl Drop for Video {
    fn drop(&mut self) {
        if Arc::strong_count(&self.0) != 1 {
            return;
        }
        if let Some(mut inner) = self.0.try_write() {
            if let Err(err) = inner.source.set_state(gst::State::Null) {
                log::error!("failed to shut down pipeline: {err}");
            }

            inner.alive.store(false, Ordering::SeqCst);
            if let Some(worker) = inner.worker.take() {
                if let Err(err) = worker.join() {
                    match err.downcast_ref::<String>() {
                        Some(e) => log::error!("Video thread panicked: {e}"),
                        None => log::error!("Video thread panicked with unknown reason"),
                    }
                }
            }
        }
    }
}

impl Video {
    /// Load the media at `uri` into a paused `playbin`.
    pub fn new(uri: &url::Url) -> Result<Self, Error> {
        gst::init()?;

        let pipeline = format!(
            "playbin uri=\"{}\" video-sink=\"videoscale ! videoconvert ! appsink name=widget_video drop=true caps=video/x-raw,format=NV12,pixel-aspect-ratio=1/1\"",
            uri.as_str()
        );
        let pipeline = gst::parse::launch(pipeline.as_ref())?
            .downcast::<gst::Pipeline>()
            .map_err(|_| Error::Cast)?;

        let sink_bin: gst::Element = pipeline.property("video-sink");
        let video_sink = sink_bin
            .pads()
            .first()
            .cloned()
            .and_then(|pad| pad.dynamic_cast::<gst::GhostPad>().ok())
            .and_then(|pad| pad.parent_element())
            .and_then(|bin| bin.downcast::<gst::Bin>().ok())
            .and_then(|bin| bin.by_name("widget_video"))
            .and_then(|sink| sink.downcast::<gst_app::AppSink>().ok())
            .ok_or(Error::Cast)?;

        Self::from_gst_pipeline(pipeline, video_sink)
    }

    /// Wrap an existing pipeline whose frames arrive on `video_sink` as NV12.
    ///
    /// The pipeline is prerolled and left paused.
    pub fn from_gst_pipeline(
        pipeline: gst::Pipeline,
        video_sink: gst_app::AppSink,
    ) -> Result<Self, Error> {
        gst::init()?;

        macro_rules! cleanup {
            ($expr:expr) => {
                $expr.map_err(|e| {
                    let _ = pipeline.set_state(gst::State::Null);
                    e
                })
            };
        }

        let pad = cleanup!(video_sink.pads().first().cloned().ok_or(Error::Caps))?;

        cleanup!(pipeline.set_state(gst::State::Paused))?;
        cleanup!(pipeline.state(gst::ClockTime::from_seconds(5)).0)?;

        let caps = cleanup!(pad.current_caps().ok_or(Error::Caps))?;
        let vinfo = cleanup!(gst_video::VideoInfo::from_caps(&caps).map_err(|_| Error::Caps))?;
        let width = vinfo.width() as i32;
        let height = vinfo.height() as i32;
        let framerate = vinfo.fps().numer() as f64 / vinfo.fps().denom() as f64;

        if !framerate.is_finite() || framerate <= 0.0 {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(Error::Framerate(framerate));
        }

        let bus = cleanup!(pipeline.bus().ok_or(Error::Cast))?;

        let frame = Arc::new(Mutex::new(Frame::empty()));
        let upload_frame = Arc::new(AtomicBool::new(false));
        let time_advanced = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));

        let frame_ref = Arc::clone(&frame);
        let upload_frame_ref = Arc::clone(&upload_frame);
        let time_advanced_ref = Arc::clone(&time_advanced);
        let alive_ref = Arc::clone(&alive);
        let pipeline_ref = pipeline.clone();

        let worker = std::thread::spawn(move || {
            let mut last_pts = None;

            while alive_ref.load(Ordering::Acquire) {
                let playing = pipeline_ref.state(gst::ClockTime::ZERO).1 == gst::State::Playing;
                let timeout = gst::ClockTime::from_mseconds(16);
                let sample = if playing {
                    video_sink.try_pull_sample(timeout)
                } else {
                    video_sink.try_pull_preroll(timeout)
                };
                let Some(sample) = sample else {
                    if !playing {
                        std::thread::sleep(Duration::from_millis(16));
                    }
                    continue;
                };

                let Some(pts) = sample.buffer().and_then(|buffer| buffer.pts()) else {
                    log::error!("error processing frame: sample without timestamp");
                    continue;
                };
                if last_pts == Some(pts) {
                    std::thread::sleep(Duration::from_millis(16));
                    continue;
                }
                last_pts = Some(pts);

                *frame_ref.lock() = Frame(sample);
                upload_frame_ref.store(true, Ordering::SeqCst);
                if playing {
                    time_advanced_ref.store(true, Ordering::SeqCst);
                }
            }
        });

        Ok(Video(Arc::new(RwLock::new(Internal {
            bus,
            source: pipeline,
            alive,
            worker: Some(worker),

            width,
            height,
            framerate,
            speed: 1.0,

            frame,
            upload_frame,
            time_advanced,
            is_eos: false,
            fullscreen_requested: false,
        }))))
    }

    pub(crate) fn read(&self) -> parking_lot::RwLockReadGuard<'_, Internal> {
        self.0.read()
    }

    pub(crate) fn write(&self) -> parking_lot::RwLockWriteGuard<'_, Internal> {
        self.0.write()
    }

    /// Get the size/resolution of the video as `(width, height)`.
    pub fn size(&self) -> (i32, i32) {
        let inner = self.read();
        (inner.width, inner.height)
    }

    /// Get the framerate of the video as frames per second.
    pub fn framerate(&self) -> f64 {
        self.read().framerate
    }

    /// Get if the stream ended or not.
    pub fn eos(&self) -> bool {
        self.read().is_eos
    }

    /// Get if the media is paused or not.
    pub fn paused(&self) -> bool {
        self.read().paused()
    }

    /// Get the underlying GStreamer pipeline.
    pub fn pipeline(&self) -> gst::Pipeline {
        self.read().source.clone()
    }

    /// Consume the "new frame decoded" flag.
    pub fn take_frame_ready(&self) -> bool {
        self.read().upload_frame.swap(false, Ordering::SeqCst)
    }

    /// Consume the "position advanced" notification.
    pub fn take_time_update(&self) -> bool {
        self.read().time_advanced.swap(false, Ordering::SeqCst)
    }

    /// Consume a pending fullscreen request.
    pub fn take_fullscreen_request(&self) -> bool {
        std::mem::take(&mut self.write().fullscreen_requested)
    }

    /// Drain end-of-stream, duration and error messages from the bus.
    pub fn drain_notices(&self) -> Vec<MediaNotice> {
        let mut inner = self.write();
        let mut notices = Vec::new();

        while let Some(msg) = inner.bus.pop_filtered(&[
            gst::MessageType::Error,
            gst::MessageType::Eos,
            gst::MessageType::DurationChanged,
        ]) {
            match msg.view() {
                gst::MessageView::Error(err) => {
                    log::error!("GStreamer error: {}", err.error());
                    notices.push(MediaNotice::Error(err.error().to_string()));
                }
                gst::MessageView::Eos(_) => {
                    // An ended element reports paused until it is played again.
                    if let Err(err) = inner.source.set_state(gst::State::Paused) {
                        log::error!("failed to pause ended pipeline: {err}");
                    }
                    inner.is_eos = true;
                    notices.push(MediaNotice::Ended);
                }
                gst::MessageView::DurationChanged(_) => {
                    notices.push(MediaNotice::DurationChanged);
                }
                _ => {}
            }
        }

        notices
    }

    /// Get the current NV12 frame data if available.
    pub fn current_frame_data(&self) -> Option<(Vec<u8>, u32, u32)> {
        let inner = self.read();
        let frame = inner.frame.lock();
        let readable = frame.readable()?;
        let data = readable.as_slice().to_vec();
        (!data.is_empty()).then(|| (data, inner.width as u32, inner.height as u32))
    }
}

impl MediaElement for Video {
    fn play(&self) -> Result<(), Error> {
        self.write().set_paused(false)
    }

    fn pause(&self) -> Result<(), Error> {
        self.write().set_paused(true)
    }

    /// Latched until the view picks it up with [`Video::take_fullscreen_request`];
    /// the window, not the pipeline, owns presentation.
    fn request_fullscreen(&self) -> Result<(), Error> {
        self.write().fullscreen_requested = true;
        Ok(())
    }

    fn current_time(&self) -> Duration {
        Duration::from_nanos(
            self.read()
                .source
                .query_position::<gst::ClockTime>()
                .map_or(0, |pos| pos.nseconds()),
        )
    }

    fn seek(&self, position: Duration) -> Result<(), Error> {
        self.write().seek(position)
    }

    fn duration(&self) -> Option<Duration> {
        self.read()
            .source
            .query_duration::<gst::ClockTime>()
            .map(|duration| Duration::from_nanos(duration.nseconds()))
            .filter(|duration| !duration.is_zero())
    }

    fn volume(&self) -> f64 {
        self.read().source.property("volume")
    }

    fn set_volume(&self, volume: f64) {
        let muted = self.muted();
        {
            let inner = self.write();
            inner.source.set_property("volume", volume.clamp(0.0, 1.0));
        }
        self.set_muted(muted);
    }

    fn muted(&self) -> bool {
        self.read().source.property("mute")
    }

    fn set_muted(&self, muted: bool) {
        self.write().source.set_property("mute", muted);
    }

    fn playback_rate(&self) -> f64 {
        self.read().speed
    }

    fn set_playback_rate(&self, rate: f64) -> Result<(), Error> {
        self.write().set_speed(rate)
    }
}
