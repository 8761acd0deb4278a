use crate::Error;
use crate::config::PlayerConfig;
use crate::controller::PlayerController;
use crate::controls::{
    Slider, play_label, slider_track, speed_label, time_label, track_ratio, volume_label,
};
use crate::element::video_surface;
use crate::media::MediaElement;
use crate::state::PlayerState;
use crate::video::{MediaNotice, Video};
use gpui::prelude::*;
use gpui::{
    AnyElement, Bounds, Context, DispatchPhase, EventEmitter, MouseButton, MouseDownEvent,
    MouseMoveEvent, MouseUpEvent, Pixels, Point, Window, div, hsla, px, rgb,
};
use std::time::{Duration, Instant};

/// Events that can be emitted by the video player.
#[derive(Debug, Clone)]
pub enum VideoPlayerEvent {
    /// Video reached end of stream.
    EndOfStream,
    /// The mirrored player state changed.
    StateChanged(PlayerState),
    /// The host declined play, pause or fullscreen.
    PlaybackRejected(String),
    /// Error occurred during playback.
    Error(String),
}

/// Video player widget: the video surface plus its control bar.
pub struct VideoPlayerView {
    controller: PlayerController<Video>,
    width: Option<Pixels>,
    height: Option<Pixels>,
    seek_bounds: Option<Bounds<Pixels>>,
    volume_bounds: Option<Bounds<Pixels>>,
    dragging: Option<Slider>,
    last_seek_at: Option<Instant>,
}

impl VideoPlayerView {
    const SEEK_THROTTLE: Duration = Duration::from_millis(100);

    /// Create a new video player view.
    pub fn new(video: Video, config: PlayerConfig) -> Self {
        Self {
            controller: PlayerController::new(video, config),
            width: None,
            height: None,
            seek_bounds: None,
            volume_bounds: None,
            dragging: None,
            last_seek_at: None,
        }
    }

    /// Set the width of the video surface.
    pub fn width(mut self, width: Pixels) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height of the video surface.
    pub fn height(mut self, height: Pixels) -> Self {
        self.height = Some(height);
        self
    }

    pub fn state(&self) -> PlayerState {
        self.controller.state()
    }

    /// Get a reference to the underlying video.
    pub fn video(&self) -> &Video {
        self.controller.media()
    }

    pub fn controller_mut(&mut self) -> &mut PlayerController<Video> {
        &mut self.controller
    }

    /// Surface the outcome of a controller operation to subscribers.
    fn report(&mut self, result: Result<(), Error>, cx: &mut Context<Self>) {
        match result {
            Ok(()) => cx.emit(VideoPlayerEvent::StateChanged(self.controller.state())),
            Err(Error::UnknownDuration) => log::trace!("duration not known yet"),
            Err(err @ Error::PlaybackRejected { .. }) => {
                cx.emit(VideoPlayerEvent::PlaybackRejected(err.to_string()));
            }
            Err(err) => {
                log::warn!("player operation failed: {err}");
                cx.emit(VideoPlayerEvent::Error(err.to_string()));
            }
        }
        cx.notify();
    }

    /// Handle bus messages, position advances and pending fullscreen requests.
    fn poll_media(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        for notice in self.video().drain_notices() {
            match notice {
                MediaNotice::Ended => {
                    self.controller.on_ended();
                    cx.emit(VideoPlayerEvent::EndOfStream);
                    cx.notify();
                }
                MediaNotice::DurationChanged => {
                    let result = self.controller.handle_time_update();
                    self.report(result, cx);
                }
                MediaNotice::Error(message) => cx.emit(VideoPlayerEvent::Error(message)),
            }
        }

        if self.dragging != Some(Slider::Seek) && self.video().take_time_update() {
            let result = self.controller.handle_time_update();
            self.report(result, cx);
        }

        if self.video().take_fullscreen_request() {
            window.toggle_fullscreen();
        }
    }

    fn toggle_play(&mut self, cx: &mut Context<Self>) {
        let result = self.controller.toggle_play();
        self.report(result, cx);
    }

    fn toggle_mute(&mut self, cx: &mut Context<Self>) {
        let result = self.controller.toggle_mute();
        self.report(result, cx);
    }

    fn select_speed(&mut self, speed: f64, cx: &mut Context<Self>) {
        let result = self.controller.set_speed(speed);
        self.report(result, cx);
    }

    fn expand(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let result = self.controller.request_expand();
        if result.is_ok() && self.video().take_fullscreen_request() {
            window.toggle_fullscreen();
        }
        self.report(result, cx);
    }

    fn begin_drag(&mut self, slider: Slider, position: Point<Pixels>, cx: &mut Context<Self>) {
        self.dragging = Some(slider);
        self.last_seek_at = None;
        self.drag_to(position, true, cx);
    }

    fn drag_to(&mut self, position: Point<Pixels>, force: bool, cx: &mut Context<Self>) {
        let Some(slider) = self.dragging else {
            return;
        };
        let bounds = match slider {
            Slider::Seek => self.seek_bounds,
            Slider::Volume => self.volume_bounds,
        };
        let Some(ratio) = bounds.and_then(|bounds| track_ratio(bounds, position)) else {
            return;
        };

        let result = match slider {
            Slider::Seek => {
                let now = Instant::now();
                if !force
                    && let Some(last) = self.last_seek_at
                    && now.duration_since(last) < Self::SEEK_THROTTLE
                {
                    return;
                }
                self.last_seek_at = Some(now);
                self.controller.seek_to(ratio as f64 * 100.0)
            }
            Slider::Volume => self.controller.adjust_volume(ratio as f64),
        };
        self.report(result, cx);
    }

    fn end_drag(&mut self, position: Point<Pixels>, cx: &mut Context<Self>) {
        self.drag_to(position, true, cx);
        self.dragging = None;
        self.last_seek_at = None;
    }

    fn button(
        id: &'static str,
        label: impl Into<gpui::SharedString>,
    ) -> gpui::Stateful<gpui::Div> {
        div()
            .id(id)
            .flex()
            .items_center()
            .justify_center()
            .px_2()
            .py_1()
            .rounded_md()
            .cursor_pointer()
            .text_color(hsla(0.0, 0.0, 1.0, 0.9))
            .hover(|style| style.bg(hsla(0.0, 0.0, 1.0, 0.15)))
            .child(label.into())
    }

    fn slider(
        id: &'static str,
        slider: Slider,
        progress: f32,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let handle = cx.entity();
        div()
            .flex()
            .items_center()
            .w_full()
            .h(px(16.0))
            .on_children_prepainted(move |bounds, _window, cx| {
                let bounds = bounds.first().copied();
                handle.update(cx, |this, _| match slider {
                    Slider::Seek => this.seek_bounds = bounds,
                    Slider::Volume => this.volume_bounds = bounds,
                });
            })
            .child(slider_track(progress, hsla(0.58, 0.9, 0.6, 1.0)))
            .id(id)
            .cursor_pointer()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, event: &MouseDownEvent, _window, cx| {
                    this.begin_drag(slider, event.position, cx);
                }),
            )
            .into_any_element()
    }
}

impl EventEmitter<VideoPlayerEvent> for VideoPlayerView {}

impl Render for VideoPlayerView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.poll_media(window, cx);

        if self.dragging.is_some() {
            let handle = cx.entity();
            window.on_mouse_event(move |event: &MouseMoveEvent, phase, window, cx| {
                if phase != DispatchPhase::Capture {
                    return;
                }
                handle.update(cx, |this, cx| this.drag_to(event.position, false, cx));
                window.refresh();
            });

            let handle = cx.entity();
            window.on_mouse_event(move |event: &MouseUpEvent, phase, window, cx| {
                if phase != DispatchPhase::Capture || event.button != MouseButton::Left {
                    return;
                }
                handle.update(cx, |this, cx| this.end_drag(event.position, cx));
                window.refresh();
            });
        }

        let state = self.controller.state();
        let controls = self.controller.config().control_set();
        let speeds = self.controller.config().speed_options().to_vec();
        let duration = self.video().duration();

        if state.playing() {
            window.request_animation_frame();
        }

        let mut surface = video_surface(self.video().clone()).id("video-surface");
        if let (Some(width), Some(height)) = (self.width, self.height) {
            surface = surface.size(width, height);
        }

        let play_pause = Self::button("play-pause", play_label(state.playing())).on_click(
            cx.listener(|this, _event, _window, cx| {
                this.toggle_play(cx);
            }),
        );

        let speed_selector = div().flex().items_center().gap_1().children(
            speeds
                .into_iter()
                .enumerate()
                .map(|(ix, speed)| {
                    let selected = speed == state.speed();
                    div()
                        .id(("speed", ix))
                        .px_2()
                        .py_1()
                        .rounded_md()
                        .cursor_pointer()
                        .text_sm()
                        .text_color(if selected {
                            hsla(0.0, 0.0, 1.0, 1.0)
                        } else {
                            hsla(0.0, 0.0, 1.0, 0.5)
                        })
                        .when(selected, |this| this.bg(hsla(0.0, 0.0, 1.0, 0.15)))
                        .child(speed_label(speed))
                        .on_click(cx.listener(move |this, _event, _window, cx| {
                            this.select_speed(speed, cx);
                        }))
                })
                .collect::<Vec<_>>(),
        );

        let mut volume_group = div().flex().items_center().gap_2();
        if controls.has_mute() {
            volume_group = volume_group.child(
                Self::button("mute", volume_label(state.displayed_volume())).on_click(
                    cx.listener(|this, _event, _window, cx| {
                        this.toggle_mute(cx);
                    }),
                ),
            );
        }
        if controls.has_volume() {
            volume_group = volume_group.child(div().w(px(96.0)).child(Self::slider(
                "volume-track",
                Slider::Volume,
                state.displayed_volume() as f32,
                cx,
            )));
        }

        let mut right_group = div()
            .flex()
            .items_center()
            .gap_3()
            .child(speed_selector)
            .child(volume_group);
        if controls.has_fullscreen() {
            right_group = right_group.child(Self::button("fullscreen", "⛶").on_click(
                cx.listener(|this, _event, window, cx| {
                    this.expand(window, cx);
                }),
            ));
        }

        let seek_bar = div().w_full().px_2().child(Self::slider(
            "seek-track",
            Slider::Seek,
            (state.percentage() / 100.0) as f32,
            cx,
        ));

        let control_bar = div()
            .flex()
            .items_center()
            .justify_between()
            .w_full()
            .px_2()
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(play_pause)
                    .child(
                        div()
                            .text_sm()
                            .text_color(hsla(0.0, 0.0, 1.0, 0.6))
                            .child(time_label(state.percentage(), duration)),
                    ),
            )
            .child(right_group);

        div()
            .flex()
            .flex_col()
            .items_center()
            .gap_2()
            .p_2()
            .rounded_lg()
            .bg(rgb(0x111111))
            .child(surface)
            .child(seek_bar)
            .child(control_bar)
    }
}

/// Helper function to create a video player view.
pub fn video_player(video: Video, config: PlayerConfig) -> VideoPlayerView {
    VideoPlayerView::new(video, config)
}

/// Helper function to create a video player from a URI.
pub fn video_player_from_uri(
    uri: &url::Url,
    config: PlayerConfig,
) -> Result<VideoPlayerView, Error> {
    Ok(video_player(Video::new(uri)?, config))
}
