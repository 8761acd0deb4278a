//! Presentation helpers for the control bar.

use gpui::{Bounds, Hsla, IsZero, Pixels, Point, Styled, canvas, fill, hsla, point, px, size};
use std::time::Duration;

/// Which slider a drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slider {
    Seek,
    Volume,
}

/// Horizontal position of `position` along `bounds`, clamped to `[0, 1]`.
pub(crate) fn track_ratio(bounds: Bounds<Pixels>, position: Point<Pixels>) -> Option<f32> {
    if bounds.size.width.is_zero() {
        return None;
    }
    let ratio = (position.x - bounds.origin.x) / bounds.size.width;
    ratio.is_finite().then(|| ratio.clamp(0.0, 1.0))
}

pub(crate) fn play_label(playing: bool) -> &'static str {
    if playing { "⏸" } else { "▶" }
}

/// Icon for the mute toggle, derived from what the slider shows.
pub(crate) fn volume_label(displayed_volume: f64) -> &'static str {
    if displayed_volume <= 0.0 {
        "🔇"
    } else if displayed_volume < 0.5 {
        "🔉"
    } else {
        "🔊"
    }
}

pub(crate) fn speed_label(speed: f64) -> String {
    format!("{speed}x")
}

pub(crate) fn format_time(time: Duration) -> String {
    let total = time.as_secs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// `elapsed / total` label; the total reads `--:--` until it is known.
pub(crate) fn time_label(percentage: f64, duration: Option<Duration>) -> String {
    match duration {
        Some(total) => {
            let elapsed = total.mul_f64(percentage.clamp(0.0, 100.0) / 100.0);
            format!("{} / {}", format_time(elapsed), format_time(total))
        }
        None => "0:00 / --:--".to_string(),
    }
}

/// A slider track filled up to `progress` with a round thumb at its end.
pub(crate) fn slider_track(progress: f32, accent: Hsla) -> gpui::Canvas<()> {
    let progress = progress.clamp(0.0, 1.0);

    canvas(
        move |_, _, _| {},
        move |bounds, _, window, _| {
            let track_height = px(4.0);
            let center_y = bounds.center().y;
            let track = Bounds {
                origin: point(bounds.origin.x, center_y - track_height / 2.0),
                size: size(bounds.size.width, track_height),
            };
            window.paint_quad(fill(track, hsla(0.0, 0.0, 1.0, 0.2)));

            let fill_width = bounds.size.width * progress;
            if fill_width > px(0.0) {
                let filled = Bounds {
                    origin: track.origin,
                    size: size(fill_width, track_height),
                };
                window.paint_quad(fill(filled, accent));
            }

            let thumb = px(10.0);
            let thumb_bounds = Bounds {
                origin: point(
                    bounds.origin.x + fill_width - thumb / 2.0,
                    center_y - thumb / 2.0,
                ),
                size: size(thumb, thumb),
            };
            window.paint_quad(fill(thumb_bounds, accent).corner_radii(thumb / 2.0));
        },
    )
    .size_full()
}
