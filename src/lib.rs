//! # GPUI Video Widget
//!
//! A video player widget for GPUI with its own playback controls, using
//! GStreamer for media playback.
//!
//! ## Features
//!
//! - Play/pause, seek bar, volume slider, mute, speed selector, fullscreen
//! - Three control presets, from a bare seek-and-play bar to the full set
//! - Player state kept as a mirror of the media element, updated through
//!   pure transitions with side effects applied separately
//! - Play/pause reconciliation that reaches the pipeline once per change
//! - Event-driven architecture for handling player events
//!
//! The controller is generic over [`MediaElement`], so it can drive any
//! backend; [`Video`] is the GStreamer one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gpui_video_widget::{ControlSet, PlayerConfig, video_player_from_uri};
//! use url::Url;
//!
//! let uri = Url::parse("file:///path/to/video.mp4").unwrap();
//! let config = PlayerConfig::new(ControlSet::Full).initial_volume(0.8);
//! let player = video_player_from_uri(&uri, config).unwrap();
//!
//! // Open `player` as a view in your GPUI application
//! ```

mod config;
mod controller;
mod controls;
mod element;
mod error;
mod media;
mod reconcile;
mod state;
#[cfg(test)]
mod testing;
mod video;
mod video_player;

pub use config::{ControlSet, PlayerConfig};
pub use controller::PlayerController;
pub use element::{VideoSurface, video_surface};
pub use error::Error;
pub use media::{MediaCommand, MediaElement};
pub use reconcile::PlaybackReconciler;
pub use state::{DEFAULT_SPEED, DEFAULT_VOLUME, PlayerState, clamp_percentage, clamp_volume};
pub use video::{MediaNotice, Video};
pub use video_player::{VideoPlayerEvent, VideoPlayerView, video_player, video_player_from_uri};

// Re-export commonly used types
pub use gstreamer as gst;
pub use url::Url;
