use gpui::{App, Application, Entity, WindowOptions, prelude::*, px};
use gpui_video_widget::{
    ControlSet, PlayerConfig, VideoPlayerEvent, VideoPlayerView, video_player_from_uri,
};
use std::path::PathBuf;
use url::Url;

/// `cargo run --example player -- [basic|volume|full] [path]`
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let controls = match args.next().as_deref() {
        Some("basic") => ControlSet::Basic,
        Some("volume") => ControlSet::WithVolume,
        _ => ControlSet::Full,
    };
    let path = args.next().map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("./assets/test3.mp4")
    });

    Application::new().run(move |cx: &mut App| {
        let uri = Url::from_file_path(&path).expect("invalid file path");

        let _ = cx.open_window(
            WindowOptions {
                focus: true,
                ..Default::default()
            },
            |_, cx| {
                let player: Entity<VideoPlayerView> = cx.new(|_| {
                    video_player_from_uri(&uri, PlayerConfig::new(controls))
                        .expect("failed to create player")
                        .width(px(640.0))
                        .height(px(360.0))
                });
                cx.subscribe(&player, |_, event: &VideoPlayerEvent, _| match event {
                    VideoPlayerEvent::StateChanged(_) => {}
                    other => log::info!("player event: {other:?}"),
                })
                .detach();
                player
            },
        );
        cx.activate(true);
    });
}
