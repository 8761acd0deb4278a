use crate::video::Video;
use gpui::{
    App, Bounds, Element, ElementId, GlobalElementId, InspectorElementId, IntoElement, LayoutId,
    Pixels, Window,
};
use image::{Frame, ImageBuffer, Rgba};
use smallvec::SmallVec;
use std::sync::Arc;
use yuv::{YuvBiPlanarImage, YuvConversionMode, YuvRange, YuvStandardMatrix, yuv_nv12_to_rgba};

/// Conversions tried in order: HD full range, HD limited range, SD.
const CONVERSIONS: [(YuvRange, YuvStandardMatrix); 3] = [
    (YuvRange::Full, YuvStandardMatrix::Bt709),
    (YuvRange::Limited, YuvStandardMatrix::Bt709),
    (YuvRange::Limited, YuvStandardMatrix::Bt601),
];

/// Paints the most recent decoded frame of a [`Video`].
pub struct VideoSurface {
    video: Video,
    width: Option<Pixels>,
    height: Option<Pixels>,
    element_id: Option<ElementId>,
}

impl VideoSurface {
    pub fn new(video: Video) -> Self {
        Self {
            video,
            width: None,
            height: None,
            element_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<ElementId>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn size(mut self, width: Pixels, height: Pixels) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    fn display_size(&self) -> (Pixels, Pixels) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                let (width, height) = self.video.size();
                (gpui::px(width as f32), gpui::px(height as f32))
            }
        }
    }
}

/// Convert a tightly packed NV12 frame to RGBA. Returns a black frame when
/// the data is short or no conversion succeeds.
pub(crate) fn nv12_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let luma = width as usize * height as usize;
    let chroma = luma / 2;
    let mut rgba = vec![0u8; luma * 4];

    if data.len() < luma + chroma {
        return rgba;
    }

    let image = YuvBiPlanarImage {
        y_plane: &data[..luma],
        y_stride: width,
        uv_plane: &data[luma..luma + chroma],
        uv_stride: width,
        width,
        height,
    };

    for (range, matrix) in CONVERSIONS {
        if yuv_nv12_to_rgba(
            &image,
            &mut rgba,
            width * 4,
            range,
            matrix,
            YuvConversionMode::Balanced,
        )
        .is_ok()
        {
            return rgba;
        }
    }

    log::warn!("could not convert {width}x{height} NV12 frame");
    rgba.fill(0);
    rgba
}

impl Element for VideoSurface {
    type RequestLayoutState = ();
    type PrepaintState = ();

    fn id(&self) -> Option<ElementId> {
        self.element_id.clone()
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let (width, height) = self.display_size();
        let style = gpui::Style {
            size: gpui::Size {
                width: gpui::Length::Definite(gpui::DefiniteLength::Absolute(
                    gpui::AbsoluteLength::Pixels(width),
                )),
                height: gpui::Length::Definite(gpui::DefiniteLength::Absolute(
                    gpui::AbsoluteLength::Pixels(height),
                )),
            },
            ..Default::default()
        };

        (window.request_layout(style, [], cx), ())
    }

    fn prepaint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        _bounds: Bounds<Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        window: &mut Window,
        _cx: &mut App,
    ) -> Self::PrepaintState {
        let playing = !self.video.eos() && !self.video.paused();
        if playing || self.video.take_frame_ready() {
            window.request_animation_frame();
        }
    }

    fn paint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        _prepaint_state: &mut Self::PrepaintState,
        window: &mut Window,
        _cx: &mut App,
    ) {
        let Some((data, width, height)) = self.video.current_frame_data() else {
            return;
        };

        let rgba = nv12_to_rgba(&data, width, height);
        let Some(buffer) = ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba) else {
            return;
        };

        let frames: SmallVec<[Frame; 1]> = SmallVec::from_elem(Frame::new(buffer), 1);
        let image = Arc::new(gpui::RenderImage::new(frames));
        if let Err(err) = window.paint_image(bounds, gpui::Corners::default(), image, 0, false) {
            log::error!("failed to paint video frame: {err}");
        }
    }
}

impl IntoElement for VideoSurface {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

/// Helper function to create a video surface.
pub fn video_surface(video: Video) -> VideoSurface {
    VideoSurface::new(video)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_frame_is_black() {
        let rgba = nv12_to_rgba(&[255; 10], 4, 4);
        assert_eq!(rgba.len(), 4 * 4 * 4);
        assert!(rgba.iter().all(|b| *b == 0));
    }

    #[test]
    fn converts_full_frame() {
        let (width, height) = (4u32, 2u32);
        let mut data = vec![200u8; 8];
        data.extend([128u8; 4]);
        let rgba = nv12_to_rgba(&data, width, height);
        assert_eq!(rgba.len(), 32);
        assert!(rgba.chunks(4).all(|px| px[0] > 150 && px[3] == 255));
    }
}
