//! Frame capture from the hidden video canvas
//!
//! JavaScript draws each video frame into the canvas before handing its
//! landmarks over, so the canvas always holds the frame being processed.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use crate::coach::{CapturedFrame, FrameSource};
use crate::error::{CoachError, Result};

pub struct CanvasFrameSource {
    canvas_id: String,
    jpeg_quality: f64,
}

impl CanvasFrameSource {
    pub fn new(canvas_id: impl Into<String>, jpeg_quality: f64) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            jpeg_quality,
        }
    }

    fn canvas(&self) -> Result<HtmlCanvasElement> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| CoachError::Browser("no document".into()))?;
        document
            .get_element_by_id(&self.canvas_id)
            .ok_or_else(|| CoachError::Browser(format!("canvas '{}' not found", self.canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CoachError::Browser(format!("'{}' is not a canvas", self.canvas_id)))
    }

    fn encode(&self) -> Result<String> {
        self.canvas()?
            .to_data_url_with_type_and_encoder_options(
                "image/jpeg",
                &JsValue::from_f64(self.jpeg_quality),
            )
            .map_err(|_| CoachError::Browser("canvas encoding failed".into()))
    }
}

impl FrameSource for CanvasFrameSource {
    fn capture(&mut self) -> Option<CapturedFrame> {
        match self.encode() {
            Ok(data_uri) => CapturedFrame::from_data_uri(data_uri),
            Err(err) => {
                log::warn!("frame capture failed: {}", err);
                None
            }
        }
    }
}
