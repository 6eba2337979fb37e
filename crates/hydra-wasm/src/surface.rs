//! `<canvas>`-backed rendering surface.

use hydra_core::Surface;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement};

pub struct HtmlCanvasSurface {
    canvas: HtmlCanvasElement,
}

impl HtmlCanvasSurface {
    /// Create a detached `<canvas>` in `document`.
    pub fn create(document: &Document) -> Result<Self, JsValue> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        Ok(Self { canvas })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for HtmlCanvasSurface {
    fn set_pixel_width(&mut self, width: u32) {
        self.canvas.set_width(width);
    }

    fn set_pixel_height(&mut self, height: u32) {
        self.canvas.set_height(height);
    }

    fn fill_container(&mut self) {
        let style = self.canvas.style();
        for prop in ["width", "height"] {
            if let Err(e) = style.set_property(prop, "100%") {
                log::warn!("canvas style.{prop}: {e:?}");
            }
        }
    }
}
