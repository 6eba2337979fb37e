//! The custom element as seen by the controller: an open shadow root for the
//! canvas, text content for the program, events for errors.

use crate::hydra::describe;
use crate::surface::HtmlCanvasSurface;
use hydra_core::{ElementError, ElementHost};
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

/// Event dispatched on the element when a reportable error occurs.
pub const ERROR_EVENT: &str = "hydra-error";

pub struct ShadowHost {
    element: HtmlElement,
    root: ShadowRoot,
}

impl ShadowHost {
    /// Attach an open shadow root to `element`.
    pub fn attach(element: HtmlElement) -> Result<Self, JsValue> {
        let root = element.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?;
        Ok(Self { element, root })
    }

    /// Log `err` and dispatch it as a bubbling [`ERROR_EVENT`].
    pub fn report(&self, err: &ElementError) {
        if !err.is_reportable() {
            return;
        }
        log::error!("<{}>: {err}", self.element.tag_name().to_lowercase());
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_composed(true);
        init.set_detail(&JsValue::from_str(&err.to_string()));
        match CustomEvent::new_with_event_init_dict(ERROR_EVENT, &init) {
            Ok(event) => {
                if let Err(e) = self.element.dispatch_event(&event) {
                    log::warn!("dispatching {ERROR_EVENT}: {}", describe(&e));
                }
            }
            Err(e) => log::warn!("creating {ERROR_EVENT}: {}", describe(&e)),
        }
    }
}

impl ElementHost<HtmlCanvasSurface> for ShadowHost {
    fn mount(&mut self, surface: &HtmlCanvasSurface) {
        if let Err(e) = self.root.append_child(surface.canvas()) {
            log::error!("mounting canvas: {}", describe(&e));
        }
    }

    fn program_text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }
}
