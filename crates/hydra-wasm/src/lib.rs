//! WASM bridge for hydra-element — registers `<hydra-element>`, a custom
//! element running a `hydra-synth` program on a canvas in its shadow root.
//!
//! Compiled via `wasm-pack build --target web`. The page hands over the
//! `hydra-synth` class; if a global `Hydra` exists the element is defined on
//! load. The element's text content is the program:
//!
//! ```html
//! <script type="module">
//!   import Hydra from "hydra-synth";
//!   import init, { define } from "./pkg/hydra_wasm.js";
//!   await init();
//!   define("hydra-element", Hydra);
//! </script>
//! <hydra-element width="640" height="360" outputs="2">
//!   osc(10, 0.1, 1.2).out()
//! </hydra-element>
//! ```

mod host;
mod hydra;
mod surface;

pub use host::ERROR_EVENT;
pub use hydra::defer_eval;

use host::ShadowHost;
use hydra::HydraFactory;
use hydra_core::{ElementController, ElementDefaults, ElementError, OBSERVED_ATTRIBUTES, OptionsPatch};
use js_sys::{Function, Reflect};
use surface::HtmlCanvasSurface;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Tag registered on load when a global `Hydra` class is present.
pub const TAG_NAME: &str = "hydra-element";

type Controller = ElementController<ShadowHost, HtmlCanvasSurface, HydraFactory>;

/// Per-element controller handed to the JS element class.
#[wasm_bindgen]
pub struct HydraElement {
    controller: Controller,
}

#[wasm_bindgen]
impl HydraElement {
    /// Build the controller for `element`: shadow root, canvas sized to the
    /// viewport, default options. `engine` is the `hydra-synth` class; it is
    /// not instantiated until the element is connected.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement, engine: Function) -> Result<HydraElement, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let width = window.inner_width()?.as_f64().unwrap_or_default();
        let height = window.inner_height()?.as_f64().unwrap_or_default();

        let surface = HtmlCanvasSurface::create(&document)?;
        let host = ShadowHost::attach(element)?;
        let controller = ElementController::new(
            host,
            surface,
            HydraFactory::new(engine),
            ElementDefaults::for_viewport(width, height),
        );
        Ok(Self { controller })
    }

    /// `connectedCallback`. Returns `true` if the engine was created by this call.
    ///
    /// The program itself runs in a microtask after this returns, so it may
    /// set attributes on its own element.
    pub fn connected(&mut self) -> bool {
        let result = self.controller.on_attached();
        self.settle(result).unwrap_or(false)
    }

    /// `attributeChangedCallback`. Returns `false` if the value was rejected.
    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> bool {
        let result = self.controller.on_attribute_changed(
            name,
            old_value.as_deref(),
            new_value.as_deref(),
        );
        self.settle(result).is_some()
    }

    /// Attach with extra engine options given as a JSON object, e.g.
    /// `{"detectAudio":true}`. Keys match the engine's option names.
    #[wasm_bindgen(js_name = attachWith)]
    pub fn attach_with(&mut self, json: &str) -> bool {
        let result = OptionsPatch::from_json(json)
            .map_err(ElementError::InvalidOverrides)
            .and_then(|patch| self.controller.attach_with(patch));
        self.settle(result).unwrap_or(false)
    }

    /// Current options as JSON.
    pub fn options(&self) -> String {
        self.controller.options_json()
    }

    /// Whether the engine has been created.
    #[wasm_bindgen(getter)]
    pub fn attached(&self) -> bool {
        self.controller.is_attached()
    }
}

impl HydraElement {
    /// Report an error to the page; `None` if there was one.
    fn settle<T>(&self, result: Result<T, ElementError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.controller.host().report(&e);
                None
            }
        }
    }
}

// ─── Registration ────────────────────────────────────────────────────────

#[wasm_bindgen(inline_js = r#"
export function defineElement(tag, observed, create) {
  if (customElements.get(tag)) {
    return false;
  }
  customElements.define(tag, class extends HTMLElement {
    static get observedAttributes() {
      return observed;
    }
    constructor() {
      super();
      this.controller = create(this);
    }
    connectedCallback() {
      this.controller.connected();
    }
    attributeChangedCallback(name, oldValue, newValue) {
      this.controller.attributeChanged(name, oldValue, newValue);
    }
  });
  return true;
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = defineElement)]
    fn define_element(
        tag: &str,
        observed: &js_sys::Array,
        create: &Closure<dyn FnMut(HtmlElement) -> JsValue>,
    ) -> bool;
}

/// Register the element under `tag`, building engines with `engine` (the
/// `hydra-synth` class). Returns `false` if the tag is taken.
#[wasm_bindgen]
pub fn define(tag: &str, engine: Function) -> bool {
    let observed: js_sys::Array = OBSERVED_ATTRIBUTES
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect();
    let create = Closure::<dyn FnMut(HtmlElement) -> JsValue>::new(move |element: HtmlElement| {
        match HydraElement::new(element, engine.clone()) {
            Ok(el) => JsValue::from(el),
            Err(e) => wasm_bindgen::throw_val(e),
        }
    });
    let defined = define_element(tag, &observed, &create);
    // The element class calls `create` for every instance the page ever makes.
    create.forget();
    if defined {
        log::info!("defined <{tag}>");
    } else {
        log::warn!("<{tag}> is already defined");
    }
    defined
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook_setup();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"hydra-element: logger already set".into());
    }
    let global = Reflect::get(&js_sys::global(), &JsValue::from_str("Hydra"));
    match global.ok().and_then(|v| v.dyn_into::<Function>().ok()) {
        Some(engine) => {
            define(TAG_NAME, engine);
        }
        None => log::info!("no global Hydra; call define(tag, Hydra) to register"),
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("hydra-element panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
