//! Bindings to the `hydra-synth` engine.
//!
//! The engine class is handed in by the page (`define(tag, Hydra)`), then
//! constructed as `new Hydra({ canvas, ...options })`. Programs go through
//! its `eval` method.

use crate::surface::HtmlCanvasSurface;
use hydra_core::{Engine, EngineFactory, EngineOptions};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub struct HydraEngine {
    synth: JsValue,
}

impl Engine for HydraEngine {
    fn eval(&mut self, program: &str) {
        if let Err(e) = defer_eval(&self.synth, program) {
            log::error!("queueing program: {}", describe(&e));
        }
    }
}

/// Builds one engine per element from the page-supplied constructor.
#[derive(Clone)]
pub struct HydraFactory {
    ctor: Function,
}

impl HydraFactory {
    pub fn new(ctor: Function) -> Self {
        Self { ctor }
    }
}

impl EngineFactory<HtmlCanvasSurface> for HydraFactory {
    type Engine = HydraEngine;

    fn construct(
        &mut self,
        surface: &HtmlCanvasSurface,
        options: &EngineOptions,
    ) -> Result<HydraEngine, String> {
        let params = serde_wasm_bindgen::to_value(options).map_err(|e| e.to_string())?;
        Reflect::set(&params, &JsValue::from_str("canvas"), surface.canvas())
            .map_err(|e| describe(&e))?;
        let synth =
            Reflect::construct(&self.ctor, &Array::of1(&params)).map_err(|e| describe(&e))?;
        Ok(HydraEngine { synth })
    }
}

/// Queue `target.eval(program)` as a microtask.
///
/// The element's callbacks run while wasm-bindgen holds a borrow of the
/// element object. A program that touches its own element's attributes
/// would re-enter that object, so it only runs once the callback returned.
pub fn defer_eval(target: &JsValue, program: &str) -> Result<(), JsValue> {
    let eval: Function = Reflect::get(target, &JsValue::from_str("eval"))?.dyn_into()?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let target = target.clone();
    let program = JsValue::from_str(program);
    let task = Closure::once_into_js(move || {
        if let Err(e) = eval.call1(&target, &program) {
            log::error!("program failed: {}", describe(&e));
        }
    });
    window.queue_microtask(task.unchecked_ref());
    Ok(())
}

/// Best-effort message for a thrown JS value.
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
