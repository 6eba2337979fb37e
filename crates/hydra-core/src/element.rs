//! Element controller: translates host lifecycle callbacks into calls on the
//! canvas, the options store and the engine adapter.
//!
//! The host (a custom element, a test harness) owns one controller per
//! element instance and forwards two callbacks to it:
//!
//! - **attribute changed**: parsed and applied immediately. `width`/`height`
//!   resize the surface; the other attributes merge into the options store.
//! - **attached**: on the first call the surface is mounted, the engine is
//!   built from the options snapshot taken at that instant, and the program
//!   text is submitted. Later calls do nothing.
//!
//! Options changed after the engine exists are stored but never reach it.

use crate::attr::{self, Attribute};
use crate::canvas::{self, CanvasManager, PixelSize, Surface};
use crate::engine::{Engine, EngineAdapter, EngineFactory};
use crate::error::ElementError;
use crate::options::{EngineOptions, OptionsPatch, OptionsStore};

/// Host services the controller needs beyond the surface itself.
pub trait ElementHost<S> {
    /// Append the surface to the element's rendering root.
    fn mount(&mut self, surface: &S);

    /// The element's current text content.
    fn program_text(&self) -> String;
}

/// Attribute values in effect when an element is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDefaults {
    pub size: PixelSize,
    pub options: EngineOptions,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self {
            size: PixelSize::FALLBACK,
            options: EngineOptions::default(),
        }
    }
}

impl ElementDefaults {
    /// Defaults for an element created in a viewport of the given size.
    pub fn for_viewport(width: f64, height: f64) -> Self {
        Self {
            size: PixelSize::from_viewport(width, height),
            options: EngineOptions::default(),
        }
    }
}

pub struct ElementController<H, S, F>
where
    F: EngineFactory<S>,
{
    host: H,
    canvas: CanvasManager<S>,
    options: OptionsStore,
    engine: EngineAdapter<F::Engine>,
    factory: F,
    defaults: ElementDefaults,
    mounted: bool,
}

impl<H, S, F> ElementController<H, S, F>
where
    H: ElementHost<S>,
    S: Surface,
    F: EngineFactory<S>,
{
    /// Create a controller. No engine is constructed until [`Self::on_attached`].
    pub fn new(host: H, surface: S, factory: F, defaults: ElementDefaults) -> Self {
        Self {
            host,
            canvas: CanvasManager::new(surface, defaults.size),
            options: OptionsStore::new(defaults.options),
            engine: EngineAdapter::new(),
            factory,
            defaults,
            mounted: false,
        }
    }

    // ─── Lifecycle callbacks ─────────────────────────────────────────────

    /// Handle attachment to the document.
    ///
    /// Returns `true` if this call constructed the engine, `false` if it
    /// already existed. A construction failure leaves the element detached
    /// from any engine, so a later attachment retries.
    pub fn on_attached(&mut self) -> Result<bool, ElementError> {
        if self.engine.is_present() {
            log::debug!("attach: engine already present");
            return Ok(false);
        }
        if !self.mounted {
            self.host.mount(self.canvas.surface());
            self.mounted = true;
        }
        let snapshot = self.options.snapshot();
        match self
            .engine
            .construct(&mut self.factory, self.canvas.surface(), snapshot)
        {
            Ok(engine) => {
                let program = self.host.program_text();
                engine.eval(&program);
                log::debug!("submitted program ({} bytes)", program.len());
                Ok(true)
            }
            Err(ElementError::AlreadyConstructed) => Ok(false),
            Err(e) => {
                log::error!("{e}");
                Err(e)
            }
        }
    }

    /// Merge `overrides` into the options, then attach.
    ///
    /// Once the engine exists this is a no-op: the overrides are dropped and
    /// the store is left as it was.
    pub fn attach_with(&mut self, overrides: OptionsPatch) -> Result<bool, ElementError> {
        if self.engine.is_present() {
            log::debug!("attach: engine already present, overrides ignored");
            return Ok(false);
        }
        if !overrides.is_empty() {
            self.options.merge(overrides);
        }
        self.on_attached()
    }

    /// Handle an attribute change. `new_value` is `None` when the attribute
    /// was removed, which restores its default.
    ///
    /// A value that fails to parse is rejected and the previous value kept.
    pub fn on_attribute_changed(
        &mut self,
        name: &str,
        _old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> Result<(), ElementError> {
        let Some(attr) = Attribute::from_name(name) else {
            return Ok(());
        };
        let result = match new_value {
            Some(value) => self.apply(attr, value),
            None => {
                self.restore_default(attr);
                Ok(())
            }
        };
        if let Err(e) = &result {
            log::warn!("{e}");
        }
        result
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Current options snapshot (not necessarily what the engine was built with).
    pub fn options(&self) -> EngineOptions {
        self.options.snapshot()
    }

    pub fn options_json(&self) -> String {
        self.options.to_json()
    }

    pub fn canvas(&self) -> &CanvasManager<S> {
        &self.canvas
    }

    pub fn engine(&self) -> &EngineAdapter<F::Engine> {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_attached(&self) -> bool {
        self.engine.is_present()
    }

    // ─── Private helpers ─────────────────────────────────────────────────

    fn apply(&mut self, attr: Attribute, value: &str) -> Result<(), ElementError> {
        match attr {
            Attribute::Width => self.canvas.set_width(attr::parse_dimension(attr, value)?),
            Attribute::Height => self.canvas.set_height(attr::parse_dimension(attr, value)?),
            Attribute::Audio => {
                self.merge(OptionsPatch::detect_audio(attr::parse_flag(attr, value)?));
            }
            Attribute::Sources => {
                self.merge(OptionsPatch::num_sources(attr::parse_count(attr, value)?));
            }
            Attribute::Outputs => {
                self.merge(OptionsPatch::num_outputs(attr::parse_count(attr, value)?));
            }
            Attribute::Precision => {
                self.merge(OptionsPatch::precision(attr::parse_precision(attr, value)?));
            }
        }
        Ok(())
    }

    fn restore_default(&mut self, attr: Attribute) {
        let d = self.defaults;
        match attr {
            Attribute::Width => self.canvas.set_width(canvas::at_least_one(d.size.width)),
            Attribute::Height => self.canvas.set_height(canvas::at_least_one(d.size.height)),
            Attribute::Audio => self.merge(OptionsPatch::detect_audio(d.options.detect_audio)),
            Attribute::Sources => self.merge(OptionsPatch::num_sources(d.options.num_sources)),
            Attribute::Outputs => self.merge(OptionsPatch::num_outputs(d.options.num_outputs)),
            Attribute::Precision => self.merge(OptionsPatch::precision(d.options.precision)),
        }
    }

    fn merge(&mut self, patch: OptionsPatch) {
        let snapshot = self.options.merge(patch);
        if self.engine.is_present() {
            log::debug!("options updated after engine construction; engine keeps its snapshot");
        } else {
            log::debug!("options -> {snapshot:?}");
        }
    }
}
