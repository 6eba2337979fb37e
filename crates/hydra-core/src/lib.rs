pub mod attr;
pub mod canvas;
pub mod element;
pub mod engine;
pub mod error;
pub mod options;

pub use attr::{Attribute, OBSERVED_ATTRIBUTES};
pub use canvas::{CanvasManager, PixelSize, Surface};
pub use element::{ElementController, ElementDefaults, ElementHost};
pub use engine::{Constructed, Engine, EngineAdapter, EngineFactory, EngineState};
pub use error::{ElementError, ParseError};
pub use options::{EngineOptions, OptionsPatch, OptionsStore, Precision};
