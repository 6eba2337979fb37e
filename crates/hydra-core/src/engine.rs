//! Lazy, at-most-once engine construction.
//!
//! The adapter is a two-state machine. `Absent → Present` happens once, on
//! the first successful [`EngineAdapter::construct`]; nothing moves it back.
//! The options used for construction are frozen alongside the handle.

use crate::error::ElementError;
use crate::options::EngineOptions;

/// A running visual-synthesis engine.
pub trait Engine {
    /// Hand `program` to the engine as a script to execute.
    fn eval(&mut self, program: &str);
}

/// Builds engines bound to a surface of type `S`.
pub trait EngineFactory<S> {
    type Engine: Engine;

    /// Construct an engine drawing into `surface`. The error string is the
    /// engine's own rejection message.
    fn construct(&mut self, surface: &S, options: &EngineOptions) -> Result<Self::Engine, String>;
}

/// The `Present` state: the engine and the options it was built with.
#[derive(Debug)]
pub struct Constructed<E> {
    pub engine: E,
    pub options: EngineOptions,
}

/// Borrowed view of the adapter's state.
#[derive(Debug)]
pub enum EngineState<'a, E> {
    Absent,
    Present(&'a Constructed<E>),
}

#[derive(Debug)]
pub struct EngineAdapter<E> {
    /// `None` is `Absent`. Once set it is never cleared or replaced.
    slot: Option<Constructed<E>>,
}

impl<E> Default for EngineAdapter<E> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<E: Engine> EngineAdapter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the engine with `options` as its full parameter set.
    ///
    /// Fails with [`ElementError::AlreadyConstructed`] once a handle exists.
    /// A factory failure leaves the adapter `Absent`.
    pub fn construct<S, F>(
        &mut self,
        factory: &mut F,
        surface: &S,
        options: EngineOptions,
    ) -> Result<&mut E, ElementError>
    where
        F: EngineFactory<S, Engine = E>,
    {
        if self.is_present() {
            return Err(ElementError::AlreadyConstructed);
        }
        let engine = factory
            .construct(surface, &options)
            .map_err(ElementError::EngineConstructionFailure)?;
        log::info!(
            "engine constructed (audio={}, sources={}, outputs={}, precision={})",
            options.detect_audio,
            options.num_sources,
            options.num_outputs,
            options.precision
        );
        let present = self.slot.insert(Constructed { engine, options });
        Ok(&mut present.engine)
    }

    /// Submit a program to the constructed engine.
    pub fn submit(&mut self, program: &str) -> Result<(), ElementError> {
        self.engine_mut()
            .ok_or(ElementError::EngineNotConstructed)?
            .eval(program);
        Ok(())
    }

    pub fn is_present(&self) -> bool {
        self.slot.is_some()
    }

    pub fn engine(&self) -> Option<&E> {
        self.slot.as_ref().map(|c| &c.engine)
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.slot.as_mut().map(|c| &mut c.engine)
    }

    /// Options the engine was constructed with.
    pub fn options(&self) -> Option<&EngineOptions> {
        self.slot.as_ref().map(|c| &c.options)
    }

    pub fn state(&self) -> EngineState<'_, E> {
        match &self.slot {
            Some(present) => EngineState::Present(present),
            None => EngineState::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Precision;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct FakeEngine {
        programs: Vec<String>,
    }

    impl Engine for FakeEngine {
        fn eval(&mut self, program: &str) {
            self.programs.push(program.to_string());
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        builds: usize,
        reject: Option<&'static str>,
    }

    impl EngineFactory<()> for FakeFactory {
        type Engine = FakeEngine;

        fn construct(&mut self, _: &(), _: &EngineOptions) -> Result<FakeEngine, String> {
            if let Some(reason) = self.reject {
                return Err(reason.to_string());
            }
            self.builds += 1;
            Ok(FakeEngine::default())
        }
    }

    #[test]
    fn submit_before_construct_fails() {
        let mut adapter = EngineAdapter::<FakeEngine>::new();
        assert_eq!(adapter.submit("osc().out()"), Err(ElementError::EngineNotConstructed));
    }

    #[test]
    fn construct_once() {
        let mut adapter = EngineAdapter::new();
        let mut factory = FakeFactory::default();
        adapter
            .construct(&mut factory, &(), EngineOptions::default())
            .unwrap();
        let second = adapter.construct(&mut factory, &(), EngineOptions::default());
        assert!(matches!(second, Err(ElementError::AlreadyConstructed)));
        assert_eq!(factory.builds, 1);
    }

    #[test]
    fn options_are_frozen_at_construction() {
        let mut adapter = EngineAdapter::new();
        let options = EngineOptions {
            precision: Precision::Mediump,
            ..EngineOptions::default()
        };
        adapter
            .construct(&mut FakeFactory::default(), &(), options)
            .unwrap();
        assert_eq!(adapter.options(), Some(&options));
    }

    #[test]
    fn failed_construction_stays_absent() {
        let mut adapter = EngineAdapter::new();
        let mut factory = FakeFactory {
            reject: Some("WebGL unavailable"),
            ..FakeFactory::default()
        };
        let err = adapter
            .construct(&mut factory, &(), EngineOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ElementError::EngineConstructionFailure("WebGL unavailable".into())
        );
        assert!(!adapter.is_present());

        factory.reject = None;
        assert!(adapter.construct(&mut factory, &(), EngineOptions::default()).is_ok());
    }

    #[test]
    fn state_moves_from_absent_to_present() {
        let mut adapter = EngineAdapter::new();
        assert!(matches!(adapter.state(), EngineState::Absent));
        adapter
            .construct(&mut FakeFactory::default(), &(), EngineOptions::default())
            .unwrap();
        match adapter.state() {
            EngineState::Present(c) => assert_eq!(c.options, EngineOptions::default()),
            EngineState::Absent => panic!("expected Present"),
        }
    }

    #[test]
    fn submit_reaches_engine() {
        let mut adapter = EngineAdapter::new();
        adapter
            .construct(&mut FakeFactory::default(), &(), EngineOptions::default())
            .unwrap();
        adapter.submit("noise().out()").unwrap();
        assert_eq!(adapter.engine().unwrap().programs, vec!["noise().out()"]);
    }
}
