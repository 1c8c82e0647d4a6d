//! Runners execute an assembled pipeline.
//!
//! A runner is anything exposing `run(is_training)`. Entry points either bind
//! a runner type directly, or look one up by name in a [`RunnerRegistry`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::assembler::Assembler;
use crate::error::{Result, SurroundError};
use crate::state::State;

/// Name under which [`BatchRunner`] is registered by [`RunnerRegistry::with_defaults`].
pub const BATCH_RUNNER: &str = "BatchRunner";

pub trait Runner {
    fn run(&mut self, is_training: bool) -> Result<()>;
}

impl<R: Runner + ?Sized> Runner for Box<R> {
    fn run(&mut self, is_training: bool) -> Result<()> {
        (**self).run(is_training)
    }
}

/// Execution mode selected by the `--mode` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Batch,
    Train,
}

impl RunMode {
    /// Only the exact, case-sensitive value `"train"` selects training.
    pub fn from_flag(value: &str) -> Self {
        if value == "train" {
            RunMode::Train
        } else {
            RunMode::Batch
        }
    }

    pub fn is_training(self) -> bool {
        self == RunMode::Train
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Batch => f.write_str("batch"),
            RunMode::Train => f.write_str("train"),
        }
    }
}

/// Runs the assembler in batch mode over a fresh `S::default()` state.
pub struct BatchRunner<S> {
    assembler: Assembler<S>,
    last_state: Option<S>,
}

impl<S: State + Default> BatchRunner<S> {
    pub fn new(assembler: Assembler<S>) -> Self {
        Self {
            assembler,
            last_state: None,
        }
    }

    /// State left behind by the most recent run, including failed runs.
    pub fn last_state(&self) -> Option<&S> {
        self.last_state.as_ref()
    }

    pub fn assembler(&self) -> &Assembler<S> {
        &self.assembler
    }
}

impl<S: State + Default> Runner for BatchRunner<S> {
    fn run(&mut self, is_training: bool) -> Result<()> {
        info!(
            assembler = self.assembler.name(),
            is_training, "batch runner starting"
        );
        self.assembler.init_assembler(true)?;
        let mut state = S::default();
        let result = self.assembler.run(&mut state, is_training);
        self.last_state = Some(state);
        result
    }
}

pub type RunnerFactory<S> = Box<dyn Fn(Assembler<S>) -> Box<dyn Runner>>;

/// Maps runner names to constructors.
pub struct RunnerRegistry<S> {
    factories: BTreeMap<String, RunnerFactory<S>>,
}

impl<S> Default for RunnerRegistry<S> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<S: State + Default + 'static> RunnerRegistry<S> {
    /// Registry with [`BatchRunner`] under [`BATCH_RUNNER`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(BATCH_RUNNER, |assembler| {
            Box::new(BatchRunner::new(assembler)) as Box<dyn Runner>
        });
        registry
    }
}

impl<S> RunnerRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Assembler<S>) -> Box<dyn Runner> + 'static,
    {
        let name = name.into();
        debug!(runner = %name, "registered runner");
        self.factories.insert(name, Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn create(&self, name: &str, assembler: Assembler<S>) -> Result<Box<dyn Runner>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| SurroundError::UnknownRunner {
                name: name.to_string(),
                available: self.names(),
            })?;
        Ok(factory(assembler))
    }
}
