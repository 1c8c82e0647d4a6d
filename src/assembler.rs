//! Assembling and executing a pipeline.
//!
//! ```text
//! Validator -> pre-filter(s) -> Estimator -> post-filter(s) -> Visualiser
//! ```
//!
//! Modes:
//! - predict: `init_assembler(false)` then `run(state, false)`
//! - batch-predict: `init_assembler(true)` then `run(state, false)`
//! - training: `init_assembler(true)` then `run(state, true)`
//!
//! The visualiser only runs in batch-predict and training modes. The
//! finaliser, when set, runs after every `run` regardless of outcome.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::Config;
use crate::error::{Result, SurroundError};
use crate::stage::{Estimator, Filter, Validator, Visualiser};
use crate::state::{StageTiming, State};

pub struct Assembler<S> {
    name: String,
    config: Config,
    validator: Box<dyn Validator<S>>,
    estimator: Option<Box<dyn Estimator<S>>>,
    pre_filters: Vec<Box<dyn Filter<S>>>,
    post_filters: Vec<Box<dyn Filter<S>>>,
    visualiser: Option<Box<dyn Visualiser<S>>>,
    finaliser: Option<Box<dyn Filter<S>>>,
    batch_mode: bool,
}

impl<S: State> Assembler<S> {
    pub fn new(
        name: impl Into<String>,
        validator: impl Validator<S> + 'static,
        estimator: impl Estimator<S> + 'static,
        config: Config,
    ) -> Self {
        let mut assembler = Self::without_estimator(name, validator, config);
        assembler.estimator = Some(Box::new(estimator));
        assembler
    }

    /// An assembler whose estimator is supplied later through [`Assembler::set_estimator`].
    pub fn without_estimator(
        name: impl Into<String>,
        validator: impl Validator<S> + 'static,
        config: Config,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            validator: Box::new(validator),
            estimator: None,
            pre_filters: Vec::new(),
            post_filters: Vec::new(),
            visualiser: None,
            finaliser: None,
            batch_mode: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn batch_mode(&self) -> bool {
        self.batch_mode
    }

    /// Replace the estimator and both filter chains.
    pub fn set_estimator(
        &mut self,
        estimator: impl Estimator<S> + 'static,
        pre_filters: Vec<Box<dyn Filter<S>>>,
        post_filters: Vec<Box<dyn Filter<S>>>,
    ) {
        self.estimator = Some(Box::new(estimator));
        self.pre_filters = pre_filters;
        self.post_filters = post_filters;
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Load `<root>/config.yaml` and make sure the configured output directory exists.
    ///
    /// Call before [`Assembler::init_assembler`].
    pub fn load_config(&mut self, project_root: &Path) -> Result<()> {
        let config = Config::from_project_root(project_root)?;
        let output = config.output_path();
        if !output.exists() {
            fs::create_dir_all(&output)?;
            info!(path = %output.display(), "created output directory");
        }
        self.config = config;
        Ok(())
    }

    pub fn set_visualiser(&mut self, visualiser: impl Visualiser<S> + 'static) {
        self.visualiser = Some(Box::new(visualiser));
    }

    /// Set a filter that runs after every `run`, even when the pipeline fails.
    pub fn set_finaliser(&mut self, finaliser: impl Filter<S> + 'static) {
        self.finaliser = Some(Box::new(finaliser));
    }

    /// Initialise every filter, the estimator and the finaliser.
    ///
    /// `batch_mode` decides whether the visualiser runs after a non-training run.
    pub fn init_assembler(&mut self, batch_mode: bool) -> Result<()> {
        self.batch_mode = batch_mode;
        let config = &self.config;

        for filter in &mut self.pre_filters {
            initialise(filter.name().to_string(), filter.initialise(config))?;
        }

        let estimator = self
            .estimator
            .as_mut()
            .ok_or_else(|| SurroundError::MissingEstimator(self.name.clone()))?;
        initialise(estimator.name().to_string(), estimator.initialise(config))?;

        for filter in &mut self.post_filters {
            initialise(filter.name().to_string(), filter.initialise(config))?;
        }

        if let Some(finaliser) = &mut self.finaliser {
            initialise(finaliser.name().to_string(), finaliser.initialise(config))?;
        }

        info!(assembler = %self.name, batch_mode, "assembler initialised");
        Ok(())
    }

    /// Run the pipeline over `state`. Results are left in `state`.
    ///
    /// With `is_training` the estimator's `fit` runs instead of `estimate`.
    pub fn run(&mut self, state: &mut S, is_training: bool) -> Result<()> {
        info!(assembler = %self.name, is_training, "starting assembler");

        let result = self.validate(state).and_then(|()| self.run_pipeline(state, is_training));
        if let Err(e) = &result {
            error!(assembler = %self.name, err = %e, "failed running assembler");
        }

        if let Some(finaliser) = &mut self.finaliser {
            if let Err(e) = finaliser.operate(state, &self.config) {
                let err = SurroundError::stage(finaliser.name(), e);
                error!(assembler = %self.name, err = %err, "finaliser failed");
                return result.and(Err(err));
            }
        }

        result
    }

    fn validate(&mut self, state: &mut S) -> Result<()> {
        self.validator
            .validate(state, &self.config)
            .map_err(|e| SurroundError::Validation {
                stage: self.validator.name().to_string(),
                reason: format!("{e:#}"),
            })
    }

    fn run_pipeline(&mut self, state: &mut S, is_training: bool) -> Result<()> {
        let dump = self.config.enable_stage_output_dump();

        execute_filters(&mut self.pre_filters, state, &self.config, dump)?;

        let estimator = self
            .estimator
            .as_mut()
            .ok_or_else(|| SurroundError::MissingEstimator(self.name.clone()))?;
        let start = Instant::now();
        let outcome = if is_training {
            estimator.fit(state, &self.config)
        } else {
            estimator.estimate(state, &self.config)
        };
        outcome.map_err(|e| SurroundError::stage(estimator.name(), e))?;
        if dump {
            estimator
                .dump_output(state, &self.config)
                .map_err(|e| SurroundError::stage(estimator.name(), e))?;
        }
        let elapsed = start.elapsed();
        record_timing(state, estimator.name(), elapsed);
        if is_training {
            info!(estimator = estimator.name(), ?elapsed, "fitting finished");
        } else {
            info!(estimator = estimator.name(), ?elapsed, "estimator finished");
        }

        execute_filters(&mut self.post_filters, state, &self.config, dump)?;

        if is_training || self.batch_mode {
            if let Some(visualiser) = &mut self.visualiser {
                visualiser
                    .visualise(state, &self.config)
                    .map_err(|e| SurroundError::stage(visualiser.name(), e))?;
            }
        }

        Ok(())
    }
}

fn initialise(stage: String, outcome: anyhow::Result<()>) -> Result<()> {
    outcome.map_err(|e| SurroundError::Initialise {
        stage,
        reason: format!("{e:#}"),
    })
}

fn record_timing<S: State>(state: &mut S, stage: &str, duration: Duration) {
    state.meta_mut().stage_metadata.push(StageTiming {
        stage: stage.to_string(),
        duration,
    });
}

/// Run each filter in order, stopping after the first one that leaves errors on the state.
fn execute_filters<S: State>(
    filters: &mut [Box<dyn Filter<S>>],
    state: &mut S,
    config: &Config,
    dump: bool,
) -> Result<()> {
    if filters.is_empty() {
        return Ok(());
    }

    let block_start = Instant::now();
    for filter in filters.iter_mut() {
        let start = Instant::now();
        filter
            .operate(state, config)
            .map_err(|e| SurroundError::stage(filter.name(), e))?;
        if dump {
            filter
                .dump_output(state, config)
                .map_err(|e| SurroundError::stage(filter.name(), e))?;
        }
        let elapsed = start.elapsed();
        record_timing(state, filter.name(), elapsed);
        info!(filter = filter.name(), ?elapsed, "filter finished");

        if state.has_errors() {
            error!(
                filter = filter.name(),
                errors = ?state.meta().errors,
                "error during processing"
            );
            break;
        }
    }

    let elapsed = block_start.elapsed();
    state.meta_mut().execution_time = Some(elapsed);
    info!(?elapsed, "filters finished");
    Ok(())
}
