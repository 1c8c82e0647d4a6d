//! Stage traits composed by the [`Assembler`](crate::Assembler).
//!
//! Execution order for one run:
//!
//! `Validator -> pre-filters -> Estimator (estimate | fit) -> post-filters -> Visualiser`
//!
//! with an optional finaliser filter that runs whether or not the rest succeeded.

use anyhow::Result;

use crate::config::Config;

/// Short type name of `T`, without its module path.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Behaviour shared by filters and estimators.
pub trait Stage<S> {
    /// Name used in logs, errors and `stage_metadata`. Defaults to the type name.
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    /// Called once from `Assembler::init_assembler`.
    fn initialise(&mut self, _config: &Config) -> Result<()> {
        Ok(())
    }

    /// Called after the stage runs when `surround.enable_stage_output_dump` is set.
    fn dump_output(&self, _state: &S, _config: &Config) -> Result<()> {
        Ok(())
    }
}

/// Checks the input state before any other stage runs.
pub trait Validator<S> {
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    fn validate(&mut self, state: &mut S, config: &Config) -> Result<()>;
}

/// Transforms the state before or after the estimator. Also used as finaliser.
pub trait Filter<S>: Stage<S> {
    fn operate(&mut self, state: &mut S, config: &Config) -> Result<()>;
}

/// The main stage of a pipeline.
pub trait Estimator<S>: Stage<S> {
    fn estimate(&mut self, state: &mut S, config: &Config) -> Result<()>;

    /// Training-mode counterpart of `estimate`.
    fn fit(&mut self, state: &mut S, config: &Config) -> Result<()>;
}

/// Reports on the state after a batch or training run.
pub trait Visualiser<S> {
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    fn visualise(&mut self, state: &S, config: &Config) -> Result<()>;
}
