//! Process entry points for generated projects.
//!
//! Two shapes exist:
//! - simple: build the assembler and hand it to a named runner, run without training.
//! - mode-dispatch: read `--mode`, run the batch runner in training mode iff the mode is `train`.

use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::info;

use crate::assembler::Assembler;
use crate::error::Result;
use crate::runner::{BatchRunner, RunMode, Runner, RunnerRegistry};
use crate::state::State;

/// Command line of a mode-dispatch entry point.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ModeArgs {
    /// Mode to run in: `train` fits the estimator, anything else runs batch prediction
    #[arg(long, default_value = "batch", value_name = "MODE")]
    pub mode: String,
}

impl ModeArgs {
    /// Parse the process arguments, reporting usage under `program`.
    ///
    /// Exits the process with clap's usage error on malformed arguments.
    pub fn parse_for(program: &'static str) -> Self {
        let matches = Self::command().name(program).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn run_mode(&self) -> RunMode {
        RunMode::from_flag(&self.mode)
    }
}

/// Invoke `runner` with the training flag selected by `mode`.
pub fn dispatch<R: Runner + ?Sized>(mode: RunMode, runner: &mut R) -> Result<()> {
    info!(%mode, "dispatching runner");
    match mode {
        RunMode::Train => runner.run(true),
        RunMode::Batch => runner.run(false),
    }
}

/// Mode-dispatch entry point: run `assembler` through a [`BatchRunner`].
///
/// Returns the runner so callers can inspect the final state.
pub fn run_mode_dispatch<S: State + Default>(
    args: &ModeArgs,
    assembler: Assembler<S>,
) -> Result<BatchRunner<S>> {
    let mut runner = BatchRunner::new(assembler);
    dispatch(args.run_mode(), &mut runner)?;
    Ok(runner)
}

/// Simple entry point: resolve `runner_name` in `registry` and run it without training.
pub fn run_simple<S>(
    registry: &RunnerRegistry<S>,
    runner_name: &str,
    assembler: Assembler<S>,
) -> Result<()> {
    let mut runner = registry.create(runner_name, assembler)?;
    info!(runner = runner_name, "running simple entry point");
    runner.run(false)
}
