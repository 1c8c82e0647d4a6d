/// surround library crate.
///
/// Assembles validator/estimator pipelines, runs them through named runners,
/// and scaffolds new pipeline projects from the bundled entry-point templates.
///
/// The `surround` binary (src/main.rs) and generated projects use this same API.
pub mod assembler;
pub mod config;
pub mod entry;
pub mod error;
pub mod generator;
pub mod runner;
pub mod stage;
pub mod state;
pub mod utils;

pub use assembler::Assembler;
pub use config::Config;
pub use entry::{ModeArgs, dispatch, run_mode_dispatch, run_simple};
pub use error::{Result, SurroundError};
pub use runner::{BATCH_RUNNER, BatchRunner, RunMode, Runner, RunnerRegistry};
pub use stage::{Estimator, Filter, Stage, Validator, Visualiser};
pub use state::{StageTiming, State, StateMeta};
pub use utils::{init_tracing, init_tracing_from_env, print_summary};
