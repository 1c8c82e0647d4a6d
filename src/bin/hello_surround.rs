//! Mode-dispatch entry point over a small "hello" pipeline.
//!
//! `--mode train` fits the estimator, any other mode runs batch prediction.
//! The final state is printed to stdout as `key=value` lines.

use anyhow::{Result, bail};
use surround::{Assembler, BatchRunner, Config, Estimator, ModeArgs, Stage, State, StateMeta, Validator};

const PROJECT_NAME: &str = "hello-surround";

#[derive(Debug, Default)]
struct HelloState {
    text: Option<String>,
    trained: bool,
    meta: StateMeta,
}

impl State for HelloState {
    fn meta(&self) -> &StateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut StateMeta {
        &mut self.meta
    }
}

struct InputValidator;

impl Validator<HelloState> for InputValidator {
    fn validate(&mut self, state: &mut HelloState, _config: &Config) -> Result<()> {
        if state.text.is_some() {
            bail!("'text' must be empty before the pipeline runs");
        }
        Ok(())
    }
}

struct Main;

impl Stage<HelloState> for Main {}

impl Estimator<HelloState> for Main {
    fn estimate(&mut self, state: &mut HelloState, config: &Config) -> Result<()> {
        let greeting = match config.get_str("helloStage.suffix") {
            Some(suffix) => format!("hello {suffix}"),
            None => "hello".to_string(),
        };
        state.text = Some(greeting);
        Ok(())
    }

    fn fit(&mut self, state: &mut HelloState, _config: &Config) -> Result<()> {
        state.trained = true;
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = ModeArgs::parse_for(PROJECT_NAME);
    surround::init_tracing_from_env();

    let assembler = Assembler::new(PROJECT_NAME, InputValidator, Main, Config::new());
    let mut runner = BatchRunner::new(assembler);
    surround::dispatch(args.run_mode(), &mut runner)?;

    if let Some(state) = runner.last_state() {
        println!("mode={}", args.run_mode());
        println!("trained={}", state.trained);
        println!("text={}", state.text.as_deref().unwrap_or(""));
        surround::print_summary(state.meta());
    }
    Ok(())
}
