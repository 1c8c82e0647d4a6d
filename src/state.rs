use std::time::Duration;

/// Timing record appended by the assembler after each filter or estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub stage: String,
    pub duration: Duration,
}

/// Bookkeeping the assembler reads and writes on every pipeline state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMeta {
    /// Errors recorded by stages. A non-empty list stops the current filter block.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stage_metadata: Vec<StageTiming>,
    /// Wall time of the most recent filter block.
    pub execution_time: Option<Duration>,
}

/// Data passed between the stages of a pipeline.
///
/// User state types embed a [`StateMeta`] and expose it through this trait:
///
/// ```
/// use surround::{State, StateMeta};
///
/// #[derive(Default)]
/// struct Words {
///     text: Option<String>,
///     meta: StateMeta,
/// }
///
/// impl State for Words {
///     fn meta(&self) -> &StateMeta {
///         &self.meta
///     }
///     fn meta_mut(&mut self) -> &mut StateMeta {
///         &mut self.meta
///     }
/// }
/// ```
pub trait State {
    fn meta(&self) -> &StateMeta;
    fn meta_mut(&mut self) -> &mut StateMeta;

    fn has_errors(&self) -> bool {
        !self.meta().errors.is_empty()
    }

    fn add_error(&mut self, error: impl Into<String>)
    where
        Self: Sized,
    {
        self.meta_mut().errors.push(error.into());
    }

    fn add_warning(&mut self, warning: impl Into<String>)
    where
        Self: Sized,
    {
        self.meta_mut().warnings.push(warning.into());
    }
}
