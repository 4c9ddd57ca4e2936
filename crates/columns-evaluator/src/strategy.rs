//! The capability a player needs to take part in self-play.

use std::fmt;

/// Failure of a strategy to produce an output.
///
/// Unlike illegal moves, strategy errors are not part of the game: the arena
/// aborts the game and reports them.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StrategyError {
    #[display("expected {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },
    #[display("strategy failed: {message}")]
    Failed { message: String },
}

/// Maps an encoded game state to one weight per catalog position.
///
/// See [`codec`](crate::codec) for the input and output layouts.
/// Implementations must be deterministic for the arena to be reproducible.
pub trait Strategy: fmt::Debug + Send + Sync {
    fn activate(&self, input: &[f32]) -> Result<Vec<f32>, StrategyError>;
}

impl<S> Strategy for &S
where
    S: Strategy + ?Sized,
{
    fn activate(&self, input: &[f32]) -> Result<Vec<f32>, StrategyError> {
        (**self).activate(input)
    }
}

impl<S> Strategy for Box<S>
where
    S: Strategy + ?Sized,
{
    fn activate(&self, input: &[f32]) -> Result<Vec<f32>, StrategyError> {
        (**self).activate(input)
    }
}

pub type BoxedStrategy = Box<dyn Strategy>;
