//! Donation goal tracker: progression, list validation and export

pub mod codegen;
mod progress;
mod validate;

#[cfg(test)]
mod progress_tests;

pub use progress::{
    COMPLETED_TEXT, CompletionTimings, DEFAULT_STACK_SIZE, GoalBar, GoalTracker, GoalView,
    STACK_FALLOFF, StackTier, amount_text, goal_percent, stack_tier,
};
pub use validate::{GoalListExt, GoalWarning, validate_goals};
