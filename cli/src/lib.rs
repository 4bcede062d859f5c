pub mod commands;
pub mod context;
pub mod logging;
pub mod tasks;

pub use context::{CliContext, Studio};
