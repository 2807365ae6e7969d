//! Chart synthesis from model-generated code.
//!
//! The pipeline: strip markdown fencing from the raw model text, evaluate
//! the candidate statements in a scoped JavaScript context that records
//! plotting commands, render the recorded commands to a PNG artifact, and
//! fall back to a deterministic default chart when the generated code
//! fails. Every request gets a fresh evaluation context and a fresh
//! drawing area — there is no shared drawing state between requests.
//!
//! The evaluator is a containment measure, not a sandbox: only `df` and
//! `plt` are installed, but JavaScript built-ins remain reachable and no
//! memory or CPU isolation is provided. Treat model output as trusted
//! input.

mod command;
mod engine;
mod error;
mod render;
mod sanitize;
mod synthesis;

pub use command::PlotCommand;
pub use engine::execute;
pub use error::ChartError;
pub use render::render;
pub use sanitize::strip_code_fences;
pub use synthesis::{fallback_commands, synthesize, ChartSynthesis};

pub type Result<T> = std::result::Result<T, ChartError>;
