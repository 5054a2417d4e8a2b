//! Caller-facing commands: run an operation and render its result as text.
//!
//! Every command writes to a caller-supplied [`std::io::Write`] so output
//! can be captured in tests as easily as printed to stdout.

pub mod deploy;
pub mod describe;
pub mod list;
pub mod namespaces;
pub mod remove;

pub use describe::FunctionDescription;
