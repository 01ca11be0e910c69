//! Local tool execution
//!
//! The statically declared tool table and the executor that dispatches
//! backend-requested calls to it.

mod builtin;
mod executor;

pub use executor::LocalToolExecutor;
