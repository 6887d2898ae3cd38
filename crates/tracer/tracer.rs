pub mod config;
mod db;
mod errors;
pub mod evm;
mod execution_result;
pub mod fixtures;
mod logger;
pub mod serde_utils;

pub use config::{AccessListItem, Account, BlockConstants, LoggerConfig, TraceConfig, Transaction};
pub use db::TraceDb;
pub use errors::{TraceDbError, TraceError};
pub use execution_result::{ExecutionResult, StructLog};
pub use logger::StructLogger;

/// Produces one [`ExecutionResult`] per transaction of a configuration.
pub trait Tracer {
    fn trace(&self, config: &TraceConfig) -> Result<Vec<ExecutionResult>, TraceError>;
}

/// [`Tracer`] backed by revm with the struct logger attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevmTracer;

impl Tracer for RevmTracer {
    fn trace(&self, config: &TraceConfig) -> Result<Vec<ExecutionResult>, TraceError> {
        evm::trace(config)
    }
}
