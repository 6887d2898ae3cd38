use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use ethtrace_tracer::{RevmTracer, TraceConfig, TraceError, Tracer};
use tracing::debug;

use crate::status::TraceStatus;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to unmarshal config, err: {0}")]
    InvalidInput(String),
    #[error("Failed to unmarshal config, err: {0}")]
    Decode(serde_json::Error),
    #[error("Failed to run Trace, err: {0}")]
    Trace(#[from] TraceError),
    #[error("Failed to run Trace, err: tracer panicked: {0}")]
    Panicked(String),
    #[error("Failed to marshal []ExecutionResult, err: {0}")]
    Encode(serde_json::Error),
}

impl BridgeError {
    pub fn status(&self) -> TraceStatus {
        match self {
            BridgeError::InvalidInput(_) => TraceStatus::InvalidInput,
            BridgeError::Decode(_) => TraceStatus::Decode,
            BridgeError::Trace(_) | BridgeError::Panicked(_) => TraceStatus::Trace,
            BridgeError::Encode(_) => TraceStatus::Encode,
        }
    }
}

/// Traces a JSON encoded [`TraceConfig`] with revm and returns the
/// pretty-printed execution results.
pub fn create_trace(config: &str) -> Result<String, BridgeError> {
    create_trace_with(&RevmTracer, config)
}

/// Same as [`create_trace`] with a caller supplied tracer. The tracer is
/// only invoked once the config decoded successfully.
pub fn create_trace_with<T: Tracer>(tracer: &T, config: &str) -> Result<String, BridgeError> {
    let config: TraceConfig = serde_json::from_str(config).map_err(BridgeError::Decode)?;
    debug!(
        transactions = config.transactions.len(),
        "Decoded trace config"
    );

    let results = panic::catch_unwind(AssertUnwindSafe(|| tracer.trace(&config)))
        .map_err(|payload| BridgeError::Panicked(panic_message(payload.as_ref())))??;

    serde_json::to_string_pretty(&results).map_err(BridgeError::Encode)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethtrace_tracer::ExecutionResult;

    struct FailingTracer;

    impl Tracer for FailingTracer {
        fn trace(&self, _config: &TraceConfig) -> Result<Vec<ExecutionResult>, TraceError> {
            Err(TraceError::QuantityOverflow { field: "chain_id" })
        }
    }

    struct PanickingTracer;

    impl Tracer for PanickingTracer {
        fn trace(&self, _config: &TraceConfig) -> Result<Vec<ExecutionResult>, TraceError> {
            panic!("out of cheese")
        }
    }

    const EMPTY_CONFIG: &str = r#"{
        "chain_id": "0x1",
        "block_constants": {
            "coinbase": "0x0000000000000000000000000000000000000000",
            "timestamp": "0x0",
            "number": "0x1",
            "difficulty": "0x0",
            "gas_limit": "0x0",
            "base_fee": "0x0"
        }
    }"#;

    #[test]
    fn decode_errors_keep_their_prefix() {
        let err = create_trace("{").unwrap_err();
        assert_eq!(err.status(), TraceStatus::Decode);
        assert!(
            err.to_string()
                .starts_with("Failed to unmarshal config, err: ")
        );
    }

    #[test]
    fn tracer_errors_are_wrapped() {
        let err = create_trace_with(&FailingTracer, EMPTY_CONFIG).unwrap_err();
        assert_eq!(err.status(), TraceStatus::Trace);
        assert_eq!(
            err.to_string(),
            "Failed to run Trace, err: chain_id does not fit in 64 bits"
        );
    }

    #[test]
    fn tracer_panics_are_caught() {
        let err = create_trace_with(&PanickingTracer, EMPTY_CONFIG).unwrap_err();
        assert_eq!(err.status(), TraceStatus::Trace);
        assert_eq!(
            err.to_string(),
            "Failed to run Trace, err: tracer panicked: out of cheese"
        );
    }

    #[test]
    fn config_without_transactions_traces_to_empty_array() {
        assert_eq!(create_trace(EMPTY_CONFIG).unwrap(), "[]");
    }
}
