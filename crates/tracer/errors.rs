use ethereum_types::Address;
use revm::primitives::B256;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("invalid bytecode for account {address:#x}: {reason}")]
    InvalidBytecode { address: Address, reason: String },
    #[error("{field} does not fit in 64 bits")]
    QuantityOverflow { field: &'static str },
    #[error("Failed to apply config.Transactions[{index}]: {reason}")]
    Transaction { index: usize, reason: String },
    #[error("state error: {0}")]
    Database(#[from] TraceDbError),
}

/// Error type of the in-memory pre-state handed to revm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceDbError {
    #[error("code not found for hash {0}")]
    CodeNotFound(B256),
}
