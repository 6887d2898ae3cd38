use std::collections::BTreeMap;

use revm::primitives::ExecutionResult as RevmExecutionResult;
use serde::{Deserialize, Serialize};

/// Outcome of one traced transaction, in geth's `ExecutionResult` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub gas: u64,
    pub failed: bool,
    /// Hex without `0x` prefix. Holds the revert data when the call reverted.
    pub return_value: String,
    pub struct_logs: Vec<StructLog>,
}

impl ExecutionResult {
    pub fn new(result: &RevmExecutionResult, struct_logs: Vec<StructLog>) -> Self {
        ExecutionResult {
            gas: result.gas_used(),
            failed: !result.is_success(),
            return_value: result.output().map(hex::encode).unwrap_or_default(),
            struct_logs,
        }
    }
}

/// A single interpreter step as recorded by the struct logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLog {
    pub pc: u64,
    pub op: String,
    /// Gas remaining before the step executed.
    pub gas: u64,
    /// Gas charged by the step. Includes the gas handed to a called frame
    /// but not the gas handed to a `CREATE`/`CREATE2` frame. A step that
    /// runs out of gas reports 0 rather than the cost it attempted.
    pub gas_cost: u64,
    pub depth: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `0x` prefixed words, bottom of the stack first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
    /// 32 byte words, hex encoded without prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_data: Option<String>,
}
