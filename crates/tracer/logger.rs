use std::collections::{BTreeMap, HashMap};

use revm::{
    Database, EvmContext, Inspector,
    interpreter::{Interpreter, InterpreterAction, OpCode, opcode},
    primitives::{Address as RevmAddress, U256 as RevmU256},
};

use crate::{config::LoggerConfig, execution_result::StructLog};

/// Records one [`StructLog`] per executed opcode, the way geth's struct
/// logger does. A logger is meant to observe a single transaction.
#[derive(Debug, Default)]
pub struct StructLogger {
    config: LoggerConfig,
    logs: Vec<StructLog>,
    /// Slots touched so far by `SLOAD`/`SSTORE`, per executing contract.
    storage: HashMap<RevmAddress, BTreeMap<RevmU256, RevmU256>>,
    pending: Option<PendingStep>,
}

/// Interpreter state captured before an opcode runs, completed in `step_end`.
#[derive(Debug)]
struct PendingStep {
    pc: u64,
    opcode: u8,
    gas_remaining: u64,
    depth: u64,
    contract: RevmAddress,
    stack: Option<Vec<String>>,
    memory: Option<Vec<String>>,
    storage_access: Option<StorageAccess>,
}

#[derive(Debug)]
enum StorageAccess {
    Read { key: RevmU256 },
    Write { key: RevmU256, value: RevmU256 },
}

impl StructLogger {
    pub fn new(config: LoggerConfig) -> Self {
        StructLogger {
            config,
            ..Default::default()
        }
    }

    pub fn into_struct_logs(self) -> Vec<StructLog> {
        self.logs
    }

    fn storage_access(&self, opcode: u8, stack: &[RevmU256]) -> Option<StorageAccess> {
        if self.config.disable_storage {
            return None;
        }
        let mut top = stack.iter().rev();
        match opcode {
            opcode::SLOAD => top.next().map(|key| StorageAccess::Read { key: *key }),
            opcode::SSTORE => match (top.next(), top.next()) {
                (Some(key), Some(value)) => Some(StorageAccess::Write {
                    key: *key,
                    value: *value,
                }),
                _ => None,
            },
            _ => None,
        }
    }

    fn record_slot(
        &mut self,
        contract: RevmAddress,
        key: RevmU256,
        value: RevmU256,
    ) -> BTreeMap<String, String> {
        let slots = self.storage.entry(contract).or_default();
        slots.insert(key, value);
        slots
            .iter()
            .map(|(key, value)| (word_hex(key), word_hex(value)))
            .collect()
    }
}

fn word_hex(word: &RevmU256) -> String {
    hex::encode(word.to_be_bytes::<32>())
}

fn opcode_name(opcode: u8) -> String {
    OpCode::new(opcode)
        .map(|op| op.as_str().to_string())
        .unwrap_or_else(|| format!("opcode {opcode:#04x}"))
}

impl<DB: Database> Inspector<DB> for StructLogger {
    fn step(&mut self, interp: &mut Interpreter, context: &mut EvmContext<DB>) {
        let opcode = interp.current_opcode();
        let stack = interp.stack.data();

        let pending = PendingStep {
            pc: interp.program_counter() as u64,
            opcode,
            gas_remaining: interp.gas.remaining(),
            depth: context.journaled_state.depth as u64,
            contract: interp.contract.target_address,
            stack: (!self.config.disable_stack)
                .then(|| stack.iter().map(|word| format!("{word:#x}")).collect()),
            memory: self.config.enable_memory.then(|| {
                interp
                    .shared_memory
                    .context_memory()
                    .chunks(32)
                    .map(hex::encode)
                    .collect()
            }),
            storage_access: self.storage_access(opcode, stack),
        };
        self.pending = Some(pending);
    }

    fn step_end(&mut self, interp: &mut Interpreter, _context: &mut EvmContext<DB>) {
        let Some(step) = self.pending.take() else {
            return;
        };
        let failed = interp.instruction_result.is_error();
        // CREATE already deducted the child's gas; calls keep it in their cost.
        let forwarded = match &interp.next_action {
            InterpreterAction::Create { inputs } => inputs.gas_limit,
            _ => 0,
        };

        let storage = match step.storage_access {
            Some(StorageAccess::Write { key, value }) => {
                Some(self.record_slot(step.contract, key, value))
            }
            Some(StorageAccess::Read { key }) if !failed => {
                let value = interp.stack.data().last().copied().unwrap_or_default();
                Some(self.record_slot(step.contract, key, value))
            }
            _ => None,
        };

        self.logs.push(StructLog {
            pc: step.pc,
            op: opcode_name(step.opcode),
            gas: step.gas_remaining,
            gas_cost: step
                .gas_remaining
                .saturating_sub(interp.gas.remaining())
                .saturating_sub(forwarded),
            depth: step.depth,
            error: failed.then(|| format!("{:?}", interp.instruction_result)),
            stack: step.stack,
            memory: step.memory,
            storage,
            return_data: self
                .config
                .enable_return_data
                .then(|| format!("0x{}", hex::encode(&interp.return_data_buffer))),
        });
    }
}
