use ethereum_types::U256;
use revm::{
    Evm, inspector_handle_register,
    db::CacheDB,
    primitives::{
        AccessListItem, Address as RevmAddress, B256, BlockEnv, SpecId, TxEnv,
        TxKind as RevmTxKind, U256 as RevmU256,
    },
};
use tracing::debug;

use crate::{
    config::{BlockConstants, TraceConfig, Transaction},
    db::TraceDb,
    errors::TraceError,
    execution_result::ExecutionResult,
    logger::StructLogger,
};

/// Hard fork every trace runs under.
pub const TRACE_SPEC_ID: SpecId = SpecId::LONDON;

/// Runs every transaction of `config` in order against the configured
/// pre-state. State changes of a transaction are visible to the ones after
/// it. A transaction that fails validation aborts the whole trace.
pub fn trace(config: &TraceConfig) -> Result<Vec<ExecutionResult>, TraceError> {
    let chain_id = checked_u64(config.chain_id, "chain_id")?;
    let mut db = CacheDB::new(TraceDb::from_config(config)?);
    let block_env = block_env(&config.block_constants);

    debug!(
        chain_id,
        block = config.block_constants.number,
        accounts = config.accounts.len(),
        transactions = config.transactions.len(),
        "Tracing transactions"
    );

    let mut results = Vec::with_capacity(config.transactions.len());
    for (index, tx) in config.transactions.iter().enumerate() {
        let mut logger = StructLogger::new(config.logger_config);
        let tx_result = {
            let mut evm = Evm::builder()
                .with_block_env(block_env.clone())
                .with_tx_env(tx_env(tx, chain_id))
                .modify_cfg_env(|cfg| {
                    cfg.chain_id = chain_id;
                    cfg.disable_base_fee = true;
                    cfg.disable_eip3607 = true;
                })
                .with_spec_id(TRACE_SPEC_ID)
                .with_external_context(&mut logger)
                .with_db(&mut db)
                .append_handler_register(inspector_handle_register)
                .build();
            evm.transact_commit()
                .map_err(|err| TraceError::Transaction {
                    index,
                    reason: err.to_string(),
                })?
        };

        let struct_logs = logger.into_struct_logs();
        debug!(
            index,
            gas_used = tx_result.gas_used(),
            success = tx_result.is_success(),
            steps = struct_logs.len(),
            "Traced transaction"
        );
        results.push(ExecutionResult::new(&tx_result, struct_logs));
    }

    Ok(results)
}

fn checked_u64(value: U256, field: &'static str) -> Result<u64, TraceError> {
    if value > U256::from(u64::MAX) {
        return Err(TraceError::QuantityOverflow { field });
    }
    Ok(value.low_u64())
}

pub fn block_env(constants: &BlockConstants) -> BlockEnv {
    let difficulty = RevmU256::from_limbs(constants.difficulty.0);
    BlockEnv {
        number: RevmU256::from(constants.number),
        coinbase: RevmAddress(constants.coinbase.0.into()),
        timestamp: RevmU256::from_limbs(constants.timestamp.0),
        gas_limit: RevmU256::from_limbs(constants.gas_limit.0),
        basefee: RevmU256::from_limbs(constants.base_fee.0),
        difficulty,
        prevrandao: Some(B256::from(difficulty.to_be_bytes::<32>())),
        blob_excess_gas_and_price: None,
    }
}

pub fn tx_env(tx: &Transaction, chain_id: u64) -> TxEnv {
    let (gas_price, gas_priority_fee) = if tx.is_dynamic_fee() {
        (
            RevmU256::from_limbs(tx.gas_fee_cap.0),
            Some(RevmU256::from_limbs(tx.gas_tip_cap.0)),
        )
    } else {
        (RevmU256::from_limbs(tx.gas_price.0), None)
    };

    TxEnv {
        caller: RevmAddress(tx.from.0.into()),
        gas_limit: tx.gas_limit,
        gas_price,
        transact_to: match tx.to {
            Some(address) => RevmTxKind::Call(RevmAddress(address.0.into())),
            None => RevmTxKind::Create,
        },
        value: RevmU256::from_limbs(tx.value.0),
        data: tx.call_data.clone().into(),
        // Account checks are skipped, the caller's nonce is informational.
        nonce: None,
        chain_id: Some(chain_id),
        access_list: tx
            .access_list
            .iter()
            .map(|item| AccessListItem {
                address: RevmAddress(item.address.0.into()),
                storage_keys: item
                    .storage_keys
                    .iter()
                    .map(|key| B256::from(key.0))
                    .collect(),
            })
            .collect(),
        gas_priority_fee,
        ..Default::default()
    }
}
