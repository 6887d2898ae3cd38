use std::collections::BTreeMap;

use bytes::Bytes;
use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::serde_utils;

/// Everything needed to trace a batch of transactions against an in-memory
/// pre-state. Built fresh from the caller's JSON on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(with = "serde_utils::u256::hex_str")]
    pub chain_id: U256,
    /// Hashes of the most recent blocks, oldest first. The last entry belongs
    /// to block `number - 1`.
    #[serde(with = "serde_utils::u256::vec", default)]
    pub history_hashes: Vec<U256>,
    pub block_constants: BlockConstants,
    #[serde(default)]
    pub accounts: BTreeMap<Address, Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub logger_config: LoggerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockConstants {
    pub coinbase: Address,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub timestamp: U256,
    #[serde(with = "serde_utils::u64::hex_str")]
    pub number: u64,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub difficulty: U256,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub gas_limit: U256,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub base_fee: U256,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    #[serde(with = "serde_utils::u64::hex_str")]
    pub nonce: u64,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub balance: U256,
    #[serde(with = "serde_utils::bytes", default)]
    pub code: Bytes,
    #[serde(with = "serde_utils::u256::btreemap", default)]
    pub storage: BTreeMap<U256, U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    /// `None` deploys `call_data` as init code.
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(with = "serde_utils::u64::hex_str")]
    pub nonce: u64,
    #[serde(with = "serde_utils::u64::hex_str")]
    pub gas_limit: u64,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub value: U256,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub gas_price: U256,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub gas_fee_cap: U256,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub gas_tip_cap: U256,
    #[serde(with = "serde_utils::bytes", default)]
    pub call_data: Bytes,
    #[serde(default)]
    pub access_list: Vec<AccessListItem>,
    #[serde(default)]
    pub v: u64,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub r: U256,
    #[serde(with = "serde_utils::u256::hex_str")]
    pub s: U256,
}

impl Transaction {
    /// EIP-1559 pricing applies only when the caller set a fee cap.
    pub fn is_dynamic_fee(&self) -> bool {
        !self.gas_fee_cap.is_zero()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessListItem {
    pub address: Address,
    #[serde(rename = "storageKeys", alias = "storage_keys", default)]
    pub storage_keys: Vec<ethereum_types::H256>,
}

/// Which parts of the interpreter state end up in each struct log.
/// Field names follow geth's `logger.Config`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoggerConfig {
    pub enable_memory: bool,
    pub disable_stack: bool,
    pub disable_storage: bool,
    pub enable_return_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SELF_TEST_CONFIG;
    use hex_literal::hex;

    #[test]
    fn decodes_self_test_fixture() {
        let config: TraceConfig = serde_json::from_str(SELF_TEST_CONFIG).unwrap();

        assert_eq!(config.chain_id, U256::from(0x53a));
        assert!(config.history_hashes.is_empty());
        assert_eq!(config.block_constants.number, 0xcafe);
        assert_eq!(config.block_constants.timestamp, U256::from(0x75bcd15));
        assert_eq!(config.block_constants.gas_limit, U256::from(0x2386f26fc10000u64));
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.transactions.len(), 1);

        let contract = Address::from(hex!("000000000000000000000000000000000cafe111"));
        let account = &config.accounts[&contract];
        assert_eq!(account.address, contract);
        assert_eq!(account.balance, U256::from(0x8ac7230489e80000u64));
        assert_eq!(account.code.first(), Some(&0x00));

        let tx = &config.transactions[0];
        assert_eq!(tx.to, Some(contract));
        assert_eq!(tx.gas_limit, 0xf4240);
        assert_eq!(tx.gas_price, U256::one());
        assert!(!tx.is_dynamic_fee());

        assert_eq!(
            config.logger_config,
            LoggerConfig {
                enable_memory: true,
                disable_stack: false,
                disable_storage: false,
                enable_return_data: true,
            }
        );
    }

    #[test]
    fn fixture_survives_reencoding() {
        let config: TraceConfig = serde_json::from_str(SELF_TEST_CONFIG).unwrap();
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: TraceConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(config, decoded);
    }

    #[test]
    fn missing_logger_flags_default_to_false() {
        let flags: LoggerConfig = serde_json::from_str(r#"{"EnableMemory":true}"#).unwrap();
        assert!(flags.enable_memory);
        assert!(!flags.disable_stack);
        assert!(!flags.disable_storage);
        assert!(!flags.enable_return_data);
    }

    #[test]
    fn access_list_accepts_both_key_spellings() {
        let camel: AccessListItem = serde_json::from_str(
            r#"{"address":"0x000000000000000000000000000000000cafe111","storageKeys":["0x0000000000000000000000000000000000000000000000000000000000000001"]}"#,
        )
        .unwrap();
        let snake: AccessListItem = serde_json::from_str(
            r#"{"address":"0x000000000000000000000000000000000cafe111","storage_keys":["0x0000000000000000000000000000000000000000000000000000000000000001"]}"#,
        )
        .unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.storage_keys.len(), 1);
    }

    #[test]
    fn contract_creation_has_no_recipient() {
        let mut config: TraceConfig = serde_json::from_str(SELF_TEST_CONFIG).unwrap();
        config.transactions[0].to = None;
        let encoded = serde_json::to_value(&config).unwrap();
        assert!(encoded["transactions"][0]["to"].is_null());
    }
}
