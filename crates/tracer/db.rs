use std::collections::HashMap;

use revm::{
    DatabaseRef,
    primitives::{
        AccountInfo as RevmAccountInfo, Address as RevmAddress, B256 as RevmB256,
        Bytecode as RevmBytecode, KECCAK_EMPTY, U256 as RevmU256, keccak256,
    },
};

use crate::{
    config::TraceConfig,
    errors::{TraceDbError, TraceError},
};

/// Read-only pre-state seeded from a [`TraceConfig`]. Wrapped in a revm
/// `CacheDB` during tracing, which absorbs the writes of each transaction.
#[derive(Debug, Default, Clone)]
pub struct TraceDb {
    accounts: HashMap<RevmAddress, RevmAccountInfo>,
    storage: HashMap<RevmAddress, HashMap<RevmU256, RevmU256>>,
    code: HashMap<RevmB256, RevmBytecode>,
    block_hashes: HashMap<u64, RevmB256>,
}

impl TraceDb {
    pub fn from_config(config: &TraceConfig) -> Result<Self, TraceError> {
        let mut db = TraceDb::default();

        for (address, account) in &config.accounts {
            let revm_address = RevmAddress::from(address.0);
            let code_hash = if account.code.is_empty() {
                KECCAK_EMPTY
            } else {
                let bytecode = RevmBytecode::new_raw_checked(account.code.clone().into())
                    .map_err(|err| TraceError::InvalidBytecode {
                        address: *address,
                        reason: format!("{err:?}"),
                    })?;
                let hash = keccak256(&account.code);
                db.code.insert(hash, bytecode);
                hash
            };

            db.accounts.insert(
                revm_address,
                RevmAccountInfo {
                    balance: RevmU256::from_limbs(account.balance.0),
                    nonce: account.nonce,
                    code_hash,
                    code: None,
                },
            );

            let slots = account
                .storage
                .iter()
                .map(|(key, value)| (RevmU256::from_limbs(key.0), RevmU256::from_limbs(value.0)))
                .collect();
            db.storage.insert(revm_address, slots);
        }

        // history_hashes[len - 1] is the parent of the traced block.
        let number = config.block_constants.number;
        let len = config.history_hashes.len() as u64;
        for (offset, hash) in config.history_hashes.iter().enumerate() {
            let Some(block_number) = number
                .checked_add(offset as u64)
                .and_then(|n| n.checked_sub(len))
            else {
                continue;
            };
            let hash = RevmB256::from(RevmU256::from_limbs(hash.0).to_be_bytes::<32>());
            db.block_hashes.insert(block_number, hash);
        }

        Ok(db)
    }

    #[cfg(test)]
    fn block_hash_count(&self) -> usize {
        self.block_hashes.len()
    }
}

impl DatabaseRef for TraceDb {
    /// The database error type.
    type Error = TraceDbError;

    /// Get basic account information.
    fn basic_ref(&self, address: RevmAddress) -> Result<Option<RevmAccountInfo>, Self::Error> {
        Ok(self.accounts.get(&address).cloned())
    }

    /// Get account code by its hash.
    fn code_by_hash_ref(&self, code_hash: RevmB256) -> Result<RevmBytecode, Self::Error> {
        if code_hash == KECCAK_EMPTY {
            return Ok(RevmBytecode::default());
        }
        self.code
            .get(&code_hash)
            .cloned()
            .ok_or(TraceDbError::CodeNotFound(code_hash))
    }

    /// Get storage value of address at index. Unset slots read as zero.
    fn storage_ref(&self, address: RevmAddress, index: RevmU256) -> Result<RevmU256, Self::Error> {
        Ok(self
            .storage
            .get(&address)
            .and_then(|slots| slots.get(&index))
            .copied()
            .unwrap_or_default())
    }

    /// Get block hash by block number. Blocks outside the supplied history
    /// hash to zero.
    fn block_hash_ref(&self, number: u64) -> Result<RevmB256, Self::Error> {
        Ok(self
            .block_hashes
            .get(&number)
            .copied()
            .unwrap_or_default())
    }
}
