use {
  crate::Wei,
  serde::{Deserialize, Serialize},
};

/// Identifies the native contract implementation that handles
/// calls made to an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Code {
  /// Crowdfunding ledger with owner-only withdrawals.
  FundMe,

  /// Price feed with a caller-settable answer, used on development chains.
  MockV3Aggregator,
}

/// Represents the basic unit of storage in the chain state.
///
/// Externally owned accounts (user wallets) carry only a nonce and a
/// balance. Contract accounts additionally carry the code that handles
/// calls made to them and the serialized contract storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
  /// Number of transactions sent from this account. A transaction
  /// is only accepted if it carries the current nonce of its sender.
  pub nonce: u64,

  /// Native currency held by this account, in wei.
  pub balance: Wei,

  /// The contract implementation for this account, `None` for wallets.
  pub code: Option<Code>,

  /// Contract storage encoded as msgpack. Empty for wallets.
  pub storage: Vec<u8>,
}

impl Account {
  pub fn wallet(balance: Wei) -> Self {
    Self {
      balance,
      ..Default::default()
    }
  }

  pub fn contract(code: Code, storage: Vec<u8>) -> Self {
    Self {
      nonce: 0,
      balance: 0,
      code: Some(code),
      storage,
    }
  }

  pub fn is_contract(&self) -> bool {
    self.code.is_some()
  }
}
