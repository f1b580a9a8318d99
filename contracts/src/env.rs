use {
  fundme_primitives::{Address, Wei},
  thiserror::Error,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
  #[error("insufficient balance: {available} available, {requested} requested")]
  InsufficientBalance { available: Wei, requested: Wei },

  #[error("recipient {0} does not accept value transfers")]
  Rejected(Address),
}

/// Kind of contract storage access, used for gas metering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAccess {
  Read,
  Write,
}

/// Tally of storage accesses made by a contract call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StorageCounter {
  pub reads: u64,
  pub writes: u64,
}

impl StorageCounter {
  pub fn record(&mut self, access: StorageAccess) {
    match access {
      StorageAccess::Read => self.reads += 1,
      StorageAccess::Write => self.writes += 1,
    }
  }
}

/// The transaction environment a contract call runs in.
///
/// Implementations are expected to have already moved the attached
/// value into the contract account before the call starts, so
/// [`Env::balance`] includes [`Env::value`].
pub trait Env {
  /// Identity of the account that made the call.
  fn caller(&self) -> &Address;

  /// Native currency attached to the call.
  fn value(&self) -> Wei;

  /// Native currency held by the called contract.
  fn balance(&self) -> Wei;

  /// Moves native currency out of the called contract.
  ///
  /// On failure no balance has changed.
  fn transfer(&mut self, to: &Address, amount: Wei) -> Result<(), TransferError>;

  /// Notified on every contract storage access.
  fn record(&mut self, access: StorageAccess) {
    let _ = access;
  }
}
