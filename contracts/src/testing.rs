use {
  crate::{Env, Error, StorageAccess, StorageCounter, TransferError},
  ed25519_dalek::Keypair,
  fundme_primitives::{Address, Wei},
  std::collections::BTreeMap,
};

/// In-memory transaction environment for contract unit tests.
///
/// Every call runs against a snapshot and is reverted when the
/// contract returns an error, like a transaction on chain.
#[derive(Debug, Clone, Default)]
pub struct TestEnv {
  held: Wei,
  payouts: BTreeMap<Address, Wei>,
  reject_payouts: bool,
  last_storage: StorageCounter,
}

pub struct TestCall<'e> {
  env: &'e mut TestEnv,
  caller: Address,
  value: Wei,
  storage: StorageCounter,
}

impl TestEnv {
  pub fn random_address() -> Address {
    Keypair::generate(&mut rand::thread_rng()).public.into()
  }

  pub fn call<T>(
    &mut self,
    caller: Address,
    value: Wei,
    op: impl FnOnce(&mut TestCall<'_>) -> Result<T, Error>,
  ) -> Result<T, Error> {
    let snapshot = self.clone();
    self.held += value;

    let mut call = TestCall {
      env: &mut *self,
      caller,
      value,
      storage: StorageCounter::default(),
    };
    let result = op(&mut call);
    let storage = call.storage;

    if result.is_err() {
      *self = snapshot;
    }
    self.last_storage = storage;
    result
  }

  pub fn held(&self) -> Wei {
    self.held
  }

  pub fn paid_to(&self, address: &Address) -> Wei {
    self.payouts.get(address).copied().unwrap_or_default()
  }

  pub fn last_storage(&self) -> StorageCounter {
    self.last_storage
  }

  /// Every outbound transfer fails from now on.
  pub fn reject_payouts(&mut self) {
    self.reject_payouts = true;
  }
}

impl Env for TestCall<'_> {
  fn caller(&self) -> &Address {
    &self.caller
  }

  fn value(&self) -> Wei {
    self.value
  }

  fn balance(&self) -> Wei {
    self.env.held
  }

  fn transfer(&mut self, to: &Address, amount: Wei) -> Result<(), TransferError> {
    if self.env.reject_payouts {
      return Err(TransferError::Rejected(*to));
    }
    if self.env.held < amount {
      return Err(TransferError::InsufficientBalance {
        available: self.env.held,
        requested: amount,
      });
    }
    self.env.held -= amount;
    *self.env.payouts.entry(*to).or_default() += amount;
    Ok(())
  }

  fn record(&mut self, access: StorageAccess) {
    self.storage.record(access);
  }
}
