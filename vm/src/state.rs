use {
  fundme_primitives::{Account, Address},
  std::collections::{BTreeMap, HashMap},
};

/// Represents a change in chain accounts state.
///
/// Logically the entire state of the chain is the result of
/// cumulative application of consecutive state diffs. Accounts are
/// never removed, a diff only creates or replaces them.
///
/// A transaction produces a statediff only if it executes successfully,
/// which is what makes every transaction all-or-nothing: a failed
/// transaction has no diff to apply.
#[derive(Debug, Clone, Default)]
pub struct StateDiff {
  upserts: BTreeMap<Address, Account>,
}

impl StateDiff {
  /// Inserts or updates an account under a given address.
  ///
  /// If the state diff had an account stored under this address
  /// then the old value is returned, otherwise `None` is returned.
  pub fn set(&mut self, address: Address, account: Account) -> Option<Account> {
    self.upserts.insert(address, account)
  }

  /// The account stored under an address by this diff, if any.
  pub fn get(&self, address: &Address) -> Option<&Account> {
    self.upserts.get(address)
  }

  /// Iterate over all accounts created or changed by this diff.
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
    self.upserts.iter()
  }

  pub fn is_empty(&self) -> bool {
    self.upserts.is_empty()
  }
}

pub trait State {
  fn get(&self, address: &Address) -> Option<Account>;
  fn apply(&mut self, diff: StateDiff);
}

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
  data: HashMap<Address, Account>,
}

impl State for InMemoryStateStore {
  fn get(&self, address: &Address) -> Option<Account> {
    self.data.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    self.data.extend(diff.upserts);
  }
}
