use {
  crate::{Hash, Transaction},
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
};

#[derive(Clone, Serialize, Deserialize)]
pub struct Block {
  pub height: u64,
  pub parent: Hash,

  /// Seconds since unix epoch at the time the block was produced.
  pub timestamp: u64,
  pub transactions: Vec<Transaction>,

  #[serde(skip)]
  hash_cache: OnceCell<Hash>,
}

impl Block {
  pub fn new(
    parent: &Block,
    timestamp: u64,
    transactions: Vec<Transaction>,
  ) -> Self {
    Self {
      height: parent.height + 1,
      parent: *parent.hash(),
      timestamp,
      transactions,
      hash_cache: Default::default(),
    }
  }

  pub fn zero() -> Self {
    Self {
      height: 0,
      parent: Hash::default(),
      timestamp: 0,
      transactions: vec![],
      hash_cache: OnceCell::new(),
    }
  }

  pub fn hash(&self) -> &Hash {
    self
      .hash_cache
      .get_or_init(|| Hash::of(&[&rmp_serde::to_vec(self).unwrap()]))
  }
}

impl core::fmt::Debug for Block {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Block")
      .field("height", &self.height)
      .field("parent", &self.parent)
      .field("timestamp", &self.timestamp)
      .field("hash", self.hash())
      .field("transactions", &self.transactions)
      .finish()
  }
}
