use {
  serde::{Deserialize, Serialize},
  sha2::{Digest, Sha256},
  std::fmt::{Debug, Display},
};

/// Sha256 digest identifying blocks and transactions.
#[derive(
  Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Hash([u8; 32]);

impl Hash {
  pub const fn from_bytes(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }

  pub fn to_bytes(&self) -> [u8; 32] {
    self.0
  }

  /// Hash of the concatenation of all parts.
  pub fn of(parts: &[&[u8]]) -> Self {
    let mut hasher = Sha256::new();
    for part in parts {
      hasher.update(part);
    }
    Self(hasher.finalize().into())
  }
}

impl AsRef<[u8]> for Hash {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Display for Hash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", bs58::encode(self.0).into_string())
  }
}

impl Debug for Hash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "hash({})", bs58::encode(self.0).into_string())
  }
}
