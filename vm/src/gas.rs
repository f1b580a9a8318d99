/// Gas charged for the different parts of a transaction.
///
/// The total cost of a transaction is its base cost plus one charge per
/// contract storage read and write, multiplied by the gas price of the
/// transaction. Failed transactions are not included in the state, so
/// they cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
  /// Base cost of a call or a plain value transfer.
  pub transaction: u64,

  /// Base cost of a contract deployment.
  pub create: u64,

  pub storage_read: u64,
  pub storage_write: u64,
}

impl Default for Schedule {
  fn default() -> Self {
    Self {
      transaction: 21_000,
      create: 53_000,
      storage_read: 2_100,
      storage_write: 20_000,
    }
  }
}
