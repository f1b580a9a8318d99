use serde::{Deserialize, Serialize};

/// One price update published by a price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
  pub round_id: u64,
  pub answer: i128,
  pub started_at: u64,
  pub updated_at: u64,
  pub answered_in_round: u64,
}

/// A source of the native currency to USD exchange rate.
///
/// Answers are fixed-point numbers with [`PriceOracle::decimals`]
/// fractional digits, so with 8 decimals an answer of `200000000000`
/// means 2000 USD for one unit of native currency.
pub trait PriceOracle {
  fn latest_round_data(&self) -> RoundData;

  fn decimals(&self) -> u8;

  fn version(&self) -> u64;

  fn description(&self) -> String;

  /// The most recent answer of the feed.
  fn current_rate(&self) -> i128 {
    self.latest_round_data().answer
  }
}
