use {
  crate::{PriceOracle, RoundData},
  serde::{Deserialize, Serialize},
  std::collections::BTreeMap,
};

/// A price feed whose answer is set by whoever calls it.
///
/// Deployed on development chains in place of a real price feed so that
/// tests and local scripts control the exchange rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockV3Aggregator {
  decimals: u8,
  latest_answer: i128,
  latest_timestamp: u64,
  latest_round: u64,
  rounds: BTreeMap<u64, RoundData>,
}

impl MockV3Aggregator {
  pub const VERSION: u64 = 0;

  pub fn new(decimals: u8, initial_answer: i128, timestamp: u64) -> Self {
    let mut aggregator = Self {
      decimals,
      latest_answer: 0,
      latest_timestamp: 0,
      latest_round: 0,
      rounds: BTreeMap::new(),
    };
    aggregator.update_answer(initial_answer, timestamp);
    aggregator
  }

  /// Publishes a new answer in the next round.
  pub fn update_answer(&mut self, answer: i128, timestamp: u64) {
    let round_id = self.latest_round + 1;
    self.update_round_data(round_id, answer, timestamp, timestamp);
  }

  /// Overwrites the data of an arbitrary round and makes it the latest.
  pub fn update_round_data(
    &mut self,
    round_id: u64,
    answer: i128,
    timestamp: u64,
    started_at: u64,
  ) {
    self.latest_round = round_id;
    self.latest_answer = answer;
    self.latest_timestamp = timestamp;
    self.rounds.insert(round_id, RoundData {
      round_id,
      answer,
      started_at,
      updated_at: timestamp,
      answered_in_round: round_id,
    });
  }

  pub fn get_round_data(&self, round_id: u64) -> Option<&RoundData> {
    self.rounds.get(&round_id)
  }

  pub fn latest_answer(&self) -> i128 {
    self.latest_answer
  }

  pub fn latest_timestamp(&self) -> u64 {
    self.latest_timestamp
  }

  pub fn latest_round(&self) -> u64 {
    self.latest_round
  }
}

impl PriceOracle for MockV3Aggregator {
  fn latest_round_data(&self) -> RoundData {
    RoundData {
      round_id: self.latest_round,
      answer: self.latest_answer,
      started_at: self
        .rounds
        .get(&self.latest_round)
        .map(|round| round.started_at)
        .unwrap_or(self.latest_timestamp),
      updated_at: self.latest_timestamp,
      answered_in_round: self.latest_round,
    }
  }

  fn decimals(&self) -> u8 {
    self.decimals
  }

  fn version(&self) -> u64 {
    Self::VERSION
  }

  fn description(&self) -> String {
    "v0.6/tests/MockV3Aggregator.sol".into()
  }
}

#[cfg(test)]
mod tests {
  use {super::MockV3Aggregator, crate::PriceOracle};

  #[test]
  fn answers_advance_rounds() {
    let mut feed = MockV3Aggregator::new(8, 2000_0000_0000, 100);
    assert_eq!(feed.decimals(), 8);
    assert_eq!(feed.latest_round(), 1);
    assert_eq!(feed.current_rate(), 2000_0000_0000);

    feed.update_answer(1500_0000_0000, 200);
    let latest = feed.latest_round_data();
    assert_eq!(latest.round_id, 2);
    assert_eq!(latest.answer, 1500_0000_0000);
    assert_eq!(latest.updated_at, 200);

    // history is kept per round
    assert_eq!(feed.get_round_data(1).map(|r| r.answer), Some(2000_0000_0000));
    assert!(feed.get_round_data(3).is_none());
  }

  #[test]
  fn round_data_can_be_overwritten() {
    let mut feed = MockV3Aggregator::new(8, 2000_0000_0000, 100);
    feed.update_round_data(10, 1800_0000_0000, 300, 250);

    let latest = feed.latest_round_data();
    assert_eq!(latest.round_id, 10);
    assert_eq!(latest.started_at, 250);
    assert_eq!(latest.updated_at, 300);
    assert_eq!(feed.latest_timestamp(), 300);

    // next plain update continues from the overwritten round
    feed.update_answer(1900_0000_0000, 400);
    assert_eq!(feed.latest_round(), 11);
  }
}
