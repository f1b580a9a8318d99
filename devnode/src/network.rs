use {clap::ValueEnum, std::fmt::Display};

/// Answer decimals of the mock price feed deployed on development chains.
pub const DECIMALS: u8 = 8;

/// Initial answer of the mock price feed, 2000 USD.
pub const INITIAL_ANSWER: i128 = 2000_0000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
  Hardhat,
  Localhost,
  Goerli,
  Sepolia,
}

impl Network {
  pub fn chain_id(&self) -> u64 {
    match self {
      Network::Hardhat | Network::Localhost => 31337,
      Network::Goerli => 5,
      Network::Sepolia => 11155111,
    }
  }

  /// Development chains have no real price feed, a mock
  /// aggregator is deployed in its place.
  pub fn is_development(&self) -> bool {
    matches!(self, Network::Hardhat | Network::Localhost)
  }

  pub fn name(&self) -> &'static str {
    match self {
      Network::Hardhat => "hardhat",
      Network::Localhost => "localhost",
      Network::Goerli => "goerli",
      Network::Sepolia => "sepolia",
    }
  }
}

impl Display for Network {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.name(), self.chain_id())
  }
}
