use {
  crate::{deploy::Tag, network::Network},
  clap::{Parser, Subcommand},
  fundme_primitives::{parse_ether, Address, Wei, GWEI},
  std::path::PathBuf,
};

/// FundMe Local Devnode
///
/// A single node instance of the FundMe chain for local use. Every
/// submitted transaction is executed immediately in its own block.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// Network the scripts run against
  #[clap(short, long,
    value_enum,
    default_value = "hardhat",
    value_name = "NAME")]
  network: Network,

  /// Directory of the persistent chain state, in-memory if omitted
  #[clap(short, long, value_name = "PATH")]
  data_dir: Option<PathBuf>,

  /// Price of one unit of gas in gwei
  #[clap(long, default_value = "1", value_name = "GWEI")]
  gas_price: u64,

  /// Number of funded development signers
  #[clap(long, default_value = "10", value_name = "COUNT")]
  signers: usize,

  /// ETH/USD price feed used by FundMe on live networks
  #[clap(long, value_name = "ADDRESS")]
  price_feed: Option<Address>,

  #[clap(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List development signers and their balances
  Accounts,

  /// Run deploy scripts
  Deploy {
    /// Deploy scripts to run
    #[clap(long, value_enum, default_value = "all")]
    tags: Tag,
  },

  /// Contribute to the deployed FundMe ledger
  Fund {
    /// Contribution in ETH
    #[clap(long, default_value = "0.05", value_parser = parse_ether)]
    value: Wei,

    /// Index of the signer sending the contribution
    #[clap(long, default_value = "0")]
    account: usize,
  },

  /// Withdraw everything held by the FundMe ledger
  Withdraw {
    /// Use the withdraw variant with fewer storage reads
    #[clap(long)]
    cheaper: bool,

    /// Index of the signer sending the withdrawal
    #[clap(long, default_value = "0")]
    account: usize,
  },

  /// Show the state of the FundMe ledger
  Status,

  /// Publish a new answer on the mock price feed
  SetPrice {
    /// Answer with the feed decimals, 200000000000 is 2000 USD
    #[clap(allow_hyphen_values = true)]
    answer: i128,
  },
}

impl SystemSettings {
  pub fn network(&self) -> Network {
    self.network
  }

  pub fn data_dir(&self) -> Option<&PathBuf> {
    self.data_dir.as_ref()
  }

  pub fn gas_price(&self) -> Wei {
    self.gas_price as Wei * GWEI
  }

  pub fn signers(&self) -> usize {
    self.signers
  }

  pub fn price_feed(&self) -> Option<Address> {
    self.price_feed
  }
}
