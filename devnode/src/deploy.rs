use {
  crate::{
    accounts::Signers,
    chain::Node,
    network::{Network, DECIMALS, INITIAL_ANSWER},
  },
  clap::ValueEnum,
  fundme_primitives::{Action, Address, Deployment},
  tracing::info,
};

pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";
pub const FUND_ME: &str = "FundMe";

/// Selects which deploy scripts run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tag {
  All,
  Mocks,
  #[value(name = "fundme")]
  FundMe,
}

/// Deploys contracts on behalf of the deployer signer and remembers
/// their addresses per network.
pub struct Deployer<'n> {
  node: &'n mut Node,
  network: Network,
  price_feed: Option<Address>,
}

impl<'n> Deployer<'n> {
  pub fn new(
    node: &'n mut Node,
    network: Network,
    price_feed: Option<Address>,
  ) -> Self {
    Self {
      node,
      network,
      price_feed,
    }
  }

  /// Runs all deploy scripts matching the tag, in order.
  ///
  /// `all` deploys mocks only on development chains, while an explicit
  /// `mocks` tag deploys them on any network.
  pub fn run(&mut self, signers: &Signers, tag: Tag) -> anyhow::Result<()> {
    let mocks = match tag {
      Tag::All => self.network.is_development(),
      Tag::Mocks => true,
      Tag::FundMe => false,
    };
    if mocks {
      self.deploy_mocks(signers)?;
    }
    if matches!(tag, Tag::All | Tag::FundMe) {
      self.deploy_fund_me(signers)?;
    }
    Ok(())
  }

  /// Address of a deployed contract, if deployed on this network.
  pub fn get(&self, name: &str) -> anyhow::Result<Option<Address>> {
    self.node.state().get_meta(&self.key(name))
  }

  /// Address of the FundMe ledger.
  ///
  /// On development chains all deploy scripts are run first if the
  /// ledger was not deployed yet.
  pub fn fund_me(&mut self, signers: &Signers) -> anyhow::Result<Address> {
    if let Some(address) = self.get(FUND_ME)? {
      return Ok(address);
    }
    if !self.network.is_development() {
      anyhow::bail!("{FUND_ME} is not deployed on {}", self.network);
    }
    self.run(signers, Tag::All)?;
    self
      .get(FUND_ME)?
      .ok_or_else(|| anyhow::anyhow!("{FUND_ME} deployment is missing"))
  }

  /// Deploys a mock price feed.
  pub fn deploy_mocks(&mut self, signers: &Signers) -> anyhow::Result<()> {
    match self.network.is_development() {
      true => info!("Local network detected! Deploying mocks..."),
      false => info!("Deploying mocks on {}...", self.network),
    }
    self.deploy(signers, MOCK_V3_AGGREGATOR, Deployment::MockV3Aggregator {
      decimals: DECIMALS,
      initial_answer: INITIAL_ANSWER,
    })?;
    info!("Mocks deployed!");
    info!("--------------------------");
    Ok(())
  }

  /// Deploys the FundMe ledger.
  ///
  /// Development chains always use the mock price feed. Other networks
  /// use the configured price feed, or a mock deployed there with the
  /// `mocks` tag. The chain rejects the deployment if the address is
  /// not a price feed.
  pub fn deploy_fund_me(
    &mut self,
    signers: &Signers,
  ) -> anyhow::Result<Address> {
    let configured = match self.network.is_development() {
      true => None,
      false => self.price_feed,
    };
    let price_feed = match configured {
      Some(address) => address,
      None => self.get(MOCK_V3_AGGREGATOR)?.ok_or_else(|| {
        match self.network.is_development() {
          true => anyhow::anyhow!(
            "no {MOCK_V3_AGGREGATOR} deployment on {}, run the mocks first",
            self.network
          ),
          false => anyhow::anyhow!(
            "no price feed on {}, pass --price-feed or deploy with --tags mocks",
            self.network
          ),
        }
      })?,
    };
    info!("using price feed {price_feed}");

    let address =
      self.deploy(signers, FUND_ME, Deployment::FundMe { price_feed })?;
    info!("--------------------------");
    Ok(address)
  }

  fn deploy(
    &mut self,
    signers: &Signers,
    name: &str,
    deployment: Deployment,
  ) -> anyhow::Result<Address> {
    if let Some(address) = self.get(name)? {
      info!("reusing \"{name}\" at {address}");
      return Ok(address);
    }

    let receipt =
      self
        .node
        .send(signers.deployer()?, 0, Action::Deploy(deployment))?;
    let address = receipt
      .contract_address
      .ok_or_else(|| anyhow::anyhow!("deploy of {name} created no contract"))?;

    let key = self.key(name);
    self.node.store_mut().put_meta(&key, &address)?;
    info!(
      "deployed \"{name}\" at {address} with {} gas",
      receipt.gas_used
    );
    Ok(address)
  }

  fn key(&self, name: &str) -> String {
    format!("deployments/{name}")
  }
}
