use {
  ed25519_dalek::Keypair,
  fundme_contracts::{FundMe, MockV3Aggregator},
  fundme_primitives::{
    Account,
    Action,
    Address,
    Call,
    Deployment,
    Transaction,
    Wei,
    GWEI,
    WEI_PER_ETHER,
  },
  fundme_vm::{BlockContext, InMemoryStateStore, Receipt, State, StateDiff},
};

pub const DECIMALS: u8 = 8;
pub const INITIAL_ANSWER: i128 = 2000_0000_0000;
pub const GAS_PRICE: Wei = GWEI;

/// Enough to fund once at the initial mock answer.
pub const SEND_VALUE: Wei = WEI_PER_ETHER;

/// Balance of every wallet created by [`Chain::wallet`].
pub const GENESIS_BALANCE: Wei = 10_000 * WEI_PER_ETHER;

/// A single-node chain that executes every submitted transaction
/// in its own block.
pub struct Chain {
  pub store: InMemoryStateStore,
  pub height: u64,
}

impl Chain {
  pub fn new() -> Self {
    Self {
      store: InMemoryStateStore::default(),
      height: 0,
    }
  }

  /// Creates a new wallet with [`GENESIS_BALANCE`] in state.
  pub fn wallet(&mut self) -> Keypair {
    let keypair = Keypair::generate(&mut rand::thread_rng());
    let mut genesis = StateDiff::default();
    genesis.set(keypair.public.into(), Account::wallet(GENESIS_BALANCE));
    self.store.apply(genesis);
    keypair
  }

  pub fn nonce(&self, address: &Address) -> u64 {
    self.store.get(address).map(|acc| acc.nonce).unwrap_or_default()
  }

  pub fn balance(&self, address: &Address) -> Wei {
    fundme_vm::balance(&self.store, address)
  }

  pub fn fund_me(&self, address: &Address) -> anyhow::Result<FundMe> {
    Ok(fundme_vm::load(&self.store, address)?)
  }

  pub fn feed(&self, address: &Address) -> anyhow::Result<MockV3Aggregator> {
    Ok(fundme_vm::load(&self.store, address)?)
  }

  /// Signs a transaction with the next nonce of the signer.
  pub fn transaction(
    &self,
    signer: &Keypair,
    value: Wei,
    action: Action,
  ) -> Transaction {
    let nonce = self.nonce(&signer.public.into());
    Transaction::signed(signer, nonce, GAS_PRICE, value, action)
  }

  /// Executes a transaction in a new block and applies its changes.
  pub fn submit(&mut self, tx: &Transaction) -> Result<Receipt, fundme_vm::Error> {
    let block = BlockContext {
      height: self.height + 1,
      timestamp: 1_700_000_000 + self.height,
    };
    let outcome = fundme_vm::execute(tx, &block, &self.store)?;
    self.store.apply(outcome.diff);
    self.height += 1;
    Ok(outcome.receipt)
  }

  pub fn call(
    &mut self,
    signer: &Keypair,
    to: Address,
    value: Wei,
    call: Call,
  ) -> Result<Receipt, fundme_vm::Error> {
    let tx = self.transaction(signer, value, Action::Call { to, call });
    self.submit(&tx)
  }

  pub fn deploy(
    &mut self,
    signer: &Keypair,
    deployment: Deployment,
  ) -> anyhow::Result<Address> {
    let tx = self.transaction(signer, 0, Action::Deploy(deployment));
    self
      .submit(&tx)?
      .contract_address
      .ok_or_else(|| anyhow::anyhow!("deploy receipt without an address"))
  }
}

/// A chain with a mock price feed and a FundMe ledger deployed by
/// the returned deployer.
pub struct Fixture {
  pub chain: Chain,
  pub deployer: Keypair,
  pub feed: Address,
  pub fund_me: Address,
}

impl Fixture {
  pub fn deploy() -> anyhow::Result<Self> {
    let mut chain = Chain::new();
    let deployer = chain.wallet();
    let feed = chain.deploy(&deployer, Deployment::MockV3Aggregator {
      decimals: DECIMALS,
      initial_answer: INITIAL_ANSWER,
    })?;
    let fund_me =
      chain.deploy(&deployer, Deployment::FundMe { price_feed: feed })?;
    Ok(Self {
      chain,
      deployer,
      feed,
      fund_me,
    })
  }

  pub fn fund(
    &mut self,
    funder: &Keypair,
    value: Wei,
  ) -> Result<Receipt, fundme_vm::Error> {
    let to = self.fund_me;
    self.chain.call(funder, to, value, Call::Fund)
  }
}
