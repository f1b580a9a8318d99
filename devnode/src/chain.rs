use {
  crate::{accounts::Signers, storage::Store},
  ed25519_dalek::Keypair,
  fundme_primitives::{
    format_ether,
    Action,
    Address,
    Block,
    Transaction,
    Wei,
  },
  fundme_vm::{BlockContext, Receipt, State},
  serde::de::DeserializeOwned,
  std::time::{SystemTime, UNIX_EPOCH},
  tracing::{info, warn},
};

/// Local chain that produces a block for every submitted transaction.
pub struct Node {
  store: Store,
  head: Block,
  gas_price: Wei,
}

impl Node {
  /// Opens the chain in `store` and funds any signer that has
  /// no wallet yet.
  pub fn new(
    mut store: Store,
    signers: &Signers,
    gas_price: Wei,
  ) -> anyhow::Result<Self> {
    let head = store.head()?.unwrap_or_else(Block::zero);

    let genesis = signers.genesis(&store);
    if !genesis.is_empty() {
      info!("funding {} development signers", genesis.iter().count());
      store.apply(genesis);
    }

    Ok(Self {
      store,
      head,
      gas_price,
    })
  }

  pub fn head(&self) -> &Block {
    &self.head
  }

  pub fn state(&self) -> &Store {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut Store {
    &mut self.store
  }

  pub fn balance(&self, address: &Address) -> Wei {
    fundme_vm::balance(&self.store, address)
  }

  /// Decodes the storage of a contract.
  pub fn load<T: DeserializeOwned>(
    &self,
    address: &Address,
  ) -> anyhow::Result<T> {
    Ok(fundme_vm::load(&self.store, address)?)
  }

  /// Signs a transaction with the next nonce of the signer, includes it
  /// in a new block and waits for it to be mined.
  pub fn send(
    &mut self,
    signer: &Keypair,
    value: Wei,
    action: Action,
  ) -> anyhow::Result<Receipt> {
    let from: Address = signer.public.into();
    let nonce = self.store.get(&from).map(|acc| acc.nonce).unwrap_or(0);
    let tx = Transaction::signed(signer, nonce, self.gas_price, value, action);
    self.submit(tx)
  }

  /// Executes a transaction in a new block.
  ///
  /// Failed transactions are not included in any block and leave the
  /// chain unchanged.
  pub fn submit(&mut self, tx: Transaction) -> anyhow::Result<Receipt> {
    let block = Block::new(&self.head, self.timestamp(), vec![tx]);
    let tx = &block.transactions[0];

    let context = BlockContext::from(&block);
    let outcome = match fundme_vm::execute(tx, &context, &self.store) {
      Ok(outcome) => outcome,
      Err(e) => {
        warn!("transaction {} reverted: {e}", tx.hash());
        return Err(e.into());
      }
    };

    self.store.commit(outcome.diff, &block)?;

    info!(
      "mined block {} with transaction {} (gas used: {}, fee: {} ETH)",
      block.height,
      tx.hash(),
      outcome.receipt.gas_used,
      format_ether(outcome.receipt.gas_cost())
    );

    self.head = block;
    Ok(outcome.receipt)
  }

  fn timestamp(&self) -> u64 {
    let now = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|elapsed| elapsed.as_secs())
      .unwrap_or_default();
    now.max(self.head.timestamp)
  }
}
