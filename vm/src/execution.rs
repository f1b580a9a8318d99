use {
  crate::{Schedule, State, StateDiff},
  fundme_contracts::{
    Env,
    FundMe,
    MockV3Aggregator,
    StorageAccess,
    StorageCounter,
    TransferError,
  },
  fundme_primitives::{
    Account,
    Action,
    Address,
    Block,
    Call,
    Code,
    Deployment,
    Hash,
    Transaction,
    Wei,
  },
  serde::{de::DeserializeOwned, Deserialize, Serialize},
  thiserror::Error,
  tracing::debug,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Contract call failed: {0}")]
  Contract(#[from] fundme_contracts::Error),

  #[error("Invalid transaction signature")]
  InvalidSignature,

  #[error("Invalid nonce for {address}: expected {expected}, got {found}")]
  InvalidNonce {
    address: Address,
    expected: u64,
    found: u64,
  },

  #[error(
    "Insufficient balance in {address}: {available} available, {required} \
     required"
  )]
  InsufficientBalance {
    address: Address,
    available: Wei,
    required: Wei,
  },

  #[error("Unknown account {0}")]
  UnknownAccount(Address),

  #[error("Account {0} has no contract code")]
  NotAContract(Address),

  #[error("{call:?} is not supported by {address}")]
  UnsupportedCall { address: Address, call: Call },

  #[error("{0} does not accept value transfers")]
  TransferRejected(Address),

  #[error("Price feed {0} is not available")]
  PriceFeedUnavailable(Address),

  #[error("Contract storage encoding error: {0}")]
  StorageEncode(#[from] rmp_serde::encode::Error),

  #[error("Contract storage decoding error: {0}")]
  StorageDecode(#[from] rmp_serde::decode::Error),
}

/// Properties of the block a transaction is executed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
  pub height: u64,

  /// Seconds since unix epoch.
  pub timestamp: u64,
}

impl From<&Block> for BlockContext {
  fn from(block: &Block) -> Self {
    Self {
      height: block.height,
      timestamp: block.timestamp,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
  pub transaction: Hash,
  pub block: u64,
  pub gas_used: u64,
  pub effective_gas_price: Wei,

  /// Address of the created contract for deploy transactions.
  pub contract_address: Option<Address>,
}

impl Receipt {
  /// Total fee paid by the sender.
  pub fn gas_cost(&self) -> Wei {
    self.gas_used as Wei * self.effective_gas_price
  }
}

/// Result of a successfully executed transaction.
#[derive(Debug)]
pub struct Outcome {
  /// Account changes, ready to be applied to the state the
  /// transaction was executed against.
  pub diff: StateDiff,
  pub receipt: Receipt,
}

/// Executes a transaction using the default gas schedule.
pub fn execute(
  tx: &Transaction,
  block: &BlockContext,
  state: &impl State,
) -> Result<Outcome, Error> {
  execute_with(tx, block, state, &Schedule::default())
}

/// Executes a transaction against the current state.
///
/// Nothing is written to `state`. All changes are accumulated in the
/// returned [`StateDiff`], which the caller applies. If any step fails,
/// including the contract call or any value transfer it makes, the error
/// is returned and the partial changes are dropped.
pub fn execute_with(
  tx: &Transaction,
  block: &BlockContext,
  state: &impl State,
  schedule: &Schedule,
) -> Result<Outcome, Error> {
  if !tx.verify() {
    return Err(Error::InvalidSignature);
  }

  let mut overlay = Overlay::new(state);
  let mut sender = overlay
    .get(&tx.from)
    .ok_or(Error::UnknownAccount(tx.from))?;

  if sender.nonce != tx.nonce {
    return Err(Error::InvalidNonce {
      address: tx.from,
      expected: sender.nonce,
      found: tx.nonce,
    });
  }
  sender.nonce += 1;
  overlay.set(tx.from, sender);

  let mut storage = StorageCounter::default();
  let (base_gas, contract_address) = match &tx.action {
    Action::Deploy(deployment) => {
      let address = deploy(&mut overlay, tx, block, deployment)?;
      (schedule.create, Some(address))
    }
    Action::Call { to, call } => {
      dispatch(&mut overlay, tx, block, to, call, &mut storage)?;
      (schedule.transaction, None)
    }
  };

  let gas_used = base_gas
    + storage.reads * schedule.storage_read
    + storage.writes * schedule.storage_write;
  let fee = (gas_used as Wei).saturating_mul(tx.gas_price);
  overlay.debit(&tx.from, fee)?;

  let receipt = Receipt {
    transaction: *tx.hash(),
    block: block.height,
    gas_used,
    effective_gas_price: tx.gas_price,
    contract_address,
  };

  debug!(
    tx = %receipt.transaction,
    from = %tx.from,
    gas_used,
    "transaction executed"
  );

  Ok(Outcome {
    diff: overlay.into_diff(),
    receipt,
  })
}

/// Decodes the storage of a contract for read-only access.
pub fn load<T: DeserializeOwned>(
  state: &impl State,
  address: &Address,
) -> Result<T, Error> {
  let account = state.get(address).ok_or(Error::UnknownAccount(*address))?;
  decode(address, &account)
}

/// Native currency held by an account, zero for unknown accounts.
pub fn balance(state: &impl State, address: &Address) -> Wei {
  state.get(address).map(|acc| acc.balance).unwrap_or_default()
}

fn decode<T: DeserializeOwned>(
  address: &Address,
  account: &Account,
) -> Result<T, Error> {
  if !account.is_contract() {
    return Err(Error::NotAContract(*address));
  }
  Ok(rmp_serde::from_slice(&account.storage)?)
}

fn deploy<S: State>(
  overlay: &mut Overlay<'_, S>,
  tx: &Transaction,
  block: &BlockContext,
  deployment: &Deployment,
) -> Result<Address, Error> {
  let address = tx.from.derive(&[b"create", &tx.nonce.to_le_bytes()]);
  if tx.value != 0 {
    return Err(Error::TransferRejected(address));
  }

  let account = match deployment {
    Deployment::FundMe { price_feed } => {
      overlay.price_feed(price_feed)?;
      Account::contract(
        Code::FundMe,
        rmp_serde::to_vec(&FundMe::new(tx.from, *price_feed))?,
      )
    }
    Deployment::MockV3Aggregator {
      decimals,
      initial_answer,
    } => Account::contract(
      Code::MockV3Aggregator,
      rmp_serde::to_vec(&MockV3Aggregator::new(
        *decimals,
        *initial_answer,
        block.timestamp,
      ))?,
    ),
  };

  overlay.set(address, account);
  Ok(address)
}

fn dispatch<S: State>(
  overlay: &mut Overlay<'_, S>,
  tx: &Transaction,
  block: &BlockContext,
  to: &Address,
  call: &Call,
  storage: &mut StorageCounter,
) -> Result<(), Error> {
  let code = overlay.get(to).and_then(|acc| acc.code);
  match (code, call) {
    (None, Call::Transfer) => overlay.move_value(&tx.from, to, tx.value),
    (None, _) => Err(Error::NotAContract(*to)),

    (Some(Code::FundMe), Call::Fund | Call::Transfer) => {
      overlay.move_value(&tx.from, to, tx.value)?;
      let mut fund_me: FundMe = overlay.load(to)?;
      let feed_address = *fund_me.get_price_feed();
      let feed = overlay.price_feed(&feed_address)?;
      fund_me.fund(&mut overlay.env(tx, to, storage), &feed)?;
      overlay.store(to, &fund_me)
    }

    (Some(Code::FundMe), Call::Withdraw | Call::CheaperWithdraw) => {
      if tx.value != 0 {
        return Err(Error::TransferRejected(*to));
      }
      let mut fund_me: FundMe = overlay.load(to)?;
      let mut env = overlay.env(tx, to, storage);
      match call {
        Call::Withdraw => fund_me.withdraw(&mut env)?,
        _ => fund_me.cheaper_withdraw(&mut env)?,
      }
      overlay.store(to, &fund_me)
    }

    (Some(Code::MockV3Aggregator), Call::UpdateAnswer { answer }) => {
      if tx.value != 0 {
        return Err(Error::TransferRejected(*to));
      }
      let mut feed: MockV3Aggregator = overlay.load(to)?;
      feed.update_answer(*answer, block.timestamp);
      overlay.store(to, &feed)
    }

    (
      Some(Code::MockV3Aggregator),
      Call::UpdateRoundData {
        round_id,
        answer,
        timestamp,
        started_at,
      },
    ) => {
      if tx.value != 0 {
        return Err(Error::TransferRejected(*to));
      }
      let mut feed: MockV3Aggregator = overlay.load(to)?;
      feed.update_round_data(*round_id, *answer, *timestamp, *started_at);
      overlay.store(to, &feed)
    }

    (Some(Code::MockV3Aggregator), Call::Transfer) => {
      Err(Error::TransferRejected(*to))
    }

    (Some(_), call) => Err(Error::UnsupportedCall {
      address: *to,
      call: call.clone(),
    }),
  }
}

/// Uncommitted changes layered over the state a transaction runs against.
struct Overlay<'s, S: State> {
  base: &'s S,
  diff: StateDiff,
}

impl<'s, S: State> Overlay<'s, S> {
  fn new(base: &'s S) -> Self {
    Self {
      base,
      diff: StateDiff::default(),
    }
  }

  fn get(&self, address: &Address) -> Option<Account> {
    self
      .diff
      .get(address)
      .cloned()
      .or_else(|| self.base.get(address))
  }

  fn set(&mut self, address: Address, account: Account) {
    self.diff.set(address, account);
  }

  fn into_diff(self) -> StateDiff {
    self.diff
  }

  fn load<T: DeserializeOwned>(&self, address: &Address) -> Result<T, Error> {
    let account = self.get(address).ok_or(Error::UnknownAccount(*address))?;
    decode(address, &account)
  }

  fn store<T: Serialize>(
    &mut self,
    address: &Address,
    contract: &T,
  ) -> Result<(), Error> {
    let mut account =
      self.get(address).ok_or(Error::UnknownAccount(*address))?;
    account.storage = rmp_serde::to_vec(contract)?;
    self.set(*address, account);
    Ok(())
  }

  fn price_feed(&self, address: &Address) -> Result<MockV3Aggregator, Error> {
    match self.get(address) {
      Some(account) if account.code == Some(Code::MockV3Aggregator) => {
        decode(address, &account)
      }
      _ => Err(Error::PriceFeedUnavailable(*address)),
    }
  }

  fn debit(&mut self, address: &Address, amount: Wei) -> Result<(), Error> {
    let mut account =
      self.get(address).ok_or(Error::UnknownAccount(*address))?;
    if account.balance < amount {
      return Err(Error::InsufficientBalance {
        address: *address,
        available: account.balance,
        required: amount,
      });
    }
    account.balance -= amount;
    self.set(*address, account);
    Ok(())
  }

  fn credit(&mut self, address: &Address, amount: Wei) {
    let mut account = self.get(address).unwrap_or_default();
    account.balance += amount;
    self.set(*address, account);
  }

  fn move_value(
    &mut self,
    from: &Address,
    to: &Address,
    amount: Wei,
  ) -> Result<(), Error> {
    self.debit(from, amount)?;
    self.credit(to, amount);
    Ok(())
  }

  fn env<'o>(
    &'o mut self,
    tx: &Transaction,
    contract: &Address,
    storage: &'o mut StorageCounter,
  ) -> CallEnv<'o, 's, S> {
    CallEnv {
      overlay: self,
      contract: *contract,
      caller: tx.from,
      value: tx.value,
      storage,
    }
  }
}

/// Environment of a single contract call.
struct CallEnv<'o, 's, S: State> {
  overlay: &'o mut Overlay<'s, S>,
  contract: Address,
  caller: Address,
  value: Wei,
  storage: &'o mut StorageCounter,
}

impl<S: State> Env for CallEnv<'_, '_, S> {
  fn caller(&self) -> &Address {
    &self.caller
  }

  fn value(&self) -> Wei {
    self.value
  }

  fn balance(&self) -> Wei {
    self
      .overlay
      .get(&self.contract)
      .map(|acc| acc.balance)
      .unwrap_or_default()
  }

  fn transfer(&mut self, to: &Address, amount: Wei) -> Result<(), TransferError> {
    // contracts in this chain have no receive path for value
    // coming from other contracts.
    if self.overlay.get(to).map_or(false, |acc| acc.is_contract()) {
      return Err(TransferError::Rejected(*to));
    }

    self
      .overlay
      .debit(&self.contract, amount)
      .map_err(|_| TransferError::InsufficientBalance {
        available: self.balance(),
        requested: amount,
      })?;
    self.overlay.credit(to, amount);
    Ok(())
  }

  fn record(&mut self, access: StorageAccess) {
    self.storage.record(access);
  }
}
