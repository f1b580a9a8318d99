use {
  crate::{
    get_conversion_rate,
    Env,
    Error,
    PriceOracle,
    StorageAccess::{Read, Write},
  },
  fundme_primitives::{Address, Wei, WEI_PER_ETHER},
  serde::{Deserialize, Serialize},
  std::collections::BTreeMap,
  tracing::debug,
};

/// Minimum value of a single contribution: 50 USD with 18 decimals.
pub const MINIMUM_USD: Wei = 50 * WEI_PER_ETHER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  /// No outstanding contributions.
  Empty,

  /// At least one contribution since the last withdrawal.
  Funded,
}

/// Crowdfunding ledger.
///
/// Tracks how much each sender contributed since the last withdrawal and
/// the order in which contributions arrived. Only the owner, the account
/// that created the ledger, can withdraw, and a withdrawal always takes
/// the whole held balance and resets every funder record.
///
/// Every operation is all-or-nothing: when it returns an error the ledger
/// is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundMe {
  owner: Address,
  price_feed: Address,
  funders: Vec<Address>,
  address_to_amount_funded: BTreeMap<Address, Wei>,
}

impl FundMe {
  pub fn new(owner: Address, price_feed: Address) -> Self {
    Self {
      owner,
      price_feed,
      funders: vec![],
      address_to_amount_funded: BTreeMap::new(),
    }
  }

  /// Records the value attached to the call as a contribution of the caller.
  ///
  /// Fails with [`Error::InsufficientContribution`] if the value is worth
  /// less than [`MINIMUM_USD`] at the current rate of `price_feed`.
  pub fn fund(
    &mut self,
    env: &mut impl Env,
    price_feed: &impl PriceOracle,
  ) -> Result<(), Error> {
    let funder = *env.caller();
    let amount = env.value();

    let usd_value = get_conversion_rate(amount, price_feed)?;
    if usd_value < MINIMUM_USD {
      return Err(Error::InsufficientContribution {
        usd_value,
        minimum: MINIMUM_USD,
      });
    }

    env.record(Read);
    let funded = self
      .address_to_amount_funded
      .get(&funder)
      .copied()
      .unwrap_or_default()
      .checked_add(amount)
      .ok_or(Error::Overflow)?;

    env.record(Write);
    self.address_to_amount_funded.insert(funder, funded);

    env.record(Write);
    self.funders.push(funder);

    debug!(%funder, amount, usd_value, "contribution accepted");
    Ok(())
  }

  /// Sends the whole held balance to the owner and resets all funders.
  ///
  /// Resets records one funder at a time straight out of storage,
  /// reading the funders length again on every iteration.
  pub fn withdraw(&mut self, env: &mut impl Env) -> Result<(), Error> {
    self.only_owner(env)?;
    let checkpoint = self.clone();

    let mut index = 0;
    loop {
      env.record(Read);
      if index >= self.funders.len() {
        break;
      }

      env.record(Read);
      let funder = self.funders[index];

      env.record(Write);
      self.address_to_amount_funded.remove(&funder);
      index += 1;
    }

    env.record(Write);
    self.funders.clear();

    self.pay_owner(env, checkpoint)
  }

  /// Same final state as [`FundMe::withdraw`], but copies the funders
  /// into memory once before resetting their records, saving one storage
  /// read per funder.
  pub fn cheaper_withdraw(&mut self, env: &mut impl Env) -> Result<(), Error> {
    self.only_owner(env)?;
    let checkpoint = self.clone();

    env.record(Read);
    let funders: Vec<Address> = self
      .funders
      .iter()
      .map(|funder| {
        env.record(Read);
        *funder
      })
      .collect();

    for funder in &funders {
      env.record(Write);
      self.address_to_amount_funded.remove(funder);
    }

    env.record(Write);
    self.funders.clear();

    self.pay_owner(env, checkpoint)
  }

  pub fn get_owner(&self) -> &Address {
    &self.owner
  }

  pub fn get_price_feed(&self) -> &Address {
    &self.price_feed
  }

  pub fn get_funder(&self, index: usize) -> Result<&Address, Error> {
    self.funders.get(index).ok_or(Error::IndexOutOfRange {
      index,
      len: self.funders.len(),
    })
  }

  /// Total contributed by an address since the last withdrawal.
  pub fn get_address_to_amount_funded(&self, funder: &Address) -> Wei {
    self
      .address_to_amount_funded
      .get(funder)
      .copied()
      .unwrap_or_default()
  }

  pub fn funders(&self) -> &[Address] {
    &self.funders
  }

  pub fn status(&self) -> Status {
    match self.funders.is_empty() {
      true => Status::Empty,
      false => Status::Funded,
    }
  }

  fn only_owner(&self, env: &impl Env) -> Result<(), Error> {
    if env.caller() != &self.owner {
      return Err(Error::NotOwner);
    }
    Ok(())
  }

  fn pay_owner(
    &mut self,
    env: &mut impl Env,
    checkpoint: FundMe,
  ) -> Result<(), Error> {
    let amount = env.balance();
    if let Err(e) = env.transfer(&self.owner, amount) {
      *self = checkpoint;
      return Err(e.into());
    }

    debug!(owner = %self.owner, amount, "withdrawal complete");
    Ok(())
  }
}
