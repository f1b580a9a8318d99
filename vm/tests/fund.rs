use {
  common::{Fixture, GAS_PRICE, INITIAL_ANSWER, SEND_VALUE},
  fundme_contracts::{PriceOracle, Status},
  fundme_primitives::{Address, Call, WEI_PER_ETHER},
  fundme_vm::Error,
};

mod common;

#[test]
fn constructor_sets_price_feed_and_owner() -> anyhow::Result<()> {
  let fixture = Fixture::deploy()?;
  let fund_me = fixture.chain.fund_me(&fixture.fund_me)?;
  let deployer: Address = fixture.deployer.public.into();

  assert_eq!(fund_me.get_price_feed(), &fixture.feed);
  assert_eq!(fund_me.get_owner(), &deployer);
  assert_eq!(fund_me.status(), Status::Empty);
  assert!(!fixture.fund_me.has_private_key());

  let feed = fixture.chain.feed(&fixture.feed)?;
  assert_eq!(feed.current_rate(), INITIAL_ANSWER);
  assert_eq!(feed.version(), 0);
  Ok(())
}

#[test]
fn fails_without_enough_value() -> anyhow::Result<()> {
  let mut fixture = Fixture::deploy()?;
  let funder = fixture.chain.wallet();
  let funder_address: Address = funder.public.into();
  let balance_before = fixture.chain.balance(&funder_address);

  // 0.025 ETH is exactly 50 USD at 2000 USD/ETH, one wei less is not enough
  let threshold = 25_000_000_000_000_000;
  for value in [0, 1, threshold - 1] {
    let result = fixture.fund(&funder, value);
    assert!(matches!(
      result,
      Err(Error::Contract(
        fundme_contracts::Error::InsufficientContribution { .. }
      ))
    ));
  }

  // rejected contributions change nothing and cost nothing
  assert_eq!(fixture.chain.balance(&funder_address), balance_before);
  assert_eq!(fixture.chain.nonce(&funder_address), 0);
  assert_eq!(fixture.chain.balance(&fixture.fund_me), 0);
  assert!(fixture.chain.fund_me(&fixture.fund_me)?.funders().is_empty());

  fixture.fund(&funder, threshold)?;
  let fund_me = fixture.chain.fund_me(&fixture.fund_me)?;
  assert_eq!(fund_me.get_address_to_amount_funded(&funder_address), threshold);
  Ok(())
}

#[test]
fn updates_the_amount_funded() -> anyhow::Result<()> {
  let mut fixture = Fixture::deploy()?;
  let funder = fixture.chain.wallet();
  let funder_address: Address = funder.public.into();

  let receipt = fixture.fund(&funder, SEND_VALUE)?;

  let fund_me = fixture.chain.fund_me(&fixture.fund_me)?;
  assert_eq!(
    fund_me.get_address_to_amount_funded(&funder_address),
    SEND_VALUE
  );
  assert_eq!(fund_me.get_funder(0)?, &funder_address);
  assert!(matches!(
    fund_me.get_funder(1),
    Err(fundme_contracts::Error::IndexOutOfRange { index: 1, len: 1 })
  ));
  assert_eq!(fund_me.status(), Status::Funded);

  assert_eq!(fixture.chain.balance(&fixture.fund_me), SEND_VALUE);
  assert_eq!(
    fixture.chain.balance(&funder_address),
    common::GENESIS_BALANCE - SEND_VALUE - receipt.gas_cost()
  );
  assert_eq!(receipt.effective_gas_price, GAS_PRICE);
  Ok(())
}

#[test]
fn repeated_contributions_accumulate() -> anyhow::Result<()> {
  let mut fixture = Fixture::deploy()?;
  let alice = fixture.chain.wallet();
  let bob = fixture.chain.wallet();
  let alice_address: Address = alice.public.into();
  let bob_address: Address = bob.public.into();

  fixture.fund(&alice, SEND_VALUE)?;
  fixture.fund(&bob, 2 * SEND_VALUE)?;
  fixture.fund(&alice, SEND_VALUE)?;

  let fund_me = fixture.chain.fund_me(&fixture.fund_me)?;
  assert_eq!(fund_me.funders(), &[alice_address, bob_address, alice_address]);
  assert_eq!(
    fund_me.get_address_to_amount_funded(&alice_address),
    2 * SEND_VALUE
  );
  assert_eq!(
    fund_me.get_address_to_amount_funded(&bob_address),
    2 * SEND_VALUE
  );
  assert_eq!(fixture.chain.balance(&fixture.fund_me), 4 * SEND_VALUE);
  Ok(())
}

#[test]
fn plain_transfers_are_contributions() -> anyhow::Result<()> {
  let mut fixture = Fixture::deploy()?;
  let funder = fixture.chain.wallet();
  let funder_address: Address = funder.public.into();
  let to = fixture.fund_me;

  fixture.chain.call(&funder, to, SEND_VALUE, Call::Transfer)?;
  let fund_me = fixture.chain.fund_me(&to)?;
  assert_eq!(fund_me.get_funder(0)?, &funder_address);
  assert_eq!(
    fund_me.get_address_to_amount_funded(&funder_address),
    SEND_VALUE
  );

  // same minimum as an explicit contribution
  assert!(matches!(
    fixture.chain.call(&funder, to, 1, Call::Transfer),
    Err(Error::Contract(
      fundme_contracts::Error::InsufficientContribution { .. }
    ))
  ));
  Ok(())
}

#[test]
fn minimum_follows_the_price_feed() -> anyhow::Result<()> {
  let mut fixture = Fixture::deploy()?;
  let funder = fixture.chain.wallet();
  let feed = fixture.feed;

  // at 1000 USD/ETH 0.05 ETH is exactly the minimum
  fixture.chain.call(&fixture.deployer, feed, 0, Call::UpdateAnswer {
    answer: 1000_0000_0000,
  })?;
  assert!(fixture.fund(&funder, WEI_PER_ETHER / 20 - 1).is_err());
  fixture.fund(&funder, WEI_PER_ETHER / 20)?;

  // a broken feed rejects every contribution
  fixture.chain.call(&fixture.deployer, feed, 0, Call::UpdateAnswer {
    answer: 0,
  })?;
  assert!(matches!(
    fixture.fund(&funder, SEND_VALUE),
    Err(Error::Contract(fundme_contracts::Error::InvalidPrice(0)))
  ));

  let answer = fixture.chain.feed(&feed)?.latest_round_data();
  assert_eq!(answer.round_id, 3);
  Ok(())
}
