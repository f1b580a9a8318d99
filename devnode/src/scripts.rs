use {
  crate::chain::Node,
  ed25519_dalek::Keypair,
  fundme_contracts::{get_price, FundMe, MockV3Aggregator, PriceOracle},
  fundme_primitives::{format_ether, Action, Address, Call, Wei},
  fundme_vm::Receipt,
  tracing::info,
};

pub fn fund(
  node: &mut Node,
  fund_me: Address,
  funder: &Keypair,
  value: Wei,
) -> anyhow::Result<Receipt> {
  info!("Funding contract");
  let receipt = node.send(funder, value, Action::Call {
    to: fund_me,
    call: Call::Fund,
  })?;
  info!("Funded");
  Ok(receipt)
}

pub fn withdraw(
  node: &mut Node,
  fund_me: Address,
  owner: &Keypair,
  cheaper: bool,
) -> anyhow::Result<Receipt> {
  info!("withdrawing from contract");
  let call = match cheaper {
    true => Call::CheaperWithdraw,
    false => Call::Withdraw,
  };
  let receipt = node.send(owner, 0, Action::Call { to: fund_me, call })?;
  info!("withdraw complete");
  Ok(receipt)
}

/// Publishes a new answer on the price feed used by the ledger.
pub fn set_price(
  node: &mut Node,
  fund_me: Address,
  sender: &Keypair,
  answer: i128,
) -> anyhow::Result<Receipt> {
  let ledger: FundMe = node.load(&fund_me)?;
  let to = *ledger.get_price_feed();
  let receipt = node.send(sender, 0, Action::Call {
    to,
    call: Call::UpdateAnswer { answer },
  })?;
  info!("price feed {to} answer set to {answer}");
  Ok(receipt)
}

pub fn print_accounts(node: &Node, addresses: impl Iterator<Item = Address>) {
  for (index, address) in addresses.enumerate() {
    println!(
      "#{index}: {address} ({} ETH)",
      format_ether(node.balance(&address))
    );
  }
}

pub fn print_status(node: &Node, fund_me: Address) -> anyhow::Result<()> {
  let ledger: FundMe = node.load(&fund_me)?;
  let feed: MockV3Aggregator = node.load(ledger.get_price_feed())?;

  println!("FundMe:     {fund_me}");
  println!("owner:      {}", ledger.get_owner());
  println!("price feed: {} ({})", ledger.get_price_feed(), feed.description());
  println!(
    "ETH price:  {} USD",
    format_ether(get_price(&feed)?)
  );
  println!("status:     {:?}", ledger.status());
  println!("balance:    {} ETH", format_ether(node.balance(&fund_me)));
  for (index, funder) in ledger.funders().iter().enumerate() {
    println!(
      "  funder #{index}: {funder} ({} ETH)",
      format_ether(ledger.get_address_to_amount_funded(funder))
    );
  }
  Ok(())
}
