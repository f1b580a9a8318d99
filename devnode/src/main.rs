use {
  crate::{
    accounts::Signers,
    chain::Node,
    deploy::Deployer,
    settings::{Command, SystemSettings},
    storage::Store,
  },
  clap::Parser,
  tracing::{info, subscriber::set_global_default},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
};

mod accounts;
mod chain;
mod deploy;
mod network;
mod scripts;
mod settings;
mod storage;

fn main() -> anyhow::Result<()> {
  // configure logging, RUST_LOG overrides the default level
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(
        EnvFilter::try_from_default_env()
          .unwrap_or_else(|_| EnvFilter::new("info")),
      )
      .finish(),
  )?;

  // gather CLI parameters
  let settings = SystemSettings::parse();
  info!("startup settings: {settings:#?}");

  // get an instance of state store, it can be either
  // an in-memory ephemeral storage if no data directory
  // is provided by cli or persistent on-disk store otherwise.
  let network = settings.network();
  let store = Store::open(
    settings.data_dir().map(|path| path.as_path()),
    network.name(),
  )?;

  let signers = Signers::new(settings.signers())?;
  let mut node = Node::new(store, &signers, settings.gas_price())?;
  info!("running on {network} at height {}", node.head().height);

  let price_feed = settings.price_feed();
  match settings.command {
    Command::Accounts => scripts::print_accounts(&node, signers.addresses()),
    Command::Deploy { tags } => {
      Deployer::new(&mut node, network, price_feed).run(&signers, tags)?;
    }
    Command::Fund { value, account } => {
      let fund_me = Deployer::new(&mut node, network, price_feed)
        .fund_me(&signers)?;
      scripts::fund(&mut node, fund_me, signers.get(account)?, value)?;
    }
    Command::Withdraw { cheaper, account } => {
      let fund_me = Deployer::new(&mut node, network, price_feed)
        .fund_me(&signers)?;
      scripts::withdraw(&mut node, fund_me, signers.get(account)?, cheaper)?;
    }
    Command::Status => {
      let fund_me = Deployer::new(&mut node, network, price_feed)
        .fund_me(&signers)?;
      scripts::print_status(&node, fund_me)?;
    }
    Command::SetPrice { answer } => {
      let fund_me = Deployer::new(&mut node, network, price_feed)
        .fund_me(&signers)?;
      scripts::set_price(&mut node, fund_me, signers.deployer()?, answer)?;
    }
  }

  Ok(())
}
