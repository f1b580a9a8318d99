mod account;
mod address;
mod block;
mod hash;
mod transaction;
mod units;

pub use {
  account::{Account, Code},
  address::{Address, Error as AddressError},
  block::Block,
  hash::Hash,
  transaction::{Action, Call, Deployment, Transaction},
  units::{
    format_ether,
    parse_ether,
    Error as UnitsError,
    Wei,
    GWEI,
    WEI_PER_ETHER,
  },
};
