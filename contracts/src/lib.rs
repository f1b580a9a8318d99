//! Native contracts of the FundMe chain.
//!
//! [`FundMe`] is a crowdfunding ledger that accepts contributions worth at
//! least [`MINIMUM_USD`] and lets its owner withdraw everything it holds.
//! The USD value of a contribution is computed through a [`PriceOracle`],
//! which on development chains is a [`MockV3Aggregator`].
//!
//! Contracts never touch balances directly. Caller identity, attached value,
//! the held balance and outbound transfers are provided by an [`Env`]
//! implemented by the execution environment.

mod aggregator;
mod converter;
mod env;
mod error;
mod fund_me;
mod oracle;

#[cfg(test)]
mod testing;

pub use {
  aggregator::MockV3Aggregator,
  converter::{get_conversion_rate, get_price, PRICE_DECIMALS},
  env::{Env, StorageAccess, StorageCounter, TransferError},
  error::Error,
  fund_me::{FundMe, Status, MINIMUM_USD},
  oracle::{PriceOracle, RoundData},
};
