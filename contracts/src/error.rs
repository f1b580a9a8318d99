use {crate::TransferError, fundme_primitives::Wei, thiserror::Error};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error(
    "Not enough native currency sent: worth {usd_value} usd-wei, minimum is \
     {minimum}"
  )]
  InsufficientContribution { usd_value: Wei, minimum: Wei },

  #[error("Caller is not the owner")]
  NotOwner,

  #[error("Funder index {index} out of range, there are {len} funders")]
  IndexOutOfRange { index: usize, len: usize },

  #[error("Outbound transfer failed: {0}")]
  TransferFailed(#[from] TransferError),

  #[error("Price feed returned a non-positive answer: {0}")]
  InvalidPrice(i128),

  #[error("Arithmetic overflow")]
  Overflow,
}
