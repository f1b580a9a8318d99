use thiserror::Error;

/// Smallest unit of the native currency.
pub type Wei = u128;

pub const GWEI: Wei = 1_000_000_000;
pub const WEI_PER_ETHER: Wei = 1_000_000_000_000_000_000;

const ETHER_DECIMALS: usize = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("invalid ether amount: {0:?}")]
  Invalid(String),

  #[error("ether amounts have at most 18 decimals: {0:?}")]
  TooManyDecimals(String),

  #[error("ether amount does not fit in 128 bits: {0:?}")]
  Overflow(String),
}

/// Parses a decimal ether amount, like `"0.05"`, into wei.
pub fn parse_ether(value: &str) -> Result<Wei, Error> {
  let value = value.trim();
  let (whole, fraction) = match value.split_once('.') {
    Some((whole, fraction)) => (whole, fraction),
    None => (value, ""),
  };

  let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
  if (whole.is_empty() && fraction.is_empty())
    || !is_digits(whole)
    || !is_digits(fraction)
  {
    return Err(Error::Invalid(value.to_owned()));
  }

  if fraction.len() > ETHER_DECIMALS {
    return Err(Error::TooManyDecimals(value.to_owned()));
  }

  let overflow = || Error::Overflow(value.to_owned());
  let whole: Wei = match whole {
    "" => 0,
    digits => digits.parse().map_err(|_| overflow())?,
  };
  let fraction: Wei = match fraction {
    "" => 0,
    digits => {
      let scale = 10u128.pow((ETHER_DECIMALS - digits.len()) as u32);
      digits.parse::<Wei>().map_err(|_| overflow())? * scale
    }
  };

  whole
    .checked_mul(WEI_PER_ETHER)
    .and_then(|w| w.checked_add(fraction))
    .ok_or_else(overflow)
}

/// Formats a wei amount as decimal ether, always with at least one
/// fractional digit (`1.0`, `0.05`).
pub fn format_ether(wei: Wei) -> String {
  let whole = wei / WEI_PER_ETHER;
  let fraction = wei % WEI_PER_ETHER;
  let fraction = format!("{fraction:018}");
  let fraction = fraction.trim_end_matches('0');
  if fraction.is_empty() {
    format!("{whole}.0")
  } else {
    format!("{whole}.{fraction}")
  }
}
