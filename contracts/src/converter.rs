use {
  crate::{Error, PriceOracle},
  fundme_primitives::Wei,
};

/// Number of decimals of prices returned by [`get_price`] and of USD
/// values returned by [`get_conversion_rate`].
pub const PRICE_DECIMALS: u8 = 18;

fn positive_answer(feed: &impl PriceOracle) -> Result<u128, Error> {
  let answer = feed.current_rate();
  if answer <= 0 {
    return Err(Error::InvalidPrice(answer));
  }
  Ok(answer as u128)
}

fn pow10(exponent: u8) -> Result<u128, Error> {
  10u128.checked_pow(exponent as u32).ok_or(Error::Overflow)
}

/// USD price of one unit of native currency, with 18 decimals.
pub fn get_price(feed: &impl PriceOracle) -> Result<u128, Error> {
  let answer = positive_answer(feed)?;
  let decimals = feed.decimals();
  if decimals <= PRICE_DECIMALS {
    answer
      .checked_mul(pow10(PRICE_DECIMALS - decimals)?)
      .ok_or(Error::Overflow)
  } else {
    Ok(answer / pow10(decimals - PRICE_DECIMALS)?)
  }
}

/// USD value, with 18 decimals, of an amount of wei at the current
/// rate of the feed. Rounds down.
pub fn get_conversion_rate(
  amount: Wei,
  feed: &impl PriceOracle,
) -> Result<Wei, Error> {
  let answer = positive_answer(feed)?;
  let scale = pow10(feed.decimals())?;
  amount
    .checked_mul(answer)
    .map(|value| value / scale)
    .ok_or(Error::Overflow)
}
