//! Locked balance of vesting accounts as returned by `/cosmos/auth/v1beta1/accounts`.

use anyhow::{anyhow, Context, Result};
use primitive_types::U256;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AmountCoin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseVestingAccount {
    #[serde(default)]
    pub original_vesting: Vec<AmountCoin>,
    #[serde(with = "unix_seconds")]
    pub end_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VestingPeriod {
    #[serde(with = "unix_seconds")]
    pub length: i64,
    #[serde(default)]
    pub amount: Vec<AmountCoin>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "@type")]
pub enum Account {
    #[serde(rename = "/cosmos.vesting.v1beta1.ContinuousVestingAccount")]
    Continuous {
        base_vesting_account: BaseVestingAccount,
        #[serde(with = "unix_seconds")]
        start_time: i64,
    },
    #[serde(rename = "/cosmos.vesting.v1beta1.DelayedVestingAccount")]
    Delayed {
        base_vesting_account: BaseVestingAccount,
    },
    #[serde(rename = "/cosmos.vesting.v1beta1.PeriodicVestingAccount")]
    Periodic {
        base_vesting_account: BaseVestingAccount,
        #[serde(with = "unix_seconds")]
        start_time: i64,
        #[serde(default)]
        vesting_periods: Vec<VestingPeriod>,
    },
    #[serde(rename = "/cosmos.vesting.v1beta1.PermanentLockedAccount")]
    PermanentLocked {
        base_vesting_account: BaseVestingAccount,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
}

impl Account {
    /// Amount of `denom` that has not vested at unix time `now`.
    pub fn locked_at(&self, denom: &str, now: i64) -> Result<U256> {
        match self {
            Self::Continuous {
                base_vesting_account,
                start_time,
            } => {
                let original = sum_denom(&base_vesting_account.original_vesting, denom)?;
                let end_time = base_vesting_account.end_time;
                if now <= *start_time {
                    return Ok(original);
                }
                if now >= end_time {
                    return Ok(U256::zero());
                }

                let elapsed = U256::from((now - start_time) as u64);
                let duration = U256::from((end_time - start_time) as u64);
                let scaled = original
                    .checked_mul(elapsed)
                    .context("vesting amount overflow")?;
                let vested = round_half_even(scaled, duration);
                Ok(original.saturating_sub(vested))
            }
            Self::Delayed {
                base_vesting_account,
            } => {
                if now < base_vesting_account.end_time {
                    sum_denom(&base_vesting_account.original_vesting, denom)
                } else {
                    Ok(U256::zero())
                }
            }
            Self::Periodic {
                base_vesting_account,
                start_time,
                vesting_periods,
            } => {
                let original = sum_denom(&base_vesting_account.original_vesting, denom)?;
                let mut period_end = *start_time;
                let mut vested = U256::zero();
                for period in vesting_periods {
                    period_end += period.length;
                    if period_end > now {
                        break;
                    }
                    vested = vested.saturating_add(sum_denom(&period.amount, denom)?);
                }
                Ok(original.saturating_sub(vested))
            }
            Self::PermanentLocked {
                base_vesting_account,
            } => sum_denom(&base_vesting_account.original_vesting, denom),
            Self::Other => Ok(U256::zero()),
        }
    }
}

/// `numerator / denominator` rounded half to even, like the SDK's `Dec::RoundInt`.
fn round_half_even(numerator: U256, denominator: U256) -> U256 {
    let quotient = numerator / denominator;
    let twice_remainder = (numerator % denominator) * U256::from(2u8);

    if twice_remainder > denominator || (twice_remainder == denominator && quotient.bit(0)) {
        quotient + U256::one()
    } else {
        quotient
    }
}

/// Parses an integer coin amount.
pub fn parse_amount(amount: &str) -> Result<U256> {
    U256::from_dec_str(amount).map_err(|err| anyhow!("invalid amount {}: {:?}", amount, err))
}

/// Parses a `DecCoin` amount, dropping the fractional part.
pub fn parse_dec_amount(amount: &str) -> Result<U256> {
    let integer = amount.split('.').next().unwrap_or_default();
    if integer.is_empty() {
        return Ok(U256::zero());
    }
    parse_amount(integer)
}

fn sum_denom(coins: &[AmountCoin], denom: &str) -> Result<U256> {
    coins
        .iter()
        .filter(|coin| coin.denom == denom)
        .try_fold(U256::zero(), |total, coin| {
            let amount = parse_amount(&coin.amount)?;
            total
                .checked_add(amount)
                .context("vesting amount overflow")
        })
}

mod unix_seconds {
    use serde::{Deserialize, Deserializer};

    /// Accepts the string-encoded int64 used by the REST gateway as well as plain numbers.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Raw::Number(number) => Ok(number),
        }
    }
}
