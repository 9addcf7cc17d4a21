//! Currency amount parsing and formatting
//!
//! Amounts are `u128` wei. Human-readable strings carry an optional unit
//! (`ether`, `gwei`, `wei`); a bare decimal string is read as ether.
//! Integers in configuration files are read as wei.

use vanity_error::{RegistryError, RegistryResult};

use crate::types::Wei;

pub const WEI_PER_GWEI: Wei = 1_000_000_000;
pub const WEI_PER_ETHER: Wei = 1_000_000_000_000_000_000;

/// Parse an amount such as `"0.0105 ether"`, `"500 gwei"`, `"10 wei"` or `"0.01"`
pub fn parse_amount(input: &str) -> RegistryResult<Wei> {
    let mut parts = input.split_whitespace();
    let number = parts
        .next()
        .ok_or_else(|| RegistryError::invalid_input("empty amount"))?;
    let unit = parts.next().unwrap_or("ether");
    if parts.next().is_some() {
        return Err(RegistryError::invalid_input(format!("malformed amount '{}'", input)));
    }

    let decimals = match unit.to_ascii_lowercase().as_str() {
        "ether" | "eth" => 18,
        "gwei" => 9,
        "wei" => 0,
        other => return Err(RegistryError::invalid_input(format!("unknown unit '{}'", other))),
    };

    parse_decimal(number, decimals)
        .ok_or_else(|| RegistryError::invalid_input(format!("malformed amount '{}'", input)))
}

fn parse_decimal(number: &str, decimals: u32) -> Option<Wei> {
    let (whole, fraction) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > decimals as usize {
        return None;
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    let scale = 10u128.checked_pow(decimals)?;
    let whole_value: Wei = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction_value: Wei = if fraction.is_empty() {
        0
    } else {
        let padding = 10u128.checked_pow(decimals - fraction.len() as u32)?;
        fraction.parse::<Wei>().ok()?.checked_mul(padding)?
    };

    whole_value.checked_mul(scale)?.checked_add(fraction_value)
}

/// Format wei as a decimal ether string without trailing zeros
pub fn format_ether(amount: Wei) -> String {
    let whole = amount / WEI_PER_ETHER;
    let fraction = amount % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:018}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Serde adapter: writes `"<n> wei"`, reads integers (wei) or unit strings
pub mod serde_wei {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_amount, Wei};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Integer(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Wei, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{} wei", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Wei, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Integer(value) => Ok(Wei::from(value)),
            RawAmount::Text(text) => parse_amount(&text).map_err(serde::de::Error::custom),
        }
    }
}
