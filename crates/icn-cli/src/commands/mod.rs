//! CLI Commands

pub mod companies;
pub mod config;
pub mod entitlements;

use std::str::FromStr;

/// Parse a flag value with a string-error `FromStr`
pub(crate) fn parse<T: FromStr<Err = String>>(raw: &str) -> anyhow::Result<T> {
    raw.parse().map_err(anyhow::Error::msg)
}
