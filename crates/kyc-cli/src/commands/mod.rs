//! CLI Commands

pub mod admin;
pub mod form;
pub mod register;

use std::error::Error;
use std::str::FromStr;

/// Parse a single `KEY=VALUE` argument
pub fn parse_key_val<T>(s: &str) -> Result<(String, T), Box<dyn Error + Send + Sync + 'static>>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no `=` found in `{}`", s))?;

    if key.is_empty() {
        return Err(format!("invalid NAME=VALUE: empty name in `{}`", s).into());
    }

    Ok((key.to_string(), value.parse()?))
}
