//! Tier representation and the sorted-pairs line format

use std::collections::BTreeMap;

use crate::error::{RedoError, Result};

/// Address → value mapping.
///
/// A `BTreeMap` keeps addresses in ascending lexicographic order, which is
/// the order every snapshot must be rendered in.
pub type Tier = BTreeMap<String, i64>;

/// Render a tier as `key value` pairs separated by single spaces.
///
/// An empty tier renders as the empty string.
pub fn format_pairs(tier: &Tier) -> String {
    let mut line = String::new();
    for (address, value) in tier {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(address);
        line.push(' ');
        line.push_str(&value.to_string());
    }
    line
}

/// Parse a sorted-pairs line back into a tier.
///
/// Tokens are whitespace separated; a later pair for the same address wins.
/// `line_no` is only used for error reporting.
pub fn parse_pairs(line: &str, line_no: usize) -> Result<Tier> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() % 2 != 0 {
        return Err(RedoError::parse(
            line_no,
            format!("expected address/value pairs, got {} tokens", tokens.len()),
        ));
    }

    let mut tier = Tier::new();
    for pair in tokens.chunks(2) {
        let value: i64 = pair[1].parse().map_err(|_| {
            RedoError::parse(
                line_no,
                format!("value for address {} is not an integer: {}", pair[0], pair[1]),
            )
        })?;
        tier.insert(pair[0].to_string(), value);
    }

    Ok(tier)
}
