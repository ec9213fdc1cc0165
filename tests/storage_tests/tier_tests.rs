//! Tests for the sorted-pairs tier format
//!
//! These tests verify:
//! - Rendering order and separators
//! - Empty tiers render as an empty line
//! - Parse errors for odd token counts and non-integer values

use redolog::storage::{format_pairs, parse_pairs, Tier};
use redolog::RedoError;

fn tier(pairs: &[(&str, i64)]) -> Tier {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// =============================================================================
// format_pairs
// =============================================================================

#[test]
fn test_format_empty_tier() {
    assert_eq!(format_pairs(&Tier::new()), "");
}

#[test]
fn test_format_sorts_keys_lexicographically() {
    let t = tier(&[("b", 2), ("B", 1), ("a10", 3), ("a2", 4)]);

    // Byte order: uppercase before lowercase, "a10" before "a2"
    assert_eq!(format_pairs(&t), "B 1 a10 3 a2 4 b 2");
}

#[test]
fn test_format_negative_values() {
    let t = tier(&[("X", -7), ("Y", 0)]);
    assert_eq!(format_pairs(&t), "X -7 Y 0");
}

#[test]
fn test_format_has_no_trailing_space() {
    let line = format_pairs(&tier(&[("A", 10), ("B", 20)]));
    assert_eq!(line, "A 10 B 20");
    assert!(!line.ends_with(' '));
}

// =============================================================================
// parse_pairs
// =============================================================================

#[test]
fn test_parse_bootstrap_line() {
    let t = parse_pairs("A 10 B 20", 1).unwrap();
    assert_eq!(t, tier(&[("A", 10), ("B", 20)]));
}

#[test]
fn test_parse_blank_line_is_empty_tier() {
    assert!(parse_pairs("   ", 1).unwrap().is_empty());
}

#[test]
fn test_parse_tolerates_extra_whitespace() {
    let t = parse_pairs("  A   10\tB 20  ", 1).unwrap();
    assert_eq!(format_pairs(&t), "A 10 B 20");
}

#[test]
fn test_parse_odd_token_count_fails() {
    let err = parse_pairs("A 10 B", 3).unwrap_err();
    assert!(matches!(err, RedoError::Parse { line: 3, .. }));
}

#[test]
fn test_parse_non_integer_value_fails() {
    let err = parse_pairs("A ten", 1).unwrap_err();
    assert!(matches!(err, RedoError::Parse { line: 1, .. }));
}

#[test]
fn test_parse_later_pair_wins() {
    let t = parse_pairs("A 1 A 2", 1).unwrap();
    assert_eq!(t.get("A"), Some(&2));
    assert_eq!(t.len(), 1);
}
