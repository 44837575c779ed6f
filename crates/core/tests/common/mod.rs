//! Shared helpers for the core integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

/// Pubkey fixtures: valid 64-hex strings, distinct from each other.
pub const KEY_A: &str = "1111111111111111111111111111111111111111111111111111111111111111";
pub const KEY_B: &str = "2222222222222222222222222222222222222222222222222222222222222222";
pub const KEY_C: &str = "3333333333333333333333333333333333333333333333333333333333333333";

/// Build an owned argument vector from string literals.
pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
