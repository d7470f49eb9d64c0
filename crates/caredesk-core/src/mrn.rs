//! Medical record number (MRN) generation.
//!
//! An MRN is `MRN` + millisecond timestamp + 8 random alphanumeric characters
//! + a checksum letter, uppercased. The checksum letter is the sum of the
//! timestamp's digits modulo 26, mapped onto `A`..`Z`.
//!
//! Uniqueness is probabilistic; callers probe the user store and retry on
//! collision, up to [`MRN_MAX_ATTEMPTS`] times.

use chrono::Utc;
use rand::{Rng, distributions::Alphanumeric};

pub const MRN_PREFIX: &str = "MRN";

/// Retry cap for the collision-probing loop in user creation.
pub const MRN_MAX_ATTEMPTS: u32 = 5;

pub fn generate_mrn() -> String {
    let timestamp = Utc::now().timestamp_millis().to_string();

    let random_part: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    format!(
        "{MRN_PREFIX}{timestamp}{random_part}{}",
        checksum_char(&timestamp)
    )
    .to_uppercase()
}

fn checksum_char(timestamp: &str) -> char {
    let sum: u32 = timestamp.chars().filter_map(|c| c.to_digit(10)).sum();
    char::from(b'A' + (sum % 26) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_prefix_and_expected_length() {
        let mrn = generate_mrn();
        assert!(mrn.starts_with(MRN_PREFIX));
        // "MRN" + 13-digit millisecond timestamp + 8 random chars + checksum
        assert_eq!(mrn.len(), MRN_PREFIX.len() + 13 + 8 + 1);
    }

    #[test]
    fn is_fully_uppercase() {
        let mrn = generate_mrn();
        assert_eq!(mrn, mrn.to_uppercase());
    }

    #[test]
    fn checksum_matches_timestamp_digits() {
        let mrn = generate_mrn();
        let timestamp = &mrn[MRN_PREFIX.len()..MRN_PREFIX.len() + 13];
        let expected = checksum_char(timestamp);
        assert_eq!(mrn.chars().last().unwrap(), expected);
    }

    #[test]
    fn checksum_char_is_deterministic() {
        assert_eq!(checksum_char("0"), 'A');
        assert_eq!(checksum_char("1"), 'B');
        assert_eq!(checksum_char("99"), 'S'); // 18 % 26 = 18 -> 'S'
        assert_eq!(checksum_char("26"), 'I'); // 8 -> 'I'
    }

    #[test]
    fn consecutive_mrns_differ() {
        assert_ne!(generate_mrn(), generate_mrn());
    }
}
