//! Token amounts.
//!
//! Amounts are base units of an 18-decimal token. A `u128` holds
//! 3.4 * 10^38 base units, enough for any supply this protocol mints;
//! all ledger arithmetic is checked.

/// Amount of token base units.
pub type Amount = u128;

/// Base units per whole token (10^18).
pub const TOKEN_UNIT: Amount = 1_000_000_000_000_000_000;

/// Convert whole tokens to base units, saturating on overflow.
pub const fn tokens(whole: u128) -> Amount {
    whole.saturating_mul(TOKEN_UNIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(tokens(0), 0);
        assert_eq!(tokens(1), TOKEN_UNIT);
        assert_eq!(tokens(1_000_000), 1_000_000 * TOKEN_UNIT);
        assert_eq!(tokens(u128::MAX), u128::MAX);
    }
}
