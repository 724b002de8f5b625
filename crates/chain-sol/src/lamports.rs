use rust_decimal::{Decimal, RoundingStrategy};

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert lamports to whole SOL without losing precision.
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

/// Format a lamport balance as SOL with exactly four decimal places.
pub fn format_sol(lamports: u64) -> String {
    let sol = lamports_to_sol(lamports)
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{sol:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_and_a_half_sol() {
        assert_eq!(format_sol(1_500_000_000), "1.5000");
    }

    #[test]
    fn zero_balance() {
        assert_eq!(format_sol(0), "0.0000");
    }

    #[test]
    fn dust_rounds_to_four_places() {
        assert_eq!(format_sol(123_456_789), "0.1235");
        assert_eq!(format_sol(1), "0.0000");
    }

    #[test]
    fn large_balance_keeps_integer_part() {
        assert_eq!(format_sol(42 * LAMPORTS_PER_SOL + 1_000_000), "42.0010");
    }

    #[test]
    fn exact_conversion() {
        assert_eq!(lamports_to_sol(1_000_000), Decimal::new(1, 3));
    }
}
