//! The fill rule.
//!
//! Each order clears independently against the day-ahead price at its
//! hour; there is no interaction between orders and no quantity limit.

use crate::market::types::Side;

/// Whether an order crosses the day-ahead price in its favorable
/// direction. Equality fills on both sides.
pub fn fills(side: Side, bid_price: f64, day_ahead_price: f64) -> bool {
    match side {
        Side::Buy => bid_price >= day_ahead_price,
        Side::Sell => bid_price <= day_ahead_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_fills_at_or_above_clearing_price() {
        assert!(fills(Side::Buy, 60.0, 55.0));
        assert!(fills(Side::Buy, 60.0, 60.0));
        assert!(!fills(Side::Buy, 60.0, 60.01));
    }

    #[test]
    fn sell_fills_at_or_below_clearing_price() {
        assert!(fills(Side::Sell, 60.0, 65.0));
        assert!(fills(Side::Sell, 60.0, 60.0));
        assert!(!fills(Side::Sell, 60.0, 59.99));
    }
}
