//! Settlement of filled day-ahead positions against the real-time price.

use chrono::NaiveDate;

use crate::market::matching;
use crate::market::types::{Order, PnlDetail, PnlReport, round_cents};

/// Settles one order against the prices at its hour.
///
/// A filled buy earns `quantity × (RT − DA)`; a filled sell earns the
/// negation. Unfilled orders settle to zero. Amounts are rounded to cents.
pub fn settle(order: &Order, day_ahead_price: f64, real_time_price: f64) -> PnlDetail {
    let filled = matching::fills(order.side, order.price, day_ahead_price);
    let pnl = if filled {
        round_cents(order.side.sign() * order.quantity * (real_time_price - day_ahead_price))
    } else {
        0.0
    };

    PnlDetail {
        order_id: order.id,
        hour: order.hour,
        side: order.side,
        quantity: order.quantity,
        bid_price: order.price,
        day_ahead_price,
        real_time_price,
        filled,
        pnl,
    }
}

/// Aggregates per-order details into a dated report. `details` must
/// already be in submission order.
pub fn report(date: NaiveDate, currency: &str, details: Vec<PnlDetail>) -> PnlReport {
    let total_pnl = round_cents(details.iter().map(|d| d.pnl).sum());
    PnlReport {
        date,
        currency: currency.to_string(),
        total_pnl,
        details,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::market::types::{OrderId, Side};

    fn order(side: Side, price: f64, quantity: f64) -> Order {
        Order {
            id: OrderId::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            hour: 17,
            side,
            price,
            quantity,
            created_at: NaiveDate::from_ymd_opt(2025, 6, 14)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn filled_buy_earns_rt_minus_da() {
        let detail = settle(&order(Side::Buy, 60.0, 1.5), 60.0, 65.0);
        assert!(detail.filled);
        assert_eq!(detail.pnl, 7.5);
    }

    #[test]
    fn filled_sell_earns_da_minus_rt() {
        let detail = settle(&order(Side::Sell, 60.0, 2.0), 60.0, 55.0);
        assert!(detail.filled);
        assert_eq!(detail.pnl, 10.0);
    }

    #[test]
    fn unfilled_order_settles_to_zero() {
        let detail = settle(&order(Side::Buy, 50.0, 2.0), 60.0, 80.0);
        assert!(!detail.filled);
        assert_eq!(detail.pnl, 0.0);
    }

    #[test]
    fn losing_position_goes_negative() {
        let detail = settle(&order(Side::Buy, 60.0, 2.0), 60.0, 52.5);
        assert!(detail.filled);
        assert_eq!(detail.pnl, -15.0);
    }

    #[test]
    fn report_totals_details() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let details = vec![
            settle(&order(Side::Buy, 60.0, 1.5), 60.0, 65.0),
            settle(&order(Side::Sell, 60.0, 2.0), 60.0, 55.0),
            settle(&order(Side::Buy, 50.0, 2.0), 60.0, 80.0),
        ];
        let report = report(date, "USD", details);
        assert_eq!(report.total_pnl, 17.5);
        assert_eq!(report.currency, "USD");
        assert_eq!(report.details.len(), 3);
    }

    #[test]
    fn report_handles_no_orders() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let report = report(date, "USD", Vec::new());
        assert_eq!(report.total_pnl, 0.0);
        assert!(report.details.is_empty());
    }

    #[test]
    fn pnl_is_rounded_to_cents() {
        let detail = settle(&order(Side::Buy, 60.0, 0.333), 60.0, 61.0);
        assert_eq!(detail.pnl, 0.33);
    }
}
