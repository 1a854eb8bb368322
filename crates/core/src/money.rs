//! Monetary quantities.
//!
//! Balances and amounts are exact decimals; the ledger never uses floats.

use rust_decimal::Decimal;

/// A monetary amount or balance (single currency, exact decimal).
pub type Amount = Decimal;

/// Whether `amount` is usable as the quantity of a deposit/withdraw/transfer.
pub fn is_positive(amount: Amount) -> bool {
    amount > Decimal::ZERO
}
