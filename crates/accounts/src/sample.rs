//! Fixed sample data set used when durable storage is absent or unreadable.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use ledgercast_core::AccountNumber;

use crate::Account;

/// Creation time stamped on every sample account.
pub fn sample_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The deterministic seed accounts. Identical on every call.
pub fn sample_accounts() -> Vec<Account> {
    let at = sample_created_at();
    vec![
        Account::new(AccountNumber::from("0001"), "Alice Nguyen", Decimal::from(1000), at),
        Account::new(AccountNumber::from("0002"), "Bob Tran", Decimal::from(500), at),
        Account::new(AccountNumber::from("0003"), "Carol Le", Decimal::from(250), at),
        Account::new(AccountNumber::from("0004"), "Dave Pham", Decimal::from(75), at)
            .with_locked(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_set_is_deterministic() {
        assert_eq!(sample_accounts(), sample_accounts());
    }

    #[test]
    fn sample_set_contains_expected_balances() {
        let accounts = sample_accounts();
        let first = accounts.iter().find(|a| a.account_number().as_str() == "0001").unwrap();
        let second = accounts.iter().find(|a| a.account_number().as_str() == "0002").unwrap();
        assert_eq!(first.balance(), dec!(1000));
        assert_eq!(second.balance(), dec!(500));
        assert!(accounts.iter().any(|a| a.is_locked()));
        assert!(accounts.iter().all(|a| a.is_well_formed()));
    }
}
