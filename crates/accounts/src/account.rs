use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgercast_core::{AccountNumber, Amount, Entity, LedgerError, LedgerResult, money};

/// Rejection reason for a refused deposit.
pub const CANNOT_DEPOSIT: &str = "cannot deposit";

/// Rejection reason for a refused withdrawal.
pub const CANNOT_WITHDRAW: &str = "insufficient balance or invalid amount";

/// One monetary account.
///
/// The number, holder and creation time never change; only `balance` moves,
/// and only through [`Account::deposit`] / [`Account::withdraw`]. A locked
/// account stays readable but refuses both.
///
/// This type doubles as the snapshot record, so its serde shape is the
/// durable storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    account_number: AccountNumber,
    holder_name: String,
    balance: Amount,
    created_at: DateTime<Utc>,
    #[serde(default)]
    locked: bool,
}

impl Account {
    /// Open an unlocked account. Negative opening balances are clamped to zero.
    pub fn new(
        account_number: AccountNumber,
        holder_name: impl Into<String>,
        balance: Amount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_number,
            holder_name: holder_name.into(),
            balance: balance.max(Decimal::ZERO),
            created_at,
            locked: false,
        }
    }

    /// Builder-style lock flag (used by seeding and tests).
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The resulting balance must also stay representable.
    pub fn can_deposit(&self, amount: Amount) -> bool {
        !self.locked && money::is_positive(amount) && self.balance.checked_add(amount).is_some()
    }

    pub fn can_withdraw(&self, amount: Amount) -> bool {
        !self.locked && money::is_positive(amount) && self.balance >= amount
    }

    pub fn deposit(&mut self, amount: Amount) -> LedgerResult<()> {
        if self.locked || !money::is_positive(amount) {
            return Err(LedgerError::invalid(CANNOT_DEPOSIT));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid(CANNOT_DEPOSIT))?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Amount) -> LedgerResult<()> {
        if !self.can_withdraw(amount) {
            return Err(LedgerError::invalid(CANNOT_WITHDRAW));
        }
        self.balance -= amount;
        Ok(())
    }

    /// Snapshot records may come from hand-edited files; reject the ones that
    /// would break the non-negative balance invariant.
    pub fn is_well_formed(&self) -> bool {
        self.balance >= Decimal::ZERO && !self.account_number.as_str().trim().is_empty()
    }
}

impl Entity for Account {
    type Id = AccountNumber;

    fn id(&self) -> &Self::Id {
        &self.account_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn test_account(balance: Amount) -> Account {
        Account::new(AccountNumber::from("0001"), "Test Holder", balance, test_time())
    }

    #[test]
    fn deposit_increases_balance_by_exact_amount() {
        let mut acc = test_account(dec!(100));
        acc.deposit(dec!(25.50)).unwrap();
        assert_eq!(acc.balance(), dec!(125.50));
    }

    #[test]
    fn deposit_rejects_non_positive_amounts() {
        let mut acc = test_account(dec!(100));
        assert_eq!(
            acc.deposit(Decimal::ZERO),
            Err(LedgerError::invalid(CANNOT_DEPOSIT))
        );
        assert!(acc.deposit(dec!(-1)).is_err());
        assert_eq!(acc.balance(), dec!(100));
    }

    #[test]
    fn deposit_that_would_overflow_is_refused() {
        let mut acc = test_account(Decimal::MAX - dec!(1000));
        assert!(acc.can_deposit(dec!(1000)));
        acc.deposit(dec!(1000)).unwrap();
        assert_eq!(acc.balance(), Decimal::MAX);

        assert!(!acc.can_deposit(dec!(1)));
        let err = acc.deposit(dec!(1)).unwrap_err();
        assert_eq!(err, LedgerError::invalid(CANNOT_DEPOSIT));
        assert_eq!(acc.balance(), Decimal::MAX);
    }

    #[test]
    fn withdraw_allows_draining_to_zero_but_not_below() {
        let mut acc = test_account(dec!(100));
        acc.withdraw(dec!(100)).unwrap();
        assert_eq!(acc.balance(), Decimal::ZERO);

        let err = acc.withdraw(dec!(0.01)).unwrap_err();
        assert_eq!(err.to_string(), CANNOT_WITHDRAW);
        assert_eq!(acc.balance(), Decimal::ZERO);
    }

    #[test]
    fn locked_account_is_readable_but_immutable() {
        let mut acc = test_account(dec!(100)).with_locked(true);
        assert!(!acc.can_deposit(dec!(1)));
        assert!(!acc.can_withdraw(dec!(1)));
        assert!(acc.deposit(dec!(1)).is_err());
        assert!(acc.withdraw(dec!(1)).is_err());
        assert_eq!(acc.balance(), dec!(100));
        assert_eq!(acc.holder_name(), "Test Holder");
    }

    #[test]
    fn negative_opening_balance_is_clamped() {
        let acc = test_account(dec!(-10));
        assert_eq!(acc.balance(), Decimal::ZERO);
    }

    #[test]
    fn identity_is_the_account_number() {
        let a = test_account(dec!(1));
        let b = test_account(dec!(999)).with_locked(true);
        assert!(a.same_identity(&b));
        assert_eq!(a.id().as_str(), "0001");
    }

    #[test]
    fn snapshot_record_round_trips_and_defaults_locked() {
        let json = r#"{
            "account_number": "0009",
            "holder_name": "Old Record",
            "balance": "12.34",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let acc: Account = serde_json::from_str(json).unwrap();
        assert_eq!(acc.balance(), dec!(12.34));
        assert!(!acc.is_locked());
        assert!(acc.is_well_formed());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Deposit(i64),
        Withdraw(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-500i64..5_000).prop_map(Op::Deposit),
            (-500i64..5_000).prop_map(Op::Withdraw),
        ]
    }

    proptest! {
        #[test]
        fn balance_never_goes_negative(
            start in 0i64..10_000,
            ops in proptest::collection::vec(op_strategy(), 0..64),
        ) {
            let mut acc = test_account(Decimal::new(start, 2));
            let mut expected = Decimal::new(start, 2);

            for op in ops {
                match op {
                    Op::Deposit(cents) => {
                        let amt = Decimal::new(cents, 2);
                        let allowed = acc.can_deposit(amt);
                        prop_assert_eq!(acc.deposit(amt).is_ok(), allowed);
                        if allowed {
                            expected += amt;
                        }
                    }
                    Op::Withdraw(cents) => {
                        let amt = Decimal::new(cents, 2);
                        let allowed = acc.can_withdraw(amt);
                        prop_assert_eq!(acc.withdraw(amt).is_ok(), allowed);
                        if allowed {
                            expected -= amt;
                        }
                    }
                }
                prop_assert!(acc.balance() >= Decimal::ZERO);
                prop_assert_eq!(acc.balance(), expected);
            }
        }
    }
}
