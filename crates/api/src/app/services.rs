//! Request handler: the single entry point HTTP routes call into.
//!
//! Every ledger operation runs on the blocking pool (the store takes a
//! `std::sync::Mutex` and writes the snapshot synchronously). Notifications are
//! published only after the store call has returned, so the store lock is never
//! held while fanning out.

use std::sync::Arc;

use ledgercast_core::{AccountNumber, Amount, LedgerError};
use ledgercast_events::{NotificationEvent, NotificationHub, Subscription};
use ledgercast_infra::{
    JsonFileStorage, LedgerStore, OperationResult, TransferResult,
    ledger::{DEPOSIT_OK, WITHDRAW_OK},
};

use crate::app::dto::{AccountSummary, AccountView, StatusView};
use crate::config::ServerConfig;

pub const SHUTDOWN_MESSAGE: &str = "server shutting down";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("ledger task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug)]
pub struct BankService {
    store: Arc<LedgerStore>,
    hub: Arc<NotificationHub>,
    subscriber_buffer: usize,
}

impl BankService {
    pub fn new(store: Arc<LedgerStore>, hub: Arc<NotificationHub>, subscriber_buffer: usize) -> Self {
        Self {
            store,
            hub,
            subscriber_buffer: subscriber_buffer.max(1),
        }
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    pub fn hub(&self) -> &Arc<NotificationHub> {
        &self.hub
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&LedgerStore) -> T + Send + 'static,
    {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || f(&store)).await?)
    }

    pub async fn get_account(&self, number: AccountNumber) -> Result<AccountView, ServiceError> {
        let found = self.with_store({
            let number = number.clone();
            move |s: &LedgerStore| s.get(&number)
        })
        .await?;

        Ok(match found {
            Some(account) => AccountView::from(&account),
            None => AccountView::missing(number),
        })
    }

    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, ServiceError> {
        let accounts = self.with_store(|s: &LedgerStore| s.list_all()).await?;
        Ok(accounts.iter().map(AccountSummary::from).collect())
    }

    pub async fn deposit(&self, number: AccountNumber, amount: Amount) -> Result<OperationResult, ServiceError> {
        let result = self
            .with_store({
                let number = number.clone();
                move |s: &LedgerStore| s.deposit(&number, amount)
            })
            .await?;

        match &result {
            Ok(balance) => {
                self.hub
                    .publish(&number, &NotificationEvent::deposit(number.clone(), amount, *balance));
            }
            Err(e) => tracing::warn!(account = %number, %amount, reason = %e, "deposit rejected"),
        }
        Ok(OperationResult::from_result(&result, DEPOSIT_OK))
    }

    pub async fn withdraw(&self, number: AccountNumber, amount: Amount) -> Result<OperationResult, ServiceError> {
        let result = self
            .with_store({
                let number = number.clone();
                move |s: &LedgerStore| s.withdraw(&number, amount)
            })
            .await?;

        match &result {
            Ok(balance) => {
                self.hub
                    .publish(&number, &NotificationEvent::withdraw(number.clone(), amount, *balance));
            }
            Err(e) => tracing::warn!(account = %number, %amount, reason = %e, "withdrawal rejected"),
        }
        Ok(OperationResult::from_result(&result, WITHDRAW_OK))
    }

    /// Sender is notified first, then the receiver.
    pub async fn transfer(
        &self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Amount,
    ) -> Result<TransferResult, ServiceError> {
        let result = self
            .with_store({
                let (from, to) = (from.clone(), to.clone());
                move |s: &LedgerStore| s.transfer(&from, &to, amount)
            })
            .await?;

        match &result {
            Ok(receipt) => {
                self.hub.publish(
                    &from,
                    &NotificationEvent::transfer_sent(from.clone(), to.clone(), amount, receipt.from_balance),
                );
                self.hub.publish(
                    &to,
                    &NotificationEvent::transfer_received(to.clone(), from.clone(), amount, receipt.to_balance),
                );
            }
            Err(e) => tracing::warn!(from = %from, to = %to, %amount, reason = %e, "transfer rejected"),
        }
        Ok(TransferResult::from(&result))
    }

    /// Open an event session for an existing account.
    pub async fn subscribe(&self, number: AccountNumber) -> Result<Subscription, ServiceError> {
        let exists = self
            .with_store({
                let number = number.clone();
                move |s: &LedgerStore| s.get(&number).is_some()
            })
            .await?;
        if !exists {
            return Err(LedgerError::NotFound.into());
        }
        Ok(Subscription::open(self.hub.clone(), number, self.subscriber_buffer))
    }

    pub async fn status(&self) -> Result<StatusView, ServiceError> {
        let (accounts, total_balance) = self.with_store(|s: &LedgerStore| (s.len(), s.total_balance())).await?;
        Ok(StatusView {
            accounts,
            total_balance,
            subscribed_accounts: self.hub.active_accounts(),
        })
    }

    /// End every open subscription so streaming responses can finish.
    pub fn shutdown(&self) -> usize {
        self.hub.close_all(SHUTDOWN_MESSAGE)
    }
}

/// Wire the file-backed store and an empty hub from configuration.
pub async fn build_services(config: &ServerConfig) -> Result<BankService, ServiceError> {
    let path = config.data_file.clone();
    let store = tokio::task::spawn_blocking(move || LedgerStore::open(JsonFileStorage::new(path))).await?;
    Ok(BankService::new(
        Arc::new(store),
        Arc::new(NotificationHub::new()),
        config.subscriber_buffer,
    ))
}
