//! Subscription sessions: the transport-facing side of a hub registration.
//!
//! A [`Subscription`] is a stream of events for one account. It registers a
//! bounded channel with the hub when opened and deregisters it when dropped,
//! so a client disconnect releases the channel immediately (no polling leak
//! window). If the hub prunes the channel first (delivery failure), the stream
//! simply ends.
//!
//! ```text
//! Unregistered --open--> Active --(disconnect | delivery failure)--> Terminated
//! ```
//!
//! There is no idle timeout and no replay: once a gap occurs the session is
//! over and the client has to subscribe again.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

use ledgercast_core::{AccountNumber, SubscriberId};

use crate::event::NotificationEvent;
use crate::hub::NotificationHub;

/// Lifecycle of a subscription session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Active,
    Terminated,
}

#[derive(Debug)]
pub struct Subscription {
    hub: Arc<NotificationHub>,
    account: AccountNumber,
    id: Option<SubscriberId>,
    receiver: mpsc::Receiver<NotificationEvent>,
    state: SessionState,
}

impl Subscription {
    /// Register a new session for `account` with room for `buffer` pending
    /// events. A `SYSTEM` greeting is queued before any ledger event.
    pub fn open(hub: Arc<NotificationHub>, account: AccountNumber, buffer: usize) -> Self {
        let (tx, receiver) = mpsc::channel(buffer.max(1));
        let mut session = Self {
            hub,
            account,
            id: None,
            receiver,
            state: SessionState::Unregistered,
        };

        let greeting = NotificationEvent::system(
            session.account.clone(),
            format!("subscribed to account {}", session.account),
        );
        // Fresh channel with capacity >= 1: cannot fail.
        let _ = tx.try_send(greeting);

        let id = session.hub.subscribe(session.account.clone(), tx);
        session.id = Some(id);
        session.state = SessionState::Active;
        tracing::info!(account = %session.account, subscriber = %id, "subscription opened");
        session
    }

    pub fn account(&self) -> &AccountNumber {
        &self.account
    }

    pub fn id(&self) -> Option<SubscriberId> {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Wait for the next event. `None` means the session has terminated.
    pub async fn recv(&mut self) -> Option<NotificationEvent> {
        let next = self.receiver.recv().await;
        if next.is_none() {
            self.close();
        }
        next
    }

    /// End the session and release the hub registration. Idempotent.
    pub fn close(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }
        if let Some(id) = self.id {
            self.hub.unsubscribe(&self.account, id);
            tracing::info!(account = %self.account, subscriber = %id, "subscription closed");
        }
        self.receiver.close();
        self.state = SessionState::Terminated;
    }
}

impl Stream for Subscription {
    type Item = NotificationEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.receiver.poll_recv(cx) {
            Poll::Ready(None) => {
                this.close();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use rust_decimal_macros::dec;
    use tokio_stream::StreamExt;

    fn acc(n: &str) -> AccountNumber {
        AccountNumber::from(n)
    }

    #[tokio::test]
    async fn open_registers_and_greets() {
        let hub = Arc::new(NotificationHub::new());
        let mut sub = Subscription::open(hub.clone(), acc("0001"), 8);

        assert_eq!(sub.state(), SessionState::Active);
        assert_eq!(hub.subscriber_count(&acc("0001")), 1);

        let greeting = sub.recv().await.unwrap();
        assert_eq!(greeting.kind(), EventKind::System);
    }

    #[tokio::test]
    async fn published_events_arrive_in_order() {
        let hub = Arc::new(NotificationHub::new());
        let mut sub = Subscription::open(hub.clone(), acc("0001"), 8);
        let _ = sub.next().await; // greeting

        hub.publish(&acc("0001"), &NotificationEvent::deposit(acc("0001"), dec!(5), dec!(105)));
        hub.publish(&acc("0001"), &NotificationEvent::withdraw(acc("0001"), dec!(2), dec!(103)));

        assert_eq!(sub.next().await.unwrap().kind(), EventKind::Deposit);
        assert_eq!(sub.next().await.unwrap().kind(), EventKind::Withdraw);
    }

    #[tokio::test]
    async fn dropping_the_session_deregisters_promptly() {
        let hub = Arc::new(NotificationHub::new());
        let sub = Subscription::open(hub.clone(), acc("0002"), 8);
        assert_eq!(hub.active_accounts(), 1);

        drop(sub);
        assert_eq!(hub.subscriber_count(&acc("0002")), 0);
        assert_eq!(hub.active_accounts(), 0);
    }

    #[tokio::test]
    async fn overflowing_session_is_pruned_and_stream_ends() {
        let hub = Arc::new(NotificationHub::new());
        // Buffer of one is already taken by the greeting.
        let mut sub = Subscription::open(hub.clone(), acc("0001"), 1);

        let delivered =
            hub.publish(&acc("0001"), &NotificationEvent::deposit(acc("0001"), dec!(1), dec!(1)));
        assert_eq!(delivered, 0);
        assert_eq!(hub.subscriber_count(&acc("0001")), 0);

        assert_eq!(sub.recv().await.unwrap().kind(), EventKind::System);
        assert!(sub.recv().await.is_none());
        assert_eq!(sub.state(), SessionState::Terminated);
    }

    #[tokio::test]
    async fn id_names_the_hub_registration() {
        let hub = Arc::new(NotificationHub::new());
        let sub = Subscription::open(hub.clone(), acc("0003"), 4);
        let id = sub.id().unwrap();

        assert!(hub.unsubscribe(sub.account(), id));
        assert_eq!(hub.subscriber_count(&acc("0003")), 0);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let hub = Arc::new(NotificationHub::new());
        let mut sub = Subscription::open(hub.clone(), acc("0001"), 4);
        sub.close();
        sub.close();
        assert_eq!(sub.state(), SessionState::Terminated);
        assert_eq!(hub.active_accounts(), 0);
    }
}
