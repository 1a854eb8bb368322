//! Per-account notification fan-out.
//!
//! The hub keeps, for every account number, the ordered list of channels that
//! want to hear about it. Publishing walks that list once; a channel that
//! refuses delivery is dropped on the spot, so membership heals itself without
//! a separate liveness probe.
//!
//! - No IO / no async: `publish` only performs non-blocking `deliver` calls
//! - Best-effort: failures never reach the caller of `publish`
//! - Independent of the ledger: the hub never calls back into the store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ledgercast_core::{AccountNumber, SubscriberId};

use crate::channel::Channel;
use crate::event::NotificationEvent;

struct Registration {
    id: SubscriberId,
    channel: Box<dyn Channel>,
}

/// Subscription registry + publisher.
///
/// A single mutex guards the whole mapping, so concurrent subscribe /
/// unsubscribe / publish calls never lose or duplicate a registration.
/// Accounts with no channels have no entry.
#[derive(Default)]
pub struct NotificationHub {
    channels: Mutex<HashMap<AccountNumber, Vec<Registration>>>,
}

impl core::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("active_accounts", &self.active_accounts())
            .finish()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-updated (every
    // mutation is a single push/retain/remove), so a poisoned lock is still usable.
    fn registry(&self) -> MutexGuard<'_, HashMap<AccountNumber, Vec<Registration>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `channel` for `account`. It receives every later publish.
    pub fn subscribe<C>(&self, account: AccountNumber, channel: C) -> SubscriberId
    where
        C: Channel + 'static,
    {
        let id = SubscriberId::new();
        let mut registry = self.registry();
        let list = registry.entry(account.clone()).or_default();
        list.push(Registration {
            id,
            channel: Box::new(channel),
        });
        tracing::debug!(account = %account, subscriber = %id, total = list.len(), "subscriber registered");
        id
    }

    /// Deliver `event` to every channel registered for `account`, in
    /// registration order. Channels that fail are removed.
    ///
    /// Returns how many channels accepted the event.
    pub fn publish(&self, account: &AccountNumber, event: &NotificationEvent) -> usize {
        let mut registry = self.registry();
        let Some(list) = registry.get_mut(account) else {
            return 0;
        };

        // Drop any dead subscribers while publishing.
        list.retain(|reg| match reg.channel.deliver(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(account = %account, subscriber = %reg.id, error = %e, "pruning subscriber");
                false
            }
        });

        let delivered = list.len();
        if delivered == 0 {
            registry.remove(account);
        }
        delivered
    }

    /// Remove one channel. Returns false if it was not registered (already
    /// pruned or never there).
    pub fn unsubscribe(&self, account: &AccountNumber, id: SubscriberId) -> bool {
        let mut registry = self.registry();
        let Some(list) = registry.get_mut(account) else {
            return false;
        };

        let before = list.len();
        list.retain(|reg| reg.id != id);
        let removed = list.len() != before;

        if list.is_empty() {
            registry.remove(account);
        }
        if removed {
            tracing::debug!(account = %account, subscriber = %id, "subscriber removed");
        }
        removed
    }

    /// Send a final `SYSTEM` event to every channel, then drop all
    /// registrations. Sessions see their stream end. Returns how many channels
    /// were closed.
    pub fn close_all(&self, message: &str) -> usize {
        let drained: Vec<_> = self.registry().drain().collect();

        let mut closed = 0;
        for (account, list) in drained {
            let farewell = NotificationEvent::system(account.clone(), message);
            for reg in list {
                if let Err(e) = reg.channel.deliver(&farewell) {
                    tracing::debug!(account = %account, subscriber = %reg.id, error = %e, "farewell not delivered");
                }
                closed += 1;
            }
        }
        if closed > 0 {
            tracing::info!(closed, "closed all subscriber channels");
        }
        closed
    }

    pub fn subscriber_count(&self, account: &AccountNumber) -> usize {
        self.registry().get(account).map(Vec::len).unwrap_or(0)
    }

    /// Number of accounts with at least one live channel.
    pub fn active_accounts(&self) -> usize {
        self.registry().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::DeliveryError;
    use crate::event::EventKind;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, mpsc};

    fn acc(n: &str) -> AccountNumber {
        AccountNumber::from(n)
    }

    fn deposit_event(n: &str) -> NotificationEvent {
        NotificationEvent::deposit(acc(n), dec!(10), dec!(110))
    }

    struct BrokenChannel;

    impl Channel for BrokenChannel {
        fn deliver(&self, _event: &NotificationEvent) -> Result<(), DeliveryError> {
            Err(DeliveryError::Closed)
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let hub = NotificationHub::new();
        assert_eq!(hub.publish(&acc("0001"), &deposit_event("0001")), 0);
        assert_eq!(hub.active_accounts(), 0);
    }

    #[test]
    fn publish_reaches_every_subscriber_of_the_account_only() {
        let hub = NotificationHub::new();
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        let (tx_other, rx_other) = mpsc::channel();

        hub.subscribe(acc("0001"), tx1);
        hub.subscribe(acc("0001"), tx2);
        hub.subscribe(acc("0002"), tx_other);

        assert_eq!(hub.publish(&acc("0001"), &deposit_event("0001")), 2);

        assert_eq!(rx1.try_recv().unwrap().kind(), EventKind::Deposit);
        assert_eq!(rx2.try_recv().unwrap().kind(), EventKind::Deposit);
        assert!(rx_other.try_recv().is_err());
    }

    #[test]
    fn failing_channel_is_pruned_without_affecting_others() {
        let hub = NotificationHub::new();
        let (tx, rx) = mpsc::channel();

        hub.subscribe(acc("0001"), BrokenChannel);
        hub.subscribe(acc("0001"), tx);
        assert_eq!(hub.subscriber_count(&acc("0001")), 2);

        assert_eq!(hub.publish(&acc("0001"), &deposit_event("0001")), 1);
        assert_eq!(hub.subscriber_count(&acc("0001")), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn dropped_receiver_is_pruned_and_entry_removed() {
        let hub = NotificationHub::new();
        let (tx, rx) = mpsc::channel();
        hub.subscribe(acc("0001"), tx);
        drop(rx);

        assert_eq!(hub.publish(&acc("0001"), &deposit_event("0001")), 0);
        assert_eq!(hub.subscriber_count(&acc("0001")), 0);
        assert_eq!(hub.active_accounts(), 0);
    }

    #[test]
    fn slow_bounded_subscriber_is_dropped() {
        let hub = NotificationHub::new();
        let (slow_tx, _slow_rx) = tokio::sync::mpsc::channel(1);
        let (fast_tx, fast_rx) = mpsc::channel();
        hub.subscribe(acc("0001"), slow_tx);
        hub.subscribe(acc("0001"), fast_tx);

        assert_eq!(hub.publish(&acc("0001"), &deposit_event("0001")), 2);
        // Second event overflows the slow buffer.
        assert_eq!(hub.publish(&acc("0001"), &deposit_event("0001")), 1);
        assert_eq!(fast_rx.try_iter().count(), 2);
    }

    #[test]
    fn unsubscribe_removes_only_that_channel_and_empty_entries() {
        let hub = NotificationHub::new();
        let (tx1, _rx1) = mpsc::channel();
        let (tx2, _rx2) = mpsc::channel();
        let id1 = hub.subscribe(acc("0001"), tx1);
        let id2 = hub.subscribe(acc("0001"), tx2);

        assert!(hub.unsubscribe(&acc("0001"), id1));
        assert!(!hub.unsubscribe(&acc("0001"), id1));
        assert_eq!(hub.subscriber_count(&acc("0001")), 1);

        assert!(hub.unsubscribe(&acc("0001"), id2));
        assert_eq!(hub.active_accounts(), 0);
        assert!(!hub.unsubscribe(&acc("0009"), id2));
    }

    #[test]
    fn close_all_says_goodbye_and_empties_the_registry() {
        let hub = NotificationHub::new();
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        hub.subscribe(acc("0001"), tx1);
        hub.subscribe(acc("0002"), tx2);

        assert_eq!(hub.close_all("server shutting down"), 2);
        assert_eq!(hub.active_accounts(), 0);

        let last = rx1.try_recv().unwrap();
        assert_eq!(last.kind(), EventKind::System);
        assert_eq!(last.message(), "server shutting down");
        assert_eq!(rx2.try_recv().unwrap().account_number(), &acc("0002"));
        // Senders are gone with the registrations.
        assert!(matches!(rx1.recv(), Err(_)));
    }

    #[test]
    fn close_all_drops_channels_that_refuse_the_farewell() {
        let hub = NotificationHub::new();
        let (tx, rx) = mpsc::channel();
        hub.subscribe(acc("0001"), BrokenChannel);
        hub.subscribe(acc("0001"), tx);

        assert_eq!(hub.close_all("bye"), 2);
        assert_eq!(hub.active_accounts(), 0);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn concurrent_subscribes_are_not_lost() {
        let hub = Arc::new(NotificationHub::new());
        let mut receivers = Vec::new();
        let mut handles = Vec::new();

        for i in 0..8 {
            let (tx, rx) = mpsc::channel();
            receivers.push(rx);
            let hub = hub.clone();
            let account = if i % 2 == 0 { "0001" } else { "0002" };
            handles.push(std::thread::spawn(move || {
                hub.subscribe(acc(account), tx);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(hub.subscriber_count(&acc("0001")), 4);
        assert_eq!(hub.subscriber_count(&acc("0002")), 4);
        assert_eq!(hub.active_accounts(), 2);
    }
}
