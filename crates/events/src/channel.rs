//! Output channels: anything that can take a sequence of notification events.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::NotificationEvent;

/// Why a channel refused an event. Causes the hub to drop the channel.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side is gone (client disconnected).
    #[error("subscriber channel closed")]
    Closed,

    /// The subscriber fell behind and its buffer is full.
    #[error("subscriber channel full")]
    Full,
}

/// A live connection capable of receiving notification events.
///
/// `deliver` must not block: a slow or dead subscriber reports an error
/// instead of stalling the publisher.
pub trait Channel: Send + Sync {
    fn deliver(&self, event: &NotificationEvent) -> Result<(), DeliveryError>;
}

impl Channel for mpsc::Sender<NotificationEvent> {
    fn deliver(&self, event: &NotificationEvent) -> Result<(), DeliveryError> {
        self.try_send(event.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

impl Channel for mpsc::UnboundedSender<NotificationEvent> {
    fn deliver(&self, event: &NotificationEvent) -> Result<(), DeliveryError> {
        self.send(event.clone()).map_err(|_| DeliveryError::Closed)
    }
}

impl Channel for std::sync::mpsc::Sender<NotificationEvent> {
    fn deliver(&self, event: &NotificationEvent) -> Result<(), DeliveryError> {
        self.send(event.clone()).map_err(|_| DeliveryError::Closed)
    }
}
