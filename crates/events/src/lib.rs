//! Balance-change notifications: event model, channels, fan-out hub and
//! subscription sessions.

pub mod channel;
pub mod event;
pub mod hub;
pub mod subscription;

pub use channel::{Channel, DeliveryError};
pub use event::{EventKind, NotificationEvent};
pub use hub::NotificationHub;
pub use subscription::{SessionState, Subscription};
