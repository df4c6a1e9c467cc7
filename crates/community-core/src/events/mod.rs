//! Domain events emitted to the notification collaborator

mod notification;

pub use notification::{Notification, NotificationTarget};
