//! Localized message tables

mod messages;

pub use messages::Messages;
