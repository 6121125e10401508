// Adapters layer: concrete notifiers for delivering pair messages.

pub mod http;
pub mod outbox;

pub use http::HttpNotifier;
pub use outbox::OutboxNotifier;
