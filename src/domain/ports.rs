use crate::domain::model::{Message, Participant};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies the roster in report order.
pub trait EntrySource {
    fn entries(&self) -> Result<Vec<Participant>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, recipient: &str, message: &Message) -> Result<()>;
}
