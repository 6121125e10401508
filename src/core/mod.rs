pub mod exchange;
pub mod pairing;
pub mod rules;

pub use crate::domain::model::{Message, Pair, Participant, Roster};
pub use crate::domain::ports::{EntrySource, Notifier};
pub use crate::utils::error::Result;
