pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{CsvRoster, SantaConfig};

pub use adapters::{HttpNotifier, OutboxNotifier};
pub use crate::core::{
    exchange::{plan_exchange, DeliveryReport, ExchangePlan, GiftExchange},
    pairing::{PairingEngine, DEFAULT_ATTEMPT_BUDGET},
    rules::{count_valid_permutations, is_valid_pair, validate_pairs, validate_roster},
};
pub use domain::model::{Message, Pair, Participant, Roster};
pub use domain::ports::{EntrySource, Notifier};
pub use render::MessageRenderer;
pub use utils::error::{Result, SantaError};
