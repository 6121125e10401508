#[cfg(feature = "cli")]
pub mod cli;
pub mod csv_roster;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use csv_roster::CsvRoster;
pub use toml_config::SantaConfig;
