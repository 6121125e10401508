use crate::config::toml_config::SantaConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Pick Secret Santa pairs and notify every gifter")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "secret-santa.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Override the RNG seed from config
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the attempt budget from config
    #[arg(long)]
    pub attempts: Option<usize>,

    /// Override debug mode from config
    #[arg(long)]
    pub debug: Option<bool>,

    /// Dry run - validate and match without sending anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut SantaConfig) {
        if let Some(seed) = self.seed {
            config.exchange.seed = Some(seed);
            tracing::info!("🔧 Seed overridden to: {}", seed);
        }
        if let Some(attempts) = self.attempts {
            config.exchange.attempt_budget = Some(attempts);
            tracing::info!("🔧 Attempt budget overridden to: {}", attempts);
        }
        if let Some(debug_mode) = self.debug {
            config.settings.debug = Some(debug_mode);
            tracing::info!("🔧 Debug mode overridden to: {}", debug_mode);
        }
    }
}
