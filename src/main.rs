use chrono::Datelike;
use clap::Parser;
use secret_santa::utils::error::ErrorSeverity;
use secret_santa::utils::{logger, report, validation::Validate};
use secret_santa::{
    plan_exchange, CliConfig, GiftExchange, HttpNotifier, MessageRenderer, Notifier,
    OutboxNotifier, PairingEngine, Roster, SantaConfig, SantaError,
};
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match SantaConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    println!(
        "🎅 {} Pair Picker | {}\n",
        config.exchange_name(),
        chrono::Local::now().year()
    );

    let roster = config.roster().unwrap_or_else(|e| exit_with(&e));
    tracing::info!("👥 Loaded {} participants", roster.len());

    let mut engine = PairingEngine::from_seed_option(config.seed(), config.attempt_budget());
    let plan = plan_exchange(&roster, &mut engine).unwrap_or_else(|e| exit_with(&e));
    println!("There are {} pair permutations.", plan.permutations);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No messages will be sent");
        println!(
            "✅ Found a valid pairing for {} participants",
            plan.pairs.len()
        );
        return Ok(());
    }

    let renderer = match config.template_path() {
        Some(path) => MessageRenderer::from_file(path, config.subject()),
        None => Ok(MessageRenderer::new(config.subject())),
    }
    .unwrap_or_else(|e| exit_with(&e));

    let notifier_type = config.notifier.r#type.clone();
    match notifier_type.as_str() {
        "http" => {
            let notifier = build_http_notifier(&config).unwrap_or_else(|e| exit_with(&e));
            let exchange = GiftExchange::new(notifier, renderer);
            run(exchange, &config, &roster, &plan.pairs, &args).await
        }
        _ => {
            let dir = config.notifier.outbox_dir.as_deref().unwrap_or("./outbox");
            let notifier = OutboxNotifier::new(config.resolve_path(dir));
            let exchange = GiftExchange::new(notifier, renderer);
            run(exchange, &config, &roster, &plan.pairs, &args).await
        }
    }
}

fn build_http_notifier(config: &SantaConfig) -> secret_santa::Result<HttpNotifier> {
    let notifier = &config.notifier;
    let endpoint = notifier.endpoint.clone().unwrap_or_default();
    let sender = notifier.sender.clone().unwrap_or_default();

    let api_key = notifier.api_key.clone();
    if api_key.as_deref().is_some_and(|key| key.contains("${")) {
        tracing::warn!("⚠️ notifier.api_key still contains an unresolved ${{VAR}} placeholder");
    }

    let http = HttpNotifier::new(endpoint, sender).with_api_key(api_key);
    match notifier.timeout_seconds {
        Some(seconds) => http.with_timeout(Duration::from_secs(seconds)),
        None => Ok(http),
    }
}

async fn run<N: Notifier>(
    exchange: GiftExchange<N>,
    config: &SantaConfig,
    roster: &Roster,
    pairs: &[secret_santa::Pair],
    args: &CliConfig,
) -> anyhow::Result<()> {
    if config.is_debug() {
        return run_debug(exchange, config, roster, pairs).await;
    }

    println!("\nMessages will be sent to the following addresses:");
    println!("{}", report::recipient_list(roster));

    if !args.yes && !confirm("\nDo you want to notify everyone who their Secret Santa is? ")? {
        println!("\nCancelled");
        return Ok(());
    }
    println!();

    let delivery = exchange
        .notify_all(pairs)
        .await
        .unwrap_or_else(|e| exit_with(&e));

    for failed in &delivery.failed {
        eprintln!(
            "❌ Could not notify {} <{}>: {}",
            failed.gifter, failed.recipient, failed.error
        );
    }
    println!(
        "\n✅ Process complete: {}/{} messages delivered",
        delivery.delivered.len(),
        pairs.len()
    );

    if !delivery.is_complete() {
        std::process::exit(2);
    }
    Ok(())
}

/// Shows every pair and sends a single sample message to the test address.
async fn run_debug<N: Notifier>(
    exchange: GiftExchange<N>,
    config: &SantaConfig,
    roster: &Roster,
    pairs: &[secret_santa::Pair],
) -> anyhow::Result<()> {
    tracing::info!("🐛 Debug mode - only a sample message is sent");
    println!("\nPairs:");
    print!("{}", report::pair_table(pairs));

    let sample = roster
        .first()
        .and_then(|first| pairs.iter().find(|pair| &pair.giftee == first));
    let Some(sample) = sample else {
        return Ok(());
    };

    let message = exchange.renderer().render(sample)?;
    std::fs::write("preview.html", &message.html_body)?;
    println!("\n📝 Wrote preview.html");

    match &config.notifier.test_email {
        Some(test_email) => {
            if let Err(e) = exchange.notify_sample(sample, test_email).await {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }
        None => tracing::info!("No notifier.test_email configured, skipping sample delivery"),
    }
    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    Ok(matches!(
        response.trim().to_lowercase().as_str(),
        "yes" | "y"
    ))
}

fn exit_with(e: &SantaError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
