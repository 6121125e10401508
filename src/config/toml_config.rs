use crate::config::csv_roster::CsvRoster;
use crate::core::pairing::DEFAULT_ATTEMPT_BUDGET;
use crate::core::EntrySource;
use crate::domain::model::{Participant, Roster};
use crate::render::DEFAULT_SUBJECT;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SantaConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub participants: Vec<Participant>,

    /// 設定檔所在目錄，用於解析相對路徑
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub attempt_budget: Option<usize>,
    pub seed: Option<u64>,
    pub template: Option<String>,
    pub roster_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub r#type: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub sender: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub outbox_dir: Option<String>,
    pub test_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub debug: Option<bool>,
}

impl SantaConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.as_ref().parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAIL_RELAY_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 相對路徑以設定檔目錄為基準
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(budget) = self.exchange.attempt_budget {
            validation::validate_positive_number("exchange.attempt_budget", budget, 1)?;
        }
        if let Some(template) = &self.exchange.template {
            validation::validate_path("exchange.template", template)?;
            validation::validate_file_extension(
                "exchange.template",
                template,
                &["html", "htm"],
            )?;
        }

        match (&self.exchange.roster_file, self.participants.is_empty()) {
            (Some(_), false) => {
                return Err(SantaError::ConfigValidationError {
                    field: "participants".to_string(),
                    message: "Use either [[participants]] or exchange.roster_file, not both"
                        .to_string(),
                })
            }
            (None, true) => {
                return Err(SantaError::MissingConfigError {
                    field: "participants".to_string(),
                })
            }
            (Some(file), true) => {
                validation::validate_path("exchange.roster_file", file)?;
                validation::validate_file_extension("exchange.roster_file", file, &["csv"])?;
            }
            (None, false) => validate_participants(&self.participants)?,
        }

        self.validate_notifier()
    }

    fn validate_notifier(&self) -> Result<()> {
        let notifier = &self.notifier;
        match notifier.r#type.as_str() {
            "http" => {
                let endpoint =
                    validation::validate_required_field("notifier.endpoint", &notifier.endpoint)?;
                validation::validate_url("notifier.endpoint", endpoint)?;
                let sender =
                    validation::validate_required_field("notifier.sender", &notifier.sender)?;
                validation::validate_email("notifier.sender", sender)?;
            }
            "outbox" => {
                let dir = validation::validate_required_field(
                    "notifier.outbox_dir",
                    &notifier.outbox_dir,
                )?;
                validation::validate_path("notifier.outbox_dir", dir)?;
            }
            other => {
                return Err(SantaError::InvalidConfigValueError {
                    field: "notifier.type".to_string(),
                    value: other.to_string(),
                    reason: "Unsupported notifier. Valid types: http, outbox".to_string(),
                })
            }
        }

        if let Some(timeout) = notifier.timeout_seconds {
            validation::validate_range("notifier.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(test_email) = &notifier.test_email {
            validation::validate_email("notifier.test_email", test_email)?;
        }
        Ok(())
    }

    /// 取得交換活動名稱
    pub fn exchange_name(&self) -> &str {
        self.exchange.name.as_deref().unwrap_or("Secret Santa")
    }

    /// 取得郵件主旨
    pub fn subject(&self) -> &str {
        self.exchange.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }

    /// 取得配對嘗試次數上限
    pub fn attempt_budget(&self) -> usize {
        self.exchange.attempt_budget.unwrap_or(DEFAULT_ATTEMPT_BUDGET)
    }

    pub fn seed(&self) -> Option<u64> {
        self.exchange.seed
    }

    pub fn template_path(&self) -> Option<PathBuf> {
        self.exchange.template.as_deref().map(|t| self.resolve_path(t))
    }

    pub fn is_debug(&self) -> bool {
        self.settings.debug.unwrap_or(false)
    }

    /// 讀取參與者名單並建立 Roster
    pub fn roster(&self) -> Result<Roster> {
        Ok(Roster::new(self.entries()?))
    }
}

impl EntrySource for SantaConfig {
    fn entries(&self) -> Result<Vec<Participant>> {
        match &self.exchange.roster_file {
            Some(file) => {
                let entries = CsvRoster::new(self.resolve_path(file)).entries()?;
                // 只有標題列的名單視同未提供參與者
                if entries.is_empty() {
                    return Err(SantaError::MissingConfigError {
                        field: "participants".to_string(),
                    });
                }
                validate_participants(&entries)?;
                Ok(entries)
            }
            None => Ok(self.participants.clone()),
        }
    }
}

impl Validate for SantaConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 名字、email 與願望清單網址檢查
pub fn validate_participants(participants: &[Participant]) -> Result<()> {
    for (i, participant) in participants.iter().enumerate() {
        let field = |name: &str| format!("participants[{}].{}", i, name);
        validation::validate_non_empty_string(&field("first"), &participant.first_name)?;
        validation::validate_non_empty_string(&field("last"), &participant.last_name)?;
        validation::validate_email(&field("email"), &participant.email)?;
        if let Some(url) = &participant.wishlist_url {
            validation::validate_url(&field("wishlist"), url)?;
        }
    }
    Ok(())
}
