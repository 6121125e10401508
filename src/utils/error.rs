use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("Mail relay request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Failed to match previous recipient '{previous_recipient}' of {participant} with anyone in the participant list")]
    UnknownPreviousRecipient {
        participant: String,
        previous_recipient: String,
    },

    #[error("Failed to find a full set of valid pairs for {participants} participants after {attempts} attempts")]
    UnsatisfiableConstraints { attempts: usize, participants: usize },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Delivery to {recipient} failed: {message}")]
    DeliveryError { recipient: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Roster,
    Matching,
    Template,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SantaError::UnknownPreviousRecipient { .. } | SantaError::CsvError(_) => {
                ErrorCategory::Roster
            }
            SantaError::UnsatisfiableConstraints { .. } => ErrorCategory::Matching,
            SantaError::TemplateError { .. } => ErrorCategory::Template,
            SantaError::DeliveryError { .. } | SantaError::ApiError(_) => ErrorCategory::Delivery,
            SantaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一收件人失敗不影響其他配對
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SantaError::UnknownPreviousRecipient {
                previous_recipient, ..
            } => format!(
                "Check the spelling of '{}' or clear the previous_recipient field",
                previous_recipient
            ),
            SantaError::UnsatisfiableConstraints { .. } => {
                "The roster's constraint graph may be too dense for its size - add or remove participants"
                    .to_string()
            }
            SantaError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file", field)
            }
            SantaError::InvalidConfigValueError { field, .. }
            | SantaError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' in the configuration file", field)
            }
            SantaError::ConfigError { .. } => {
                "Make sure the file exists and is valid TOML format".to_string()
            }
            SantaError::CsvError(_) => {
                "Check that the roster file has a header row: first,last,email,previous_recipient,wishlist,notes"
                    .to_string()
            }
            SantaError::TemplateError { .. } => {
                "Check the placeholders used in the message template".to_string()
            }
            SantaError::DeliveryError { .. } | SantaError::ApiError(_) => {
                "Check the notifier endpoint and credentials, then resend to the failed recipients"
                    .to_string()
            }
            SantaError::IoError(_) => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Roster => format!("Participant list problem: {}", self),
            ErrorCategory::Matching => format!("{}", self),
            ErrorCategory::Template => format!("Could not render the message: {}", self),
            ErrorCategory::Delivery => format!("Could not send a notification: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsatisfiable_constraints_guidance() {
        let err = SantaError::UnsatisfiableConstraints {
            attempts: 1000,
            participants: 2,
        };
        assert_eq!(err.category(), ErrorCategory::Matching);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("add or remove participants"));
    }

    #[test]
    fn test_delivery_errors_are_not_fatal() {
        let err = SantaError::DeliveryError {
            recipient: "john@example.com".to_string(),
            message: "502 Bad Gateway".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("john@example.com"));
    }
}
