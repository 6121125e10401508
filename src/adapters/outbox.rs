use crate::domain::model::Message;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes every message to `<base_path>/<recipient>.html` instead of sending it.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    base_path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path_for(&self, recipient: &str) -> PathBuf {
        let file_name: String = recipient
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '@' | '-' | '_' | '+' => c,
                _ => '_',
            })
            .collect();
        Path::new(&self.base_path).join(format!("{}.html", file_name))
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn deliver(&self, recipient: &str, message: &Message) -> Result<()> {
        let full_path = self.path_for(recipient);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = format!(
            "<!-- To: {} -->\n<!-- Subject: {} -->\n{}",
            recipient, message.subject, message.html_body
        );
        fs::write(&full_path, content)?;
        tracing::debug!("Wrote message for {} to {}", recipient, full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_outbox_writes_one_file_per_recipient() {
        let temp_dir = TempDir::new().unwrap();
        let outbox = OutboxNotifier::new(temp_dir.path().join("outbox"));
        let message = Message {
            subject: "Secret Santa Match".to_string(),
            html_body: "<p>Hi</p>".to_string(),
        };

        tokio_test::block_on(outbox.deliver("fake1@gmail.com", &message)).unwrap();

        let written = fs::read_to_string(outbox.path_for("fake1@gmail.com")).unwrap();
        assert!(written.contains("<!-- To: fake1@gmail.com -->"));
        assert!(written.contains("<!-- Subject: Secret Santa Match -->"));
        assert!(written.ends_with("<p>Hi</p>"));
    }

    #[test]
    fn test_path_for_sanitizes_recipient() {
        let outbox = OutboxNotifier::new("out");
        let path = outbox.path_for("../evil/name@example.com");
        assert_eq!(path, Path::new("out").join(".._evil_name@example.com.html"));
    }
}
