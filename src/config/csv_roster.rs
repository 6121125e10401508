use crate::core::EntrySource;
use crate::domain::model::Participant;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Roster read from a CSV file with a header row:
/// `first,last,email,previous_recipient,wishlist,notes`.
#[derive(Debug, Clone)]
pub struct CsvRoster {
    path: PathBuf,
}

impl CsvRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntrySource for CsvRoster {
    fn entries(&self) -> Result<Vec<Participant>> {
        tracing::debug!("Reading roster from {}", self.path.display());
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let participant: Participant = record?;
            entries.push(participant);
        }
        tracing::debug!("Read {} participants", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_csv_roster() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "first,last,email,previous_recipient,wishlist,notes").unwrap();
        writeln!(file, "John,Doe,fake1@gmail.com,Linda German,,").unwrap();
        writeln!(
            file,
            "Linda, German ,fake3@gmail.com,,https://example.com/list,\"Tea, not coffee\""
        )
        .unwrap();

        let entries = CsvRoster::new(file.path()).entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].previous_recipient(), Some("Linda German"));
        assert_eq!(entries[0].wishlist_url, None);
        assert_eq!(entries[1].full_name(), "Linda German");
        assert_eq!(
            entries[1].wishlist_url.as_deref(),
            Some("https://example.com/list")
        );
        assert_eq!(entries[1].notes.as_deref(), Some("Tea, not coffee"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(CsvRoster::new("does/not/exist.csv").entries().is_err());
    }
}
