use serde::{Deserialize, Deserializer, Serialize};

/// One entrant in the exchange.
///
/// Field names on the wire follow the roster files (`first`, `last`, ...).
/// Empty optional fields are read as absent so that value equality is not
/// affected by how a roster spells "nothing".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "first")]
    pub first_name: String,
    #[serde(rename = "last")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(
        default,
        alias = "last_giftee",
        alias = "prev_giftee",
        deserialize_with = "empty_as_none"
    )]
    pub previous_recipient: Option<String>,
    #[serde(default, rename = "wishlist", deserialize_with = "empty_as_none")]
    pub wishlist_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl Participant {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            previous_recipient: None,
            wishlist_url: None,
            notes: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_previous_recipient(mut self, full_name: impl Into<String>) -> Self {
        self.previous_recipient = non_empty(full_name.into());
        self
    }

    pub fn with_wishlist(mut self, url: impl Into<String>) -> Self {
        self.wishlist_url = non_empty(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(notes.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn previous_recipient(&self) -> Option<&str> {
        self.previous_recipient.as_deref()
    }
}

/// `gifter` gives a gift to `giftee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub gifter: Participant,
    pub giftee: Participant,
}

impl Pair {
    pub fn new(gifter: Participant, giftee: Participant) -> Self {
        Self { gifter, giftee }
    }
}

/// Ordered participant list. Insertion order is report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    pub fn first(&self) -> Option<&Participant> {
        self.participants.first()
    }
}

impl From<Vec<Participant>> for Roster {
    fn from(participants: Vec<Participant>) -> Self {
        Self::new(participants)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.participants.iter()
    }
}

/// A rendered notification ready for a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub subject: String,
    pub html_body: String,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(non_empty))
}
