//! HTML card rendering for pair notifications.
//!
//! Templates use `{{ key }}` placeholders and `{{#key}}...{{/key}}` sections
//! that are kept only when `key` has a non-empty value. Values are HTML-escaped.

use crate::domain::model::{Message, Pair};
use crate::utils::error::{Result, SantaError};
use chrono::Datelike;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN_TEMPLATE: &str = include_str!("../templates/christmas_card.html");

pub const DEFAULT_SUBJECT: &str = "Secret Santa Match";

#[derive(Debug, Clone)]
pub struct MessageRenderer {
    template: String,
    subject: String,
    year: i32,
}

impl MessageRenderer {
    /// Built-in card.
    pub fn new(subject: impl Into<String>) -> Self {
        Self::with_template(BUILTIN_TEMPLATE, subject)
    }

    pub fn with_template(template: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subject: subject.into(),
            year: chrono::Local::now().year(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P, subject: impl Into<String>) -> Result<Self> {
        let template = std::fs::read_to_string(&path).map_err(|e| SantaError::TemplateError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Ok(Self::with_template(template, subject))
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn render(&self, pair: &Pair) -> Result<Message> {
        let mut values = HashMap::new();
        values.insert("gifter_name", pair.gifter.full_name());
        values.insert("giftee_name", pair.giftee.full_name());
        values.insert("notes", pair.giftee.notes.clone().unwrap_or_default());
        values.insert(
            "wishlist_link",
            pair.giftee.wishlist_url.clone().unwrap_or_default(),
        );
        values.insert("year", self.year.to_string());

        Ok(Message {
            subject: self.subject.clone(),
            html_body: render_template(&self.template, &values)?,
        })
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
            .expect("placeholder pattern is a valid regex")
    })
}

pub fn render_template(template: &str, values: &HashMap<&str, String>) -> Result<String> {
    let expanded = expand_sections(template, values)?;

    let re = placeholder_regex();
    if let Some(unknown) = re
        .captures_iter(&expanded)
        .map(|caps| caps[1].to_string())
        .find(|name| !values.contains_key(name.as_str()))
    {
        return Err(unknown_key(&unknown));
    }

    let rendered = re.replace_all(&expanded, |caps: &regex::Captures| {
        escape_html(values.get(&caps[1]).map(String::as_str).unwrap_or_default())
    });
    Ok(rendered.into_owned())
}

fn expand_sections(template: &str, values: &HashMap<&str, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{#") {
        out.push_str(&rest[..start]);

        let after_open = &rest[start + 3..];
        let name_end = after_open.find("}}").ok_or_else(|| SantaError::TemplateError {
            message: "Unclosed section tag".to_string(),
        })?;
        let name = after_open[..name_end].trim();
        let body_and_rest = &after_open[name_end + 2..];

        let closing = format!("{{{{/{}}}}}", name);
        let body_end = body_and_rest
            .find(&closing)
            .ok_or_else(|| SantaError::TemplateError {
                message: format!("Section '{}' is missing its closing tag {}", name, closing),
            })?;

        let value = values.get(name).ok_or_else(|| unknown_key(name))?;
        if !value.trim().is_empty() {
            out.push_str(&expand_sections(&body_and_rest[..body_end], values)?);
        }

        rest = &body_and_rest[body_end + closing.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn unknown_key(name: &str) -> SantaError {
    SantaError::TemplateError {
        message: format!("Unknown placeholder '{}'", name),
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Participant;

    fn pair() -> Pair {
        Pair::new(
            Participant::new("Michael", "Ericson").with_email("michael@example.com"),
            Participant::new("Brian", "Napier")
                .with_wishlist("https://www.giftster.com/list/A5IgT/")
                .with_notes("Test Notes Here."),
        )
    }

    #[test]
    fn test_render_builtin_card() {
        let message = MessageRenderer::new(DEFAULT_SUBJECT)
            .with_year(2024)
            .render(&pair())
            .unwrap();

        assert_eq!(message.subject, "Secret Santa Match");
        assert!(message.html_body.contains("Hi Michael Ericson,"));
        assert!(message.html_body.contains("<strong>Brian Napier</strong>"));
        assert!(message
            .html_body
            .contains(r#"href="https://www.giftster.com/list/A5IgT/""#));
        assert!(message.html_body.contains("Notes: Test Notes Here."));
        assert!(message.html_body.contains("Secret Santa 2024"));
        assert!(!message.html_body.contains("{{"));
    }

    #[test]
    fn test_empty_sections_are_dropped() {
        let plain = Pair::new(
            Participant::new("Michael", "Ericson"),
            Participant::new("Brian", "Napier"),
        );
        let message = MessageRenderer::new(DEFAULT_SUBJECT).render(&plain).unwrap();
        assert!(!message.html_body.contains("wishlist"));
        assert!(!message.html_body.contains("Notes:"));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut values = HashMap::new();
        values.insert("notes", "<b>socks & \"tea\"</b>".to_string());
        let out = render_template("{{notes}}", &values).unwrap();
        assert_eq!(out, "&lt;b&gt;socks &amp; &quot;tea&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_unknown_placeholder_is_an_error() {
        let values = HashMap::new();
        assert!(matches!(
            render_template("Hello {{ gifter }}", &values),
            Err(SantaError::TemplateError { .. })
        ));
    }

    #[test]
    fn test_unclosed_section_is_an_error() {
        let mut values = HashMap::new();
        values.insert("notes", "x".to_string());
        assert!(render_template("{{#notes}}never closed", &values).is_err());
    }

    #[test]
    fn test_nested_sections() {
        let mut values = HashMap::new();
        values.insert("notes", "n".to_string());
        values.insert("wishlist_link", String::new());
        let out = render_template(
            "[{{#notes}}a{{#wishlist_link}}b{{/wishlist_link}}c{{/notes}}]",
            &values,
        )
        .unwrap();
        assert_eq!(out, "[ac]");
    }
}
