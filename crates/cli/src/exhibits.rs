//! Exhibit records on top of the debounced store
//!
//! Layout in the store:
//! - `exhibits-{owner}`      → `[id, ...]` in save order
//! - `exhibit-{owner}-{id}`  → the exhibit record
//!
//! Records are normalized to plain JSON before they reach the store.

use exhibit_store::{Result, Store};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum number of autocomplete choices offered at once
pub const MAX_CHOICES: usize = 25;

/// Maximum length of a choice label
pub const MAX_CHOICE_NAME: usize = 100;

/// A saved message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exhibit {
    /// Per-owner sequence number, starting at 1
    pub id: u64,
    /// User who saved the exhibit
    pub owner_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub author_profile_url: String,
    /// `None` for messages outside a guild (DMs, group chats)
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub content: String,
    pub attachment_url: Option<String>,
}

impl Exhibit {
    /// Link back to the original message
    pub fn message_link(&self) -> String {
        let guild = self
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "@me".to_string());
        format!(
            "https://discord.com/channels/{}/{}/{}",
            guild, self.channel_id, self.message_id
        )
    }

    /// Whether the autocomplete query `current` matches this exhibit
    pub fn matches(&self, current: &str) -> bool {
        self.content.contains(current)
            || self.id.to_string().contains(current)
            || self.author_name.contains(current)
    }
}

/// Everything needed to save an exhibit except its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExhibit {
    pub owner_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub author_profile_url: String,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub content: String,
    pub attachment_url: Option<String>,
}

impl NewExhibit {
    fn with_id(self, id: u64) -> Exhibit {
        Exhibit {
            id,
            owner_id: self.owner_id,
            author_id: self.author_id,
            author_name: self.author_name,
            author_profile_url: self.author_profile_url,
            guild_id: self.guild_id,
            channel_id: self.channel_id,
            message_id: self.message_id,
            content: self.content,
            attachment_url: self.attachment_url,
        }
    }
}

/// Autocomplete entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: u64,
}

/// Key holding an owner's exhibit ids
pub fn index_key(owner_id: u64) -> String {
    format!("exhibits-{}", owner_id)
}

/// Key holding a single exhibit
pub fn exhibit_key(owner_id: u64, id: u64) -> String {
    format!("exhibit-{}-{}", owner_id, id)
}

/// Exhibit operations over a shared store
#[derive(Debug, Clone)]
pub struct Exhibits {
    store: Store,
}

impl Exhibits {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Ids saved by `owner_id`, in save order
    pub fn ids(&self, owner_id: u64) -> Result<Vec<u64>> {
        Ok(self.store.get_as(&index_key(owner_id))?.unwrap_or_default())
    }

    /// All exhibits of `owner_id`, in save order
    ///
    /// Ids whose record is missing are skipped.
    pub fn list(&self, owner_id: u64) -> Result<Vec<Exhibit>> {
        let mut exhibits = Vec::new();
        for id in self.ids(owner_id)? {
            match self.get(owner_id, id)? {
                Some(exhibit) => exhibits.push(exhibit),
                None => warn!("Exhibit {} of owner {} is indexed but missing", id, owner_id),
            }
        }
        Ok(exhibits)
    }

    /// A single exhibit
    pub fn get(&self, owner_id: u64, id: u64) -> Result<Option<Exhibit>> {
        self.store.get_as(&exhibit_key(owner_id, id))
    }

    /// Save a new exhibit under the next free id
    pub fn save(&self, new: NewExhibit) -> Result<Exhibit> {
        let owner_id = new.owner_id;
        let next_id = self
            .list(owner_id)?
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            + 1;

        let exhibit = new.with_id(next_id);
        self.store.set_serialized(exhibit_key(owner_id, next_id), &exhibit)?;

        let mut ids = self.ids(owner_id)?;
        ids.push(next_id);
        self.store.set_serialized(index_key(owner_id), &ids)?;

        Ok(exhibit)
    }

    /// Choices for a partially typed exhibit reference
    ///
    /// Only the first [`MAX_CHOICES`] exhibits are considered.
    pub fn autocomplete(&self, owner_id: u64, current: &str) -> Result<Vec<Choice>> {
        Ok(self
            .list(owner_id)?
            .into_iter()
            .take(MAX_CHOICES)
            .filter(|e| e.matches(current))
            .map(|e| Choice {
                name: truncate(
                    &format!(
                        "{} - {} - {}",
                        e.id,
                        e.author_name,
                        remove_markdown(&e.content)
                    ),
                    MAX_CHOICE_NAME,
                ),
                value: e.id,
            })
            .collect())
    }
}

/// Strip markdown the way discord's client-side helper does
///
/// Removes `* _ ~ | \` and backticks anywhere, masked links
/// (`[text](url)`) whole, and at the start of a line: block quotes,
/// `#`..`###` headings and `-#` subtext. Line breaks are kept.
pub fn remove_markdown(text: &str) -> String {
    text.split('\n').map(strip_line).collect::<Vec<_>>().join("\n")
}

fn strip_line(line: &str) -> String {
    let line = strip_line_prefix(line);
    let (head, tail) = match masked_link(line) {
        Some((start, end)) => (&line[..start], &line[end..]),
        None => (line, ""),
    };
    head.chars()
        .chain(tail.chars())
        .filter(|c| !matches!(c, '*' | '_' | '~' | '`' | '|' | '\\'))
        .collect()
}

fn strip_line_prefix(line: &str) -> &str {
    let quote = line
        .strip_prefix(">>>")
        .and_then(after_whitespace)
        .or_else(|| line.strip_prefix('>').and_then(after_whitespace));
    if let Some(rest) = quote {
        return rest;
    }

    if line.starts_with('#') {
        let hashes = line.bytes().take(3).take_while(|b| *b == b'#').count();
        return &line[hashes..];
    }

    line.trim_start().strip_prefix("-#").unwrap_or(line)
}

fn after_whitespace(rest: &str) -> Option<&str> {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}

/// Byte range of a greedy `[..](..)` match: first `[` to last `)`
fn masked_link(line: &str) -> Option<(usize, usize)> {
    let start = line.find('[')?;
    let end = line.rfind(')')?;
    if end < start + 5 {
        return None;
    }
    let split = line.as_bytes()[..end - 1]
        .windows(2)
        .rposition(|w| w == b"](")?;
    (split >= start + 2).then_some((start, end + 1))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
