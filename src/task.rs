//! Task data structure and related functionality.
//!
//! This module defines the `Task` record, the `TaskDraft` used to create one and
//! the `TaskPatch` used to edit one, together with the tag normalisation rules
//! every stored task obeys.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::Priority;

/// A single to-do item.
///
/// Field names on disk follow the camelCase layout of the stored collection
/// (`dueDate`, `createdAt`). Optional fields are omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Everything needed to create a task except its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    /// Unset means not completed.
    pub completed: Option<bool>,
    /// Unset means "now" at creation time.
    pub created_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Turn the draft into a stored task with the given id.
    pub fn into_task(self, id: u64, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            priority: self.priority,
            due_date: self.due_date,
            completed: self.completed.unwrap_or(false),
            created_at: Some(self.created_at.unwrap_or(now)),
            tags: normalise_tags(&self.tags),
        }
    }
}

/// Partial update for a task. `None` leaves the field untouched.
///
/// There is deliberately no `id` or `created_at` here; a JSON patch that
/// carries those keys has them ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    #[serde(deserialize_with = "patch_date")]
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Merge the patch onto `task`, patch values winning.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(tags) = self.tags {
            task.tags = normalise_tags(&tags);
        }
    }
}

/// Trim tags, drop empty ones and later duplicates, keeping first-seen order.
/// Matching is case-sensitive.
pub fn normalise_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for raw in tags {
        let tag = raw.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

/// Split comma-separated tag arguments and normalise the result.
pub fn split_tag_args(inputs: &[String]) -> Vec<String> {
    let parts: Vec<&str> = inputs.iter().flat_map(|raw| raw.split(',')).collect();
    normalise_tags(&parts)
}

/// Append `add` to `current` and drop anything in `remove`.
pub fn edit_tags(current: &[String], add: &[String], remove: &[String]) -> Vec<String> {
    let mut merged: Vec<&str> = current.iter().map(String::as_str).collect();
    merged.extend(add.iter().map(String::as_str));
    merged.retain(|t| !remove.iter().any(|r| r.trim() == t.trim()));
    normalise_tags(&merged)
}

/// Parse a stored creation timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC) or a bare
/// date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_date<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

fn lenient_timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn patch_date<'de, D>(de: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_date(de).map(Some)
}
