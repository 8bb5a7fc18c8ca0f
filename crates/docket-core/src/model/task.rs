use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// The three task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Todo
    }
}

/// Task priority levels, ordered `low < med < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Med
    }
}

/// All persisted fields for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub assignee_email: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a task. Unset fields take their documented defaults
/// (`status = todo`, `priority = med`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee_email: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Three-state patch value for optional fields: leave as-is, clear, or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T: Clone + PartialEq> Patch<T> {
    /// Resolve the patch against the current value.
    pub fn apply(&self, current: Option<&T>) -> Option<T> {
        match self {
            Self::Keep => current.cloned(),
            Self::Clear => None,
            Self::Set(value) => Some(value.clone()),
        }
    }

    /// Whether applying this patch would change the current value.
    pub fn changes(&self, current: Option<&T>) -> bool {
        match self {
            Self::Keep => false,
            Self::Clear => current.is_some(),
            Self::Set(value) => current != Some(value),
        }
    }
}

/// Partial update for a task. Every field is optional; optional task fields
/// use [`Patch`] so a patch can also clear them.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee_email: Patch<String>,
    pub due_date: Patch<NaiveDate>,
}

impl TaskPatch {
    /// Apply every supplied field to `task`, leaving the rest untouched.
    /// `project_id`, `id`, and timestamps are never patched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        task.assignee_email = self.assignee_email.apply(task.assignee_email.as_ref());
        task.due_date = self.due_date.apply(task.due_date.as_ref());
    }

    /// Whether applying this patch to `task` would change any field.
    #[must_use]
    pub fn changes(&self, task: &Task) -> bool {
        self.title.as_ref().is_some_and(|t| *t != task.title)
            || self.status.is_some_and(|s| s != task.status)
            || self.priority.is_some_and(|p| p != task.priority)
            || self.assignee_email.changes(task.assignee_email.as_ref())
            || self.due_date.changes(task.due_date.as_ref())
    }
}

/// Trim a title and reject it when nothing is left.
pub fn normalize_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("title must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Shape check for assignee emails: one `@`, a non-empty local part, and a
/// dotted domain. Deliverability is not this layer's problem.
pub fn validate_email(raw: &str) -> Result<()> {
    let mut parts = raw.split('@');
    let (local, domain) = (parts.next().unwrap_or(""), parts.next().unwrap_or(""));
    let valid = parts.next().is_none()
        && !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !raw.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(Error::invalid(format!("malformed assignee email: '{raw}'")))
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(Error::invalid(format!(
                "invalid status '{s}': expected todo, in_progress, or done"
            ))),
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "med" => Ok(Self::Med),
            "high" => Ok(Self::High),
            _ => Err(Error::invalid(format!(
                "invalid priority '{s}': expected low, med, or high"
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Patch, Priority, Status, TaskPatch, normalize_title, validate_email};
    use crate::error::Error;
    use std::str::FromStr;

    #[test]
    fn enum_json_roundtrips() {
        assert_eq!(serde_json::to_string(&Status::Todo).unwrap(), "\"todo\"");
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(serde_json::to_string(&Priority::Med).unwrap(), "\"med\"");

        assert_eq!(
            serde_json::from_str::<Status>("\"done\"").unwrap(),
            Status::Done
        );
        assert_eq!(
            serde_json::from_str::<Priority>("\"high\"").unwrap(),
            Priority::High
        );
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(Status::from_str(" TODO ").unwrap(), Status::Todo);
        assert_eq!(Priority::from_str("High").unwrap(), Priority::High);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(matches!(
            Status::from_str("archived"),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            Priority::from_str("urgent"),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn priority_ordering_is_low_med_high() {
        assert!(Priority::Low < Priority::Med);
        assert!(Priority::Med < Priority::High);
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(normalize_title("   ").is_err());
        assert_eq!(normalize_title("  fix login  ").unwrap(), "fix login");
    }

    #[test]
    fn email_shape_check() {
        assert!(validate_email("dev@test.io").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@test.io").is_err());
        assert!(validate_email("dev@nodot").is_err());
        assert!(validate_email("dev@test.io extra").is_err());
    }

    #[test]
    fn patch_three_states() {
        let current = Some("a@b.io".to_string());
        assert_eq!(
            Patch::Keep.apply(current.as_ref()),
            Some("a@b.io".to_string())
        );
        assert_eq!(Patch::<String>::Clear.apply(current.as_ref()), None);
        assert!(Patch::<String>::Clear.changes(current.as_ref()));
        assert!(!Patch::<String>::Clear.changes(None));
        assert!(Patch::Set("c@d.io".to_string()).changes(current.as_ref()));
        assert!(!Patch::Set("a@b.io".to_string()).changes(current.as_ref()));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let task = crate::model::test_task("tsk-x", "prj-x", "title");
        assert!(!TaskPatch::default().changes(&task));
    }
}
