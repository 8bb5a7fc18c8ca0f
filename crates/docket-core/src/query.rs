//! Listing contract: filter validation, sort semantics, and pagination.
//!
//! Raw query parameters arrive as strings/integers ([`TaskQuery`]) and are
//! validated here exactly once into a [`ListPlan`]. Invalid enum values,
//! non-positive page numbers, and non-positive page sizes are rejected with
//! `InvalidInput`; nothing is silently ignored or widened.
//!
//! Sorting is specified once ([`SortSpec`]) and rendered two ways — a Rust
//! comparator for the in-memory store and an `ORDER BY` clause for SQLite —
//! so both backends order identically. Ties always break by task id.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{Priority, Status, Task, task};

/// Default page size when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sortable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Due date; tasks without one sort as if due at the earliest possible
    /// date (last under the default descending order).
    #[default]
    DueDate,
    CreatedAt,
    UpdatedAt,
    Title,
    Priority,
    Status,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A fully-resolved sort: field plus direction.
///
/// The default is due date descending (most-distant future first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

const fn status_rank(status: Status) -> u8 {
    match status {
        Status::Todo => 0,
        Status::InProgress => 1,
        Status::Done => 2,
    }
}

impl SortSpec {
    /// Comparator used by the in-memory store. Must agree with
    /// [`Self::sql_clause`].
    #[must_use]
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        let primary = match self.field {
            SortField::DueDate => a
                .due_date
                .unwrap_or(NaiveDate::MIN)
                .cmp(&b.due_date.unwrap_or(NaiveDate::MIN)),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Status => status_rank(a.status).cmp(&status_rank(b.status)),
        };
        let oriented = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        oriented.then_with(|| a.id.cmp(&b.id))
    }

    /// `ORDER BY` clause used by the SQLite store. Must agree with
    /// [`Self::compare`]. Dates are stored as ISO-8601 text, so lexicographic
    /// order is chronological; `COALESCE(due_date, '')` puts missing dates
    /// before every real one, matching the comparator's earliest-date rule.
    #[must_use]
    pub fn sql_clause(self) -> String {
        let expr = match self.field {
            SortField::DueDate => "COALESCE(due_date, '')",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Priority => {
                "CASE priority WHEN 'low' THEN 0 WHEN 'med' THEN 1 WHEN 'high' THEN 2 END"
            }
            SortField::Status => {
                "CASE status WHEN 'todo' THEN 0 WHEN 'in_progress' THEN 1 WHEN 'done' THEN 2 END"
            }
        };
        let direction = match self.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        format!("ORDER BY {expr} {direction}, id ASC")
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due_date" | "duedate" => Ok(Self::DueDate),
            "created_at" | "createdat" => Ok(Self::CreatedAt),
            "updated_at" | "updatedat" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            _ => Err(Error::invalid(format!(
                "invalid sort field '{s}': expected due_date, created_at, updated_at, title, priority, or status"
            ))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(Error::invalid(format!(
                "invalid sort order '{s}': expected asc or desc"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DueDate => "due_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::Status => "status",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Raw listing parameters as supplied by the caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_email: Option<String>,
    /// 1-based page number; default 1.
    pub page: Option<i64>,
    /// Page size; default [`DEFAULT_PAGE_SIZE`]. Must be positive.
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Typed filter criteria handed to a store. When multiple fields are set
/// they combine with AND semantics; all matches are exact.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee_email: Option<String>,
    pub sort: SortSpec,
    /// Maximum number of results. Ignored by counting.
    pub limit: Option<u32>,
    /// Offset for pagination. Ignored by counting.
    pub offset: Option<u32>,
}

/// A validated listing request: typed filter plus resolved pagination.
#[derive(Debug, Clone)]
pub struct ListPlan {
    pub filter: TaskFilter,
    pub page: u32,
    pub size: u32,
}

fn positive(value: Option<i64>, default: u32, what: &str) -> Result<u32> {
    let Some(raw) = value else {
        return Ok(default);
    };
    u32::try_from(raw)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| Error::invalid(format!("{what} must be a positive integer, got {raw}")))
}

impl TaskQuery {
    /// Validate every parameter and resolve defaults.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on any unknown enum value, malformed email, or
    /// non-positive page/size. A non-positive size never falls back to an
    /// unpaginated listing.
    pub fn plan(&self) -> Result<ListPlan> {
        let status = self.status.as_deref().map(Status::from_str).transpose()?;
        let priority = self
            .priority
            .as_deref()
            .map(Priority::from_str)
            .transpose()?;
        if let Some(email) = self.assignee_email.as_deref() {
            task::validate_email(email)?;
        }

        let field = self
            .sort_by
            .as_deref()
            .map(SortField::from_str)
            .transpose()?;
        let order = self.order.as_deref().map(SortOrder::from_str).transpose()?;
        let sort = SortSpec {
            field: field.unwrap_or_default(),
            // An explicit sort field without an order reads ascending; only
            // the fully-default sort is due-date descending.
            order: order.unwrap_or(if field.is_some() {
                SortOrder::Asc
            } else {
                SortOrder::Desc
            }),
        };

        let page = positive(self.page, 1, "page")?;
        let size = positive(self.size, DEFAULT_PAGE_SIZE, "size")?;

        Ok(ListPlan {
            filter: TaskFilter {
                status,
                priority,
                assignee_email: self.assignee_email.clone(),
                sort,
                limit: Some(size),
                offset: Some((page - 1).saturating_mul(size)),
            },
            page,
            size,
        })
    }
}

/// One page of results: the slice plus the pre-pagination match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}
