//! Application state and utility functions for the task board.
//!
//! This module provides the `Database` struct, the single owned state
//! container holding both repositories and the current view selections,
//! along with date parsing and formatting helpers used by the front end.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::repo::{CategoryRepository, TaskRepository};
use crate::store::{FileStore, Persistence};
use crate::task::Task;
use crate::view::ViewFilter;

/// Tasks, categories and the current view selections.
#[derive(Debug)]
pub struct Database {
    tasks: TaskRepository,
    categories: CategoryRepository,
    pub filter: ViewFilter,
}

impl Database {
    /// Load both collections through `persistence`.
    pub fn open(persistence: Persistence) -> Self {
        let storage = Rc::new(persistence);
        Database {
            tasks: TaskRepository::load(Rc::clone(&storage)),
            categories: CategoryRepository::load(storage),
            filter: ViewFilter::default(),
        }
    }

    /// Load from a data directory holding one JSON file per collection.
    pub fn open_dir(dir: &Path) -> Self {
        Database::open(Persistence::new(FileStore::new(dir)))
    }

    pub fn tasks(&self) -> &TaskRepository {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRepository {
        &mut self.tasks
    }

    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryRepository {
        &mut self.categories
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
    }

    /// The derived view under the current selections.
    pub fn view(&self) -> Vec<&Task> {
        self.filter.apply(self.tasks.all())
    }

    /// Distinct tags with the number of tasks carrying each.
    pub fn tag_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for t in self.tasks.all() {
            for tag in &t.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
        counts
    }

    /// Task count per category name, including names no category has any more.
    pub fn category_usage(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = self.categories.names().into_iter().map(|n| (n, 0)).collect();
        for t in self.tasks.all() {
            *counts.entry(t.category.as_str()).or_default() += 1;
        }
        counts
    }
}

/// Parse human-readable due date input with smart natural language support.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "next monday", "this friday", bare weekday names
/// - "weekend", "end of week", "end of month"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_relative(s, Local::now().date_naive())
}

/// Same as [`parse_due_input`] with an explicit reference day.
pub fn parse_due_relative(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return first_of_next.pred_opt();
        }
        "this weekend" | "weekend" => {
            // Coming Saturday
            let days_until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            return today.checked_add_signed(Duration::days(i64::from(days_until_saturday)));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some((idx, _)) = rest.char_indices().last() {
            let (num, unit) = rest.split_at(idx);
            let per_unit = match unit {
                "d" => Some(1),
                "w" => Some(7),
                // Approximate: 30 days per month
                "m" => Some(30),
                _ => None,
            };
            if let (Ok(n), Some(per_unit)) = (num.trim().parse::<i64>(), per_unit) {
                // Offsets outside chrono's date range yield None.
                return n
                    .checked_mul(per_unit)
                    .and_then(Duration::try_days)
                    .and_then(|offset| today.checked_add_signed(offset));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = i64::from(today.weekday().num_days_from_monday());
    let (next_week, name) = match s.strip_prefix("next ") {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix("this ").unwrap_or(&s)),
    };
    if let Some(&(_, target)) = weekdays.iter().find(|(day, _)| *day == name) {
        let days_ahead = (target + 7 - current) % 7;
        let days = if next_week { days_ahead + 7 } else { days_ahead };
        return today.checked_add_signed(Duration::days(days));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the ISO week (Monday to Sunday) containing `day`.
pub fn start_end_of_week(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = i64::from(day.weekday().num_days_from_monday());
    let start = day - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {days}d")
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, SortKey};
    use crate::store::MemoryStore;
    use crate::task::TaskDraft;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fresh_database_has_seed_categories() {
        let db = Database::open(Persistence::new(MemoryStore::new()));
        assert!(db.tasks().is_empty());
        assert_eq!(db.categories().names(), ["Work", "Personal", "Shopping", "Health", "Other"]);
        assert_eq!(db.filter, ViewFilter::default());
    }

    #[test]
    fn test_view_follows_filter() {
        let mut db = Database::open(Persistence::new(MemoryStore::new()));
        let created = |hour| Some(chrono::Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap());
        let mut a = TaskDraft::new("alpha");
        a.created_at = created(8);
        a.priority = Priority::Low;
        a.category = "Work".into();
        let a = db.tasks_mut().create(a);
        let mut b = TaskDraft::new("beta");
        b.created_at = created(9);
        b.priority = Priority::High;
        b.category = "Personal".into();
        let b = db.tasks_mut().create(b);

        let ids = |db: &Database| db.view().iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(&db), [b, a]);

        db.set_filter(ViewFilter {
            category: Some("Work".into()),
            ..Default::default()
        });
        assert_eq!(ids(&db), [a]);

        db.filter.clear();
        db.filter.sort = SortKey::Title;
        assert_eq!(ids(&db), [a, b]);
    }

    #[test]
    fn test_counts() {
        let mut db = Database::open(Persistence::new(MemoryStore::new()));
        let mut draft = TaskDraft::new("x");
        draft.category = "Gone".into();
        draft.tags = vec!["red".into(), "blue".into()];
        db.tasks_mut().create(draft.clone());
        draft.category = "Work".into();
        draft.tags = vec!["red".into()];
        db.tasks_mut().create(draft);

        let tags = db.tag_counts();
        assert_eq!(tags.get("red"), Some(&2));
        assert_eq!(tags.get("blue"), Some(&1));

        let usage = db.category_usage();
        assert_eq!(usage.get("Gone"), Some(&1));
        assert_eq!(usage.get("Work"), Some(&1));
        assert_eq!(usage.get("Health"), Some(&0));
    }

    #[test]
    fn test_parse_due_relative() {
        // 2024-05-15 is a Wednesday.
        let today = day(2024, 5, 15);
        assert_eq!(parse_due_relative("today", today), Some(today));
        assert_eq!(parse_due_relative("Tomorrow", today), Some(day(2024, 5, 16)));
        assert_eq!(parse_due_relative("in 3d", today), Some(day(2024, 5, 18)));
        assert_eq!(parse_due_relative("in 2w", today), Some(day(2024, 5, 29)));
        assert_eq!(parse_due_relative("fri", today), Some(day(2024, 5, 17)));
        assert_eq!(parse_due_relative("wednesday", today), Some(today));
        assert_eq!(parse_due_relative("next monday", today), Some(day(2024, 5, 27)));
        assert_eq!(parse_due_relative("this friday", today), Some(day(2024, 5, 17)));
        assert_eq!(parse_due_relative("weekend", today), Some(day(2024, 5, 18)));
        assert_eq!(parse_due_relative("eow", today), Some(day(2024, 5, 19)));
        assert_eq!(parse_due_relative("eom", day(2024, 12, 3)), Some(day(2024, 12, 31)));
        assert_eq!(parse_due_relative("2024-07-01", today), Some(day(2024, 7, 1)));
        assert_eq!(parse_due_relative("someday", today), None);
    }

    #[test]
    fn test_parse_due_relative_out_of_range() {
        let today = day(2024, 5, 15);
        assert_eq!(parse_due_relative("in 999999999999d", today), None);
        assert_eq!(parse_due_relative("in 9223372036854775807m", today), None);
        assert_eq!(parse_due_relative("in 9223372036854775807w", today), None);
        assert_eq!(parse_due_relative("in -2d", today), Some(day(2024, 5, 13)));
        assert_eq!(parse_due_relative("tomorrow", NaiveDate::MAX), None);
        assert_eq!(parse_due_relative("yesterday", NaiveDate::MIN), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = day(2024, 5, 15);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(day(2024, 5, 16)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(day(2024, 5, 20)), today), "in 5d");
        assert_eq!(format_due_relative(Some(day(2024, 5, 13)), today), "2d late");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Shopping list", 8), "Shoppin…");
    }
}
