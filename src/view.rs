//! Derived task view: filtering and sorting for display.
//!
//! Nothing here mutates the task collection; every call builds a fresh,
//! ordered list of references. Sorting is stable over the collection's
//! insertion order, so identical inputs always give identical output.

use std::cmp::Ordering;

use crate::fields::{Priority, SortKey};
use crate::task::Task;

/// Filter and sort the tasks for display.
///
/// A task passes when it matches `category` (if given and non-empty) and
/// `priority` (if given).
pub fn derive_view<'a>(
    tasks: &'a [Task],
    category: Option<&str>,
    priority: Option<Priority>,
    sort: SortKey,
) -> Vec<&'a Task> {
    let category = category.filter(|c| !c.is_empty());
    let mut view: Vec<&Task> = tasks
        .iter()
        .filter(|t| {
            if let Some(c) = category {
                if t.category != c {
                    return false;
                }
            }
            if let Some(p) = priority {
                if t.priority != p {
                    return false;
                }
            }
            true
        })
        .collect();

    match sort {
        // Missing timestamps compare lowest, which puts them last here.
        SortKey::Date => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Priority => view.sort_by_key(|t| t.priority.rank()),
        SortKey::Title => view.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }
    view
}

/// Current filter and sort selections of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub sort: SortKey,
}

impl ViewFilter {
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        derive_view(tasks, self.category.as_deref(), self.priority, self.sort)
    }

    /// Back to no restriction, sorted by date.
    pub fn clear(&mut self) {
        *self = ViewFilter::default();
    }

    /// True if any filter restricts the view.
    pub fn is_active(&self) -> bool {
        self.category.as_deref().is_some_and(|c| !c.is_empty()) || self.priority.is_some()
    }
}

/// Collation-style title comparison.
///
/// Letters compare case- and accent-insensitively first, then by accent, then
/// lowercase before uppercase, then by raw code points so the order is total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn primary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .map(fold_accent)
}

fn secondary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

// Lowercase Latin-1 and Latin Extended-A letters to their base letter.
fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'æ' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' | 'œ' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' | 'ß' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn task(id: u64, title: &str, category: &str, priority: Priority, created: Option<DateTime<Utc>>) -> Task {
        Task {
            id,
            title: title.into(),
            description: String::new(),
            category: category.into(),
            priority,
            due_date: None,
            completed: false,
            created_at: created,
            tags: Vec::new(),
        }
    }

    fn at(hour: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap())
    }

    fn ids(view: &[&Task]) -> Vec<u64> {
        view.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_two_task_scenario() {
        let tasks = vec![
            task(1, "A", "Work", Priority::Low, at(1)),
            task(2, "B", "Work", Priority::High, at(2)),
        ];
        assert_eq!(ids(&derive_view(&tasks, None, None, SortKey::Date)), [2, 1]);
        assert_eq!(ids(&derive_view(&tasks, None, None, SortKey::Priority)), [2, 1]);
        assert_eq!(ids(&derive_view(&tasks, None, Some(Priority::Low), SortKey::Date)), [1]);
    }

    #[test]
    fn test_priority_sort_groups_by_rank() {
        let tasks = vec![
            task(1, "a", "", Priority::Low, at(1)),
            task(2, "b", "", Priority::Medium, at(2)),
            task(3, "c", "", Priority::High, at(3)),
            task(4, "d", "", Priority::Low, at(4)),
            task(5, "e", "", Priority::High, at(5)),
        ];
        assert_eq!(ids(&derive_view(&tasks, None, None, SortKey::Priority)), [3, 5, 2, 1, 4]);
    }

    #[test]
    fn test_missing_created_at_sorts_oldest() {
        let tasks = vec![
            task(1, "none", "", Priority::Medium, None),
            task(2, "old", "", Priority::Medium, at(1)),
            task(3, "new", "", Priority::Medium, at(9)),
        ];
        assert_eq!(ids(&derive_view(&tasks, None, None, SortKey::Date)), [3, 2, 1]);
    }

    #[test]
    fn test_category_filter() {
        let tasks = vec![
            task(1, "a", "Work", Priority::Low, at(1)),
            task(2, "b", "Home", Priority::Low, at(2)),
            task(3, "c", "Work", Priority::High, at(3)),
        ];
        assert_eq!(ids(&derive_view(&tasks, Some("Work"), None, SortKey::Date)), [3, 1]);
        assert_eq!(ids(&derive_view(&tasks, Some("Work"), Some(Priority::High), SortKey::Date)), [3]);
        assert!(derive_view(&tasks, Some("Garden"), None, SortKey::Date).is_empty());
        assert_eq!(derive_view(&tasks, Some(""), None, SortKey::Date).len(), 3);
        assert_eq!(derive_view(&tasks, None, None, SortKey::Date).len(), 3);
    }

    #[test]
    fn test_view_is_pure_and_deterministic() {
        let tasks = vec![
            task(1, "beta", "", Priority::Medium, at(3)),
            task(2, "Alpha", "", Priority::Medium, at(3)),
            task(3, "alpha", "", Priority::Low, None),
        ];
        let snapshot = tasks.clone();
        for sort in [SortKey::Date, SortKey::Priority, SortKey::Title] {
            let first = ids(&derive_view(&tasks, None, None, sort));
            let second = ids(&derive_view(&tasks, None, None, sort));
            assert_eq!(first, second);
        }
        assert_eq!(tasks, snapshot);
    }

    #[test]
    fn test_title_sort() {
        let tasks = vec![
            task(1, "cherry", "", Priority::Medium, None),
            task(2, "Banana", "", Priority::Medium, None),
            task(3, "apple", "", Priority::Medium, None),
            task(4, "Apple", "", Priority::Medium, None),
        ];
        assert_eq!(ids(&derive_view(&tasks, None, None, SortKey::Title)), [3, 4, 2, 1]);
    }

    #[test]
    fn test_compare_titles_collation() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("a", "A"), Ordering::Less);
        assert_eq!(compare_titles("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_titles("rest", "résumé"), Ordering::Less);
        assert_eq!(compare_titles("Çilek", "Cuma"), Ordering::Less);
        assert_eq!(compare_titles("Şeker", "Sut"), Ordering::Less);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_filter_state_clear() {
        let mut filter = ViewFilter {
            category: Some("Work".into()),
            priority: Some(Priority::High),
            sort: SortKey::Title,
        };
        assert!(filter.is_active());
        filter.clear();
        assert_eq!(filter, ViewFilter::default());
        assert!(!filter.is_active());
        assert_eq!(filter.sort, SortKey::Date);
    }
}
