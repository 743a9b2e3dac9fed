//! Pure list operations behind the dashboard.
//!
//! The store applies these under its write lock; they never fail and never
//! look at anything but their arguments.

use serde::Serialize;

use crate::models::letter::{CoverLetterRecord, LetterStatus};

/// Dashboard counters, always computed over the full list (not the search view).
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub generated: usize,
    pub drafts: usize,
}

/// `[record, ...letters]` — newest first, no validation, no dedup.
pub fn save(mut letters: Vec<CoverLetterRecord>, record: CoverLetterRecord) -> Vec<CoverLetterRecord> {
    letters.insert(0, record);
    letters
}

/// Removes every record whose id equals `id`; the rest keep their order.
pub fn delete(mut letters: Vec<CoverLetterRecord>, id: &str) -> Vec<CoverLetterRecord> {
    letters.retain(|letter| letter.id != id);
    letters
}

/// Case-insensitive substring search over title, company and position.
/// An empty query matches everything.
pub fn filter<'a>(letters: &'a [CoverLetterRecord], query: &str) -> Vec<&'a CoverLetterRecord> {
    let needle = query.to_lowercase();
    letters
        .iter()
        .filter(|letter| {
            letter.title.to_lowercase().contains(&needle)
                || letter.company_name.to_lowercase().contains(&needle)
                || letter.position.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn summarize(letters: &[CoverLetterRecord]) -> Summary {
    Summary {
        total: letters.len(),
        generated: letters
            .iter()
            .filter(|l| l.status == LetterStatus::Generated)
            .count(),
        drafts: letters
            .iter()
            .filter(|l| l.status == LetterStatus::Draft)
            .count(),
    }
}

/// Time-derived id: epoch milliseconds, bumped until it is unused in `letters`.
pub fn next_id(letters: &[CoverLetterRecord], now_millis: i64) -> String {
    let mut candidate = now_millis;
    loop {
        let id = candidate.to_string();
        if !letters.iter().any(|l| l.id == id) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::letter::letter_title;

    fn record(id: &str, position: &str, company: &str, status: LetterStatus) -> CoverLetterRecord {
        CoverLetterRecord {
            id: id.to_string(),
            title: letter_title(position, company),
            company_name: company.to_string(),
            position: position.to_string(),
            content: "Sample cover letter content...".to_string(),
            created_at: Utc::now(),
            status,
            form_data: None,
        }
    }

    fn ids(letters: &[CoverLetterRecord]) -> Vec<&str> {
        letters.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_save_prepends() {
        let list = vec![
            record("1", "Software Engineer", "TechCorp", LetterStatus::Generated),
            record("2", "Product Manager", "StartupXYZ", LetterStatus::Draft),
        ];
        let saved = save(list, record("3", "Designer", "Acme", LetterStatus::Generated));
        assert_eq!(ids(&saved), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_save_does_not_dedupe() {
        let list = vec![record("1", "A", "B", LetterStatus::Draft)];
        let saved = save(list, record("1", "C", "D", LetterStatus::Generated));
        assert_eq!(ids(&saved), vec!["1", "1"]);
        assert_eq!(saved[0].position, "C");
    }

    #[test]
    fn test_delete_removes_all_matches_and_keeps_order() {
        let list = vec![
            record("a", "P", "C", LetterStatus::Draft),
            record("x", "P", "C", LetterStatus::Draft),
            record("b", "P", "C", LetterStatus::Draft),
            record("x", "P", "C", LetterStatus::Draft),
            record("c", "P", "C", LetterStatus::Draft),
        ];
        let remaining = delete(list, "x");
        assert_eq!(ids(&remaining), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let list = vec![record("1", "P", "C", LetterStatus::Draft)];
        let remaining = delete(list.clone(), "missing");
        assert_eq!(remaining, list);
    }

    #[test]
    fn test_filter_is_case_insensitive_over_three_fields() {
        let list = vec![
            record("1", "Software Engineer", "TechCorp", LetterStatus::Generated),
            record("2", "Product Manager", "StartupXYZ", LetterStatus::Draft),
        ];

        assert_eq!(filter(&list, "xyz").len(), 1);
        assert_eq!(filter(&list, "TECHCORP")[0].id, "1");
        assert_eq!(filter(&list, "manager")[0].id, "2");
        assert_eq!(filter(&list, " at ").len(), 2, "title contains ' at '");
        assert!(filter(&list, "nothing like this").is_empty());
    }

    #[test]
    fn test_empty_query_returns_full_list_in_order() {
        let list = vec![
            record("1", "A", "B", LetterStatus::Generated),
            record("2", "C", "D", LetterStatus::Draft),
        ];
        let all = filter(&list, "");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "1");
        assert_eq!(all[1].id, "2");
    }

    #[test]
    fn test_summarize_counts_by_status() {
        let list = vec![
            record("1", "A", "B", LetterStatus::Generated),
            record("2", "A", "B", LetterStatus::Draft),
            record("3", "A", "B", LetterStatus::Generated),
            record("4", "A", "B", LetterStatus::Edited),
        ];
        assert_eq!(
            summarize(&list),
            Summary {
                total: 4,
                generated: 2,
                drafts: 1
            }
        );
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_next_id_skips_taken_ids() {
        let list = vec![
            record("1000", "A", "B", LetterStatus::Generated),
            record("1001", "A", "B", LetterStatus::Generated),
        ];
        assert_eq!(next_id(&list, 1000), "1002");
        assert_eq!(next_id(&list, 5), "5");
    }
}
