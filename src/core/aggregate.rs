//! Summary counts and grouped counts for charts

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::core::dates::format_date;
use crate::core::record::{Field, Record, Status};

/// Total / completed / pending tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut summary = Summary::default();
        for record in records {
            summary.total += 1;
            match record.status() {
                Status::Completed => summary.completed += 1,
                Status::Pending => summary.pending += 1,
            }
        }
        summary
    }

    /// Completed share in percent, `None` for an empty set
    pub fn completion_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.completed as f64 / self.total as f64 * 100.0)
        }
    }
}

/// One group of a grouped count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    /// Grouping value (ISO date for date groups)
    pub key: String,
    /// Display label
    pub label: String,
    pub count: usize,
}

/// Count records per distinct value of `field`
///
/// Records with no value are left out. Text groups come most frequent
/// first, ties in order of first appearance; date groups come in
/// chronological order labelled with `date_pattern`.
pub fn group_counts<'a, I>(records: I, field: Field, date_pattern: &str) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    match field {
        Field::Employee => text_groups(records.into_iter().map(|r| r.employee.as_str())),
        Field::Course => text_groups(records.into_iter().map(|r| r.course.as_str())),
        Field::CompletionDate => date_groups(
            records.into_iter().filter_map(|r| r.completion_date),
            date_pattern,
        ),
    }
}

/// Summary per distinct value of `field`
///
/// Same exclusion and ordering rules as [`group_counts`]: text groups come
/// largest first, date groups are keyed by ISO date in chronological order.
pub fn summaries_by<'a, I>(records: I, field: Field) -> Vec<(String, Summary)>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: Vec<(String, Summary)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let value = match field {
            Field::Employee => record.employee.clone(),
            Field::Course => record.course.clone(),
            Field::CompletionDate => record
                .completion_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        };
        if value.is_empty() {
            continue;
        }
        let slot = *index.entry(value.clone()).or_insert_with(|| {
            groups.push((value, Summary::default()));
            groups.len() - 1
        });
        let summary = &mut groups[slot].1;
        summary.total += 1;
        match record.status() {
            Status::Completed => summary.completed += 1,
            Status::Pending => summary.pending += 1,
        }
    }

    match field {
        Field::CompletionDate => groups.sort_by(|a, b| a.0.cmp(&b.0)),
        _ => groups.sort_by(|a, b| b.1.total.cmp(&a.1.total)),
    }
    groups
}

fn text_groups<'a>(values: impl Iterator<Item = &'a str>) -> Vec<GroupCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for value in values.filter(|v| !v.is_empty()) {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut groups: Vec<GroupCount> = order
        .into_iter()
        .map(|v| GroupCount {
            key: v.to_string(),
            label: v.to_string(),
            count: counts[v],
        })
        .collect();
    // Stable sort keeps first-appearance order among ties
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

fn date_groups(dates: impl Iterator<Item = NaiveDate>, pattern: &str) -> Vec<GroupCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in dates {
        *counts.entry(date).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| GroupCount {
            key: date.to_string(),
            label: format_date(Some(date), pattern),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dates::DEFAULT_DISPLAY_FORMAT;

    fn rec(employee: &str, course: &str, date: Option<(i32, u32, u32)>) -> Record {
        Record::new(
            employee,
            course,
            date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }

    fn pairs(groups: &[GroupCount]) -> Vec<(&str, usize)> {
        groups.iter().map(|g| (g.label.as_str(), g.count)).collect()
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            rec("Ana", "A", Some((2024, 1, 1))),
            rec("Bob", "A", None),
            rec("Caio", "B", Some((2024, 1, 2))),
        ];
        let summary = Summary::of(&records);
        assert_eq!(
            summary,
            Summary {
                total: 3,
                completed: 2,
                pending: 1
            }
        );
        assert!(summary.completion_rate().unwrap() > 66.0);
        assert_eq!(Summary::default().completion_rate(), None);
    }

    #[test]
    fn test_group_by_employee_frequency_descending() {
        let records = vec![rec("Ana", "A", None), rec("Ana", "B", None), rec("Bob", "A", None)];
        let groups = group_counts(&records, Field::Employee, DEFAULT_DISPLAY_FORMAT);
        assert_eq!(pairs(&groups), vec![("Ana", 2), ("Bob", 1)]);
    }

    #[test]
    fn test_group_ties_keep_first_appearance() {
        let records = vec![
            rec("Zed", "Z", None),
            rec("Ana", "A", None),
            rec("Bob", "B", None),
            rec("Bob", "B", None),
        ];
        let groups = group_counts(&records, Field::Course, DEFAULT_DISPLAY_FORMAT);
        assert_eq!(pairs(&groups), vec![("B", 2), ("Z", 1), ("A", 1)]);
    }

    #[test]
    fn test_group_excludes_empty_values() {
        let records = vec![rec("", "A", None), rec("Ana", "", None)];
        let by_employee = group_counts(&records, Field::Employee, DEFAULT_DISPLAY_FORMAT);
        assert_eq!(pairs(&by_employee), vec![("Ana", 1)]);
        let by_date = group_counts(&records, Field::CompletionDate, DEFAULT_DISPLAY_FORMAT);
        assert!(by_date.is_empty());
    }

    #[test]
    fn test_summaries_by_course() {
        let records = vec![
            rec("Ana", "NR-10", Some((2024, 1, 1))),
            rec("Bob", "NR-35", None),
            rec("Caio", "NR-35", Some((2024, 2, 1))),
            rec("Dan", "", None),
        ];
        let by_course = summaries_by(&records, Field::Course);
        assert_eq!(by_course.len(), 2);
        assert_eq!(by_course[0].0, "NR-35");
        assert_eq!(
            by_course[0].1,
            Summary {
                total: 2,
                completed: 1,
                pending: 1
            }
        );
        assert_eq!(by_course[1].0, "NR-10");
    }

    #[test]
    fn test_summaries_by_date_are_chronological() {
        let records = vec![
            rec("Ana", "A", Some((2024, 3, 5))),
            rec("Bob", "A", Some((2023, 12, 31))),
            rec("Caio", "B", Some((2024, 3, 5))),
            rec("Dan", "B", None),
        ];
        let by_date = summaries_by(&records, Field::CompletionDate);
        let keys: Vec<&str> = by_date.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2023-12-31", "2024-03-05"]);
        assert_eq!(by_date[1].1.total, 2);
    }

    #[test]
    fn test_group_by_date_is_chronological() {
        let records = vec![
            rec("Ana", "A", Some((2024, 3, 5))),
            rec("Bob", "A", Some((2023, 12, 31))),
            rec("Caio", "A", Some((2024, 3, 5))),
            rec("Dan", "A", None),
        ];
        let groups = group_counts(&records, Field::CompletionDate, DEFAULT_DISPLAY_FORMAT);
        assert_eq!(pairs(&groups), vec![("31/12/2023", 1), ("05/03/2024", 2)]);
        assert_eq!(groups[0].key, "2023-12-31");
    }
}
