//! Transaction grouping: partition a batch by a correlation field and
//! summarize every flattened path per group.
//!
//! A group is a view recomputed fully from its member events on every
//! grouping call; nothing here persists across calls. Groups keep the
//! order their correlation value first appeared in the batch, members keep
//! batch order, and summary paths keep the order they were first
//! introduced across members.

use log::debug;
use std::collections::HashMap;

use crate::parser::access::get_field_str;
use crate::parser::event::{display_value, Event};
use crate::parser::flatten::flatten_event;
use crate::utils::config::UNGROUPED_BUCKET;

/// Per-path record of the distinct values observed within one group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSummary {
    /// Distinct display-coerced values, in order of first appearance
    pub values: Vec<String>,

    /// Total occurrences of the path across member events
    pub occurrences: u64,
}

impl PathSummary {
    /// Number of distinct values seen at this path
    pub fn distinct_count(&self) -> usize {
        self.values.len()
    }

    /// Whether more than one distinct value was seen.
    ///
    /// Drives the "N unique values" rendering and highlighting.
    pub fn is_multi_valued(&self) -> bool {
        self.values.len() > 1
    }

    fn record(&mut self, value: String) {
        self.occurrences += 1;
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }
}

/// Ordered mapping from flattened path to its value summary.
///
/// Paths iterate in the union of first-appearance order across member
/// events: a path is positioned by the earliest member that contains it.
#[derive(Debug, Clone, Default)]
pub struct FieldSummary {
    entries: Vec<(String, PathSummary)>,
    index: HashMap<String, usize>,
}

impl FieldSummary {
    fn record(&mut self, path: String, value: String) {
        match self.index.get(&path) {
            Some(&at) => self.entries[at].1.record(value),
            None => {
                let mut summary = PathSummary::default();
                summary.record(value);
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, summary));
            }
        }
    }

    /// Iterate paths and their summaries in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathSummary)> {
        self.entries.iter().map(|(path, summary)| (path.as_str(), summary))
    }

    /// Look up one path's summary
    pub fn get(&self, path: &str) -> Option<&PathSummary> {
        self.index.get(path).map(|&at| &self.entries[at].1)
    }

    /// Number of distinct paths in the summary
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the summary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All events sharing one correlation value, plus their field summary
#[derive(Debug, Clone, Default)]
pub struct TransactionGroup {
    /// Correlation value identifying the group
    pub key: String,

    /// Member events, in batch order
    pub members: Vec<Event>,

    /// Per-path summary folded from every member
    pub summary: FieldSummary,
}

impl TransactionGroup {
    /// Paths whose single distinct value occurs in every member event.
    ///
    /// **Public** - the "shared values" view: within a transaction these
    /// are the fields that tie the members together
    pub fn shared_values(&self) -> Vec<(&str, &str)> {
        let member_count = self.members.len() as u64;
        self.summary
            .iter()
            .filter(|(_, summary)| {
                summary.distinct_count() == 1 && summary.occurrences == member_count
            })
            .map(|(path, summary)| (path, summary.values[0].as_str()))
            .collect()
    }
}

/// Result of grouping one batch: groups in first-appearance order.
///
/// Events whose correlation field is absent are never dropped; they are
/// collected under the `"(ungrouped)"` bucket, which takes its position
/// from the first keyless event like any other group.
#[derive(Debug, Clone, Default)]
pub struct Transactions {
    groups: Vec<TransactionGroup>,
    index: HashMap<String, usize>,
}

impl Transactions {
    /// Iterate groups in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = &TransactionGroup> {
        self.groups.iter()
    }

    /// Look up a group by correlation value
    pub fn get(&self, key: &str) -> Option<&TransactionGroup> {
        self.index.get(key).map(|&at| &self.groups[at])
    }

    /// Number of groups, including the ungrouped bucket if present
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no groups were formed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total members across all groups; equals the input batch size
    pub fn total_members(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    fn push_member(&mut self, key: String, event: Event) {
        match self.index.get(&key) {
            Some(&at) => self.groups[at].members.push(event),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(TransactionGroup {
                    key,
                    members: vec![event],
                    summary: FieldSummary::default(),
                });
            }
        }
    }
}

/// Group a batch of events by a correlation field.
///
/// **Public** - main entry point for transaction grouping
///
/// # Algorithm
/// 1. Partition events in input order by the display-coerced value of
///    `key_field`; absent keys land in the ungrouped bucket
/// 2. For each group, flatten every member and fold the (path, value)
///    pairs into the group's [`FieldSummary`]: distinct values (by display
///    form) accumulate in first-appearance order, occurrences count every
///    emission
///
/// Grouping never fails: an event whose raw payload did not decode simply
/// contributes its payload string as one scalar leaf.
pub fn group_by_transaction(events: &[Event], key_field: &str) -> Transactions {
    let mut transactions = Transactions::default();

    for event in events {
        let key = get_field_str(event, key_field)
            .unwrap_or_else(|| UNGROUPED_BUCKET.to_string());
        transactions.push_member(key, event.clone());
    }

    for group in transactions.groups.iter_mut() {
        for member in &group.members {
            for (path, value) in flatten_event(member) {
                group.summary.record(path, display_value(&value));
            }
        }
    }

    debug!(
        "Grouped {} events by '{}' into {} transactions",
        events.len(),
        key_field,
        transactions.len()
    );

    transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> Event {
        value.as_object().expect("test event must be an object").clone()
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let events = vec![
            event(json!({"tid": "B", "n": 1})),
            event(json!({"tid": "A", "n": 2})),
            event(json!({"tid": "B", "n": 3})),
        ];

        let transactions = group_by_transaction(&events, "tid");

        let keys: Vec<&str> = transactions.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(transactions.get("B").unwrap().members.len(), 2);
        assert_eq!(transactions.get("A").unwrap().members.len(), 1);
    }

    #[test]
    fn test_multi_value_detection() {
        let events = vec![
            event(json!({"tid": "X", "status": 200})),
            event(json!({"tid": "X", "status": 500})),
        ];

        let transactions = group_by_transaction(&events, "tid");

        assert_eq!(transactions.len(), 1);
        let group = transactions.get("X").unwrap();
        let status = group.summary.get("status").unwrap();
        assert_eq!(status.distinct_count(), 2);
        assert!(status.is_multi_valued());
        assert_eq!(status.occurrences, 2);
        assert_eq!(status.values, vec!["200", "500"]);
    }

    #[test]
    fn test_mixed_types_fold_after_coercion() {
        let events = vec![
            event(json!({"tid": "X", "status": 200})),
            event(json!({"tid": "X", "status": "200"})),
        ];

        let transactions = group_by_transaction(&events, "tid");

        let status = transactions.get("X").unwrap().summary.get("status").unwrap();
        assert_eq!(status.distinct_count(), 1);
        assert!(!status.is_multi_valued());
        assert_eq!(status.occurrences, 2);
    }

    #[test]
    fn test_grouping_completeness_with_ungrouped() {
        let events = vec![
            event(json!({"tid": "A"})),
            event(json!({"other": 1})),
            event(json!({"tid": "B"})),
            event(json!({})),
        ];

        let transactions = group_by_transaction(&events, "tid");

        assert_eq!(transactions.total_members(), events.len());
        let keys: Vec<&str> = transactions.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["A", UNGROUPED_BUCKET, "B"]);
        assert_eq!(transactions.get(UNGROUPED_BUCKET).unwrap().members.len(), 2);
    }

    #[test]
    fn test_summary_paths_from_nested_members() {
        let events = vec![
            event(json!({"tid": "T", "req": {"path": "/a", "hdr": {"ua": "curl"}}})),
            event(json!({"tid": "T", "req": {"path": "/b"}, "tags": ["x", "y"]})),
        ];

        let transactions = group_by_transaction(&events, "tid");
        let group = transactions.get("T").unwrap();

        // paths ordered by the earliest member that introduced them
        let paths: Vec<&str> = group.summary.iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec!["tid", "req.path", "req.hdr.ua", "tags[0]", "tags[1]"]
        );

        let path = group.summary.get("req.path").unwrap();
        assert_eq!(path.values, vec!["/a", "/b"]);
        assert!(path.is_multi_valued());

        let ua = group.summary.get("req.hdr.ua").unwrap();
        assert_eq!(ua.occurrences, 1);
        assert!(!ua.is_multi_valued());
    }

    #[test]
    fn test_undecoded_payload_stays_single_leaf() {
        let events = vec![
            event(json!({"tid": "T", "_raw": "{broken json"})),
            event(json!({"tid": "T", "_raw": "{also broken"})),
        ];

        let transactions = group_by_transaction(&events, "tid");
        let group = transactions.get("T").unwrap();

        let raw = group.summary.get("_raw").unwrap();
        assert_eq!(raw.distinct_count(), 2);
        assert_eq!(raw.occurrences, 2);
    }

    #[test]
    fn test_shared_values() {
        let events = vec![
            event(json!({"tid": "T", "env": "prod", "status": 200})),
            event(json!({"tid": "T", "env": "prod", "status": 500})),
        ];

        let transactions = group_by_transaction(&events, "tid");
        let shared = transactions.get("T").unwrap().shared_values();

        assert!(shared.contains(&("tid", "T")));
        assert!(shared.contains(&("env", "prod")));
        assert!(!shared.iter().any(|(path, _)| *path == "status"));
    }

    #[test]
    fn test_numeric_correlation_values_coerce() {
        let events = vec![
            event(json!({"tid": 7, "n": 1})),
            event(json!({"tid": "7", "n": 2})),
        ];

        let transactions = group_by_transaction(&events, "tid");

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions.get("7").unwrap().members.len(), 2);
    }

    #[test]
    fn test_groups_are_recomputed_views() {
        let events = vec![event(json!({"tid": "A", "x": 1}))];

        let first = group_by_transaction(&events, "tid");
        let second = group_by_transaction(&events, "tid");

        assert_eq!(first.len(), second.len());
        let a = first.get("A").unwrap().summary.get("x").unwrap();
        let b = second.get("A").unwrap().summary.get("x").unwrap();
        assert_eq!(a, b);
    }
}
