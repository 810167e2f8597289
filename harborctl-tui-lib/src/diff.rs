use std::collections::BTreeMap;

use crossterm::style::Stylize;
use serde_json::Value;

use crate::table::format_table;

#[derive(Clone, Debug, PartialEq)]
pub enum DiffKind {
    Added,
    Changed { old: Value },
    Unchanged,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiffEntry {
    pub key: String,
    pub value: Value,
    pub kind: DiffKind,
}

/// Compare a desired key/value map against the current one. Keys only
/// present in `current` are out of scope: the caller pushes partial
/// updates, it never deletes settings.
pub fn diff_maps(
    current: &BTreeMap<String, Value>,
    desired: &BTreeMap<String, Value>,
) -> Vec<DiffEntry> {
    desired
        .iter()
        .map(|(key, value)| {
            let kind = match current.get(key) {
                None => DiffKind::Added,
                Some(old) if old != value => DiffKind::Changed {
                    old: old.clone(),
                },
                Some(_) => DiffKind::Unchanged,
            };

            DiffEntry {
                key: key.clone(),
                value: value.clone(),
                kind,
            }
        })
        .collect()
}

/// The subset of entries that would actually modify the server.
pub fn pending_changes(
    entries: &[DiffEntry],
) -> BTreeMap<String, Value> {
    entries
        .iter()
        .filter(|entry| entry.kind != DiffKind::Unchanged)
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the comparison as aligned table lines, one row per pending
/// change, followed by a summary line.
pub fn render_diff(entries: &[DiffEntry]) -> Vec<String> {
    let mut rows = vec![];
    let mut added = 0;
    let mut changed = 0;
    let mut unchanged = 0;

    for entry in entries {
        match &entry.kind {
            DiffKind::Added => {
                added += 1;
                rows.push(format!(
                    "{} {}\t{}\t{}",
                    "+".green(),
                    entry.key.as_str().green(),
                    "-",
                    render_value(&entry.value),
                ));
            }
            DiffKind::Changed { old } => {
                changed += 1;
                rows.push(format!(
                    "{} {}\t{}\t{}",
                    "~".cyan(),
                    entry.key.as_str().cyan(),
                    render_value(old),
                    render_value(&entry.value),
                ));
            }
            DiffKind::Unchanged => unchanged += 1,
        }
    }

    let mut lines = format_table(&rows);
    lines.push(format!(
        "{added} added, {changed} changed, {unchanged} unchanged"
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn classifies_added_changed_unchanged() {
        let current = map(&[
            ("token_expiration", json!(30)),
            ("read_only", json!(false)),
        ]);
        let desired = map(&[
            ("token_expiration", json!(45)),
            ("read_only", json!(false)),
            ("project_creation_restriction", json!("adminonly")),
        ]);

        let entries = diff_maps(&current, &desired);
        assert_eq!(entries.len(), 3);

        let by_key: BTreeMap<&str, &DiffKind> = entries
            .iter()
            .map(|e| (e.key.as_str(), &e.kind))
            .collect();

        assert_eq!(
            by_key["project_creation_restriction"],
            &DiffKind::Added
        );
        assert_eq!(
            by_key["token_expiration"],
            &DiffKind::Changed { old: json!(30) }
        );
        assert_eq!(by_key["read_only"], &DiffKind::Unchanged);
    }

    #[test]
    fn pending_changes_skip_unchanged_keys() {
        let current = map(&[("read_only", json!(false))]);
        let desired = map(&[
            ("read_only", json!(false)),
            ("token_expiration", json!(45)),
        ]);

        let pending = pending_changes(&diff_maps(&current, &desired));
        assert_eq!(pending, map(&[("token_expiration", json!(45))]));
    }

    #[test]
    fn keys_only_in_current_are_ignored() {
        let current = map(&[
            ("read_only", json!(false)),
            ("token_expiration", json!(30)),
        ]);
        let desired = map(&[("read_only", json!(true))]);

        let entries = diff_maps(&current, &desired);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "read_only");
    }

    #[test]
    fn summary_counts_every_class() {
        let current = map(&[
            ("a", json!(1)),
            ("b", json!(2)),
        ]);
        let desired = map(&[
            ("a", json!(1)),
            ("b", json!(3)),
            ("c", json!("new")),
        ]);

        let lines = render_diff(&diff_maps(&current, &desired));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("1 added, 1 changed, 1 unchanged")
        );
        // One row per pending change plus the summary.
        assert_eq!(lines.len(), 3);
    }
}
