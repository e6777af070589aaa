//! Edit Scripts
//!
//! The minimal set of delete/insert operations turning an observed
//! ordering into the desired one, plus a human-readable preview.

use crate::lcs::lcs_matches;

/// One row of a remote ordered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    /// Remote row id, the handle for delete and reposition calls
    pub item_id: String,

    /// Stable id of the entity the row points at (e.g. a video id)
    pub external_id: String,
}

impl CollectionItem {
    pub fn new(item_id: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            external_id: external_id.into(),
        }
    }
}

/// A single reconciliation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Remove one observed row. Deletes are keyed by row id, so
    /// duplicate external ids remove exactly the superfluous rows.
    Delete {
        item_id: String,
        external_id: String,
    },

    /// Insert `external_id` so it lands at `position` in the final
    /// order. Position equals the element's index in the desired
    /// sequence: everything before it is either matched or inserted
    /// earlier by this same script.
    Insert {
        external_id: String,
        position: usize,
    },
}

/// Ordered edit script: all deletes first, then inserts left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Render the script as human-readable operation lines, one per
    /// op, without executing anything.
    pub fn render(&self) -> Vec<String> {
        self.ops
            .iter()
            .map(|op| match op {
                EditOp::Delete {
                    item_id,
                    external_id,
                } => format!("delete {external_id:?} (item {item_id})"),
                EditOp::Insert {
                    external_id,
                    position,
                } => format!("insert {external_id:?} at position {position}"),
            })
            .collect()
    }
}

/// Compute the minimal order-preserving edit script turning `observed`
/// into `desired`.
///
/// Equal sequences short-circuit to an empty script before any LCS
/// work; callers can rely on a true no-op.
pub fn compute_script(desired: &[String], observed: &[CollectionItem]) -> EditScript {
    let desired_ids: Vec<&str> = desired.iter().map(String::as_str).collect();
    let observed_ids: Vec<&str> = observed.iter().map(|it| it.external_id.as_str()).collect();

    if desired_ids == observed_ids {
        return EditScript::default();
    }

    let mut matched_desired = vec![false; desired.len()];
    let mut matched_observed = vec![false; observed.len()];
    for (i, j) in lcs_matches(&desired_ids, &observed_ids) {
        matched_desired[i] = true;
        matched_observed[j] = true;
    }

    let mut ops = Vec::new();
    for (j, item) in observed.iter().enumerate() {
        if !matched_observed[j] {
            ops.push(EditOp::Delete {
                item_id: item.item_id.clone(),
                external_id: item.external_id.clone(),
            });
        }
    }
    for (i, external_id) in desired.iter().enumerate() {
        if !matched_desired[i] {
            ops.push(EditOp::Insert {
                external_id: external_id.clone(),
                position: i,
            });
        }
    }

    EditScript { ops }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn observed(pairs: &[(&str, &str)]) -> Vec<CollectionItem> {
        pairs
            .iter()
            .map(|&(item_id, external_id)| CollectionItem::new(item_id, external_id))
            .collect()
    }

    #[test]
    fn test_substitution_deletes_then_inserts() {
        let script = compute_script(
            &ids(&["a", "b", "c"]),
            &observed(&[("r1", "a"), ("r2", "x"), ("r3", "c")]),
        );

        assert_eq!(
            script.ops(),
            &[
                EditOp::Delete {
                    item_id: "r2".to_string(),
                    external_id: "x".to_string(),
                },
                EditOp::Insert {
                    external_id: "b".to_string(),
                    position: 1,
                },
            ]
        );
    }

    #[test]
    fn test_empty_desired_deletes_everything() {
        let script = compute_script(&[], &observed(&[("r1", "p"), ("r2", "q")]));

        let deletes: Vec<_> = script
            .ops()
            .iter()
            .filter(|op| matches!(op, EditOp::Delete { .. }))
            .collect();
        assert_eq!(deletes.len(), 2);
        assert_eq!(script.len(), 2);
    }

    #[test]
    fn test_equal_sequences_yield_empty_script() {
        let desired = ids(&["a", "b", "c"]);
        let obs = observed(&[("r1", "a"), ("r2", "b"), ("r3", "c")]);

        let script = compute_script(&desired, &obs);
        assert!(script.is_empty());
    }

    #[test]
    fn test_append_only_inserts_at_tail_positions() {
        let script = compute_script(
            &ids(&["a", "b", "c", "d"]),
            &observed(&[("r1", "a"), ("r2", "b")]),
        );

        assert_eq!(
            script.ops(),
            &[
                EditOp::Insert {
                    external_id: "c".to_string(),
                    position: 2,
                },
                EditOp::Insert {
                    external_id: "d".to_string(),
                    position: 3,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_external_ids_delete_the_right_row() {
        // Two rows point at "a"; only the second is superfluous.
        let script = compute_script(
            &ids(&["a", "b"]),
            &observed(&[("r1", "a"), ("r2", "a"), ("r3", "b")]),
        );

        assert_eq!(
            script.ops(),
            &[EditOp::Delete {
                item_id: "r2".to_string(),
                external_id: "a".to_string(),
            }]
        );
    }

    #[test]
    fn test_reorder_moves_the_minority_element() {
        let script = compute_script(
            &ids(&["b", "c", "a"]),
            &observed(&[("r1", "a"), ("r2", "b"), ("r3", "c")]),
        );

        assert_eq!(
            script.ops(),
            &[
                EditOp::Delete {
                    item_id: "r1".to_string(),
                    external_id: "a".to_string(),
                },
                EditOp::Insert {
                    external_id: "a".to_string(),
                    position: 2,
                },
            ]
        );
    }

    #[test]
    fn test_render_is_one_line_per_op() {
        let script = compute_script(
            &ids(&["a", "b"]),
            &observed(&[("r1", "a"), ("r2", "x")]),
        );

        assert_eq!(
            script.render(),
            vec![
                "delete \"x\" (item r2)".to_string(),
                "insert \"b\" at position 1".to_string(),
            ]
        );
    }
}
