//! # Playlist Reconciler
//!
//! Computes and applies edit scripts against the remote collection
//! API. Each reconciliation is strictly sequential internally; separate
//! collections touch disjoint remote state and may be reconciled
//! concurrently by the caller.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use transport_traits::error::Result as TransportResult;

use crate::error::{ReconcileError, Result};
use crate::script::{compute_script, CollectionItem, EditOp, EditScript};

/// Remote ordered-collection API, consumed as a black box.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// Current rows of the collection, in remote order.
    async fn list_items(&self, collection_id: &str) -> TransportResult<Vec<CollectionItem>>;

    /// Remove one row by its id.
    async fn delete_item(&self, item_id: &str) -> TransportResult<()>;

    /// Add a row for `external_id` and return the new row id. The
    /// provider ignores ordinal hints at create time, so the row lands
    /// at the tail.
    async fn insert_item(&self, collection_id: &str, external_id: &str) -> TransportResult<String>;

    /// Move an existing row to `position`.
    async fn update_item_position(&self, item_id: &str, position: usize) -> TransportResult<()>;
}

/// A computed reconciliation for one collection.
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    pub collection_id: String,
    pub script: EditScript,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.script.is_empty()
    }

    /// Human-readable preview of the pending operations.
    pub fn preview(&self) -> Vec<String> {
        self.script.render()
    }
}

/// Reconciles remote playlists against locally computed orderings.
pub struct PlaylistReconciler {
    api: Arc<dyn CollectionApi>,
}

impl PlaylistReconciler {
    pub fn new(api: Arc<dyn CollectionApi>) -> Self {
        Self { api }
    }

    /// Fetch the observed ordering fresh and compute the edit script.
    /// No mutation happens here; render the plan for preview mode, or
    /// hand it to [`apply`](Self::apply).
    #[instrument(skip(self, desired))]
    pub async fn plan(&self, collection_id: &str, desired: &[String]) -> Result<ReconcilePlan> {
        let observed =
            self.api
                .list_items(collection_id)
                .await
                .map_err(|source| ReconcileError::List {
                    collection_id: collection_id.to_string(),
                    source,
                })?;

        let script = compute_script(desired, &observed);
        debug!(
            observed = observed.len(),
            desired = desired.len(),
            ops = script.len(),
            "computed edit script"
        );

        Ok(ReconcilePlan {
            collection_id: collection_id.to_string(),
            script,
        })
    }

    /// Execute a plan.
    ///
    /// All deletes run strictly before any insert — interleaving them
    /// would let a pending delete shift the ordinal an insert was
    /// computed against. Inserts run in desired order, and every
    /// insert is immediately followed by a position correction on the
    /// newly created row, because the create call ignores ordinals.
    ///
    /// The first failed call aborts the remainder of this collection's
    /// script. Partial application is safe: rerunning `reconcile`
    /// recomputes from the then-current observed state.
    #[instrument(skip(self, plan), fields(collection_id = %plan.collection_id))]
    pub async fn apply(&self, plan: &ReconcilePlan) -> Result<()> {
        if plan.is_noop() {
            debug!("collection already in desired order");
            return Ok(());
        }

        for op in plan.script.ops() {
            if let EditOp::Delete {
                item_id,
                external_id,
            } = op
            {
                debug!(item_id = %item_id, external_id = %external_id, "deleting item");
                self.api
                    .delete_item(item_id)
                    .await
                    .map_err(|source| ReconcileError::Delete {
                        item_id: item_id.clone(),
                        external_id: external_id.clone(),
                        source,
                    })?;
            }
        }

        for op in plan.script.ops() {
            if let EditOp::Insert {
                external_id,
                position,
            } = op
            {
                debug!(external_id = %external_id, position, "inserting item");
                let item_id = self
                    .api
                    .insert_item(&plan.collection_id, external_id)
                    .await
                    .map_err(|source| ReconcileError::Insert {
                        external_id: external_id.clone(),
                        source,
                    })?;

                self.api
                    .update_item_position(&item_id, *position)
                    .await
                    .map_err(|source| ReconcileError::Reposition {
                        item_id: item_id.clone(),
                        position: *position,
                        source,
                    })?;
            }
        }

        info!(ops = plan.script.len(), "edit script applied");
        Ok(())
    }

    /// Plan and apply in one step, returning the plan that ran.
    pub async fn reconcile(
        &self,
        collection_id: &str,
        desired: &[String],
    ) -> Result<ReconcilePlan> {
        let plan = self.plan(collection_id, desired).await?;
        self.apply(&plan).await?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use transport_traits::error::TransportError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Delete(String),
        Insert(String),
        Reposition(String, usize),
    }

    /// Recording fake: answers from a fixed observed listing and logs
    /// every call so ordering can be asserted.
    struct RecordingApi {
        observed: Vec<CollectionItem>,
        calls: Mutex<Vec<Call>>,
        fail_deletes: bool,
        insert_counter: Mutex<usize>,
    }

    impl RecordingApi {
        fn new(observed: Vec<CollectionItem>) -> Arc<Self> {
            Arc::new(Self {
                observed,
                calls: Mutex::new(Vec::new()),
                fail_deletes: false,
                insert_counter: Mutex::new(0),
            })
        }

        fn failing_deletes(observed: Vec<CollectionItem>) -> Arc<Self> {
            Arc::new(Self {
                observed,
                calls: Mutex::new(Vec::new()),
                fail_deletes: true,
                insert_counter: Mutex::new(0),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn mutation_calls(&self) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| !matches!(c, Call::List))
                .collect()
        }
    }

    #[async_trait]
    impl CollectionApi for RecordingApi {
        async fn list_items(&self, _collection_id: &str) -> TransportResult<Vec<CollectionItem>> {
            self.calls.lock().unwrap().push(Call::List);
            Ok(self.observed.clone())
        }

        async fn delete_item(&self, item_id: &str) -> TransportResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Delete(item_id.to_string()));
            if self.fail_deletes {
                return Err(TransportError::Status {
                    status: 404,
                    detail: "row gone".to_string(),
                });
            }
            Ok(())
        }

        async fn insert_item(
            &self,
            _collection_id: &str,
            external_id: &str,
        ) -> TransportResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Insert(external_id.to_string()));
            let mut counter = self.insert_counter.lock().unwrap();
            *counter += 1;
            Ok(format!("new{}", counter))
        }

        async fn update_item_position(
            &self,
            item_id: &str,
            position: usize,
        ) -> TransportResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Reposition(item_id.to_string(), position));
            Ok(())
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn observed(pairs: &[(&str, &str)]) -> Vec<CollectionItem> {
        pairs
            .iter()
            .map(|&(item_id, external_id)| CollectionItem::new(item_id, external_id))
            .collect()
    }

    #[tokio::test]
    async fn test_substitution_runs_delete_insert_reposition() {
        let api = RecordingApi::new(observed(&[("r1", "a"), ("r2", "x"), ("r3", "c")]));
        let reconciler = PlaylistReconciler::new(api.clone());

        let plan = reconciler
            .reconcile("pl1", &ids(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(plan.script.len(), 2);
        assert_eq!(
            api.calls(),
            vec![
                Call::List,
                Call::Delete("r2".to_string()),
                Call::Insert("b".to_string()),
                Call::Reposition("new1".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_identical_ordering_makes_no_mutation_calls() {
        let api = RecordingApi::new(observed(&[("r1", "a"), ("r2", "b")]));
        let reconciler = PlaylistReconciler::new(api.clone());

        let plan = reconciler.reconcile("pl1", &ids(&["a", "b"])).await.unwrap();

        assert!(plan.is_noop());
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_empty_desired_deletes_every_row() {
        let api = RecordingApi::new(observed(&[("r1", "p"), ("r2", "q")]));
        let reconciler = PlaylistReconciler::new(api.clone());

        reconciler.reconcile("pl1", &[]).await.unwrap();

        let mut deletes = api.mutation_calls();
        deletes.sort_by_key(|c| format!("{c:?}"));
        assert_eq!(
            deletes,
            vec![
                Call::Delete("r1".to_string()),
                Call::Delete("r2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_all_deletes_precede_all_inserts() {
        let api = RecordingApi::new(observed(&[
            ("r1", "x"),
            ("r2", "a"),
            ("r3", "y"),
            ("r4", "c"),
        ]));
        let reconciler = PlaylistReconciler::new(api.clone());

        reconciler
            .reconcile("pl1", &ids(&["a", "b", "c", "d"]))
            .await
            .unwrap();

        let calls = api.mutation_calls();
        let last_delete = calls
            .iter()
            .rposition(|c| matches!(c, Call::Delete(_)))
            .unwrap();
        let first_insert = calls
            .iter()
            .position(|c| matches!(c, Call::Insert(_)))
            .unwrap();
        assert!(
            last_delete < first_insert,
            "deletes must finish before inserts: {calls:?}"
        );
    }

    #[tokio::test]
    async fn test_each_insert_is_followed_by_its_reposition() {
        let api = RecordingApi::new(observed(&[("r1", "a")]));
        let reconciler = PlaylistReconciler::new(api.clone());

        reconciler
            .reconcile("pl1", &ids(&["a", "b", "c"]))
            .await
            .unwrap();

        let calls = api.mutation_calls();
        assert_eq!(
            calls,
            vec![
                Call::Insert("b".to_string()),
                Call::Reposition("new1".to_string(), 1),
                Call::Insert("c".to_string()),
                Call::Reposition("new2".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_delete_aborts_the_script() {
        let api = RecordingApi::failing_deletes(observed(&[("r1", "x"), ("r2", "a")]));
        let reconciler = PlaylistReconciler::new(api.clone());

        let err = reconciler
            .reconcile("pl1", &ids(&["a", "b"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Delete { .. }));
        assert!(
            !api.calls().iter().any(|c| matches!(c, Call::Insert(_))),
            "no insert may run after an aborted delete phase"
        );
    }

    #[tokio::test]
    async fn test_preview_mutates_nothing() {
        let api = RecordingApi::new(observed(&[("r1", "x")]));
        let reconciler = PlaylistReconciler::new(api.clone());

        let plan = reconciler.plan("pl1", &ids(&["a"])).await.unwrap();
        let lines = plan.preview();

        assert_eq!(lines.len(), 2);
        assert_eq!(api.calls(), vec![Call::List]);
    }
}
