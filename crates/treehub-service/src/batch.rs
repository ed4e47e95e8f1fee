//! Node references and aggregate results for batch operations.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use treehub_core::error::AppError;

/// A folder or file addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    /// The node id.
    pub id: Uuid,
    /// Whether `id` names a file rather than a folder.
    pub is_file: bool,
}

impl NodeRef {
    /// Reference a folder.
    pub fn folder(id: Uuid) -> Self {
        Self { id, is_file: false }
    }

    /// Reference a file.
    pub fn file(id: Uuid) -> Self {
        Self { id, is_file: true }
    }
}

/// One item of a batch that did not complete.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// The requested node.
    pub node: NodeRef,
    /// Why it failed.
    pub error: AppError,
}

impl Serialize for BatchFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchFailure", 4)?;
        state.serialize_field("node", &self.node)?;
        state.serialize_field("kind", &self.error.kind)?;
        state.serialize_field("message", &self.error.message)?;
        state.serialize_field("completed", &self.error.completed)?;
        state.end()
    }
}

/// Aggregate result of a batch move, copy, or delete.
///
/// Items are processed independently: a failure is recorded and the
/// batch continues with the next item.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Number of requested items that fully completed.
    pub succeeded: usize,
    /// Every node id written, including descendants and the ids a
    /// partially failed item completed.
    pub affected: Vec<Uuid>,
    /// Items that did not complete, in request order.
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Record a completed item and the ids it wrote.
    pub fn record_success(&mut self, affected: impl IntoIterator<Item = Uuid>) {
        self.succeeded += 1;
        self.affected.extend(affected);
    }

    /// Record a failed item. Ids completed before the failure count as
    /// affected.
    pub fn record_failure(&mut self, node: NodeRef, error: AppError) {
        self.affected.extend(error.completed.iter().copied());
        self.failures.push(BatchFailure { node, error });
    }

    /// Whether every item completed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first recorded failure.
    pub fn first_error(&self) -> Option<&AppError> {
        self.failures.first().map(|f| &f.error)
    }

    /// Turn a single-item batch back into a plain result.
    pub fn into_single(mut self) -> Result<Vec<Uuid>, AppError> {
        match self.failures.pop() {
            Some(failure) => Err(failure.error),
            None => Ok(self.affected),
        }
    }
}

#[cfg(test)]
mod tests {
    use treehub_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_partial_failure_ids_count_as_affected() {
        let mut outcome = BatchOutcome::default();
        let done = Uuid::new_v4();
        outcome.record_success([Uuid::new_v4()]);
        outcome.record_failure(
            NodeRef::folder(Uuid::new_v4()),
            AppError::partial(AppError::store_unavailable("down"), vec![done]),
        );
        assert_eq!(outcome.succeeded, 1);
        assert!(outcome.affected.contains(&done));
        assert_eq!(
            outcome.first_error().map(|e| e.kind),
            Some(ErrorKind::PartialFailure)
        );
    }

    #[test]
    fn test_failure_serializes_kind() {
        let failure = BatchFailure {
            node: NodeRef::file(Uuid::nil()),
            error: AppError::not_found("File missing"),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "NotFound");
        assert_eq!(json["node"]["isFile"], true);
    }
}
