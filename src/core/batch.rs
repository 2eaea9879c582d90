//! Aggregate result of a per-document batch (delete, download, share).
//!
//! Successes are never rolled back; the outcome only counts.

use std::collections::BTreeSet;

use crate::core::error::ApiError;
use crate::models::DocId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: Vec<DocId>,
    pub failed: Vec<(DocId, String)>,
    session_expired: bool,
}

impl BatchOutcome {
    /// Fold per-document results. Later duplicates of an id are ignored.
    pub fn collect<E>(results: impl IntoIterator<Item = (DocId, Result<(), E>)>) -> Self
    where
        E: Into<BatchFailure>,
    {
        let mut seen = BTreeSet::new();
        let mut outcome = Self::default();
        for (id, result) in results {
            if !seen.insert(id) {
                continue;
            }
            match result {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    let failure = e.into();
                    outcome.session_expired |= failure.session_expired;
                    outcome.failed.push((id, failure.message));
                }
            }
        }
        outcome
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Some item failed with 401/403.
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// `"X of Y succeeded"`.
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded", self.succeeded.len(), self.total())
    }

    /// `"N of M failed"`.
    pub fn failure_summary(&self) -> String {
        format!("{} of {} failed", self.failed.len(), self.total())
    }
}

/// Per-item failure as recorded in a [`BatchOutcome`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFailure {
    pub message: String,
    pub session_expired: bool,
}

impl From<ApiError> for BatchFailure {
    fn from(e: ApiError) -> Self {
        Self {
            session_expired: e.is_session_expired(),
            message: e.user_message(),
        }
    }
}

impl From<crate::core::error::PreviewError> for BatchFailure {
    fn from(e: crate::core::error::PreviewError) -> Self {
        Self {
            session_expired: e.is_session_expired(),
            message: e.to_string(),
        }
    }
}

/// Ids in first-seen order with duplicates removed.
pub fn unique_ids(ids: impl IntoIterator<Item = DocId>) -> Vec<DocId> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
