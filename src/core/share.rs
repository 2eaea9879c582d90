//! Share dialog flow.
//!
//! `Idle → Validating → Submitting → Success`, with `Failed` reachable from
//! either working phase. `Success` and `Failed` return to `Idle` on dismissal.
//! A multi-document share sends one request per document and never rolls
//! back the ones that succeeded.

use std::fmt;

use leptos::logging::warn;

use crate::core::api::ApiClient;
use crate::core::batch::{BatchOutcome, unique_ids};
use crate::core::error::ApiError;
use crate::core::transport::Transport;
use crate::models::{DocId, SharePermissions};

/// Why a share attempt failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareFailure {
    NoFileSelected,
    EmptyEmail,
    RecipientNotFound,
    SessionExpired,
    Server(String),
    Partial { failed: usize, total: usize },
}

impl ShareFailure {
    fn from_api(error: &ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::RecipientNotFound,
            ApiError::SessionExpired => Self::SessionExpired,
            other => Self::Server(other.user_message()),
        }
    }
}

impl fmt::Display for ShareFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFileSelected => write!(f, "No file selected"),
            Self::EmptyEmail => write!(f, "Please enter an email address"),
            Self::RecipientNotFound => write!(f, "Recipient not found"),
            Self::SessionExpired => write!(f, "Session expired, please log in again"),
            Self::Server(message) => write!(f, "{message}"),
            Self::Partial { failed, total } => write!(f, "{failed} of {total} failed"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SharePhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Failed(ShareFailure),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareEvent {
    Submit,
    RecipientResolved,
    Created,
    Fail(ShareFailure),
    Dismiss,
}

impl SharePhase {
    /// Apply `event`. Events that do not fit the current phase are ignored.
    pub fn on(self, event: ShareEvent) -> Self {
        match (self, event) {
            (Self::Idle, ShareEvent::Submit) => Self::Validating,
            (Self::Validating, ShareEvent::RecipientResolved) => Self::Submitting,
            (Self::Submitting, ShareEvent::Created) => Self::Success,
            (Self::Validating | Self::Submitting, ShareEvent::Fail(reason)) => Self::Failed(reason),
            (Self::Success | Self::Failed(_), ShareEvent::Dismiss) => Self::Idle,
            (phase, _) => phase,
        }
    }

    /// A request is in flight; the form should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareRequest {
    pub doc_ids: Vec<DocId>,
    pub recipient_email: String,
    pub permissions: SharePermissions,
}

/// Final phase of a run together with the per-document counts, if any
/// creation was attempted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareReport {
    pub phase: SharePhase,
    pub outcome: Option<BatchOutcome>,
}

/// Drive one submission from `Idle`. `observe` sees every phase entered.
pub async fn run_share<T: Transport>(
    api: &ApiClient<T>,
    request: &ShareRequest,
    mut observe: impl FnMut(&SharePhase),
) -> ShareReport {
    let mut phase = SharePhase::Idle;
    let mut step = |phase: &mut SharePhase, event: ShareEvent| {
        *phase = std::mem::take(phase).on(event);
        observe(phase);
    };

    step(&mut phase, ShareEvent::Submit);

    let doc_ids = unique_ids(request.doc_ids.iter().copied());
    let email = request.recipient_email.trim();
    let precondition = if doc_ids.is_empty() {
        Some(ShareFailure::NoFileSelected)
    } else if email.is_empty() {
        Some(ShareFailure::EmptyEmail)
    } else {
        None
    };
    if let Some(reason) = precondition {
        step(&mut phase, ShareEvent::Fail(reason));
        return ShareReport {
            phase,
            outcome: None,
        };
    }

    let recipient = match api.lookup_user(email).await {
        Ok(id) => id,
        Err(e) => {
            warn!("[share] lookup of {} failed: {}", email, e);
            step(&mut phase, ShareEvent::Fail(ShareFailure::from_api(&e)));
            return ShareReport {
                phase,
                outcome: None,
            };
        }
    };
    step(&mut phase, ShareEvent::RecipientResolved);

    let mut results = Vec::with_capacity(doc_ids.len());
    let mut last_error = None;
    for id in doc_ids {
        let result = api
            .create_share(id, recipient, email, request.permissions)
            .await;
        if let Err(e) = &result {
            warn!("[share] doc {} to {} failed: {}", id, email, e);
            last_error = Some(e.clone());
        }
        results.push((id, result));
    }
    let outcome = BatchOutcome::collect(results);

    let event = match last_error {
        None => ShareEvent::Created,
        Some(e) if outcome.session_expired() || outcome.total() == 1 => {
            ShareEvent::Fail(ShareFailure::from_api(&e))
        }
        Some(_) => ShareEvent::Fail(ShareFailure::Partial {
            failed: outcome.failed.len(),
            total: outcome.total(),
        }),
    };
    step(&mut phase, event);

    ShareReport {
        phase,
        outcome: Some(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{MockTransport, session};
    use crate::core::transport::Method;

    fn request(ids: &[i64], email: &str) -> ShareRequest {
        ShareRequest {
            doc_ids: ids.iter().copied().map(DocId).collect(),
            recipient_email: email.into(),
            permissions: SharePermissions::default(),
        }
    }

    #[test]
    fn test_transitions() {
        let phase = SharePhase::Idle
            .on(ShareEvent::Submit)
            .on(ShareEvent::RecipientResolved)
            .on(ShareEvent::Created);
        assert_eq!(phase, SharePhase::Success);
        assert_eq!(phase.on(ShareEvent::Dismiss), SharePhase::Idle);

        let failed = SharePhase::Validating.on(ShareEvent::Fail(ShareFailure::RecipientNotFound));
        assert_eq!(failed, SharePhase::Failed(ShareFailure::RecipientNotFound));
        assert_eq!(failed.on(ShareEvent::Dismiss), SharePhase::Idle);

        // Out-of-order events are ignored.
        assert_eq!(SharePhase::Idle.on(ShareEvent::Created), SharePhase::Idle);
    }

    #[tokio::test]
    async fn test_unknown_recipient_posts_nothing() {
        let transport = MockTransport::new();
        transport.respond_json(
            "/auth/users/lookup?email=nobody%40example.com",
            404,
            r#"{"error":"User not found"}"#,
        );
        let api = ApiClient::for_session(transport.clone(), &session());

        let mut seen = Vec::new();
        let report = run_share(&api, &request(&[1], "nobody@example.com"), |p| {
            seen.push(p.clone())
        })
        .await;

        assert_eq!(report.phase, SharePhase::Failed(ShareFailure::RecipientNotFound));
        assert_eq!(ShareFailure::RecipientNotFound.to_string(), "Recipient not found");
        assert_eq!(transport.count(Method::Post, "/share"), 0);
        assert_eq!(seen[0], SharePhase::Validating);
    }

    #[tokio::test]
    async fn test_preconditions_make_no_request() {
        let transport = MockTransport::new();
        let api = ApiClient::for_session(transport.clone(), &session());

        let report = run_share(&api, &request(&[], "bob@example.com"), |_| {}).await;
        assert_eq!(report.phase, SharePhase::Failed(ShareFailure::NoFileSelected));
        let report = run_share(&api, &request(&[1], "  "), |_| {}).await;
        assert_eq!(report.phase, SharePhase::Failed(ShareFailure::EmptyEmail));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_partial_failure() {
        let transport = MockTransport::new();
        transport.respond_json("/auth/users/lookup?email=bob%40example.com", 200, r#"{"user_id":2}"#);
        transport.respond_json("/share", 201, r#"{"share_id":1}"#);
        transport.respond_json("/share", 409, r#"{"error":"Document already shared with this user"}"#);
        let api = ApiClient::for_session(transport.clone(), &session());

        let mut seen = Vec::new();
        let report = run_share(&api, &request(&[1, 2, 2], "bob@example.com"), |p| {
            seen.push(p.clone())
        })
        .await;

        assert_eq!(
            report.phase,
            SharePhase::Failed(ShareFailure::Partial { failed: 1, total: 2 })
        );
        assert_eq!(transport.count(Method::Post, "/share"), 2);
        assert_eq!(
            seen,
            vec![
                SharePhase::Validating,
                SharePhase::Submitting,
                SharePhase::Failed(ShareFailure::Partial { failed: 1, total: 2 }),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_share_success() {
        let transport = MockTransport::new();
        transport.respond_json("/auth/users/lookup?email=bob%40example.com", 200, r#"{"user_id":"2"}"#);
        transport.respond_json("/share", 201, "{}");
        let api = ApiClient::for_session(transport.clone(), &session());

        let report = run_share(&api, &request(&[7], " bob@example.com "), |_| {}).await;
        assert_eq!(report.phase, SharePhase::Success);
        assert_eq!(report.outcome.map(|o| o.total()), Some(1));
    }

    #[tokio::test]
    async fn test_single_conflict_keeps_server_message() {
        let transport = MockTransport::new();
        transport.respond_json("/auth/users/lookup?email=bob%40example.com", 200, r#"{"user_id":2}"#);
        transport.respond_json("/share", 409, r#"{"error":"Document already shared with this user"}"#);
        let api = ApiClient::for_session(transport, &session());

        let report = run_share(&api, &request(&[7], "bob@example.com"), |_| {}).await;
        assert_eq!(
            report.phase,
            SharePhase::Failed(ShareFailure::Server(
                "Document already shared with this user".into()
            ))
        );
    }
}
