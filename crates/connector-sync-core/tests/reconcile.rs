#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "panics are the assertion mechanism in integration tests")]

mod common;

use common::{production_connector, FakeRemote};
use connector_sync_client::Invoker;
use connector_sync_core::{IgnoreSet, ReconcileOutcome, ReconcilePhase, Reconciler};
use connector_sync_types::{DesiredFields, ErrorKind, SyncError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn reconciler(remote: FakeRemote) -> Reconciler<FakeRemote> {
    Reconciler::new(remote, Invoker::new(5, Duration::from_millis(1)))
}

#[tokio::test]
async fn test_matching_state_makes_no_update_call() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));

    let outcome = reconciler
        .reconcile(
            &CancellationToken::new(),
            "c-1",
            &DesiredFields::named("prod-aws"),
            &IgnoreSet::standard(),
        )
        .await
        .expect("reconcile");

    assert_eq!(outcome, ReconcileOutcome::NoOp);
    assert!(reconciler.remote().update_calls().is_empty());
}

#[tokio::test]
async fn test_reordered_auth_params_are_no_op() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));
    let fields = DesiredFields {
        name: "prod-aws".to_string(),
        auth_params: Some(
            r#"{ "externalId": "ext", "customerRoleARN": "arn:aws:iam::1:role/wiz" }"#.to_string(),
        ),
        extra_config: None,
    };

    let outcome = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &fields, &IgnoreSet::standard())
        .await
        .expect("reconcile");

    assert!(outcome.is_noop());
}

#[tokio::test]
async fn test_renamed_connector_updated_once() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));

    let outcome = reconciler
        .reconcile(
            &CancellationToken::new(),
            "c-1",
            &DesiredFields::named("prod-aws-renamed"),
            &IgnoreSet::standard(),
        )
        .await
        .expect("reconcile");

    assert_eq!(outcome, ReconcileOutcome::Updated { changed_paths: vec!["name".to_string()] });

    let calls = reconciler.remote().update_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "c-1");
    assert_eq!(calls[0].name, "prod-aws-renamed");
    assert!(calls[0].auth_params.is_none());
    assert!(calls[0].extra_config.is_none());
}

#[tokio::test]
async fn test_nested_auth_change_reports_dotted_path() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));
    let fields = DesiredFields {
        name: "prod-aws".to_string(),
        auth_params: Some(r#"{"customerRoleARN": "arn:aws:iam::2:role/wiz"}"#.to_string()),
        extra_config: None,
    };

    let outcome = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &fields, &IgnoreSet::standard())
        .await
        .expect("reconcile");

    assert_eq!(outcome.changed_paths(), ["authParams.customerRoleARN".to_string()]);
    let calls = reconciler.remote().update_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].auth_params.is_some());
}

#[tokio::test]
async fn test_empty_ignore_set_still_skips_current_only_fields() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));

    let outcome = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &DesiredFields::named("prod-aws"), &IgnoreSet::empty())
        .await
        .expect("reconcile");

    assert!(outcome.is_noop());
}

#[tokio::test]
async fn test_transient_fetch_failure_is_retried() {
    let remote = FakeRemote::with_connector(production_connector());
    remote.fail_fetch(SyncError::remote(ErrorKind::ServiceUnavailable, "503"));
    remote.fail_fetch(SyncError::remote(ErrorKind::Timeout, "deadline"));
    let reconciler = reconciler(remote);

    let outcome = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &DesiredFields::named("prod-aws"), &IgnoreSet::standard())
        .await
        .expect("reconcile");

    assert!(outcome.is_noop());
    assert_eq!(reconciler.remote().fetch_count(), 3);
}

#[tokio::test]
async fn test_missing_connector_fails_in_fetch_phase() {
    let reconciler = reconciler(FakeRemote::default());

    let err = reconciler
        .reconcile(&CancellationToken::new(), "c-404", &DesiredFields::named("x"), &IgnoreSet::standard())
        .await
        .expect_err("missing");

    assert_eq!(err.phase, ReconcilePhase::FetchCurrent);
    assert_eq!(err.source.kind(), Some(ErrorKind::NotFound));
    assert_eq!(reconciler.remote().fetch_count(), 1);
}

#[tokio::test]
async fn test_authentication_failure_reports_authenticate_phase() {
    let remote = FakeRemote::with_connector(production_connector());
    remote.fail_fetch(SyncError::authentication("error authenticating, status code: 401", false));
    let reconciler = reconciler(remote);

    let err = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &DesiredFields::named("renamed"), &IgnoreSet::standard())
        .await
        .expect_err("auth");

    assert_eq!(err.phase, ReconcilePhase::Authenticate);
    assert!(err.to_string().contains("status code: 401"));
    assert!(reconciler.remote().update_calls().is_empty());
}

#[tokio::test]
async fn test_invalid_desired_json_reports_compare_phase() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));
    let fields = DesiredFields {
        name: "prod-aws".to_string(),
        auth_params: None,
        extra_config: Some("{not json".to_string()),
    };

    let err = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &fields, &IgnoreSet::standard())
        .await
        .expect_err("bad json");

    assert_eq!(err.phase, ReconcilePhase::Compare);
    assert!(matches!(err.source, SyncError::InvalidInput { .. }));
    assert!(reconciler.remote().update_calls().is_empty());
}

#[tokio::test]
async fn test_terminal_update_failure_reports_update_phase() {
    let remote = FakeRemote::with_connector(production_connector());
    remote.fail_update(SyncError::remote(ErrorKind::Validation, "name already taken"));
    let reconciler = reconciler(remote);

    let err = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &DesiredFields::named("dup"), &IgnoreSet::standard())
        .await
        .expect_err("validation");

    assert_eq!(err.phase, ReconcilePhase::Update);
    assert_eq!(reconciler.remote().update_calls().len(), 1);
}

#[tokio::test]
async fn test_update_exhaustion_wraps_last_error() {
    let remote = FakeRemote::with_connector(production_connector());
    for _ in 0..5 {
        remote.fail_update(SyncError::remote(ErrorKind::RateLimited, "rate limit exceeded"));
    }
    let reconciler = reconciler(remote);

    let err = reconciler
        .reconcile(&CancellationToken::new(), "c-1", &DesiredFields::named("renamed"), &IgnoreSet::standard())
        .await
        .expect_err("exhausted");

    assert_eq!(err.phase, ReconcilePhase::Update);
    assert!(matches!(err.source, SyncError::RetriesExhausted { attempts: 5, .. }));
    assert_eq!(reconciler.remote().update_calls().len(), 5);
}

#[tokio::test]
async fn test_cancelled_reconcile_makes_no_calls() {
    let reconciler = reconciler(FakeRemote::with_connector(production_connector()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = reconciler
        .reconcile(&cancel, "c-1", &DesiredFields::named("renamed"), &IgnoreSet::standard())
        .await
        .expect_err("cancelled");

    assert!(err.is_cancelled());
    assert_eq!(err.phase, ReconcilePhase::FetchCurrent);
    assert_eq!(reconciler.remote().fetch_count(), 0);
}
