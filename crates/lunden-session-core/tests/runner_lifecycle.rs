use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lunden_session_core::{PortError, RequestError, RequestPhase, RequestRunner};

struct Observed {
    successes: AtomicUsize,
    errors: AtomicUsize,
    last_error: Mutex<Option<RequestError>>,
}

impl Observed {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            successes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        })
    }
}

fn runner_with(observed: &Arc<Observed>, timeout: Duration) -> RequestRunner<u64> {
    let on_success = Arc::clone(observed);
    let on_error = Arc::clone(observed);
    RequestRunner::new(
        timeout,
        Box::new(move |_value| {
            on_success.successes.fetch_add(1, Ordering::SeqCst);
        }),
        Box::new(move |err| {
            on_error.errors.fetch_add(1, Ordering::SeqCst);
            *on_error.last_error.lock().expect("error slot") = Some(err);
        }),
    )
}

#[tokio::test]
async fn success_settles_once_and_clears_loading() {
    let observed = Observed::new();
    let runner = runner_with(&observed, Duration::from_secs(1));

    assert_eq!(runner.phase(), RequestPhase::Idle);
    let settled = runner.invoke(async { Ok(7u64) }).await;

    assert!(settled);
    assert_eq!(runner.phase(), RequestPhase::Succeeded);
    assert!(!runner.is_loading());
    assert_eq!(observed.successes.load(Ordering::SeqCst), 1);
    assert_eq!(observed.errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failure_funnels_through_error_callback() {
    let observed = Observed::new();
    let runner = runner_with(&observed, Duration::from_secs(1));

    let settled = runner
        .invoke(async { Err(PortError::Rejected(Some("vault sealed".to_owned()))) })
        .await;

    assert!(!settled);
    assert_eq!(runner.phase(), RequestPhase::Failed);
    assert_eq!(observed.errors.load(Ordering::SeqCst), 1);
    let err = observed
        .last_error
        .lock()
        .expect("error slot")
        .clone()
        .expect("error recorded");
    assert_eq!(err.message(), Some("vault sealed"));
}

#[tokio::test]
async fn rejection_without_message_exposes_fallback_hook() {
    let observed = Observed::new();
    let runner = runner_with(&observed, Duration::from_secs(1));

    runner.invoke(async { Err(PortError::Rejected(None)) }).await;

    let err = observed
        .last_error
        .lock()
        .expect("error slot")
        .clone()
        .expect("error recorded");
    assert_eq!(err.message(), None);
    assert_eq!(err.message_or("incorrect password"), "incorrect password");
}

#[tokio::test]
async fn timeout_fails_the_invocation_instead_of_hanging() {
    let observed = Observed::new();
    let runner = runner_with(&observed, Duration::from_millis(20));

    let settled = runner
        .invoke(async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(1u64)
        })
        .await;

    assert!(!settled);
    assert!(!runner.is_loading());
    assert_eq!(runner.phase(), RequestPhase::Failed);
    let err = observed
        .last_error
        .lock()
        .expect("error slot")
        .clone()
        .expect("error recorded");
    assert!(err.message_or("").contains("timed out"));
}

#[tokio::test]
async fn overlapping_invoke_is_rejected() {
    let observed = Observed::new();
    let runner = Arc::new(runner_with(&observed, Duration::from_secs(1)));

    let in_flight = Arc::clone(&runner);
    let first = tokio::spawn(async move {
        in_flight
            .invoke(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(1u64)
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(runner.is_loading());
    let second = runner.invoke(async { Ok(2u64) }).await;
    assert!(!second);

    assert!(first.await.expect("first invocation"));
    // Only the in-flight invocation settled; the rejected one fired
    // neither callback.
    assert_eq!(observed.successes.load(Ordering::SeqCst), 1);
    assert_eq!(observed.errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn runner_is_reusable_after_settlement() {
    let observed = Observed::new();
    let runner = runner_with(&observed, Duration::from_secs(1));

    assert!(!runner.invoke(async { Err(PortError::Rejected(None)) }).await);
    assert!(runner.invoke(async { Ok(3u64) }).await);

    assert_eq!(runner.phase(), RequestPhase::Succeeded);
    assert_eq!(observed.successes.load(Ordering::SeqCst), 1);
    assert_eq!(observed.errors.load(Ordering::SeqCst), 1);
}
