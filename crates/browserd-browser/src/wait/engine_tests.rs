use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn engine() -> WaitEngine {
    WaitEngine::with_interval(Duration::from_millis(300), Duration::from_secs(300))
}

#[tokio::test(start_paused = true)]
async fn test_times_out_after_timeout_not_before() {
    let engine = engine();
    let start = Instant::now();

    let outcome = engine
        .poll_until(Duration::from_secs(5), || async { Ok(false) })
        .await
        .unwrap();

    let elapsed = start.elapsed();
    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert!(elapsed >= Duration::from_secs(5), "returned early: {:?}", elapsed);
    assert!(elapsed <= Duration::from_secs(5) + engine.poll_interval());
}

#[tokio::test(start_paused = true)]
async fn test_satisfied_on_later_poll() {
    let engine = engine();
    let calls = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let counter = calls.clone();
    let outcome = engine
        .poll_until(Duration::from_secs(10), move || {
            let counter = counter.clone();
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) >= 3) }
        })
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::Satisfied);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(start.elapsed(), Duration::from_millis(900));
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_checks_once() {
    let engine = engine();
    let calls = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let counter = calls.clone();
    let outcome = engine
        .poll_until(Duration::ZERO, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(false) }
        })
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_probe_bounded() {
    let engine = engine();
    let start = Instant::now();

    let outcome = engine
        .poll_until(Duration::from_secs(2), || std::future::pending::<Result<bool, BrowserError>>())
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert!(start.elapsed() <= Duration::from_secs(2) + engine.poll_interval());
}

#[tokio::test(start_paused = true)]
async fn test_stale_context_is_retried() {
    let engine = engine();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let outcome = engine
        .poll_until(Duration::from_secs(5), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(BrowserError::StaleContext("navigating".into()))
                } else {
                    Ok(true)
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::Satisfied);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_other_errors_propagate() {
    let engine = engine();
    let result = engine
        .poll_until(Duration::from_secs(5), || async {
            Err(BrowserError::InvalidSelector("xpath://[".into()))
        })
        .await;
    assert!(matches!(result, Err(BrowserError::InvalidSelector(_))));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_clamped_to_ceiling() {
    let engine = WaitEngine::with_interval(Duration::from_millis(300), Duration::from_secs(3));
    let start = Instant::now();

    let outcome = engine
        .poll_until(Duration::from_secs(3600), || async { Ok(false) })
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert!(start.elapsed() <= Duration::from_secs(3) + engine.poll_interval());
}

#[tokio::test(start_paused = true)]
async fn test_sleep_zero_returns_immediately() {
    let engine = engine();
    let start = Instant::now();
    assert_eq!(engine.sleep(Duration::ZERO).await, Duration::ZERO);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_sleep_clamped() {
    let engine = WaitEngine::with_interval(Duration::from_millis(300), Duration::from_secs(2));
    let start = Instant::now();
    assert_eq!(engine.sleep(Duration::from_secs(10)).await, Duration::from_secs(2));
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[test]
fn test_clamp_secs() {
    let engine = engine();
    assert_eq!(engine.clamp_secs(-1.0), Duration::ZERO);
    assert_eq!(engine.clamp_secs(f64::NAN), Duration::ZERO);
    assert_eq!(engine.clamp_secs(1.5), Duration::from_millis(1500));
    assert_eq!(engine.clamp_secs(10_000.0), Duration::from_secs(300));
}

#[test]
fn test_new_from_config() {
    let engine = WaitEngine::new(&WaitConfig::default());
    assert_eq!(engine.poll_interval(), Duration::from_millis(300));
    assert_eq!(engine.clamp(Duration::from_secs(301)), Duration::from_secs(300));
}
