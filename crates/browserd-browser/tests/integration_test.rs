//! Integration tests against a real browser.
//!
//! These tests require Chrome or Chromium to be installed.
//! Run with: cargo test -p browserd-browser --test integration_test -- --ignored --nocapture

use std::time::Duration;

use browserd_browser::actions::{self, ExecutionMode};
use browserd_browser::selector;
use browserd_browser::wait::{ElementState, WaitCondition, WaitEngine, WaitOutcome};
use browserd_browser::{BrowserError, Selector, SessionManager};
use browserd_config::BrowserConfig;

const FORM_PAGE: &str = "data:text/html,<html><head><title>Form</title></head><body>\
    <h1>Sign in</h1><input name=q placeholder=Search value=old>\
    <button id=go onclick=\"document.title='clicked'\">Log on</button>\
    <input type=submit value=Search>\
    <p>Hello <b>world</b></p></body></html>";

fn test_manager(port: u16, dir: &tempfile::TempDir) -> SessionManager {
    SessionManager::new(BrowserConfig {
        debug_port: port,
        data_dir: dir.path().to_path_buf(),
        headless: true,
        ..BrowserConfig::default()
    })
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_navigate_and_read_title() {
    let dir = tempfile::tempdir().unwrap();
    let manager = test_manager(19331, &dir);

    {
        let mut session = manager.acquire().await.unwrap();
        let info = actions::navigate(&mut session, FORM_PAGE).await.unwrap();
        assert_eq!(info.title, "Form");

        let text = actions::element_text(&mut session, &Selector::parse("h1"))
            .await
            .unwrap_err();
        assert!(matches!(text, BrowserError::ElementNotFound(_)));

        let heading = actions::element_text(&mut session, &Selector::parse("tag:h1"))
            .await
            .unwrap();
        assert_eq!(heading.text, "Sign in");
    }

    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_type_then_evaluate() {
    let dir = tempfile::tempdir().unwrap();
    let manager = test_manager(19332, &dir);

    {
        let mut session = manager.acquire().await.unwrap();
        actions::navigate(&mut session, FORM_PAGE).await.unwrap();
        actions::type_text(
            &mut session,
            &Selector::parse("css:input[name=q]"),
            "hello",
            true,
            ExecutionMode::Native,
        )
        .await
        .unwrap();

        let value = actions::evaluate(
            &mut session,
            "return document.querySelector('input[name=q]').value",
        )
        .await
        .unwrap();
        assert_eq!(value, "hello");

        let err = actions::type_text(
            &mut session,
            &Selector::parse("#go"),
            "x",
            true,
            ExecutionMode::Native,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BrowserError::NotEditable(_)));
    }

    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_click_and_missing_element() {
    let dir = tempfile::tempdir().unwrap();
    let manager = test_manager(19333, &dir);

    {
        let mut session = manager.acquire().await.unwrap();
        actions::navigate(&mut session, FORM_PAGE).await.unwrap();

        actions::click(&mut session, &Selector::parse("text=Log on"), ExecutionMode::Native)
            .await
            .unwrap();
        let title = actions::evaluate(&mut session, "document.title").await.unwrap();
        assert_eq!(title, "clicked");

        let err = actions::click(&mut session, &Selector::parse("text:Log in"), ExecutionMode::Native)
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::ElementNotFound(_)));
    }

    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_handle_is_stale_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let manager = test_manager(19334, &dir);

    let handle = {
        let mut session = manager.acquire().await.unwrap();
        actions::navigate(&mut session, FORM_PAGE).await.unwrap();
        let page = session.current_page().await.unwrap();
        let context = session.page_context().await.unwrap();
        selector::resolve_first(&page, &context, &Selector::parse("#go"))
            .await
            .unwrap()
    };

    manager.restart().await.unwrap();

    let mut session = manager.acquire().await.unwrap();
    let err = session.validate(&handle).await.unwrap_err();
    assert!(matches!(err, BrowserError::StaleContext(_)));
    drop(session);

    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_tabs_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let manager = test_manager(19335, &dir);

    {
        let mut session = manager.acquire().await.unwrap();
        let err = session.switch_tab(5).await.unwrap_err();
        assert!(matches!(err, BrowserError::TabIndex { index: 5, .. }));

        let tab = session.new_tab(Some(FORM_PAGE)).await.unwrap();
        assert!(tab.active);
        assert_eq!(session.list_tabs().await.unwrap().len(), 2);

        let first = browserd_browser::snapshot::snapshot(&mut session, 80_000).await.unwrap();
        let second = browserd_browser::snapshot::snapshot(&mut session, 80_000).await.unwrap();
        assert_eq!(first.content, second.content);
        assert!(first.content.contains("[h1] Sign in"));
        assert!(first.content.contains("[button] Log on  {#go}"));
        assert!(first.content.contains("[button] Search  {@value=Search}"));
        let submit = actions::element_text(&mut session, &Selector::parse("@value=Search"))
            .await
            .unwrap();
        assert_eq!(submit.tag, "input");

        let small = browserd_browser::snapshot::snapshot(&mut session, 40).await.unwrap();
        assert!(small.truncated);
        assert!(small.content.chars().count() <= 40);

        session.close_tab(None).await.unwrap();
        let err = session.close_tab(None).await.unwrap_err();
        assert!(matches!(err, BrowserError::LastTab));
    }

    manager.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_wait_for_text_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let manager = test_manager(19336, &dir);
    let engine = WaitEngine::with_interval(Duration::from_millis(250), Duration::from_secs(60));

    {
        let mut session = manager.acquire().await.unwrap();
        actions::navigate(&mut session, FORM_PAGE).await.unwrap();
    }

    let started = std::time::Instant::now();
    let outcome = engine
        .wait(&manager, &WaitCondition::Text("Welcome".to_string()), Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert!(started.elapsed() >= Duration::from_secs(2));

    let outcome = engine
        .wait(
            &manager,
            &WaitCondition::Element {
                selector: Selector::parse("#go"),
                state: ElementState::Displayed,
            },
            Duration::from_secs(2),
        )
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Satisfied);

    manager.shutdown().await;
}
