//! Integration tests for the sandbox bridge

use codecanvas_common::ManualClock;
use codecanvas_preview::{
    BridgeState, ContextEvent, Generation, HeadlessContext, RecordingSink, RecordingViewer,
    SandboxBridge, SandboxCapability, SandboxPolicy, Severity, SinkEvent, DEFAULT_LOADING_FLOOR,
};
use std::rc::Rc;

fn setup() -> (SandboxBridge<HeadlessContext, RecordingSink>, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::at_epoch());
    let bridge =
        SandboxBridge::new(HeadlessContext::new(), RecordingSink::default(), clock.clone());
    (bridge, clock)
}

#[test]
fn test_console_calls_arrive_in_order() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();
    bridge.refresh("<script>console.log('a');console.warn('b');console.error('c')</script>")?;

    let context = bridge.context_mut();
    context.console(Severity::Log, "a");
    context.console(Severity::Warn, "b");
    context.console(Severity::Error, "c");
    assert_eq!(bridge.pump(), 3);

    let seen: Vec<(Severity, &str)> = bridge
        .diagnostics()
        .entries()
        .iter()
        .map(|e| (e.severity, e.message.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![(Severity::Log, "a"), (Severity::Warn, "b"), (Severity::Error, "c")]
    );

    let sink_messages: Vec<&str> = bridge
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Diagnostic(entry) => Some(entry.message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(sink_messages, vec!["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_export_lines_use_capture_time() -> anyhow::Result<()> {
    let (mut bridge, clock) = setup();
    bridge.refresh("")?;

    clock.advance(std::time::Duration::from_secs(3_723));
    bridge.context_mut().console(Severity::Info, "ready");
    bridge.pump();

    assert_eq!(bridge.diagnostics().to_text(), "[01:02:03] INFO: ready");
    Ok(())
}

#[test]
fn test_refresh_isolates_errors_between_generations() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();

    let first = bridge.refresh("<script>throw new Error('x')</script>")?;
    bridge.context_mut().throw("Error: x", 1);
    bridge.pump();
    assert_eq!(bridge.current_error(), Some("Error: x at line 1"));

    let second = bridge.refresh("<p>fixed</p>")?;
    assert_ne!(first, second);
    assert_eq!(bridge.current_error(), None);

    // A late error from the first context must not resurface
    bridge.context_mut().emit(ContextEvent::RuntimeError {
        generation: first,
        message: "Error: late".to_string(),
        line: 9,
    });
    assert_eq!(bridge.pump(), 0);
    assert_eq!(bridge.current_error(), None);

    let errors: Vec<&SinkEvent> = bridge
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, SinkEvent::CurrentError(_)))
        .collect();
    assert_eq!(
        errors,
        vec![
            &SinkEvent::CurrentError(Some("Error: x at line 1".to_string())),
            &SinkEvent::CurrentError(None),
        ]
    );
    Ok(())
}

#[test]
fn test_pending_error_from_replaced_document_is_discarded() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();

    bridge.refresh("<script>setTimeout(() => { throw new Error('old') })</script>")?;
    bridge.context_mut().console(Severity::Log, "before");
    bridge.context_mut().throw("Error: old", 3);
    bridge.context_mut().reject("old rejection");

    // Nothing was pumped before the document is replaced
    bridge.refresh("<p>fixed</p>")?;

    assert_eq!(bridge.current_error(), None);
    assert!(!bridge
        .sink()
        .events
        .iter()
        .any(|e| matches!(e, SinkEvent::CurrentError(Some(_)))));

    let messages: Vec<&str> = bridge
        .diagnostics()
        .entries()
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(messages, vec!["before"]);
    Ok(())
}

#[test]
fn test_stale_console_output_is_dropped() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();
    let first = bridge.refresh("<p>1</p>")?;
    bridge.refresh("<p>2</p>")?;

    bridge.context_mut().emit(ContextEvent::Console {
        generation: first,
        severity: Severity::Log,
        message: "old".to_string(),
    });
    bridge.context_mut().console(Severity::Log, "new");
    bridge.pump();

    let messages: Vec<&str> = bridge
        .diagnostics()
        .entries()
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(messages, vec!["new"]);
    Ok(())
}

#[test]
fn test_each_refresh_is_a_clean_load() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();

    for n in 1..=3u64 {
        let generation = bridge.refresh(&format!("<p>{n}</p>"))?;
        assert_eq!(generation, Generation(n));
        assert_eq!(bridge.context().generation(), generation);
        assert_eq!(bridge.context().console_installs(generation), 1);
        assert_eq!(bridge.context().handler_installs(generation), 1);
    }

    assert_eq!(bridge.context().documents().len(), 3);
    Ok(())
}

#[test]
fn test_state_transitions() -> anyhow::Result<()> {
    let (mut bridge, clock) = setup();
    assert_eq!(bridge.state(), BridgeState::Idle);

    bridge.refresh("<p></p>")?;
    assert_eq!(bridge.state(), BridgeState::Loading);

    clock.advance(DEFAULT_LOADING_FLOOR);
    assert!(bridge.tick());
    assert_eq!(bridge.state(), BridgeState::Ready);
    assert!(!bridge.tick());

    bridge.context_mut().reject("nope");
    bridge.tick();
    assert_eq!(bridge.state(), BridgeState::Error);

    bridge.rerun()?;
    assert_eq!(bridge.state(), BridgeState::Loading);
    assert_eq!(bridge.current_error(), None);
    Ok(())
}

#[test]
fn test_sandbox_attribute_follows_policy() -> anyhow::Result<()> {
    let clock = Rc::new(ManualClock::at_epoch());
    let policy = SandboxPolicy::deny_all().allow(SandboxCapability::Scripts)?;
    let mut bridge = SandboxBridge::new(HeadlessContext::new(), RecordingSink::default(), clock)
        .with_policy(policy);

    bridge.refresh("<p></p>")?;
    assert_eq!(bridge.context().sandbox_attribute(), Some("allow-scripts"));
    Ok(())
}

#[test]
fn test_default_sandbox_attribute() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();
    bridge.refresh("")?;

    let attribute = bridge.context().sandbox_attribute().unwrap_or_default();
    for token in ["allow-scripts", "allow-same-origin", "allow-forms", "allow-modals"] {
        assert!(attribute.contains(token), "missing {token} in {attribute}");
    }
    assert!(!attribute.contains("allow-top-navigation"));
    Ok(())
}

#[test]
fn test_open_external_uses_last_document() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();
    let mut viewer = RecordingViewer::default();

    assert!(bridge.open_external(&mut viewer).is_err());

    bridge.refresh("<h1>out</h1>")?;
    bridge.open_external(&mut viewer)?;

    assert_eq!(viewer.opened, vec!["<h1>out</h1>".to_string()]);
    // External views never reset the bridge context
    assert_eq!(bridge.context().documents().len(), 1);
    Ok(())
}

#[test]
fn test_clear_diagnostics_keeps_error() -> anyhow::Result<()> {
    let (mut bridge, _clock) = setup();
    bridge.refresh("")?;
    bridge.context_mut().console(Severity::Log, "x");
    bridge.context_mut().throw("TypeError: y", 2);
    bridge.pump();

    bridge.clear_diagnostics();
    assert!(bridge.diagnostics().is_empty());
    assert_eq!(bridge.current_error(), Some("TypeError: y at line 2"));
    Ok(())
}
