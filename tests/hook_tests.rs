use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use forms_client::hook::{
    app_main::AppMainHook,
    hook::{HookError, HookRunner, PostProcessHook},
};
use serde_json::{Value, json};

#[derive(Default)]
struct CountingHook {
    inits: AtomicUsize,
    calls: AtomicUsize,
    fail_init: bool,
}

impl PostProcessHook for CountingHook {
    fn init(&self) -> Result<(), HookError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            Err(HookError::Init("module missing".into()))
        } else {
            Ok(())
        }
    }

    fn process(&self, _kind: &str, payload: &Value) -> Result<Value, HookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(payload.clone())
    }
}

struct PanickingHook;

impl PostProcessHook for PanickingHook {
    fn process(&self, _kind: &str, _payload: &Value) -> Result<Value, HookError> {
        panic!("hook blew up");
    }
}

// =========================================================================
// AppMain post-processor
// =========================================================================

#[test]
fn app_main_appends_client_suffix() {
    let result = AppMainHook.process("AppMain", &json!({ "hello": "hello bob" })).unwrap();
    assert_eq!(result, json!({ "hello_response": "hello bob back from client" }));
}

#[test]
fn app_main_rejects_other_kinds_and_shapes() {
    assert!(matches!(
        AppMainHook.process("AppDummy", &json!({ "hello": "x" })),
        Err(HookError::UnsupportedKind(kind)) if kind == "AppDummy"
    ));
    assert!(matches!(
        AppMainHook.process("AppMain", &json!({ "greeting": "x" })),
        Err(HookError::Payload { .. })
    ));
}

// =========================================================================
// Runner
// =========================================================================

#[test]
fn identical_payloads_are_each_processed() {
    let hook = Arc::new(CountingHook::default());
    let runner = HookRunner::new(hook.clone());

    let first = runner.dispatch("AppMain", json!({ "hello": "a" })).expect("first dispatch");
    let again = runner.dispatch("AppMain", json!({ "hello": "a" })).expect("repeat dispatch");
    let other_kind = runner.dispatch("AppDummy", json!({ "hello": "a" })).expect("other kind");

    assert_eq!(first.wait(), Some(json!({ "hello": "a" })));
    assert_eq!(again.wait(), Some(json!({ "hello": "a" })));
    other_kind.wait();
    assert_eq!(hook.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn init_runs_once_and_lazily() {
    let hook = Arc::new(CountingHook::default());
    let runner = HookRunner::new(hook.clone());
    assert_eq!(hook.inits.load(Ordering::SeqCst), 0);

    let handles: Vec<_> = (0..4)
        .filter_map(|i| runner.dispatch("AppMain", json!({ "n": i })))
        .collect();
    for handle in handles {
        handle.wait();
    }

    assert_eq!(hook.inits.load(Ordering::SeqCst), 1);
    assert_eq!(hook.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn failed_init_skips_processing() {
    let hook = Arc::new(CountingHook {
        fail_init: true,
        ..Default::default()
    });
    let runner = HookRunner::new(hook.clone());

    assert_eq!(runner.dispatch("AppMain", json!({ "n": 1 })).unwrap().wait(), None);
    assert_eq!(runner.dispatch("AppMain", json!({ "n": 2 })).unwrap().wait(), None);
    assert_eq!(hook.inits.load(Ordering::SeqCst), 1);
    assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn panicking_hook_is_contained() {
    let runner = HookRunner::new(Arc::new(PanickingHook));
    let handle = runner.dispatch("AppMain", json!({})).unwrap();
    assert_eq!(handle.wait(), None);

    // The runner keeps working for later payloads
    assert!(runner.dispatch("AppMain", json!({ "again": true })).is_some());
}

#[test]
fn runner_without_hook_drops_payloads() {
    let runner = HookRunner::default();
    assert!(runner.dispatch("AppMain", json!({ "hello": "x" })).is_none());
}
