//! Helpers shared by the integration tests

#![allow(dead_code)]

use glacier_store::Action;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub struct TestState {
    pub prop: String,
}

pub fn test_state(prop: &str) -> TestState {
    TestState {
        prop: prop.to_string(),
    }
}

/// Releases or rejects a gated action from the outside
pub struct Gate(oneshot::Sender<bool>);

impl Gate {
    pub fn resolve(self) {
        let _ = self.0.send(true);
    }

    pub fn reject(self) {
        let _ = self.0.send(false);
    }
}

/// Action that waits for its gate before running `f`
///
/// Rejecting the gate makes the action fail with "Action rejected".
pub fn gated<F>(name: &'static str, f: F) -> (Gate, Action<TestState>)
where
    F: FnOnce(TestState) -> TestState + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let action = Action::update(name, move |state: TestState| async move {
        match rx.await {
            Ok(true) => Ok(f(state)),
            _ => Err(anyhow::anyhow!("Action rejected")),
        }
    });
    (Gate(tx), action)
}

/// Gated action appending `suffix` to `prop`
pub fn gated_append(suffix: &'static str) -> (Gate, Action<TestState>) {
    gated(suffix, move |state| TestState {
        prop: state.prop + suffix,
    })
}

pub fn update_prop(value: &'static str) -> Action<TestState> {
    Action::update("update_prop", move |state: TestState| async move {
        Ok(TestState {
            prop: value.to_string(),
            ..state
        })
    })
}

/// Let spawned queue tasks make progress on the current-thread runtime
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
