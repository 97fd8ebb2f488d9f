use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use tracing::debug;

use crate::error::ValidationError;
use crate::state::LightState;

/// Holder of the single light state.
///
/// Created once at startup and handed to the web server as managed state.
/// Every update replaces the whole state under one lock, so readers never
/// observe fields belonging to a different mode.
#[derive(Debug, Default)]
pub(crate) struct LightStore {
    state: Mutex<LightState>,
}

impl LightStore {
    // Light starts switched off.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // Current light state.
    pub(crate) fn get(&self) -> LightState {
        *self.lock()
    }

    // Validates the input and, when it is valid, replaces the current state.
    //
    // On error the stored state is left untouched.
    pub(crate) fn set(&self, input: &Value) -> Result<LightState, ValidationError> {
        let state = LightState::validate(input)?;

        let mut current = self.lock();
        debug!("Light state change {:?} -> {:?}", current.mode(), state.mode());
        *current = state;

        Ok(state)
    }

    // The state is always written whole, so a poisoned lock still holds a
    // consistent value.
    fn lock(&self) -> MutexGuard<'_, LightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use serde_json::json;

    use super::*;
    use crate::state::{Color, Rainbow};

    #[test]
    fn starts_off() {
        let store = LightStore::new();
        assert_eq!(store.get(), LightState::Off);
        assert_eq!(serde_json::to_value(store.get()).unwrap(), json!({"mode": "off"}));
    }

    #[test]
    fn set_returns_what_get_reads() {
        let store = LightStore::new();
        let state = store
            .set(&json!({"mode": "color", "red": "200", "brightness": 100}))
            .unwrap();

        assert_eq!(
            state,
            LightState::Color(Color {
                red: 200,
                green: 0,
                blue: 0,
                white: 0,
                brightness: 100,
            })
        );
        assert_eq!(store.get(), state);
    }

    #[test]
    fn set_is_idempotent() {
        let store = LightStore::new();
        let input = json!({"mode": "flash", "red": 1, "interval": "20"});

        let first = store.set(&input).unwrap();
        let second = store.set(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get(), second);
    }

    #[test]
    fn mode_change_drops_previous_fields() {
        let store = LightStore::new();
        store
            .set(&json!({"mode": "color", "red": 10, "green": 20}))
            .unwrap();
        store.set(&json!({"mode": "off"})).unwrap();

        assert_eq!(serde_json::to_value(store.get()).unwrap(), json!({"mode": "off"}));
    }

    #[test]
    fn failed_set_keeps_previous_state() {
        let store = LightStore::new();
        let before = store.set(&json!({"mode": "rainbow"})).unwrap();

        assert_eq!(
            store.set(&json!({"mode": "strobe"})),
            Err(ValidationError::UnknownMode("strobe".into()))
        );
        assert_eq!(
            store.set(&json!({"mode": "flash", "interval": 300})),
            Err(ValidationError::OutOfRange {
                field: "interval",
                value: 300
            })
        );
        assert_eq!(store.set(&json!({})), Err(ValidationError::MissingMode));
        assert_eq!(
            store.set(&json!({"mode": "rainbow", "interval": "abc"})),
            Err(ValidationError::BadFieldType { field: "interval" })
        );

        assert_eq!(
            store.get(),
            LightState::Rainbow(Rainbow {
                interval: 50,
                brightness: 255,
            })
        );
        assert_eq!(store.get(), before);
    }

    #[test]
    fn concurrent_updates_stay_consistent() {
        let store = LightStore::new();
        let inputs = [
            json!({"mode": "color", "red": 1}),
            json!({"mode": "rainbow", "interval": 2}),
            json!({"mode": "flash", "white": 3}),
            json!({"mode": "off"}),
        ];

        thread::scope(|scope| {
            for input in &inputs {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..100 {
                        store.set(input).unwrap();
                        let state = serde_json::to_value(store.get()).unwrap();
                        let fields = state.as_object().unwrap().len();
                        let expected = match state["mode"].as_str().unwrap() {
                            "off" => 1,
                            "color" => 6,
                            "rainbow" => 3,
                            "flash" => 7,
                            other => panic!("unexpected mode {other}"),
                        };
                        assert_eq!(fields, expected);
                    }
                });
            }
        });

        let last = store.get();
        assert!(inputs
            .iter()
            .any(|input| LightState::validate(input).unwrap() == last));
    }
}
