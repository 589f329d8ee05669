use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use thiserror::Error;
use web_time::Instant;

use tally_core::{Action, CounterState, CounterStore, Unsubscribe};

#[derive(Debug, Error)]
pub enum DevtoolsError {
    #[error("failed to encode action: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode action: {0}")]
    Decode(#[source] serde_json::Error),
}

/// `{"kind":"Increment","amount":5.0}` / `{"kind":"Reset"}`
pub fn encode_action(action: &Action) -> Result<String, DevtoolsError> {
    serde_json::to_string(action).map_err(DevtoolsError::Encode)
}

/// Unrecognised kinds come back as [`Action::Unknown`].
pub fn decode_action(json: &str) -> Result<Action, DevtoolsError> {
    serde_json::from_str(json).map_err(DevtoolsError::Decode)
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub seq: u64,
    pub action: String,
    pub state: CounterState,
}

/// Bounded history of accepted actions and the state each one produced.
pub struct ActionLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_seq: u64,
    last_at: Option<Instant>,
    rate_smooth: f32,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            next_seq: 1,
            last_at: None,
            rate_smooth: 0.0,
        }
    }

    pub fn record(&mut self, action: &Action, state: &CounterState) {
        let action = match encode_action(action) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("devtools: {e}");
                return;
            }
        };

        let now = Instant::now();
        if let Some(prev) = self.last_at.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let rate = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.rate_smooth = if self.rate_smooth == 0.0 {
                    rate
                } else {
                    (1.0 - a) * self.rate_smooth + a * rate
                };
            }
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        log::debug!("#{} {} -> {:?}", self.next_seq, action, state);
        self.entries.push_back(LogEntry {
            seq: self.next_seq,
            action,
            state: *state,
        });
        self.next_seq += 1;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total actions recorded, including ones already evicted.
    pub fn recorded(&self) -> u64 {
        self.next_seq - 1
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// One line for a HUD or terminal.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("actions: {}", self.recorded()),
            format!("rate: {:.1}/s", self.rate_smooth),
        ];
        if let Some(last) = self.entries.back() {
            parts.push(format!("last: {}", last.action));
            parts.push(format!("count: {}", last.state.current_count()));
        }
        parts.join("  |  ")
    }
}

/// An [`ActionLog`] wired to a store.
pub struct Inspector {
    log: Rc<RefCell<ActionLog>>,
    handle: Unsubscribe,
}

impl Inspector {
    pub fn attach(store: &CounterStore, capacity: usize) -> Self {
        let log = Rc::new(RefCell::new(ActionLog::new(capacity)));
        let handle = store.observe_actions({
            let log = log.clone();
            move |action: &Action, _prev: &CounterState, next: &CounterState| {
                log.borrow_mut().record(action, next);
            }
        });
        Self { log, handle }
    }

    pub fn log(&self) -> std::cell::Ref<'_, ActionLog> {
        self.log.borrow()
    }

    pub fn summary(&self) -> String {
        self.log.borrow().summary()
    }

    pub fn detach(&self) {
        self.handle.run();
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_active()
    }
}

impl Drop for Inspector {
    fn drop(&mut self) {
        self.handle.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{increment_by_amount, reset};

    #[test]
    fn test_encode_wire_shapes() {
        assert_eq!(
            encode_action(&increment_by_amount(5.0)).unwrap(),
            r#"{"kind":"Increment","amount":5.0}"#
        );
        assert_eq!(encode_action(&reset()).unwrap(), r#"{"kind":"Reset"}"#);
    }

    #[test]
    fn test_decode_wire_shapes() {
        assert_eq!(
            decode_action(r#"{"kind":"Increment","amount":3}"#).unwrap(),
            increment_by_amount(3.0)
        );
        assert_eq!(decode_action(r#"{"kind":"Reset"}"#).unwrap(), reset());
    }

    #[test]
    fn test_decode_unknown_kind() {
        assert_eq!(
            decode_action(r#"{"kind":"Decrement"}"#).unwrap(),
            Action::Unknown
        );
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            decode_action("{not json"),
            Err(DevtoolsError::Decode(_))
        ));
        assert!(matches!(
            decode_action(r#"{"kind":"Increment"}"#),
            Err(DevtoolsError::Decode(_))
        ));
    }

    #[test]
    fn test_state_wire_name() {
        let json = serde_json::to_string(&CounterState::new(2.0)).unwrap();
        assert_eq!(json, r#"{"currentCount":2.0}"#);
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = ActionLog::new(2);
        for i in 1..=3 {
            log.record(&increment_by_amount(1.0), &CounterState::new(i as f64));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.recorded(), 3);
        let seqs: Vec<u64> = log.entries().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![2, 3]);
    }

    #[test]
    fn test_inspector_records_store_changes() {
        let store = CounterStore::new();
        let inspector = Inspector::attach(&store, 16);

        store.dispatch(increment_by_amount(5.0));
        store.dispatch(increment_by_amount(0.0));
        store.dispatch(reset());

        {
            let log = inspector.log();
            let got: Vec<(String, f64)> = log
                .entries()
                .map(|e| (e.action.clone(), e.state.current_count()))
                .collect();
            assert_eq!(
                got,
                vec![
                    (r#"{"kind":"Increment","amount":5.0}"#.to_string(), 5.0),
                    (r#"{"kind":"Reset"}"#.to_string(), 0.0),
                ]
            );
        }
        assert!(inspector.summary().contains("actions: 2"));

        inspector.detach();
        store.dispatch(increment_by_amount(1.0));
        assert_eq!(inspector.log().recorded(), 2);
        assert!(!inspector.is_attached());
    }

    #[test]
    fn test_dropping_inspector_stops_recording() {
        let store = CounterStore::new();
        let inspector = Inspector::attach(&store, 16);
        assert_eq!(store.observer_count(), 1);

        drop(inspector);
        assert_eq!(store.observer_count(), 0);
        store.dispatch(increment_by_amount(1.0));
        assert_eq!(store.select(tally_core::current_count), 1.0);
    }
}
