use std::fmt::Debug;

use crate::action::Action;

// State holder pattern
pub trait StateHolder: 'static {
    type State: Clone + PartialEq + Debug + 'static;
    type Action: Debug + 'static;

    fn initial_state() -> Self::State;
    fn reduce(state: &Self::State, action: &Self::Action) -> Self::State;
}

/// Snapshot of the counter. Replaced wholesale on every accepted action.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CounterState {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "finite_or_zero"))]
    current_count: f64,
}

impl CounterState {
    /// Non-finite counts (NaN, ±inf) become `0`, so a snapshot is always finite.
    pub const fn new(current_count: f64) -> Self {
        if current_count.is_finite() {
            Self { current_count }
        } else {
            Self { current_count: 0.0 }
        }
    }

    pub const fn current_count(&self) -> f64 {
        self.current_count
    }
}

#[cfg(feature = "serde")]
fn finite_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = <f64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(CounterState::new(v).current_count)
}

/// The counter domain: `Increment` adds, `Reset` zeroes, anything else is ignored.
pub struct Counter;

impl StateHolder for Counter {
    type State = CounterState;
    type Action = Action;

    fn initial_state() -> CounterState {
        CounterState::default()
    }

    fn reduce(state: &CounterState, action: &Action) -> CounterState {
        match *action {
            Action::Increment { amount } => {
                if !amount.is_finite() {
                    return *state;
                }
                let next = state.current_count + amount;
                // finite + finite can still overflow to inf
                if !next.is_finite() {
                    return *state;
                }
                CounterState::new(next)
            }
            Action::Reset => CounterState::new(0.0),
            Action::Unknown => *state,
        }
    }
}

/// Free-function form of [`Counter::reduce`].
pub fn reduce(state: &CounterState, action: &Action) -> CounterState {
    Counter::reduce(state, action)
}

/// Selector for the count itself.
pub fn current_count(state: &CounterState) -> f64 {
    state.current_count
}
