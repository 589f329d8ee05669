/// A requested transition of the counter.
///
/// With the `serde` feature the wire form is internally tagged on `kind`:
/// `{"kind":"Increment","amount":5}` or `{"kind":"Reset"}`. Kinds this build
/// doesn't know decode to [`Action::Unknown`], which the reducer ignores.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind")
)]
pub enum Action {
    Increment {
        amount: f64,
    },
    Reset,
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Increment { .. } => "Increment",
            Action::Reset => "Reset",
            Action::Unknown => "Unknown",
        }
    }
}

pub fn increment_by_amount(amount: f64) -> Action {
    Action::Increment { amount }
}

pub fn reset() -> Action {
    Action::Reset
}
