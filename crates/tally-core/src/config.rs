/// Store tuning knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StoreConfig {
    /// Upper bound on the actions one outer dispatch may run, itself plus
    /// everything callbacks dispatch while it is in flight.
    pub max_cascade: usize,
    /// Log every accepted action at debug level.
    pub trace_actions: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_cascade: 1024,
            trace_actions: false,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_cascade(mut self, max_cascade: usize) -> Self {
        self.max_cascade = max_cascade.max(1);
        self
    }

    pub fn trace_actions(mut self, on: bool) -> Self {
        self.trace_actions = on;
        self
    }
}
