pub use crate::action::{Action, increment_by_amount, reset};
pub use crate::config::StoreConfig;
pub use crate::effects::Unsubscribe;
pub use crate::error::StoreError;
pub use crate::input::{dispatch_amount, parse_amount};
pub use crate::scope::Scope;
pub use crate::state::{Counter, CounterState, StateHolder, current_count, reduce};
pub use crate::store::{CounterStore, Store};
