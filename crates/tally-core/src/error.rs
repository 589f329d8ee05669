use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("dispatch called while another dispatch is in flight")]
    ReentrantDispatch,
    #[error("dispatch cascaded past {limit} actions")]
    CascadeLimit { limit: usize },
}
