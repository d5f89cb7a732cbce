//! Store errors

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Store service unavailable")]
    Unavailable,
}

impl StoreError {
    /// True for the "target does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ZoneNotFound(_) | StoreError::HostNotFound(_) | StoreError::GroupNotFound(_)
        )
    }
}
