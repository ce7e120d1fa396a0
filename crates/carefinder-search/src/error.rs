use thiserror::Error;

/// Why an address submit was refused before any lookup started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please enter an address")]
    EmptyAddress,

    /// A previous submit is still resolving.
    #[error("an address is already being resolved")]
    AlreadyResolving,
}

/// A list index that does not point at an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} is out of range for {len} entries")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}
