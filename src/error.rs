/// Validation failures surfaced before any gadget is generated.
///
/// Inconsistencies inside the composers (name collisions, call arities)
/// are programmer errors and panic in the document builder instead.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("algorithm type {0} is not supported (expected PICNIC or KKW)")]
    UnsupportedVariant(String),
    #[error("at least {min} parties are required, got {got}")]
    TooFewParties { min: usize, got: usize },
    #[error("block size {0} is not a positive multiple of the S-box width (3)")]
    BlockSize(usize),
    #[error("at least one LowMC round is required")]
    NoRounds,
    #[error("output format {0} is not supported (expected mv or bin)")]
    UnsupportedFormat(String),
    #[error("claim set {0} is not supported (expected top-level or extended)")]
    UnsupportedClaimSet(String),
}

pub type Result<T> = std::result::Result<T, Error>;
