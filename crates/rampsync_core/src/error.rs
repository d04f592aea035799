//! Error types for ramp reconciliation.
use thiserror::Error;

/// Reasons a ramp operation was refused.
///
/// None of these are fatal: the public view surface reports them as `false`
/// or `None` and leaves every parameter untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RampError {
    #[error("Point index {index} is out of range for {len} points")]
    OutOfRange { index: i64, len: usize },

    #[error("Ramp has no points")]
    EmptyRamp,

    #[error("Parameter handle is stale")]
    StaleReference,

    #[error("Owning asset is cooking")]
    MidCook,

    #[error("Batch arrays differ in length: {indices} indices, {positions} positions, {values} values, {interpolations} interpolations")]
    MismatchedBatchLengths {
        indices: usize,
        positions: usize,
        values: usize,
        interpolations: usize,
    },

    #[error("No point matched the removal request")]
    NothingRemoved,
}
