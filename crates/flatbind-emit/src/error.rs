use std::fmt;

use thiserror::Error;

/// Errors that stop emission.
///
/// Lowering guarantees owners are registered before their functions, so
/// [`EmitError::MissingOwner`] only shows up when functions and registry
/// come from different runs.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Writing into the output buffer failed.
    #[error("failed to format output: {0}")]
    Format(#[from] fmt::Error),

    /// A member function whose owner is not in the registry.
    #[error("{function}: owner {owner} is not in the registry")]
    MissingOwner { function: String, owner: String },
}
