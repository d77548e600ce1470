//! Error types for lowering.
//!
//! Every variant is fatal to the smallest enclosing entity (one field, one
//! record, one function) and never to the whole run. The lowering pass turns
//! each error into an error [`Diagnostic`](crate::Diagnostic) at the entity
//! boundary and moves on. Messages leave the site out; the diagnostic
//! renders it.

use thiserror::Error;

use crate::SourceSite;

/// Errors raised while lowering a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoweringError {
    /// A referenced type has no resolvable export record.
    #[error("{name} is not exported")]
    NotExported {
        /// Site of the referencing declaration.
        site: SourceSite,
        /// The unresolved type name.
        name: String,
    },

    /// A value-type export candidate is not trivially copyable.
    #[error("{name} is not a POD type, consider exporting it as a handle")]
    NotPod {
        /// Site of the record declaration.
        site: SourceSite,
        /// The record name.
        name: String,
    },

    /// A type in a math namespace matched none of the known name fragments.
    #[error("could not classify math type {name}")]
    UnknownSpecialType {
        /// Site of the field that referenced the type.
        site: SourceSite,
        /// The full type spelling.
        name: String,
    },

    /// A rename directive was given something other than a string literal.
    #[error("rename directive expects a string literal argument, found `{expr}`")]
    InvalidDirectiveArgument {
        /// Site of the annotated declaration.
        site: SourceSite,
        /// The offending argument expression.
        expr: String,
    },

    /// The type category cannot be represented in the flat surface.
    #[error("type {name} cannot be exported")]
    UnsupportedType {
        /// Site of the declaration using the type.
        site: SourceSite,
        /// The type spelling.
        name: String,
    },

    /// An opaque handle type was passed or returned by value.
    #[error("handle type {name} cannot cross the boundary by value, use a pointer")]
    HandleByValue {
        /// Site of the function declaration.
        site: SourceSite,
        /// The handle type name.
        name: String,
    },

    /// A wrapper parameter collides with another parameter of the same
    /// wrapper, including the ones the wrapper adds itself.
    #[error("parameter {name} of {function} clashes with another wrapper parameter")]
    ParameterNameClash {
        /// Site of the function declaration.
        site: SourceSite,
        /// The host function name.
        function: String,
        /// The colliding C parameter name.
        name: String,
    },
}

impl LoweringError {
    /// Get the site where this error occurred.
    pub fn site(&self) -> &SourceSite {
        match self {
            LoweringError::NotExported { site, .. }
            | LoweringError::NotPod { site, .. }
            | LoweringError::UnknownSpecialType { site, .. }
            | LoweringError::InvalidDirectiveArgument { site, .. }
            | LoweringError::UnsupportedType { site, .. }
            | LoweringError::HandleByValue { site, .. }
            | LoweringError::ParameterNameClash { site, .. } => site,
        }
    }

    /// Shorthand for [`LoweringError::NotExported`].
    pub fn not_exported(site: &SourceSite, name: impl Into<String>) -> Self {
        LoweringError::NotExported {
            site: site.clone(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_leaves_site_to_diagnostic() {
        let err = LoweringError::not_exported(&SourceSite::new("a.hpp", 3, 1), "engine::Mesh");
        assert_eq!(err.to_string(), "engine::Mesh is not exported");
        assert_eq!(err.site().line, 3);
    }

    #[test]
    fn not_pod_suggests_handle() {
        let err = LoweringError::NotPod {
            site: SourceSite::unknown(),
            name: "Texture".into(),
        };
        assert!(err.to_string().contains("consider exporting it as a handle"));
    }
}
