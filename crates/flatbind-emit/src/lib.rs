//! flatbind emission
//!
//! Renders a populated [`TypeRegistry`] and a list of [`ExportedFunction`]s
//! into three text artifacts:
//!
//! - **header**: C declarations of every record and wrapper prototype,
//!   usable from C and C++.
//! - **source**: C++ wrapper definitions that forward to the host
//!   declarations.
//! - **table**: a struct of function pointers with an optional static
//!   initializer, for consumers that bind at run time.
//!
//! Records are emitted in registration order and functions in lowering
//! order, so identical input always yields byte-identical output.
//!
//! # Example
//!
//! ```
//! use flatbind_core::{ExportRecord, LoweredField, QualifiedName};
//! use flatbind_emit::{EmitOptions, Emitter};
//! use flatbind_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! registry.insert(
//!     QualifiedName::parse("engine::Color"),
//!     ExportRecord::Value {
//!         exported_name: "Color".into(),
//!         fields: vec![LoweredField::typed("rgba", "uint32_t", 4, 4)],
//!     },
//! );
//!
//! let options = EmitOptions::default();
//! let bindings = Emitter::new(&registry, &[], &options).emit().unwrap();
//! assert!(bindings.header.contains("typedef struct Color Color;"));
//! assert!(bindings.header.contains("    uint32_t rgba;"));
//! ```

mod error;
mod header;
mod options;
mod signature;
mod source;
mod table;

#[cfg(test)]
mod test_support;

pub use error::EmitError;
pub use options::EmitOptions;
pub use signature::CSignature;

use flatbind_core::ExportedFunction;
use flatbind_registry::TypeRegistry;

/// The emitted text artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings {
    /// C header with record declarations and prototypes.
    pub header: String,
    /// C++ wrapper definitions.
    pub source: String,
    /// Function table declaration and optional initializer.
    pub table: String,
}

/// Renders one registry and its functions.
pub struct Emitter<'a> {
    registry: &'a TypeRegistry,
    functions: &'a [ExportedFunction],
    options: &'a EmitOptions,
}

impl<'a> Emitter<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        functions: &'a [ExportedFunction],
        options: &'a EmitOptions,
    ) -> Self {
        Self {
            registry,
            functions,
            options,
        }
    }

    /// Emit all three artifacts.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(records = self.registry.len(), functions = self.functions.len())
    )]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit(&self) -> Result<Bindings, EmitError> {
        let signatures = self.signatures()?;
        let bindings = Bindings {
            header: self.header(&signatures)?,
            source: self.source(&signatures)?,
            table: self.table(&signatures)?,
        };
        tracing::debug!(
            header = bindings.header.len(),
            source = bindings.source.len(),
            table = bindings.table.len(),
            "emitted bindings"
        );
        Ok(bindings)
    }

    /// Resolve every function signature, in function order.
    pub fn signatures(&self) -> Result<Vec<CSignature>, EmitError> {
        self.functions
            .iter()
            .map(|function| CSignature::resolve(function, self.registry))
            .collect()
    }
}

/// Shorthand for [`Emitter::emit`].
pub fn emit(
    registry: &TypeRegistry,
    functions: &[ExportedFunction],
    options: &EmitOptions,
) -> Result<Bindings, EmitError> {
    Emitter::new(registry, functions, options).emit()
}
