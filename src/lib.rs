//! flatbind
//!
//! Lowers annotated host declarations into a flat C binding surface: a C
//! header, C++ wrapper definitions and a function-pointer table.
//!
//! The pipeline lives in separate crates:
//!
//! - [`flatbind_core`]: declaration model, export records, diagnostics
//! - [`flatbind_registry`]: the insertion-ordered record registry
//! - [`flatbind_lowering`]: record, field, pointer and function lowering
//! - [`flatbind_emit`]: text emission
//!
//! [`Exporter`] drives all of them with one [`ExportConfig`].

mod config;
mod exporter;

pub use config::ExportConfig;
pub use exporter::{ExportOutput, Exporter};

pub use flatbind_core::{DeclarationModel, Diagnostics};
pub use flatbind_emit::{Bindings, EmitError, EmitOptions};
pub use flatbind_lowering::{LoweringOptions, LoweringOutput};
pub use flatbind_registry::TypeRegistry;
