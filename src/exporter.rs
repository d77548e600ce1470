//! Export driver.
//!
//! An [`Exporter`] takes a [`DeclarationModel`] through lowering and
//! emission in one call.
//!
//! # Example
//!
//! ```
//! use flatbind::{Exporter, ExportConfig};
//! use flatbind_core::{DeclarationModel, Directive, FieldDecl, RecordDecl, TypeDesc};
//!
//! let mut model = DeclarationModel::new();
//! model.add_record(
//!     RecordDecl::new("engine::Size")
//!         .exported(vec![Directive::rename("Size")])
//!         .with_field(FieldDecl::new("width", TypeDesc::builtin("float", 4, 4)))
//!         .with_field(FieldDecl::new("height", TypeDesc::builtin("float", 4, 4))),
//! );
//!
//! let output = Exporter::new(ExportConfig::default()).run(&model).unwrap();
//! assert!(!output.diagnostics.has_errors());
//! assert!(output.bindings.header.contains("struct Size {"));
//! ```

use flatbind_core::{DeclarationModel, Diagnostics, ExportedFunction};
use flatbind_emit::{Bindings, EmitError, Emitter};
use flatbind_lowering::{LoweringOutput, LoweringPass};
use flatbind_registry::TypeRegistry;

use crate::ExportConfig;

/// Everything one export run produced.
#[derive(Debug)]
pub struct ExportOutput {
    pub bindings: Bindings,
    pub registry: TypeRegistry,
    pub functions: Vec<ExportedFunction>,
    /// Errors of entities left out of the bindings, and warnings.
    pub diagnostics: Diagnostics,
}

/// Runs lowering and emission with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Lower `model` into a fresh registry.
    pub fn lower(&self, model: &DeclarationModel) -> (TypeRegistry, LoweringOutput) {
        let mut registry = TypeRegistry::new();
        let output =
            LoweringPass::new(&mut registry, model, &self.config.lowering).run(model.items());
        (registry, output)
    }

    /// Lower `model` and emit its bindings.
    ///
    /// Entities that fail to lower are reported in the diagnostics and left
    /// out of the bindings; only emission itself can fail the run.
    #[tracing::instrument(level = "info", skip_all, fields(items = model.items().len()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&self, model: &DeclarationModel) -> Result<ExportOutput, EmitError> {
        let (registry, lowered) = self.lower(model);
        tracing::info!(
            records = registry.len(),
            functions = lowered.functions.len(),
            errors = lowered.diagnostics.error_count(),
            warnings = lowered.diagnostics.warning_count(),
            "lowering finished"
        );

        let bindings = Emitter::new(&registry, &lowered.functions, &self.config.emit).emit()?;
        Ok(ExportOutput {
            bindings,
            registry,
            functions: lowered.functions,
            diagnostics: lowered.diagnostics,
        })
    }
}
