//! The lowering pass.
//!
//! Declarations are fed one at a time in discovery order. Records may be
//! registered out of that order when a pointer needs its pointee resolved
//! first. A failure aborts only the entity being lowered; the error lands in
//! [`Diagnostics`] and the pass moves on.

use rustc_hash::{FxHashMap, FxHashSet};

use flatbind_core::{
    Diagnostics, ExportedFunction, FunctionDecl, Item, QualifiedName, RecordDecl, RecordSource,
};
use flatbind_registry::TypeRegistry;

use crate::LoweringOptions;
use crate::reservation::{Reservation, Staged};

/// Output of a lowering run.
#[derive(Debug, Default)]
pub struct LoweringOutput {
    /// Exported functions in registration order.
    pub functions: Vec<ExportedFunction>,
    /// Records added to the registry during the run.
    pub records_registered: usize,
    /// Errors and warnings of the run.
    pub diagnostics: Diagnostics,
}

/// Lowers records and functions into a borrowed [`TypeRegistry`].
pub struct LoweringPass<'a> {
    pub(crate) registry: &'a mut TypeRegistry,
    pub(crate) records: &'a dyn RecordSource,
    pub(crate) options: &'a LoweringOptions,
    pub(crate) diagnostics: Diagnostics,
    /// Exported functions in registration order.
    pub(crate) functions: Vec<ExportedFunction>,
    /// Qualified names of lowered functions.
    pub(crate) seen_functions: FxHashSet<QualifiedName>,
    /// Records whose fields are being lowered, outermost first. Pointers back
    /// into one of these resolve to its reserved name.
    pub(crate) in_progress: Vec<Reservation>,
    /// Finished records held back until the reservations they resolved
    /// through commit.
    pub(crate) staged: FxHashMap<QualifiedName, Staged>,
    /// Records whose lowering already failed and was reported.
    pub(crate) failed: FxHashSet<QualifiedName>,
    /// Current nesting of pointer-triggered record lowering.
    pub(crate) depth: usize,
    initial_records: usize,
}

impl<'a> LoweringPass<'a> {
    /// Create a pass over `registry`, resolving pointees through `records`.
    pub fn new(
        registry: &'a mut TypeRegistry,
        records: &'a dyn RecordSource,
        options: &'a LoweringOptions,
    ) -> Self {
        let initial_records = registry.len();
        Self {
            registry,
            records,
            options,
            diagnostics: Diagnostics::new(),
            functions: Vec::new(),
            seen_functions: FxHashSet::default(),
            in_progress: Vec::new(),
            staged: FxHashMap::default(),
            failed: FxHashSet::default(),
            depth: 0,
            initial_records,
        }
    }

    /// Lower a whole discovery stream and finish.
    #[tracing::instrument(level = "debug", skip_all, fields(items = items.len()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, items: &[Item]) -> LoweringOutput {
        for item in items {
            self.lower_item(item);
        }
        self.finish()
    }

    /// Lower one entry of the discovery stream.
    pub fn lower_item(&mut self, item: &Item) {
        match item {
            Item::Record(name) => {
                let records = self.records;
                match records.record(name) {
                    Some(decl) => {
                        self.lower_record(decl);
                    }
                    None => tracing::warn!(%name, "discovered record has no declaration"),
                }
            }
            Item::Function(decl) => {
                self.lower_function(decl);
            }
        }
    }

    /// Lower one record declaration.
    ///
    /// Returns whether the record is registered afterwards. Errors are
    /// recorded in the diagnostics.
    pub fn lower_record(&mut self, decl: &RecordDecl) -> bool {
        if let Err(error) = self.lower_class(decl) {
            tracing::debug!(name = %decl.name, %error, "record lowering failed");
            self.diagnostics.add_error(error);
        }
        self.registry.contains(&decl.name)
    }

    /// Lower one function declaration.
    ///
    /// Returns whether a new exported function was appended. Errors are
    /// recorded in the diagnostics.
    pub fn lower_function(&mut self, decl: &FunctionDecl) -> bool {
        match self.lower_function_decl(decl) {
            Ok(Some(function)) => {
                tracing::debug!(
                    name = %function.original_name,
                    exported = %function.exported_name,
                    "function lowered"
                );
                self.seen_functions.insert(function.original_name.clone());
                self.functions.push(function);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::debug!(name = %decl.name, %error, "function lowering failed");
                self.diagnostics.add_error(error);
                false
            }
        }
    }

    /// Functions lowered so far.
    pub fn functions(&self) -> &[ExportedFunction] {
        &self.functions
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Finish the run and hand back its output.
    pub fn finish(self) -> LoweringOutput {
        LoweringOutput {
            records_registered: self.registry.len() - self.initial_records,
            functions: self.functions,
            diagnostics: self.diagnostics,
        }
    }
}
