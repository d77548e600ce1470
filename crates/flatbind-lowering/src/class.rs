//! Record lowering.
//!
//! A record is exported either as an opaque handle or as a value struct whose
//! fields are lowered one by one. Fields of math value types trigger
//! synthesis of the matching math record first.

use flatbind_core::{Directives, ExportRecord, LoweredField, LoweringError, RecordDecl};

use crate::LoweringPass;
use crate::reservation::Reservation;

impl LoweringPass<'_> {
    /// Lower `decl` into the registry.
    ///
    /// Returns `Ok(())` without registering anything when the record is not
    /// lowerable, not annotated, already registered, already being lowered,
    /// already failed, or ignored. A record that resolved through the reserved
    /// name of an enclosing record is staged until that record commits.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn lower_class(&mut self, decl: &RecordDecl) -> Result<(), LoweringError> {
        if !decl.is_lowerable() {
            tracing::trace!(name = %decl.name, "skipping incomplete, dependent or invalid record");
            return Ok(());
        }
        let Some(directives) = &decl.export else {
            return Ok(());
        };
        if self.is_settled(&decl.name) {
            return Ok(());
        }
        if directives.is_ignored() {
            tracing::debug!(name = %decl.name, "record ignored");
            return Ok(());
        }

        let lowered = self.lower_annotated(decl, directives);
        if lowered.is_err() {
            self.failed.insert(decl.name.clone());
        }
        lowered
    }

    fn lower_annotated(
        &mut self,
        decl: &RecordDecl,
        directives: &Directives,
    ) -> Result<(), LoweringError> {
        let exported_name = match directives.rename(&decl.site)? {
            Some(name) => name.to_string(),
            None => decl.name.exported_identifier(),
        };

        if directives.is_handle() {
            self.registry
                .insert(decl.name.clone(), ExportRecord::Handle { exported_name });
            return Ok(());
        }

        if !decl.is_pod {
            return Err(LoweringError::NotPod {
                site: decl.site.clone(),
                name: decl.name.to_string(),
            });
        }

        self.in_progress
            .push(Reservation::new(decl.name.clone(), exported_name.clone()));
        let fields = self.lower_fields(decl);
        let Some(reservation) = self.in_progress.pop() else {
            unreachable!("reservation of {} released early", decl.name);
        };

        match fields {
            Ok(fields) => {
                let record = ExportRecord::Value {
                    exported_name,
                    fields,
                };
                self.commit(reservation, &decl.site, record);
                Ok(())
            }
            Err(error) => {
                self.discard(reservation);
                Err(error)
            }
        }
    }

    fn lower_fields(&mut self, decl: &RecordDecl) -> Result<Vec<LoweredField>, LoweringError> {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            // Pointees synthesize their math record while being resolved.
            if !field.ty.is_pointer()
                && let Err(error) = self.expand_math_field(field)
            {
                self.diagnostics.add_error(error);
            }
            fields.push(self.lower_field(field)?);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use flatbind_core::{
        Access, Directive, DirectiveArg, Directives, ExportRecord, FieldDecl, RecordDecl, TypeDesc,
    };

    use crate::fixtures::{Harness, float, int};

    #[test]
    fn value_record_keeps_field_order() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("engine::Color")
                .exported(Directives::new())
                .with_field(FieldDecl::new("r", float()))
                .with_field(FieldDecl::new("g", float()))
                .with_field(FieldDecl::new("b", float())),
        );

        let output = h.run();
        assert!(output.diagnostics.is_empty());

        let record = h.record("engine::Color").unwrap();
        assert_eq!(record.exported_name(), "engine__Color");
        let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["r", "g", "b"]);
        assert!(record.fields().iter().all(|f| f.type_name.as_deref() == Some("float")));
    }

    #[test]
    fn handle_record_has_no_fields() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("engine::Texture")
                .exported(vec![Directive::AsHandle])
                .with_field(FieldDecl::new("id", int()))
                .non_pod(),
        );

        h.run();
        let record = h.record("engine::Texture").unwrap();
        assert!(record.is_handle());
        assert!(record.fields().is_empty());
    }

    #[test]
    fn rename_overrides_default_name() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("engine::detail::Light")
                .exported(vec![Directive::rename("Light"), Directive::AsHandle]),
        );

        h.run();
        assert_eq!(h.record("engine::detail::Light").unwrap().exported_name(), "Light");
    }

    #[test]
    fn ignored_record_is_not_registered() {
        let mut h = Harness::new();
        h.add(RecordDecl::new("Internal").exported(vec![Directive::AsHandle, Directive::Ignore]));

        let output = h.run();
        assert!(h.record("Internal").is_none());
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn unlowerable_records_are_skipped() {
        let mut h = Harness::new();
        h.add(RecordDecl::new("Forward").exported(Directives::new()).incomplete());
        let mut dependent = RecordDecl::new("Dependent").exported(Directives::new());
        dependent.is_dependent = true;
        h.add(dependent);

        let output = h.run();
        assert!(h.registry.is_empty());
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn not_pod_is_isolated() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("Before")
                .exported(Directives::new())
                .with_field(FieldDecl::new("a", int())),
        );
        h.add(RecordDecl::new("Heavy").exported(Directives::new()).non_pod());
        h.add(
            RecordDecl::new("After")
                .exported(Directives::new())
                .with_field(FieldDecl::new("b", int())),
        );

        let output = h.run();
        assert!(h.record("Heavy").is_none());
        assert!(h.record("Before").is_some());
        assert!(h.record("After").is_some());
        assert_eq!(output.diagnostics.error_count(), 1);
        let error = output.diagnostics.errors().next().unwrap();
        assert!(error.message.contains("consider exporting it as a handle"));
    }

    #[test]
    fn repeated_registration_is_a_no_op() {
        let mut h = Harness::new();
        let decl = RecordDecl::new("Point")
            .exported(Directives::new())
            .with_field(FieldDecl::new("x", int()));
        h.add(decl.clone());
        h.add(decl);

        let output = h.run();
        assert_eq!(output.records_registered, 1);
        assert_eq!(h.registry.len(), 1);
    }

    #[test]
    fn invalid_rename_aborts_record() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("Named")
                .exported(vec![Directive::Rename(DirectiveArg::Expr("kName".into()))]),
        );

        let output = h.run();
        assert!(h.record("Named").is_none());
        assert_eq!(output.diagnostics.error_count(), 1);
    }

    #[test]
    fn value_field_of_unexported_type_fails() {
        let mut h = Harness::new();
        h.declare(RecordDecl::new("Hidden").with_field(FieldDecl::new("x", int())));
        h.add(
            RecordDecl::new("Outer")
                .exported(Directives::new())
                .with_field(FieldDecl::new("inner", TypeDesc::record("Hidden", 4, 4))),
        );

        let output = h.run();
        assert!(h.record("Outer").is_none());
        let error = output.diagnostics.errors().next().unwrap();
        assert!(error.message.contains("Hidden is not exported"));
    }

    #[test]
    fn value_field_of_registered_type_uses_exported_name() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("engine::Vec2i")
                .exported(vec![Directive::rename("Vec2i")])
                .with_field(FieldDecl::new("x", int()))
                .with_field(FieldDecl::new("y", int())),
        );
        h.add(
            RecordDecl::new("engine::Rect")
                .exported(Directives::new())
                .with_field(FieldDecl::new("origin", TypeDesc::record("engine::Vec2i", 8, 4)))
                .with_field(FieldDecl::new("size", TypeDesc::record("engine::Vec2i", 8, 4))),
        );

        h.run();
        let rect = h.record("engine::Rect").unwrap();
        assert_eq!(rect.fields()[0].type_name.as_deref(), Some("Vec2i"));
        assert_eq!(rect.fields()[0].size, 8);
    }

    #[test]
    fn non_public_field_warns_but_exports() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("Secretive")
                .exported(Directives::new())
                .with_field(FieldDecl::new("hidden", int()).with_access(Access::Private)),
        );

        let output = h.run();
        assert!(h.record("Secretive").is_some());
        assert_eq!(output.diagnostics.warning_count(), 1);
        assert!(!output.diagnostics.has_errors());
    }

    #[test]
    fn self_containing_value_type_fails_deterministically() {
        let mut h = Harness::new();
        h.add(
            RecordDecl::new("Loop")
                .exported(Directives::new())
                .with_field(FieldDecl::new("again", TypeDesc::record("Loop", 4, 4))),
        );

        let first = h.run();
        assert!(h.record("Loop").is_none());
        assert_eq!(first.diagnostics.error_count(), 1);

        let second = h.run();
        assert_eq!(first.diagnostics.to_string(), second.diagnostics.to_string());
    }

    #[test]
    fn failed_record_is_reported_once() {
        let mut h = Harness::new();
        let heavy = RecordDecl::new("Heavy").exported(Directives::new()).non_pod();
        h.add(heavy.clone());
        h.add(heavy);

        let output = h.run();
        assert_eq!(output.diagnostics.error_count(), 1);
    }

    #[test]
    fn value_field_of_record_pointing_back_commits_it_first() {
        let mut h = Harness::new();
        let node = || TypeDesc::record("Node", 16, 8);
        h.add(
            RecordDecl::new("Tree")
                .exported(Directives::new())
                .with_field(FieldDecl::new("cursor", TypeDesc::pointer_to(node())))
                .with_field(FieldDecl::new("root", node())),
        );
        h.declare(
            RecordDecl::new("Node")
                .exported(Directives::new())
                .with_field(FieldDecl::new(
                    "tree",
                    TypeDesc::pointer_to(TypeDesc::record("Tree", 24, 8)),
                )),
        );

        let output = h.run();
        assert!(output.diagnostics.is_empty(), "{}", output.diagnostics);
        let order: Vec<&str> = h.registry.iter().map(|(_, r)| r.exported_name()).collect();
        assert_eq!(order, vec!["Node", "Tree"]);
        assert_eq!(h.record("Tree").unwrap().fields()[1].type_name.as_deref(), Some("Node"));
    }

    #[test]
    fn registry_holds_exact_record() {
        let mut h = Harness::new();
        h.add(RecordDecl::new("Tag").exported(vec![Directive::AsHandle]));
        h.run();
        assert_eq!(
            h.record("Tag"),
            Some(&ExportRecord::Handle {
                exported_name: "Tag".into()
            })
        );
    }
}
