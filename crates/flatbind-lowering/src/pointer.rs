//! Pointee resolution.
//!
//! Pointers are the only way lowering one record can register another: a
//! pointee that carries an export annotation but has not been lowered yet is
//! lowered on the spot. Records that point at each other work because a
//! record being lowered already has its exported name reserved; see
//! `reservation` for how records that rely on such a name are held back.

use flatbind_core::{ExportRecord, LoweringError, SourceSite, TypeDesc, normalize_scalar};

use crate::LoweringPass;

impl LoweringPass<'_> {
    /// Export record of a registered record type.
    ///
    /// Tries the spelling first, then the backing declaration.
    pub(crate) fn registered(&self, ty: &TypeDesc) -> Option<&ExportRecord> {
        self.registry
            .lookup(&ty.qualified_name())
            .or_else(|| self.registry.lookup(&ty.decl_name()))
    }

    pub(crate) fn registered_name(&self, ty: &TypeDesc) -> Option<String> {
        self.registered(ty)
            .map(|record| record.exported_name().to_string())
    }

    /// C name of a pointee, registering the pointee on demand.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn lower_pointee(
        &mut self,
        pointee: &TypeDesc,
        site: &SourceSite,
    ) -> Result<String, LoweringError> {
        if pointee.is_builtin() {
            return Ok(normalize_scalar(&pointee.name));
        }
        if !pointee.is_record() {
            return Err(LoweringError::UnsupportedType {
                site: site.clone(),
                name: pointee.spelling(),
            });
        }
        if let Some(name) = self.expand_math_type(pointee, site)? {
            return Ok(name);
        }
        if let Some(name) = self.registered_name(pointee) {
            return Ok(name);
        }

        let decl_name = pointee.decl_name();
        if let Some(reserved) = self.reserved_name(&decl_name) {
            tracing::trace!(name = %decl_name, "pointer back into a record being lowered");
            return Ok(reserved);
        }

        let records = self.records;
        let decl = match records.record(&decl_name) {
            Some(decl) if decl.export.is_some() => decl,
            _ => return Err(LoweringError::not_exported(site, pointee.name.clone())),
        };
        if self.depth >= self.options.max_depth {
            tracing::warn!(name = %decl_name, depth = self.depth, "pointee nesting too deep");
            return Err(LoweringError::not_exported(site, pointee.name.clone()));
        }

        tracing::debug!(name = %decl_name, depth = self.depth, "lowering pointee on demand");
        self.depth += 1;
        let lowered = self.lower_class(decl);
        self.depth -= 1;
        if let Err(error) = lowered {
            self.diagnostics.add_error(error);
        }

        if let Some(name) = self.registry.exported_name(&decl.name) {
            return Ok(name.to_string());
        }
        self.staged_name(&decl.name)
            .ok_or_else(|| LoweringError::not_exported(site, pointee.name.clone()))
    }
}
