use flatbind_core::{Access, FieldDecl, LoweredField, LoweringError, normalize_scalar};

use crate::LoweringPass;

impl LoweringPass<'_> {
    /// Lower one data member of a value record.
    ///
    /// Value-typed record members must already be registered; only pointer
    /// members may pull their pointee into the registry.
    pub(crate) fn lower_field(&mut self, field: &FieldDecl) -> Result<LoweredField, LoweringError> {
        if field.access != Access::Public {
            self.diagnostics.add_warning(
                field.site.clone(),
                format!("field {} is not public, exporting it may be unsafe", field.name),
            );
        }

        let name = match field.directives.rename(&field.site)? {
            Some(name) => name.to_string(),
            None => field.name.clone(),
        };
        let ty = &field.ty;

        if field.directives.is_ignored() {
            return Ok(LoweredField::opaque(name, ty.size, ty.align));
        }

        if ty.is_pointer() {
            let pointee = ty
                .pointee
                .as_deref()
                .ok_or_else(|| unsupported(field))?;
            let type_name = self.lower_pointee(pointee, &field.site)?;
            return Ok(LoweredField {
                name,
                type_name: Some(type_name),
                is_pointer: true,
                size: ty.size,
                align: ty.align,
            });
        }

        if ty.is_builtin() && !ty.is_void() {
            return Ok(LoweredField::typed(name, normalize_scalar(&ty.name), ty.size, ty.align));
        }

        if ty.is_record() {
            let type_name = self
                .registered_name(ty)
                .or_else(|| self.staged_name(&ty.decl_name()))
                .ok_or_else(|| LoweringError::not_exported(&field.site, ty.name.clone()))?;
            return Ok(LoweredField::typed(name, type_name, ty.size, ty.align));
        }

        Err(unsupported(field))
    }
}

fn unsupported(field: &FieldDecl) -> LoweringError {
    LoweringError::UnsupportedType {
        site: field.site.clone(),
        name: field.ty.spelling(),
    }
}
