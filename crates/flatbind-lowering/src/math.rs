//! Math value type synthesis.
//!
//! Types from a math namespace (`glm::vec3`, `glm::mat4`, `glm::quat`...) are
//! never annotated by the user. The first time a field or pointer refers to
//! one, a flat value record is synthesized for it under a readable name such
//! as `Vector3`, keyed by the spelling used in the host code.
//!
//! Every field of the synthesized record takes the single element type found
//! at the family's template index, whatever the field's own declared type.

use flatbind_core::{
    ExportRecord, FieldDecl, LoweredField, LoweringError, MathFamily, RecognizedKind, SourceSite,
    TypeDesc, classify, normalize_scalar,
};

use crate::LoweringPass;

impl LoweringPass<'_> {
    /// Synthesize the math record a by-value field refers to. Fields of any
    /// other type are left alone.
    pub(crate) fn expand_math_field(&mut self, field: &FieldDecl) -> Result<(), LoweringError> {
        if field.ty.is_record() {
            self.expand_math_type(&field.ty, &field.site)?;
        }
        Ok(())
    }

    /// Make sure the math record for `ty` is registered.
    ///
    /// Returns its exported name, or `None` when `ty` is not a math type.
    /// Synthesis is idempotent.
    pub(crate) fn expand_math_type(
        &mut self,
        ty: &TypeDesc,
        site: &SourceSite,
    ) -> Result<Option<String>, LoweringError> {
        let (family, exported_name) = match classify(&ty.name, &self.options.math_namespaces) {
            RecognizedKind::Math {
                family,
                exported_name,
            } => (family, exported_name),
            RecognizedKind::UnknownMath => {
                return Err(LoweringError::UnknownSpecialType {
                    site: site.clone(),
                    name: ty.name.clone(),
                });
            }
            RecognizedKind::View(_) | RecognizedKind::Plain => return Ok(None),
        };

        let key = ty.qualified_name();
        if let Some(existing) = self.registry.exported_name(&key) {
            return Ok(Some(existing.to_string()));
        }

        let records = self.records;
        let decl = records
            .record(&ty.decl_name())
            .ok_or_else(|| LoweringError::not_exported(site, ty.name.clone()))?;
        let element = math_element(ty, family, site)?;

        tracing::debug!(name = %key, exported = %exported_name, %element, "synthesizing math record");
        let fields = decl
            .fields
            .iter()
            .map(|field| LoweredField::typed(&field.name, &element, field.ty.size, field.ty.align))
            .collect();
        let record = self.registry.insert(
            key,
            ExportRecord::Value {
                exported_name,
                fields,
            },
        );
        Ok(Some(record.exported_name().to_string()))
    }
}

/// The C element type of a math specialization.
fn math_element(ty: &TypeDesc, family: MathFamily, site: &SourceSite) -> Result<String, LoweringError> {
    match ty.type_arg(family.element_index()) {
        Some(element) if element.is_builtin() => Ok(normalize_scalar(&element.name)),
        Some(element) => Err(LoweringError::UnsupportedType {
            site: site.clone(),
            name: element.spelling(),
        }),
        None => Err(LoweringError::UnknownSpecialType {
            site: site.clone(),
            name: ty.name.clone(),
        }),
    }
}
