//! Function lowering.
//!
//! Functions only read the registry: every record a signature mentions must
//! have been lowered before the function is.
//!
//! # Calling convention
//!
//! - Member functions get an injected `self` pointer, `const` for `const`
//!   members. Static members and free functions do not.
//! - References cross the boundary as pointers.
//! - `std::span` and `std::string_view` parameters become a pointer and a
//!   size.
//! - Views and containers returned by value are handed to a caller-supplied
//!   callback together with a user data pointer.
//! - Handle records never cross by value.
//! - No host parameter may share a name with another wrapper parameter,
//!   including the injected ones.

use flatbind_core::{
    ExportRecord, ExportedFunction, FunctionDecl, InnerView, LoweredParam, LoweredReturn,
    LoweringError, MemberKind, OwnerRef, ParamDecl, QualifiedName, RecognizedKind, SourceSite,
    TypeDesc, ValueKind, ViewKind, classify, normalize_scalar, recognized::strip_template_args,
};

use rustc_hash::FxHashSet;

use crate::LoweringPass;

/// A type with one level of pointer or reference peeled off.
struct Peeled<'t> {
    value: &'t TypeDesc,
    is_pointer: bool,
    is_reference: bool,
}

impl<'t> Peeled<'t> {
    fn new(ty: &'t TypeDesc) -> Self {
        match ty.pointee.as_deref() {
            Some(pointee) if ty.is_pointer() || ty.is_reference() => Self {
                value: pointee,
                is_pointer: ty.is_pointer(),
                is_reference: ty.is_reference(),
            },
            _ => Self {
                value: ty,
                is_pointer: false,
                is_reference: false,
            },
        }
    }

    fn is_indirect(&self) -> bool {
        self.is_pointer || self.is_reference
    }
}

impl LoweringPass<'_> {
    /// Lower one function declaration.
    ///
    /// Returns `Ok(None)` for functions that are not annotated, ignored, or
    /// share their qualified name with a function lowered earlier.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn lower_function_decl(
        &mut self,
        decl: &FunctionDecl,
    ) -> Result<Option<ExportedFunction>, LoweringError> {
        let Some(directives) = &decl.export else {
            return Ok(None);
        };
        if self.seen_functions.contains(&decl.name) {
            tracing::trace!(name = %decl.name, "function already lowered");
            return Ok(None);
        }
        if directives.is_ignored() {
            tracing::debug!(name = %decl.name, "function ignored");
            return Ok(None);
        }

        let exported_name = match directives.rename(&decl.site)? {
            Some(name) => name.to_string(),
            None => decl.name.exported_identifier(),
        };

        let owner = decl
            .owner
            .as_ref()
            .map(|owner| self.owner_ref(decl, owner))
            .transpose()?;
        let return_info = self.lower_return(decl)?;
        let params = decl
            .params
            .iter()
            .filter_map(|param| self.lower_param(decl, param).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        check_parameter_names(decl, owner.as_ref(), &params, &return_info)?;

        Ok(Some(ExportedFunction {
            original_name: decl.name.clone(),
            exported_name,
            site: decl.site.clone(),
            owner,
            params,
            return_info,
        }))
    }

    fn owner_ref(&self, decl: &FunctionDecl, owner: &QualifiedName) -> Result<OwnerRef, LoweringError> {
        if !self.registry.contains(owner) {
            return Err(LoweringError::not_exported(&decl.site, owner.to_string()));
        }
        let member_name = decl
            .name
            .strip_owner(owner)
            .unwrap_or_else(|| decl.name.simple_name().to_string());
        let kind = if decl.is_static {
            MemberKind::Static
        } else if decl.is_const {
            MemberKind::ConstInstance
        } else {
            MemberKind::Instance
        };
        Ok(OwnerRef {
            record: owner.clone(),
            member_name,
            kind,
        })
    }

    fn lower_return(&self, decl: &FunctionDecl) -> Result<LoweredReturn, LoweringError> {
        let ty = &decl.return_type;
        let site = &decl.site;
        if ty.is_void() {
            return Ok(LoweredReturn::void());
        }

        let peeled = Peeled::new(ty);
        let value = peeled.value;
        let mut lowered = LoweredReturn {
            lowered_type: String::new(),
            kind: ValueKind::Scalar,
            is_const: peeled.is_indirect() && value.is_const,
            is_pointer: peeled.is_indirect(),
            is_reference: peeled.is_reference,
            inner_element_type: None,
        };

        if value.is_builtin() {
            lowered.lowered_type = normalize_scalar(&value.name);
            return Ok(lowered);
        }
        if !value.is_record() {
            return Err(unsupported(site, ty));
        }

        if let RecognizedKind::View(view) = self.classify(value) {
            if peeled.is_indirect() {
                return Err(unsupported(site, ty));
            }
            lowered.kind = ValueKind::View(view);
            lowered.lowered_type = strip_template_args(&value.name).to_string();
            lowered.inner_element_type = Some(self.element_spelling(view, value, site)?);
            return Ok(lowered);
        }

        let (lowered_type, kind) = self.record_value(value, &peeled, site)?;
        lowered.lowered_type = lowered_type;
        lowered.kind = kind;
        Ok(lowered)
    }

    /// Lower one parameter; `Ok(None)` for an ignored parameter.
    fn lower_param(
        &self,
        decl: &FunctionDecl,
        param: &ParamDecl,
    ) -> Result<Option<LoweredParam>, LoweringError> {
        let site = if param.site.is_known() {
            &param.site
        } else {
            &decl.site
        };
        if param.directives.is_ignored() {
            tracing::trace!(function = %decl.name, param = %param.name, "parameter ignored");
            return Ok(None);
        }
        let name = match param.directives.rename(site)? {
            Some(name) => name.to_string(),
            None => param.name.clone(),
        };

        let ty = &param.ty;
        let peeled = Peeled::new(ty);
        let value = peeled.value;
        let mut lowered = LoweredParam {
            name,
            lowered_type: String::new(),
            source_type: value.name.clone(),
            kind: ValueKind::Scalar,
            is_const: value.is_const,
            is_pointer: peeled.is_pointer,
            is_reference: peeled.is_reference,
            inner_view: None,
        };

        if value.is_builtin() {
            if value.is_void() && !peeled.is_indirect() {
                return Err(unsupported(site, ty));
            }
            lowered.lowered_type = normalize_scalar(&value.name);
            return Ok(Some(lowered));
        }
        if !value.is_record() {
            return Err(unsupported(site, ty));
        }

        if let RecognizedKind::View(view) = self.classify(value) {
            if !view.is_param_view() || peeled.is_indirect() {
                return Err(unsupported(site, ty));
            }
            let inner = self.inner_view(view, value, site)?;
            lowered.kind = ValueKind::View(view);
            lowered.lowered_type = inner.element_type.clone();
            lowered.inner_view = Some(inner);
            return Ok(Some(lowered));
        }

        let (lowered_type, kind) = self.record_value(value, &peeled, site)?;
        lowered.lowered_type = lowered_type;
        lowered.kind = kind;
        Ok(Some(lowered))
    }

    fn classify(&self, ty: &TypeDesc) -> RecognizedKind {
        classify(&ty.name, &self.options.math_namespaces)
    }

    /// Exported name and kind of a registered record passed or returned
    /// directly or through one level of indirection.
    fn record_value(
        &self,
        value: &TypeDesc,
        peeled: &Peeled<'_>,
        site: &SourceSite,
    ) -> Result<(String, ValueKind), LoweringError> {
        match self.registered(value) {
            Some(ExportRecord::Handle { exported_name }) => {
                if !peeled.is_indirect() {
                    return Err(LoweringError::HandleByValue {
                        site: site.clone(),
                        name: value.name.clone(),
                    });
                }
                Ok((exported_name.clone(), ValueKind::Handle))
            }
            Some(ExportRecord::Value { exported_name, .. }) => {
                Ok((exported_name.clone(), ValueKind::Record))
            }
            None => Err(LoweringError::not_exported(site, value.name.clone())),
        }
    }

    /// Element type of a view, with string views defaulting to `char`.
    fn view_element(&self, view: ViewKind, ty: &TypeDesc, site: &SourceSite) -> Result<TypeDesc, LoweringError> {
        match ty.type_arg(0) {
            Some(element) => Ok(element.clone()),
            None if view.is_string() => {
                let element = TypeDesc::builtin("char", 1, 1);
                Ok(if view == ViewKind::StringView { element.with_const() } else { element })
            }
            None => Err(unsupported(site, ty)),
        }
    }

    fn inner_view(&self, view: ViewKind, ty: &TypeDesc, site: &SourceSite) -> Result<InnerView, LoweringError> {
        let element = self.view_element(view, ty, site)?;
        let peeled = Peeled::new(&element);
        let element_type = self.element_name(peeled.value, site)?;
        // string_view only ever exposes const characters.
        let is_const = peeled.value.is_const || view == ViewKind::StringView;
        Ok(InnerView {
            view,
            element_type,
            is_const,
            is_pointer: peeled.is_pointer,
            is_reference: peeled.is_reference,
        })
    }

    /// Full C spelling of a returned view's element, e.g. `const Mesh *`.
    fn element_spelling(&self, view: ViewKind, ty: &TypeDesc, site: &SourceSite) -> Result<String, LoweringError> {
        let element = self.view_element(view, ty, site)?;
        let peeled = Peeled::new(&element);
        let name = self.element_name(peeled.value, site)?;
        let spelled = if peeled.value.is_const {
            format!("const {name}")
        } else {
            name
        };
        Ok(if peeled.is_indirect() {
            format!("{spelled} *")
        } else {
            spelled
        })
    }

    fn element_name(&self, element: &TypeDesc, site: &SourceSite) -> Result<String, LoweringError> {
        if element.is_builtin() && !element.is_void() {
            return Ok(normalize_scalar(&element.name));
        }
        if !element.is_record() {
            return Err(unsupported(site, element));
        }
        match self.registered(element) {
            Some(record) => Ok(record.exported_name().to_string()),
            None => Err(LoweringError::not_exported(site, element.name.clone())),
        }
    }
}

fn unsupported(site: &SourceSite, ty: &TypeDesc) -> LoweringError {
    LoweringError::UnsupportedType {
        site: site.clone(),
        name: ty.spelling(),
    }
}

/// Reject wrappers whose C parameter list would name a parameter twice.
///
/// The wrapper adds `self`, a `<name>_size` after each view and a trailing
/// `callback` and `user_data` pair for callback returns.
fn check_parameter_names(
    decl: &FunctionDecl,
    owner: Option<&OwnerRef>,
    params: &[LoweredParam],
    return_info: &LoweredReturn,
) -> Result<(), LoweringError> {
    let mut names: Vec<String> = Vec::with_capacity(params.len() * 2 + 3);
    if owner.is_some_and(OwnerRef::takes_self) {
        names.push("self".to_string());
    }
    for param in params {
        names.push(param.name.clone());
        if param.inner_view.is_some() {
            names.push(format!("{}_size", param.name));
        }
    }
    if return_info.uses_callback() {
        names.push("callback".to_string());
        names.push("user_data".to_string());
    }

    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name.clone()) {
            return Err(LoweringError::ParameterNameClash {
                site: decl.site.clone(),
                function: decl.name.to_string(),
                name,
            });
        }
    }
    Ok(())
}
