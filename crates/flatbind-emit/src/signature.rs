//! C spelling of exported function signatures.
//!
//! The header prototypes, the wrapper definitions and the function table all
//! spell the same signature, so it is resolved once into a [`CSignature`].

use flatbind_core::{ExportedFunction, LoweredParam, LoweredReturn, MemberKind};
use flatbind_registry::TypeRegistry;

use crate::EmitError;

/// A resolved C signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSignature {
    pub return_type: String,
    pub name: String,
    /// Parameter declarations, `self` and callback parameters included.
    pub params: Vec<String>,
}

impl CSignature {
    /// Resolve the signature of `function` against `registry`.
    pub fn resolve(function: &ExportedFunction, registry: &TypeRegistry) -> Result<Self, EmitError> {
        let mut params = Vec::with_capacity(function.params.len() + 2);

        if let Some(owner) = function.owner.as_ref().filter(|owner| owner.takes_self()) {
            let exported = registry
                .exported_name(&owner.record)
                .ok_or_else(|| EmitError::MissingOwner {
                    function: function.original_name.to_string(),
                    owner: owner.record.to_string(),
                })?;
            params.push(format!("{}{exported} *self", const_prefix(owner.kind == MemberKind::ConstInstance)));
        }

        for param in &function.params {
            params.push(param_decl(param));
        }

        let ret = &function.return_info;
        if let Some(element) = &ret.inner_element_type {
            params.push(format!(
                "void (*callback)({} *data, size_t size, void *user_data)",
                const_element(element)
            ));
            params.push("void *user_data".to_string());
        }

        Ok(Self {
            return_type: return_type(ret),
            name: function.exported_name.clone(),
            params,
        })
    }

    /// The parameter list, `void` when empty.
    pub fn param_list(&self) -> String {
        if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params.join(", ")
        }
    }

    /// `ret name(params)`
    pub fn prototype(&self) -> String {
        format!("{}{}({})", type_prefix(&self.return_type), self.name, self.param_list())
    }

    /// `ret (*name)(params)`
    pub fn pointer_member(&self) -> String {
        format!("{}(*{})({})", type_prefix(&self.return_type), self.name, self.param_list())
    }
}

/// `const ` or nothing.
pub(crate) fn const_prefix(is_const: bool) -> &'static str {
    if is_const { "const " } else { "" }
}

/// Element spelling with `const` applied to the outermost element type.
pub(crate) fn const_element(element: &str) -> String {
    if element.starts_with("const ") {
        element.to_string()
    } else {
        format!("const {element}")
    }
}

/// A type followed by a declarator: pointers bind to the name.
fn type_prefix(ty: &str) -> String {
    if ty.ends_with('*') {
        ty.to_string()
    } else {
        format!("{ty} ")
    }
}

fn return_type(ret: &LoweredReturn) -> String {
    if ret.uses_callback() || ret.is_void() {
        return "void".to_string();
    }
    if ret.is_pointer {
        format!("{}{} *", const_prefix(ret.is_const), ret.lowered_type)
    } else {
        ret.lowered_type.clone()
    }
}

fn param_decl(param: &LoweredParam) -> String {
    if let Some(inner) = &param.inner_view {
        let element = format!("{}{}", const_prefix(inner.is_const), inner.element_type);
        let indirection = if inner.is_pointer || inner.is_reference { "**" } else { "*" };
        return format!(
            "{element} {indirection}{name}, size_t {name}_size",
            name = param.name
        );
    }
    if param.is_pointer || param.is_reference {
        format!("{}{} *{}", const_prefix(param.is_const), param.lowered_type, param.name)
    } else {
        format!("{}{} {}", const_prefix(param.is_const), param.lowered_type, param.name)
    }
}
