//! Lowered entities: export records and exported functions.
//!
//! These are the values the lowering pass produces and the emitter consumes.
//! None of them is mutated after creation.

use crate::{QualifiedName, SourceSite, ViewKind};

/// One member of a value record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredField {
    /// Field name after renaming.
    pub name: String,
    /// C type name; `None` for an ignored field laid out as opaque bytes.
    pub type_name: Option<String>,
    pub is_pointer: bool,
    /// Size in bytes.
    pub size: usize,
    /// Alignment in bytes.
    pub align: usize,
}

impl LoweredField {
    /// A typed member.
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>, size: usize, align: usize) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            is_pointer: false,
            size,
            align,
        }
    }

    /// An opaque blob of `size` bytes aligned to `align`.
    pub fn opaque(name: impl Into<String>, size: usize, align: usize) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            is_pointer: false,
            size,
            align,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.type_name.is_none()
    }
}

/// The resolved export of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRecord {
    /// Opaque type, only ever handled through pointers.
    Handle { exported_name: String },
    /// Plain struct with a fixed layout.
    Value {
        exported_name: String,
        fields: Vec<LoweredField>,
    },
}

impl ExportRecord {
    pub fn exported_name(&self) -> &str {
        match self {
            ExportRecord::Handle { exported_name } | ExportRecord::Value { exported_name, .. } => {
                exported_name
            }
        }
    }

    /// Fields of a value record; always empty for handles.
    pub fn fields(&self) -> &[LoweredField] {
        match self {
            ExportRecord::Handle { .. } => &[],
            ExportRecord::Value { fields, .. } => fields,
        }
    }

    pub fn is_handle(&self) -> bool {
        matches!(self, ExportRecord::Handle { .. })
    }
}

/// How a lowered parameter or return value crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Built-in scalar, passed as-is.
    Scalar,
    /// Value record, bit-copied between the host type and its C struct.
    Record,
    /// Handle record; only valid behind a pointer or reference.
    Handle,
    /// Standard view or container.
    View(ViewKind),
}

/// Element type of a view parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerView {
    pub view: ViewKind,
    /// C element type name, without cv or indirection.
    pub element_type: String,
    /// `const` on the element, or on its pointee for pointer elements.
    pub is_const: bool,
    pub is_pointer: bool,
    pub is_reference: bool,
}

/// A lowered function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredParam {
    pub name: String,
    /// C type name of the value or pointee.
    pub lowered_type: String,
    /// Host type name of the value or pointee, without cv or indirection.
    pub source_type: String,
    pub kind: ValueKind,
    /// `const` on the value, or on the pointee for pointers and references.
    pub is_const: bool,
    pub is_pointer: bool,
    pub is_reference: bool,
    /// Present for span-like and string-view-like parameters.
    pub inner_view: Option<InnerView>,
}

/// A lowered return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredReturn {
    /// C type name of the value or pointee. For container returns, the host
    /// container name without template arguments.
    pub lowered_type: String,
    pub kind: ValueKind,
    /// `const` on the pointee for pointer and reference returns.
    pub is_const: bool,
    /// Returned as a pointer in C. Set for host pointers and references.
    pub is_pointer: bool,
    /// The host returns a reference; the wrapper returns its address.
    pub is_reference: bool,
    /// C element spelling for container and view returns, which are handed
    /// back through a callback.
    pub inner_element_type: Option<String>,
}

impl LoweredReturn {
    /// A `void` return.
    pub fn void() -> Self {
        Self {
            lowered_type: "void".into(),
            kind: ValueKind::Scalar,
            is_const: false,
            is_pointer: false,
            is_reference: false,
            inner_element_type: None,
        }
    }

    pub fn is_void(&self) -> bool {
        self.kind == ValueKind::Scalar && !self.is_pointer && self.lowered_type == "void"
    }

    /// Whether the result is delivered through a callback.
    pub fn uses_callback(&self) -> bool {
        self.inner_element_type.is_some()
    }
}

/// How a member function is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Static,
    Instance,
    ConstInstance,
}

/// Non-owning reference from a function to its owning record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef {
    /// Registry key of the owning record.
    pub record: QualifiedName,
    /// Function name with the owner prefix stripped.
    pub member_name: String,
    pub kind: MemberKind,
}

impl OwnerRef {
    /// Whether the wrapper takes an injected `self` pointer.
    pub fn takes_self(&self) -> bool {
        self.kind != MemberKind::Static
    }
}

/// A function ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFunction {
    pub original_name: QualifiedName,
    pub exported_name: String,
    pub site: SourceSite,
    pub owner: Option<OwnerRef>,
    pub params: Vec<LoweredParam>,
    pub return_info: LoweredReturn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_has_no_fields() {
        let record = ExportRecord::Handle {
            exported_name: "Texture".into(),
        };
        assert!(record.fields().is_empty());
        assert!(record.is_handle());
        assert_eq!(record.exported_name(), "Texture");
    }

    #[test]
    fn opaque_field() {
        let field = LoweredField::opaque("cache", 24, 8);
        assert!(field.is_opaque());
        assert!(!field.is_pointer);
    }

    #[test]
    fn void_return() {
        let ret = LoweredReturn::void();
        assert!(ret.is_void());
        assert!(!ret.uses_callback());
    }
}
