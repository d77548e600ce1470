//! Hand-built lowered functions for emission tests.

use flatbind_core::{
    ExportRecord, ExportedFunction, InnerView, LoweredField, LoweredParam, LoweredReturn,
    MemberKind, OwnerRef, QualifiedName, SourceSite, ValueKind, ViewKind,
};
use flatbind_registry::TypeRegistry;

/// `gfx::Mesh` as handle `gfx__Mesh`, `gfx::Vertex` as value `Vertex`.
pub(crate) fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.insert(
        QualifiedName::parse("gfx::Mesh"),
        ExportRecord::Handle {
            exported_name: "gfx__Mesh".into(),
        },
    );
    registry.insert(
        QualifiedName::parse("gfx::Vertex"),
        ExportRecord::Value {
            exported_name: "Vertex".into(),
            fields: vec![
                LoweredField::typed("x", "float", 4, 4),
                LoweredField::typed("y", "float", 4, 4),
            ],
        },
    );
    registry
}

pub(crate) fn free(name: &str, params: Vec<LoweredParam>, ret: LoweredReturn) -> ExportedFunction {
    let original_name = QualifiedName::parse(name);
    ExportedFunction {
        exported_name: original_name.exported_identifier(),
        original_name,
        site: SourceSite::unknown(),
        owner: None,
        params,
        return_info: ret,
    }
}

/// A member of the record named by all but the last segment of `name`.
pub(crate) fn member(
    name: &str,
    kind: MemberKind,
    params: Vec<LoweredParam>,
    ret: LoweredReturn,
) -> ExportedFunction {
    let mut function = free(name, params, ret);
    let (owner, member_name) = name.rsplit_once("::").unwrap_or(("", name));
    function.owner = Some(OwnerRef {
        record: QualifiedName::parse(owner),
        member_name: member_name.to_string(),
        kind,
    });
    function
}

fn param(name: &str, lowered: &str, source: &str, kind: ValueKind) -> LoweredParam {
    LoweredParam {
        name: name.into(),
        lowered_type: lowered.into(),
        source_type: source.into(),
        kind,
        is_const: false,
        is_pointer: false,
        is_reference: false,
        inner_view: None,
    }
}

pub(crate) fn scalar_param(name: &str, ty: &str) -> LoweredParam {
    param(name, ty, ty, ValueKind::Scalar)
}

pub(crate) fn record_param(name: &str, source: &str, lowered: &str) -> LoweredParam {
    param(name, lowered, source, ValueKind::Record)
}

pub(crate) fn record_ref_param(name: &str, source: &str, lowered: &str, is_const: bool) -> LoweredParam {
    LoweredParam {
        is_const,
        is_reference: true,
        ..param(name, lowered, source, ValueKind::Record)
    }
}

pub(crate) fn handle_param(name: &str, source: &str, lowered: &str) -> LoweredParam {
    LoweredParam {
        is_pointer: true,
        ..param(name, lowered, source, ValueKind::Handle)
    }
}

pub(crate) fn span_param(
    name: &str,
    source: &str,
    element: &str,
    is_const: bool,
    is_pointer: bool,
) -> LoweredParam {
    LoweredParam {
        inner_view: Some(InnerView {
            view: ViewKind::Span,
            element_type: element.into(),
            is_const,
            is_pointer,
            is_reference: false,
        }),
        ..param(name, element, source, ValueKind::View(ViewKind::Span))
    }
}

pub(crate) fn string_view_param(name: &str) -> LoweredParam {
    LoweredParam {
        inner_view: Some(InnerView {
            view: ViewKind::StringView,
            element_type: "char".into(),
            is_const: true,
            is_pointer: false,
            is_reference: false,
        }),
        ..param(name, "char", "std::string_view", ValueKind::View(ViewKind::StringView))
    }
}

pub(crate) fn scalar_return(ty: &str) -> LoweredReturn {
    LoweredReturn {
        lowered_type: ty.into(),
        ..LoweredReturn::void()
    }
}

pub(crate) fn record_return(lowered: &str) -> LoweredReturn {
    LoweredReturn {
        lowered_type: lowered.into(),
        kind: ValueKind::Record,
        ..LoweredReturn::void()
    }
}

pub(crate) fn handle_pointer_return(lowered: &str) -> LoweredReturn {
    LoweredReturn {
        lowered_type: lowered.into(),
        kind: ValueKind::Handle,
        is_pointer: true,
        ..LoweredReturn::void()
    }
}

pub(crate) fn callback_return(container: &str, element: &str) -> LoweredReturn {
    LoweredReturn {
        lowered_type: container.into(),
        kind: ValueKind::View(ViewKind::Vector),
        inner_element_type: Some(element.into()),
        ..LoweredReturn::void()
    }
}
