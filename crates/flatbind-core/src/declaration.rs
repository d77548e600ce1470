//! The declaration model handed over by the collector.
//!
//! The collector walks the host sources, extracts every annotated
//! declaration together with the declarations they reference, and fills a
//! [`DeclarationModel`]. Lowering reads this model and never touches the
//! host sources itself.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::{Directives, QualifiedName, SourceSite};

bitflags! {
    /// Category flags of a type descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeCategory: u8 {
        /// A built-in scalar (`int`, `float`, `std::uint32_t`, `void`...).
        const BUILTIN = 0x01;
        /// A class, struct or union.
        const RECORD = 0x02;
        /// A pointer; see [`TypeDesc::pointee`].
        const POINTER = 0x04;
        /// An lvalue reference; see [`TypeDesc::pointee`].
        const REFERENCE = 0x08;
        /// A template specialization; see [`TypeDesc::template_args`].
        const TEMPLATE = 0x10;
    }
}

/// One argument of a template specialization.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateArg {
    Type(TypeDesc),
    Value(i64),
}

/// Raw type information of a field, parameter or return value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
    /// Spelling without top-level cv qualifiers, fully qualified for records.
    pub name: String,
    /// Size in bytes.
    pub size: usize,
    /// Alignment in bytes.
    pub align: usize,
    pub category: TypeCategory,
    /// Top-level `const`.
    pub is_const: bool,
    /// Pointed-to or referenced type.
    pub pointee: Option<Box<TypeDesc>>,
    pub template_args: Vec<TemplateArg>,
    /// Declaration backing this spelling when it differs from `name`
    /// (e.g. `glm::vec3` is backed by `glm::vec<3, float, glm::defaultp>`).
    pub decl: Option<QualifiedName>,
}

impl TypeDesc {
    /// A built-in scalar type.
    pub fn builtin(name: impl Into<String>, size: usize, align: usize) -> Self {
        Self {
            name: name.into(),
            size,
            align,
            category: TypeCategory::BUILTIN,
            is_const: false,
            pointee: None,
            template_args: Vec::new(),
            decl: None,
        }
    }

    /// `void`.
    pub fn void() -> Self {
        Self::builtin("void", 0, 0)
    }

    /// A record type.
    pub fn record(name: impl Into<String>, size: usize, align: usize) -> Self {
        Self {
            category: TypeCategory::RECORD,
            ..Self::builtin(name, size, align)
        }
    }

    /// A pointer to `pointee` on a 64-bit target.
    pub fn pointer_to(pointee: TypeDesc) -> Self {
        Self {
            name: format!("{} *", pointee.spelling()),
            size: 8,
            align: 8,
            category: TypeCategory::POINTER,
            is_const: false,
            pointee: Some(Box::new(pointee)),
            template_args: Vec::new(),
            decl: None,
        }
    }

    /// An lvalue reference to `pointee`.
    pub fn reference_to(pointee: TypeDesc) -> Self {
        Self {
            name: format!("{} &", pointee.spelling()),
            category: TypeCategory::REFERENCE,
            ..Self::pointer_to(pointee)
        }
    }

    /// Mark this type `const`.
    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Attach template arguments; marks the type as a specialization.
    pub fn with_template_args(mut self, args: Vec<TemplateArg>) -> Self {
        self.category |= TypeCategory::TEMPLATE;
        self.template_args = args;
        self
    }

    /// Point this spelling at its backing declaration.
    pub fn with_decl(mut self, decl: impl Into<QualifiedName>) -> Self {
        self.decl = Some(decl.into());
        self
    }

    pub fn is_builtin(&self) -> bool {
        self.category.contains(TypeCategory::BUILTIN)
    }

    pub fn is_record(&self) -> bool {
        self.category.contains(TypeCategory::RECORD)
    }

    pub fn is_pointer(&self) -> bool {
        self.category.contains(TypeCategory::POINTER)
    }

    pub fn is_reference(&self) -> bool {
        self.category.contains(TypeCategory::REFERENCE)
    }

    pub fn is_void(&self) -> bool {
        self.is_builtin() && self.name == "void"
    }

    /// Spelling including top-level `const`.
    pub fn spelling(&self) -> String {
        if self.is_const {
            format!("const {}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Registry key of this type.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::parse(&self.name)
    }

    /// Name of the declaration backing this type.
    pub fn decl_name(&self) -> QualifiedName {
        self.decl.clone().unwrap_or_else(|| self.qualified_name())
    }

    /// The type argument at `index`, skipping nothing.
    pub fn type_arg(&self, index: usize) -> Option<&TypeDesc> {
        match self.template_args.get(index) {
            Some(TemplateArg::Type(ty)) => Some(ty),
            _ => None,
        }
    }
}

/// Member access of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

/// A data member of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeDesc,
    pub access: Access,
    pub directives: Directives,
    pub site: SourceSite,
}

impl FieldDecl {
    /// A public field without directives.
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            access: Access::Public,
            directives: Directives::new(),
            site: SourceSite::unknown(),
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_directives(mut self, directives: impl Into<Directives>) -> Self {
        self.directives = directives.into();
        self
    }

    pub fn at(mut self, site: SourceSite) -> Self {
        self.site = site;
        self
    }
}

/// A class, struct or union declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: QualifiedName,
    pub site: SourceSite,
    /// Export annotation. `None` when the record is not annotated at all.
    pub export: Option<Directives>,
    pub fields: Vec<FieldDecl>,
    pub size: usize,
    pub align: usize,
    pub is_complete: bool,
    pub is_dependent: bool,
    pub is_invalid: bool,
    /// Trivially copyable with standard layout.
    pub is_pod: bool,
}

impl RecordDecl {
    /// A complete, valid POD record without export annotation.
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            site: SourceSite::unknown(),
            export: None,
            fields: Vec::new(),
            size: 0,
            align: 1,
            is_complete: true,
            is_dependent: false,
            is_invalid: false,
            is_pod: true,
        }
    }

    /// Annotate the record for export.
    pub fn exported(mut self, directives: impl Into<Directives>) -> Self {
        self.export = Some(directives.into());
        self
    }

    /// Append a field, growing the layout to fit it.
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        let align = field.ty.align.max(1);
        let offset = self.size.next_multiple_of(align);
        self.size = offset + field.ty.size;
        self.align = self.align.max(align);
        self.size = self.size.next_multiple_of(self.align);
        self.fields.push(field);
        self
    }

    pub fn non_pod(mut self) -> Self {
        self.is_pod = false;
        self
    }

    pub fn incomplete(mut self) -> Self {
        self.is_complete = false;
        self
    }

    pub fn at(mut self, site: SourceSite) -> Self {
        self.site = site;
        self
    }

    /// The type descriptor naming this record.
    pub fn as_type(&self) -> TypeDesc {
        TypeDesc::record(self.name.to_string(), self.size, self.align)
    }

    /// Whether lowering should consider this record at all.
    pub fn is_lowerable(&self) -> bool {
        self.is_complete && !self.is_dependent && !self.is_invalid
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeDesc,
    pub directives: Directives,
    pub site: SourceSite,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            directives: Directives::new(),
            site: SourceSite::unknown(),
        }
    }

    pub fn with_directives(mut self, directives: impl Into<Directives>) -> Self {
        self.directives = directives.into();
        self
    }
}

/// A free or member function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: QualifiedName,
    pub site: SourceSite,
    /// Export annotation. `None` when the function is not annotated.
    pub export: Option<Directives>,
    /// Owning record for member functions.
    pub owner: Option<QualifiedName>,
    pub is_static: bool,
    /// `const`-qualified member function.
    pub is_const: bool,
    pub return_type: TypeDesc,
    pub params: Vec<ParamDecl>,
}

impl FunctionDecl {
    /// A free function returning `void`, without export annotation.
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            site: SourceSite::unknown(),
            export: None,
            owner: None,
            is_static: false,
            is_const: false,
            return_type: TypeDesc::void(),
            params: Vec::new(),
        }
    }

    /// Annotate the function for export.
    pub fn exported(mut self, directives: impl Into<Directives>) -> Self {
        self.export = Some(directives.into());
        self
    }

    /// Make this a member of `owner`.
    pub fn member_of(mut self, owner: impl Into<QualifiedName>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn returns(mut self, ty: TypeDesc) -> Self {
        self.return_type = ty;
        self
    }

    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn at(mut self, site: SourceSite) -> Self {
        self.site = site;
        self
    }
}

/// Lookup of record declarations by qualified name.
///
/// Pointer lowering uses it to reach the declaration of a pointee that has
/// not been lowered yet, and math synthesis uses it to read the fields of a
/// math value type.
pub trait RecordSource {
    fn record(&self, name: &QualifiedName) -> Option<&RecordDecl>;
}

/// One entry of the discovery stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A record discovered with an export annotation.
    Record(QualifiedName),
    /// A function discovered with an export annotation.
    Function(FunctionDecl),
}

/// Everything the collector extracted from the host sources.
#[derive(Debug, Default)]
pub struct DeclarationModel {
    records: FxHashMap<QualifiedName, RecordDecl>,
    items: Vec<Item>,
}

impl DeclarationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a record reachable for lookups without queueing it.
    pub fn declare_record(&mut self, decl: RecordDecl) {
        self.records.insert(decl.name.clone(), decl);
    }

    /// Queue a discovered record and make it reachable for lookups.
    pub fn add_record(&mut self, decl: RecordDecl) {
        self.items.push(Item::Record(decl.name.clone()));
        self.declare_record(decl);
    }

    /// Queue a discovered function.
    pub fn add_function(&mut self, decl: FunctionDecl) {
        self.items.push(Item::Function(decl));
    }

    /// The discovery stream, in discovery order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl RecordSource for DeclarationModel {
    fn record(&self, name: &QualifiedName) -> Option<&RecordDecl> {
        self.records.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_grows_with_fields() {
        let decl = RecordDecl::new("Pair")
            .with_field(FieldDecl::new("a", TypeDesc::builtin("char", 1, 1)))
            .with_field(FieldDecl::new("b", TypeDesc::builtin("int", 4, 4)));
        assert_eq!(decl.size, 8);
        assert_eq!(decl.align, 4);
    }

    #[test]
    fn pointer_spelling() {
        let ptr = TypeDesc::pointer_to(TypeDesc::record("engine::Node", 16, 8).with_const());
        assert_eq!(ptr.name, "const engine::Node *");
        assert!(ptr.is_pointer());
        assert!(ptr.pointee.as_deref().is_some_and(|p| p.is_const));
    }

    #[test]
    fn decl_name_falls_back_to_spelling() {
        let plain = TypeDesc::record("engine::Node", 16, 8);
        assert_eq!(plain.decl_name(), QualifiedName::parse("engine::Node"));

        let sugared = TypeDesc::record("glm::vec3", 12, 4).with_decl("glm::vec<3, float>");
        assert_eq!(sugared.decl_name(), QualifiedName::parse("glm::vec<3, float>"));
        assert_eq!(sugared.qualified_name().to_string(), "glm::vec3");
    }

    #[test]
    fn model_keeps_discovery_order() {
        let mut model = DeclarationModel::new();
        model.add_record(RecordDecl::new("B").exported(Directives::new()));
        model.add_function(FunctionDecl::new("f"));
        model.declare_record(RecordDecl::new("Hidden"));
        model.add_record(RecordDecl::new("A").exported(Directives::new()));

        assert_eq!(model.items().len(), 3);
        assert_eq!(model.record_count(), 3);
        assert!(matches!(&model.items()[0], Item::Record(n) if n.simple_name() == "B"));
        assert!(model.record(&QualifiedName::global("Hidden")).is_some());
    }
}
