//! Shared declarations for lowering tests.

use flatbind_core::{
    DeclarationModel, ExportRecord, FieldDecl, FunctionDecl, QualifiedName, RecordDecl,
    TemplateArg, TypeDesc,
};
use flatbind_registry::TypeRegistry;

use crate::{LoweringOptions, LoweringOutput, LoweringPass};

pub(crate) fn int() -> TypeDesc {
    TypeDesc::builtin("int", 4, 4)
}

pub(crate) fn float() -> TypeDesc {
    TypeDesc::builtin("float", 4, 4)
}

pub(crate) fn double() -> TypeDesc {
    TypeDesc::builtin("double", 8, 8)
}

pub(crate) fn vec3() -> TypeDesc {
    TypeDesc::record("glm::vec3", 12, 4)
        .with_decl("glm::vec<3, float, glm::packed_highp>")
        .with_template_args(vec![
            TemplateArg::Value(3),
            TemplateArg::Type(float()),
            TemplateArg::Value(0),
        ])
}

pub(crate) fn quat() -> TypeDesc {
    TypeDesc::record("glm::quat", 16, 4)
        .with_decl("glm::qua<float, glm::packed_highp>")
        .with_template_args(vec![TemplateArg::Type(float()), TemplateArg::Value(0)])
}

pub(crate) fn mat4() -> TypeDesc {
    TypeDesc::record("glm::mat4", 64, 4)
        .with_decl("glm::mat<4, 4, float, glm::packed_highp>")
        .with_template_args(vec![
            TemplateArg::Value(4),
            TemplateArg::Value(4),
            TemplateArg::Type(float()),
            TemplateArg::Value(0),
        ])
}

pub(crate) fn span_of(element: TypeDesc) -> TypeDesc {
    TypeDesc::record(format!("std::span<{}>", element.spelling()), 16, 8)
        .with_template_args(vec![TemplateArg::Type(element)])
}

pub(crate) fn vector_of(element: TypeDesc) -> TypeDesc {
    TypeDesc::record(format!("std::vector<{}>", element.spelling()), 24, 8)
        .with_template_args(vec![TemplateArg::Type(element)])
}

pub(crate) fn string_view() -> TypeDesc {
    TypeDesc::record("std::string_view", 16, 8)
}

fn math_decls() -> Vec<RecordDecl> {
    let column = TypeDesc::record("glm::vec<4, float, glm::packed_highp>", 16, 4);
    vec![
        ["x", "y", "z"]
            .into_iter()
            .fold(RecordDecl::new("glm::vec<3, float, glm::packed_highp>"), |decl, name| {
                decl.with_field(FieldDecl::new(name, float()))
            }),
        ["x", "y", "z", "w"]
            .into_iter()
            .fold(RecordDecl::new("glm::qua<float, glm::packed_highp>"), |decl, name| {
                decl.with_field(FieldDecl::new(name, float()))
            }),
        (0..4).fold(
            RecordDecl::new("glm::mat<4, 4, float, glm::packed_highp>"),
            |decl, i| decl.with_field(FieldDecl::new(format!("value{i}"), column.clone())),
        ),
    ]
}

/// A declaration model plus the registry a pass lowers into.
pub(crate) struct Harness {
    pub model: DeclarationModel,
    pub registry: TypeRegistry,
    pub options: LoweringOptions,
}

impl Harness {
    /// A model that already knows the glm vec3, quat and mat4 declarations.
    pub fn new() -> Self {
        let mut model = DeclarationModel::new();
        for decl in math_decls() {
            model.declare_record(decl);
        }
        Self {
            model,
            registry: TypeRegistry::new(),
            options: LoweringOptions::default(),
        }
    }

    pub fn add(&mut self, decl: RecordDecl) {
        self.model.add_record(decl);
    }

    pub fn declare(&mut self, decl: RecordDecl) {
        self.model.declare_record(decl);
    }

    pub fn add_function(&mut self, decl: FunctionDecl) {
        self.model.add_function(decl);
    }

    pub fn run(&mut self) -> LoweringOutput {
        LoweringPass::new(&mut self.registry, &self.model, &self.options).run(self.model.items())
    }

    pub fn record(&self, name: &str) -> Option<&ExportRecord> {
        self.registry.lookup(&QualifiedName::parse(name))
    }
}
