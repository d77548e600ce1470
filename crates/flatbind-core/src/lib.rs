//! Core types shared by every flatbind crate.
//!
//! - [`declaration`]: the declaration model produced by the collector
//! - [`directive`]: parsed export directives
//! - [`recognized`]: classification of math value types and standard views
//! - [`export`]: lowered records and functions
//! - [`error`] and [`diagnostics`]: failure reporting

pub mod declaration;
pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod export;
mod qualified_name;
pub mod recognized;
mod site;

pub use declaration::{
    Access, DeclarationModel, FieldDecl, FunctionDecl, Item, ParamDecl, RecordDecl, RecordSource,
    TemplateArg, TypeCategory, TypeDesc,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use directive::{Directive, DirectiveArg, Directives};
pub use error::LoweringError;
pub use export::{
    ExportRecord, ExportedFunction, InnerView, LoweredField, LoweredParam, LoweredReturn,
    MemberKind, OwnerRef, ValueKind,
};
pub use qualified_name::QualifiedName;
pub use recognized::{MathFamily, RecognizedKind, ViewKind, classify, normalize_scalar};
pub use site::SourceSite;
