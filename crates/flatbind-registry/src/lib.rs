//! flatbind registry crate.
//!
//! Provides [`TypeRegistry`], the single store of export records shared by
//! every lowering step.

mod registry;

pub use registry::TypeRegistry;
