//! flatbind lowering
//!
//! Turns annotated host declarations into export records and exported
//! functions.
//!
//! ## Components
//!
//! - `class`: record lowering into handle or value records
//! - `math`: on-demand synthesis of math value records
//! - `field`: field lowering
//! - `pointer`: pointee resolution, the one path allowed to register
//!   records as a side effect
//! - `reservation`: reserved names of records being lowered, and records
//!   staged until those reservations commit
//! - `function`: function lowering with view and container marshalling
//!
//! All of them are `impl` blocks on [`LoweringPass`], which owns the
//! bookkeeping of a run and borrows the [`TypeRegistry`](flatbind_registry::TypeRegistry).

mod class;
mod field;
mod function;
mod math;
mod options;
mod pass;
mod pointer;
mod reservation;

#[cfg(test)]
mod fixtures;

pub use options::LoweringOptions;
pub use pass::{LoweringOutput, LoweringPass};
