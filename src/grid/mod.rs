//! Grid geometry and numbering.

mod core;

pub use self::core::GridModel;
