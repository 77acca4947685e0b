//! Layout operations over a [`SlotRegistry`](crate::SlotRegistry).
//!
//! Every operation stages its edits on a copy of the registry, re-checks the
//! structural invariants and only then commits, so a rejected call never
//! leaves a partial mutation behind.

mod core;

pub use self::core::{AbsorbPolicy, LayoutChange, LayoutOp};
