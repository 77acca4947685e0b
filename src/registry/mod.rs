mod core;

pub use self::core::{Slot, SlotId, SlotRegistry};
