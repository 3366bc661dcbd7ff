pub use crate::ds::{MinMaxHeap, SlotArena, SlotId};
pub use crate::error::{InvariantError, KeyNotFoundError};
pub use crate::map::HeapMap;
