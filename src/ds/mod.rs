pub mod min_max_heap;
pub mod slot_arena;

pub use min_max_heap::MinMaxHeap;
pub use slot_arena::{SlotArena, SlotId};
