pub mod slot;

#[cfg(test)]
pub use slot::MemorySlots;
pub use slot::{FileSlots, SlotStorage};
