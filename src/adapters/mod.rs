pub mod engine;
pub mod internal;
pub mod memory;

pub use engine::*;
pub use internal::*;
pub use memory::{EngineCall, EngineOp, MemoryEngine};
