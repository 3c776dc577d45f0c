//! Engine tunables organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Values here are the defaults; `EngineConfig` can override the timing ones.

mod arena;
mod attributes;
mod challenge;
mod presentation;
mod rewards;

pub use arena::*;
pub use attributes::*;
pub use challenge::*;
pub use presentation::*;
pub use rewards::*;
