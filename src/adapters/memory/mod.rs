//! In-process store backend
//!
//! Used by tests and by fixture-driven runs when `database_target = "memory"`.

pub mod fixture;
pub mod store;

pub use fixture::{load_fixture, MemoryFixture};
pub use store::MemoryStore;
