//! Storage adapters for the movie and review store ports.

mod memory;

pub use memory::{MemoryMovieStore, MemoryReviewStore};
