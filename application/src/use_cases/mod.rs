//! Use cases (application services)
//!
//! - [`recommend_books`]: one recommendation round (prompt, call, extract, validate)
//! - [`complete_with_retry`]: model calls with retry, timeout and abort

pub mod complete_with_retry;
pub mod recommend_books;
pub mod shared;
