//! Repository layer
//!
//! Repositories abstract communication with the backend behind small,
//! focused traits so the poller can run against scripted fakes in tests.

mod index;

pub use index::IndexRepository;
