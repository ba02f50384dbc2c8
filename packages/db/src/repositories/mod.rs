//! Repository implementations for database operations.

mod entry_repo;

pub use entry_repo::EntryRepository;
