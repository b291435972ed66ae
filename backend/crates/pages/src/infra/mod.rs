//! Infrastructure Layer

pub mod docstore;

pub use docstore::DocPageRepository;
