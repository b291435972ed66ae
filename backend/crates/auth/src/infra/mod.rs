//! Infrastructure Layer
//!
//! Repository implementations over the document store.

pub mod docstore;

pub use docstore::DocAuthRepository;
