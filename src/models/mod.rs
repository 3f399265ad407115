//! Core data structures for collection objects.

mod object;

pub use object::ObjectRecord;
