//! Memtable Module
//!
//! In-memory ordered data structure for recent writes.
//!
//! ## Responsibilities
//! - Fast O(log n) reads, writes, and deletes in memory
//! - Ordered iteration for segment creation
//! - Overwrite semantics on duplicate keys
//!
//! ## Data Structure Choice
//! A red-black tree, generic over key and value types:
//! - Ordered keys (required for segment generation)
//! - Worst-case O(log n) for every operation
//! - Reusable container — the engine instantiates it with string keys, but
//!   nothing in the tree itself assumes them

mod tree;

pub use tree::{Iter, Tree};
