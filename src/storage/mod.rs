//! Storage Module
//!
//! Persistent storage layer: immutable sorted segments on disk.
//!
//! ## Responsibilities
//! - Binary framing for key-value entries
//! - Probabilistic membership filtering for negative lookups
//! - Segment creation, loading, search, and merging
//!
//! ## Segment File Format (v2)
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Header (147 bytes)                                           │
//! │   Cookie: "BIGSBYSEGMENT" (13) | Version: u16 BE (2)         │
//! │   FilterLen: u32 BE (4)        | Filter bits (128)           │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Entries (to EOF, ascending key order)                        │
//! │   [KeyLen: u32 BE][Key][Kind: u8][ValLen: u32 BE][Value]     │
//! │   (Kind = 1 marks a tombstone; no value follows)             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod entry;
mod filter;
mod sstable;

pub use entry::{Entry, Value};
pub use filter::Filter;
pub use sstable::Table;
