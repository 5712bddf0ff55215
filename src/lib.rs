//! # txnbuf
//!
//! In-memory write buffer for a transactional key-value client:
//! - Ordered, tombstone-aware mutable map (B-tree or skip-log backend)
//! - Successor-seek cursors that never yield deleted keys
//! - Union iterator overlaying buffered writes on a committed snapshot
//! - Memcomparable structured keys (string / hash / list) on top
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TxStructure                              │
//! │              (string / hash / list keys)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ get / set / delete / cursor
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 MemBuffer (dirty)                            │
//! │          BTreeBuffer  |  SkipLogBuffer                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ raw_cursor
//!                       ▼
//!               ┌──────────────┐        ┌──────────────────┐
//!               │  UnionIter   │◀───────│ Snapshot (clean) │
//!               │ (dirty wins) │        │  sorted cursor   │
//!               └──────────────┘        └──────────────────┘
//! ```
//!
//! ## Ownership
//! One owner per buffer, no internal locking. Cursors borrow the buffer, so
//! mutating a buffer while one of its cursors is alive does not compile.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod comparator;
pub mod cursor;
pub mod buffer;
pub mod snapshot;
pub mod union;
pub mod codec;
pub mod structure;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TxnBufError};
pub use config::{BackendKind, Config};
pub use comparator::Comparator;
pub use cursor::Cursor;
pub use buffer::{new_buffer, BTreeBuffer, MemBuffer, SkipLogBuffer};
pub use snapshot::SnapshotCursor;
pub use union::UnionIter;
pub use structure::TxStructure;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of txnbuf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
