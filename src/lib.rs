//! Single-file JSON document store.
//!
//! The entire dataset is an in-memory JSON object persisted as one JSON
//! file on disk: load on open, rewrite the whole file on sync. Good for
//! configuration caches, small local databases, and prototyping — not a
//! replacement for a real database.
//!
//! ```rust,no_run
//! use json_db::JsonDb;
//!
//! let mut db = JsonDb::open("db.json").unwrap();
//! db.set("hello", "world").unwrap();
//! assert_eq!(db.get("hello").unwrap(), "world");
//! ```
//!
//! By default every mutation is synced to disk immediately; use the
//! [builder](JsonDb::builder) to defer syncs to an explicit call or hand
//! them to a background writer thread.
//!
//! **Single-process only.** There is no file locking: two processes
//! opening the same path will silently overwrite each other, last writer
//! wins. Reach for advisory locks or a real database if you need
//! multi-process access.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod persist;
pub mod serializer;
pub mod store;
pub mod writer;

pub use error::{Error, Result};
pub use store::{JsonDb, JsonDbBuilder};
