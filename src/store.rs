//! Core store type and builder.

use crate::error::{Error, Result};
use crate::persist::{atomic_write, load};
use crate::serializer::{JsonSerializer, Serializer};
use crate::writer::{DeferredWriter, ErrorHook};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Single-file JSON document store.
///
/// The whole dataset lives in memory as one JSON object and is persisted
/// by rewriting the backing file in full. Use [`open`](Self::open) for a
/// quick start or [`builder`](Self::builder) for control over write
/// policy and output formatting.
///
/// Mutation goes through `&mut self`, so a store is single-writer by
/// construction; wrap it in a lock if several threads need it.
pub struct JsonDb {
    data: Map<String, Value>,
    path: PathBuf,
    serializer: JsonSerializer,
    write_on_mutate: bool,
    writer: Option<DeferredWriter>,
}

impl JsonDb {
    /// Open (or lazily create) a store at `path` with the default
    /// configuration: blocking writes, sync after every mutation, 4-space
    /// indentation.
    ///
    /// A missing file is not an error — the store starts empty and the
    /// file appears on the first sync.
    pub fn open(path: impl AsRef<Path>) -> Result<JsonDb> {
        Self::builder(path).build()
    }

    /// Start configuring a new store. Call [`.build()`](JsonDbBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> JsonDbBuilder {
        JsonDbBuilder::new(path)
    }

    // ---- reads ----

    /// Get the value stored under `key`, or `None` if the key is absent.
    ///
    /// `None` means "no such key" — a stored JSON `null` comes back as
    /// `Some(&Value::Null)`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// `true` if the key exists, stored `null` included.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snapshot of all keys, in storage order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Snapshot of all values, in storage order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.data.values().cloned().collect()
    }

    /// Deep copy of the entire object. Mutating the returned map does not
    /// touch the store; use [`replace`](Self::replace) to write a whole
    /// object back.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---- writes ----

    /// Create or overwrite `key`, returning the previous value if the key
    /// existed.
    ///
    /// Accepts anything serializable; a value that cannot be represented
    /// as JSON (say, a map with non-string keys) fails with
    /// [`Error::Serialize`] before the store is touched. With
    /// write-on-mutate enabled the new state is synced immediately; a
    /// failed sync does not roll back the in-memory insert.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<Option<Value>> {
        let value = serde_json::to_value(value).map_err(|e| Error::Serialize(e.to_string()))?;
        let prev = self.data.insert(key.into(), value);
        self.after_mutation()?;
        Ok(prev)
    }

    /// Remove `key`, returning its value if it was present.
    ///
    /// The three outcomes stay distinguishable: `Ok(Some(_))` means the
    /// key was removed (and any implicit sync succeeded), `Ok(None)` means
    /// the key never existed (nothing changed, nothing synced), and
    /// `Err(_)` means the removal happened but the implicit sync failed.
    pub fn delete(&mut self, key: &str) -> Result<Option<Value>> {
        match self.data.remove(key) {
            Some(prev) => {
                self.after_mutation()?;
                Ok(Some(prev))
            }
            None => Ok(None),
        }
    }

    /// Drop every entry, syncing at most once regardless of entry count.
    /// Returns the store for chaining.
    pub fn clear(&mut self) -> Result<&mut Self> {
        self.data.clear();
        self.after_mutation()?;
        Ok(self)
    }

    /// Bulk-insert from an iterator. All values are converted up front, so
    /// a non-serializable value fails the whole batch before any insert;
    /// only one sync runs at the end, not one per entry.
    pub fn extend<I, K, V>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let entries = iter
            .into_iter()
            .map(|(k, v)| {
                let v = serde_json::to_value(v).map_err(|e| Error::Serialize(e.to_string()))?;
                Ok((k.into(), v))
            })
            .collect::<Result<Vec<_>>>()?;
        for (k, v) in entries {
            self.data.insert(k, v);
        }
        self.after_mutation()
    }

    /// Mutate the value at `key` in place. Returns `false` if the key
    /// doesn't exist (nothing happens in that case, no sync either).
    pub fn update<F>(&mut self, key: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Value),
    {
        match self.data.get_mut(key) {
            Some(v) => {
                f(v);
                self.after_mutation()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace the entire object wholesale.
    ///
    /// The argument must serialize to a JSON *object*; anything else fails
    /// with [`Error::InvalidArgument`] and leaves the current state
    /// intact. Returns a copy of the new state. Does not sync by itself —
    /// persistence still goes through [`sync`](Self::sync) or the next
    /// write-on-mutate cascade.
    pub fn replace(&mut self, value: impl Serialize) -> Result<Map<String, Value>> {
        let replacement = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(Error::InvalidArgument(
                    "replacement is not a valid JSON object".into(),
                ))
            }
            Err(e) => {
                return Err(Error::InvalidArgument(format!(
                    "replacement is not a valid JSON object: {e}"
                )))
            }
        };
        self.data = replacement;
        Ok(self.data.clone())
    }

    // ---- persistence ----

    /// Serialize the whole object and replace the backing file's content.
    ///
    /// Blocking mode (the default) returns once the write has landed or
    /// failed. With deferred writes the snapshot is serialized here, on
    /// the calling thread, then queued to the background writer and the
    /// call returns immediately — failures surface through
    /// [`take_write_error`](Self::take_write_error) and the builder's
    /// error hook, not through this return value.
    pub fn sync(&self) -> Result<()> {
        let bytes = self.serializer.serialize(&self.data)?;
        match &self.writer {
            Some(w) => {
                w.submit(bytes);
                Ok(())
            }
            None => atomic_write(&self.path, &bytes),
        }
    }

    /// Most recent deferred-write failure, if any. Always `None` for
    /// stores in blocking mode (those report failures inline).
    pub fn take_write_error(&self) -> Option<Error> {
        self.writer.as_ref().and_then(DeferredWriter::take_error)
    }

    // ---- internal ----

    fn after_mutation(&mut self) -> Result<()> {
        if self.write_on_mutate {
            self.sync()
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for JsonDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDb")
            .field("path", &self.path)
            .field("entries", &self.data.len())
            .field("write_on_mutate", &self.write_on_mutate)
            .field("deferred_write", &self.writer.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`JsonDb`] store.
///
/// ```rust,no_run
/// use json_db::JsonDb;
///
/// let db = JsonDb::builder("config.json")
///     .write_on_mutate(false)
///     .indent_width(2)
///     .build()
///     .unwrap();
/// ```
pub struct JsonDbBuilder {
    path: PathBuf,
    deferred_write: bool,
    write_on_mutate: bool,
    indent_width: usize,
    on_write_error: Option<ErrorHook>,
}

impl JsonDbBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            deferred_write: false,
            write_on_mutate: true,
            indent_width: 4,
            on_write_error: None,
        }
    }

    /// Hand syncs to a background writer thread instead of blocking the
    /// caller (default: `false`).
    pub fn deferred_write(mut self, yes: bool) -> Self {
        self.deferred_write = yes;
        self
    }

    /// Sync to disk after every mutation (default: `true`). Disable it and
    /// the file only changes on explicit [`sync`](JsonDb::sync) calls.
    pub fn write_on_mutate(mut self, yes: bool) -> Self {
        self.write_on_mutate = yes;
        self
    }

    /// Spaces of indentation in the output file (default: `4`; `0` writes
    /// compact JSON). Cosmetic only.
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Callback for deferred-write failures, invoked on the writer thread.
    /// Without one, failures are still logged and kept for
    /// [`take_write_error`](JsonDb::take_write_error).
    pub fn on_write_error(mut self, hook: impl Fn(Error) + Send + Sync + 'static) -> Self {
        self.on_write_error = Some(Arc::new(hook));
        self
    }

    /// Validate the path, load any existing content, and return the store.
    ///
    /// Fails with [`Error::InvalidArgument`] on an empty path,
    /// [`Error::PermissionDenied`] when an existing file lacks read+write
    /// access, [`Error::Corrupt`] when existing content is not a JSON
    /// object, and [`Error::Io`] for other filesystem failures.
    pub fn build(self) -> Result<JsonDb> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("missing file path".into()));
        }

        let serializer = JsonSerializer::with_indent(self.indent_width);
        let data = load(&self.path, &serializer)?;

        let writer = if self.deferred_write {
            Some(DeferredWriter::spawn(self.path.clone(), self.on_write_error))
        } else {
            None
        };

        Ok(JsonDb {
            data,
            path: self.path,
            serializer,
            write_on_mutate: self.write_on_mutate,
            writer,
        })
    }
}

impl std::fmt::Debug for JsonDbBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDbBuilder")
            .field("path", &self.path)
            .field("deferred_write", &self.deferred_write)
            .field("write_on_mutate", &self.write_on_mutate)
            .field("indent_width", &self.indent_width)
            .finish_non_exhaustive()
    }
}
