use crate::config::{Consistency, Format, Options};
use crate::document;
use crate::error::{Result, ShelfError};
use crate::locks::{self, LockRegistry};
use crate::logger::Logger;
use crate::path::{self, Resolver, Target};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// The main entry point for ShelfDB.
/// Owns a root directory in which every collection is a subdirectory and
/// every record a single file, and serializes mutations per collection.
pub struct Store {
    resolver: Resolver,
    locks: LockRegistry,
    logger: Arc<dyn Logger>,
    format: Format,
    consistency: Consistency,
}

impl Store {
    /// Open a store rooted at `path`, creating the directory if it does not exist.
    pub fn open(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let Options {
            logger,
            format,
            consistency,
        } = options;
        let root = path::normalize(path.as_ref());

        if root.is_dir() {
            logger.debug(format_args!(
                "Using '{}' (database already exists)",
                root.display()
            ));
        } else {
            logger.debug(format_args!(
                "Creating the database at '{}'...",
                root.display()
            ));
            document::create_dir_all(&root)?;
        }

        Ok(Store {
            resolver: Resolver::new(root, format),
            locks: LockRegistry::new(),
            logger,
            format,
            consistency,
        })
    }

    /// Open with the default options: JSON records, console logging at info level.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, Options::default())
    }

    /// Get the root data directory path
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Persist `value` as `collection/resource`, replacing any previous record.
    ///
    /// The record is written to a temp file next to its final location and
    /// renamed into place, so a reader never observes a partial record.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        resource: &str,
        value: &T,
    ) -> Result<()> {
        if collection.is_empty() {
            return Err(ShelfError::Validation(
                "Missing collection - no place to save record!".into(),
            ));
        }
        if resource.is_empty() {
            return Err(ShelfError::Validation(
                "Missing resource - unable to save the record (no name)!".into(),
            ));
        }

        let lock = self.locks.acquire(collection);
        let _guard = locks::exclusive(&lock);

        let dir = self.resolver.collection_dir(collection);
        if document::ensure_dir(&dir)? {
            self.logger
                .trace(format_args!("Created collection '{collection}'"));
        }

        let bytes = self.format.encode(value)?;
        let target = self.resolver.record_path(collection, resource);
        let temp = self.resolver.temp_path(&target);
        document::write_atomic(&target, &temp, &bytes)?;

        self.logger.trace(format_args!(
            "Wrote {collection}/{resource} ({} bytes)",
            bytes.len()
        ));
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Load `collection/resource` and decode it into `T`.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> Result<T> {
        if collection.is_empty() {
            return Err(ShelfError::Validation(
                "Missing collection - unable to read".into(),
            ));
        }
        if resource.is_empty() {
            return Err(ShelfError::Validation(
                "Missing resource - unable to read record (no name)!".into(),
            ));
        }

        let lock = self.read_lock(collection);
        let _guard = lock.as_deref().map(locks::shared);

        let not_found = || ShelfError::NotFound {
            path: path::relative(collection, resource),
        };

        let base = self.resolver.base_path(collection, resource);
        if self.resolver.probe(&base)?.is_none() {
            return Err(not_found());
        }

        let record = self.resolver.record_path(collection, resource);
        let bytes = match fs::read(&record) {
            Ok(bytes) => bytes,
            // The bare path exists (a nested collection) but holds no record
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        self.format.decode(&bytes)
    }

    /// Like [`read`](Self::read), but decodes into an existing value.
    pub fn read_into<T: DeserializeOwned>(
        &self,
        collection: &str,
        resource: &str,
        destination: &mut T,
    ) -> Result<()> {
        *destination = self.read(collection, resource)?;
        Ok(())
    }

    /// Return the raw bytes of every file directly inside `collection`,
    /// in directory enumeration order. Nothing is decoded or checked for
    /// valid UTF-8; use [`read_all_as`](Self::read_all_as) for that.
    ///
    /// Subdirectories (nested collections) are skipped. Any read failure
    /// aborts the whole call.
    pub fn read_all(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        if collection.is_empty() {
            return Err(ShelfError::Validation(
                "Missing collection - unable to read".into(),
            ));
        }

        let lock = self.read_lock(collection);
        let _guard = lock.as_deref().map(locks::shared);

        let dir = self.resolver.collection_dir(collection);
        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(ShelfError::NotFound {
                    path: path::relative(collection, ""),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ShelfError::NotFound {
                    path: path::relative(collection, ""),
                })
            }
            Err(e) => return Err(e.into()),
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            records.push(fs::read(entry.path())?);
        }

        self.logger.trace(format_args!(
            "Read {} records from '{collection}'",
            records.len()
        ));
        Ok(records)
    }

    /// Read every record in `collection` and decode each with the store's format.
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.read_all(collection)?
            .iter()
            .map(|raw| self.format.decode(raw))
            .collect()
    }

    // ── Deletes ─────────────────────────────────────────────────────

    /// Delete `collection/resource`.
    ///
    /// With an empty `resource` the whole collection directory is removed.
    /// The collection name itself is not checked, so `delete("", "")`
    /// targets the store root.
    pub fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        let lock = self.locks.acquire(collection);
        let _guard = locks::exclusive(&lock);

        let not_found = || ShelfError::NotFound {
            path: path::relative(collection, resource),
        };

        let base = self.resolver.base_path(collection, resource);
        let removed = match self.resolver.classify(&base)? {
            Target::Directory(dir) => fs::remove_dir_all(dir),
            Target::File(file) => fs::remove_file(file),
            Target::Missing => return Err(not_found()),
        };
        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }

        self.logger.trace(format_args!(
            "Deleted {}",
            path::relative(collection, resource).display()
        ));
        Ok(())
    }

    /// Remove a collection and every record in it.
    pub fn drop_collection(&self, collection: &str) -> Result<()> {
        if collection.is_empty() {
            return Err(ShelfError::Validation(
                "Missing collection - nothing to drop".into(),
            ));
        }
        self.delete(collection, "")
    }

    /// The collection lock when reads must not overlap writes.
    fn read_lock(&self, collection: &str) -> Option<Arc<RwLock<()>>> {
        match self.consistency {
            Consistency::BestEffort => None,
            Consistency::Strict => Some(self.locks.acquire(collection)),
        }
    }
}
