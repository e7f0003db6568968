// Path resolution - maps (collection, resource) pairs onto the filesystem

use crate::config::Format;
use std::ffi::OsString;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Suffix of the scratch file a record is written to before being renamed into place.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Lexically clean a path: drop `.` components and fold `..` into the
/// preceding normal component. Never touches the filesystem.
/// An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Append `suffix` to the final component without treating it as an extension
/// replacement, so `alice.v2` becomes `alice.v2.json`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// `collection/resource` relative to the store root, skipping empty segments.
pub fn relative(collection: &str, resource: &str) -> PathBuf {
    [collection, resource]
        .iter()
        .filter(|s| !s.is_empty())
        .collect()
}

/// What a probed record path turned out to be.
#[derive(Debug)]
pub enum Target {
    Directory(PathBuf),
    File(PathBuf),
    Missing,
}

/// Resolves logical record names to paths under a store root.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    format: Format,
}

impl Resolver {
    pub fn new(root: PathBuf, format: Format) -> Self {
        Resolver { root, format }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(relative(collection, ""))
    }

    /// The record path without its format suffix. With an empty resource
    /// this is the collection directory itself.
    pub fn base_path(&self, collection: &str, resource: &str) -> PathBuf {
        self.root.join(relative(collection, resource))
    }

    /// Final on-disk location of a record.
    pub fn record_path(&self, collection: &str, resource: &str) -> PathBuf {
        with_suffix(&self.base_path(collection, resource), self.format.extension())
    }

    pub fn temp_path(&self, record_path: &Path) -> PathBuf {
        with_suffix(record_path, TEMP_SUFFIX)
    }

    /// Stat `base`, falling back to `base` plus the format suffix when the bare
    /// path does not exist. `Ok(None)` means neither exists.
    pub fn probe(&self, base: &Path) -> io::Result<Option<Metadata>> {
        match std::fs::metadata(base) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let suffixed = with_suffix(base, self.format.extension());
                match std::fs::metadata(suffixed) {
                    Ok(meta) => Ok(Some(meta)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Classify a record target for deletion. A directory is removed as a
    /// whole, anything else refers to the suffixed record file.
    pub fn classify(&self, base: &Path) -> io::Result<Target> {
        Ok(match self.probe(base)? {
            None => Target::Missing,
            Some(meta) if meta.is_dir() => Target::Directory(base.to_path_buf()),
            Some(_) => Target::File(with_suffix(base, self.format.extension())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("./data/../db/")), PathBuf::from("db"));
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("/../tmp")), PathBuf::from("/tmp"));
    }

    #[test]
    fn test_with_suffix_keeps_existing_dots() {
        assert_eq!(
            with_suffix(Path::new("users/alice.v2"), ".json"),
            PathBuf::from("users/alice.v2.json")
        );
    }

    #[test]
    fn test_relative_skips_empty_segments() {
        assert_eq!(relative("users", "alice"), PathBuf::from("users/alice"));
        assert_eq!(relative("users", ""), PathBuf::from("users"));
        assert_eq!(relative("", "alice"), PathBuf::from("alice"));
    }

    #[test]
    fn test_record_and_temp_paths() {
        let resolver = Resolver::new(PathBuf::from("/db"), Format::Json);
        let record = resolver.record_path("users", "alice");
        assert_eq!(record, PathBuf::from("/db/users/alice.json"));
        assert_eq!(
            resolver.temp_path(&record),
            PathBuf::from("/db/users/alice.json.tmp")
        );
        assert_eq!(resolver.base_path("users", ""), PathBuf::from("/db/users"));

        let yaml = Resolver::new(PathBuf::from("/db"), Format::Yaml);
        assert_eq!(
            yaml.record_path("users", "bob"),
            PathBuf::from("/db/users/bob.yaml")
        );
    }

    #[test]
    fn test_probe_falls_back_to_suffixed_path() {
        let tmp = TempDir::new().unwrap();
        let resolver = Resolver::new(tmp.path().to_path_buf(), Format::Json);
        std::fs::create_dir_all(tmp.path().join("users")).unwrap();
        std::fs::write(tmp.path().join("users/alice.json"), "{}\n").unwrap();

        let base = resolver.base_path("users", "alice");
        assert!(resolver.probe(&base).unwrap().unwrap().is_file());
        assert!(resolver
            .probe(&resolver.base_path("users", "bob"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_classify() {
        let tmp = TempDir::new().unwrap();
        let resolver = Resolver::new(tmp.path().to_path_buf(), Format::Json);
        std::fs::create_dir_all(tmp.path().join("users")).unwrap();
        std::fs::write(tmp.path().join("users/alice.json"), "{}\n").unwrap();

        match resolver.classify(&resolver.base_path("users", "")).unwrap() {
            Target::Directory(p) => assert_eq!(p, tmp.path().join("users")),
            other => panic!("expected directory, got {other:?}"),
        }
        match resolver.classify(&resolver.base_path("users", "alice")).unwrap() {
            Target::File(p) => assert_eq!(p, tmp.path().join("users/alice.json")),
            other => panic!("expected file, got {other:?}"),
        }
        assert!(matches!(
            resolver.classify(&resolver.base_path("users", "carol")).unwrap(),
            Target::Missing
        ));
    }
}
