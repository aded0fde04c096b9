//! [`TestTree`] fixture for synchronization scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// What a snapshot records for one relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
}

/// Record every entry below `root` by relative path.
///
/// Symlinks are not followed; the fixtures only create plain files and
/// directories.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Node> {
    let mut nodes = BTreeMap::new();
    collect(root, Path::new(""), &mut nodes);
    nodes
}

fn collect(root: &Path, relative: &Path, nodes: &mut BTreeMap<PathBuf, Node>) {
    let dir = root.join(relative);
    let entries = fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("snapshot: cannot list {}: {e}", dir.display()));
    for entry in entries {
        let entry = entry.expect("snapshot: bad directory entry");
        let rel = relative.join(entry.file_name());
        let file_type = entry.file_type().expect("snapshot: no file type");
        if file_type.is_dir() {
            nodes.insert(rel.clone(), Node::Dir);
            collect(root, &rel, nodes);
        } else {
            let bytes = fs::read(entry.path()).expect("snapshot: cannot read file");
            nodes.insert(rel, Node::File(bytes));
        }
    }
}

/// A temporary directory with `source/` and `replica/` subdirectories.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.source_file("d/x.txt", "hello");
/// tree.replica_file("old.txt", "stale");
/// // run a pass, then:
/// tree.assert_mirrored();
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create empty `source/` and `replica/` directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("TestTree::new: failed to create temp dir");
        fs::create_dir(temp_dir.path().join("source")).expect("create source");
        fs::create_dir(temp_dir.path().join("replica")).expect("create replica");
        Self { temp_dir }
    }

    /// The temporary root holding both trees.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn replica(&self) -> PathBuf {
        self.root().join("replica")
    }

    /// Write a file under `source/`, creating parent directories.
    pub fn source_file(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.source(), relative, content.as_ref())
    }

    /// Write a file under `replica/`, creating parent directories.
    pub fn replica_file(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.replica(), relative, content.as_ref())
    }

    /// Create a directory (and parents) under `source/`.
    pub fn source_dir(&self, relative: &str) -> PathBuf {
        make_dir(&self.source(), relative)
    }

    /// Create a directory (and parents) under `replica/`.
    pub fn replica_dir(&self, relative: &str) -> PathBuf {
        make_dir(&self.replica(), relative)
    }

    /// Read a replica file as UTF-8.
    pub fn read_replica(&self, relative: &str) -> String {
        fs::read_to_string(self.replica().join(relative))
            .unwrap_or_else(|e| panic!("read_replica: {relative}: {e}"))
    }

    pub fn replica_exists(&self, relative: &str) -> bool {
        self.replica().join(relative).exists()
    }

    /// Assert that both trees hold the same entries with the same bytes.
    pub fn assert_mirrored(&self) {
        assert_eq!(snapshot(&self.source()), snapshot(&self.replica()));
    }
}

fn write_file(base: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("write_file: create parents");
    }
    fs::write(&path, content).unwrap_or_else(|e| panic!("write_file: {relative}: {e}"));
    path
}

fn make_dir(base: &Path, relative: &str) -> PathBuf {
    let path = base.join(relative);
    fs::create_dir_all(&path).unwrap_or_else(|e| panic!("make_dir: {relative}: {e}"));
    path
}
