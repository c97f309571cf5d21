//! Classpath roots consumed by the package-part index.
//!
//! The index never walks a classpath itself; it is handed roots that
//! implement the small traits here. [`JarRoot`] and [`DirRoot`] cover the
//! two physical shapes of a binary dependency (archive and exploded
//! directory); anything else — an in-memory test root, an IDE VFS adapter —
//! implements the same seam.

mod dir;
mod discover;
mod jar;

pub use dir::DirRoot;
pub use discover::discover_binary_roots;
pub use jar::JarRoot;

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Identity of a classpath root.
///
/// Compared by value. Root constructors canonicalize their path before
/// forming the id, so two spellings of the same container compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RootId(Arc<str>);

impl RootId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a classpath root. Only binary (compiled) roots carry
/// module-mapping manifests; source roots are skipped by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Binary,
    Source,
}

/// A directory-like container of compiled output.
pub trait ClasspathRoot: Send + Sync {
    /// Stable identity of the container.
    fn id(&self) -> RootId;

    /// The conventional metadata directory (`META-INF`), or `None` when
    /// the root has no such directory.
    fn metadata_dir(&self) -> Option<Box<dyn MetadataDir>>;
}

/// Handle to a root's metadata directory.
pub trait MetadataDir {
    /// Direct children of the directory. Enumeration failure is an I/O
    /// error, fatal to the `add_roots` call that triggered it.
    fn children(&self) -> io::Result<Vec<Box<dyn MetadataEntry>>>;
}

/// One file entry inside a metadata directory.
pub trait MetadataEntry {
    /// Entry file name, without any directory prefix.
    fn name(&self) -> &str;

    /// Full entry content. Failures are fatal and propagated, never
    /// retried.
    fn read_all_bytes(&self) -> io::Result<Vec<u8>>;
}

/// Membership test deciding which roots the active session resolves
/// against.
pub trait ResolutionScope: Send + Sync {
    fn contains(&self, root: &RootId) -> bool;
}

/// Scope containing every root.
#[derive(Debug, Clone, Copy, Default)]
pub struct EverythingScope;

impl ResolutionScope for EverythingScope {
    fn contains(&self, _root: &RootId) -> bool {
        true
    }
}

/// Scope restricted to an explicit set of root ids.
#[derive(Debug, Default)]
pub struct ExplicitScope {
    roots: HashSet<RootId>,
}

impl ExplicitScope {
    pub fn new(roots: impl IntoIterator<Item = RootId>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

impl ResolutionScope for ExplicitScope {
    fn contains(&self, root: &RootId) -> bool {
        self.roots.contains(root)
    }
}
