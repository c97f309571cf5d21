use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::warn;
use walkdir::WalkDir;

use super::{ClasspathRoot, DirRoot, JarRoot, RootKind};
use crate::codec::METADATA_DIR_NAME;

/// Walk `dir` collecting binary roots for the index: `.jar` archives and
/// exploded class directories (any directory with a `META-INF` child).
///
/// Exploded roots are not descended into, so a jar unpacked on disk
/// contributes one root rather than one per nested directory. Files with a
/// `.jar` name that turn out not to be archives are skipped with a warning.
/// Results are sorted by root id for deterministic addition order.
pub fn discover_binary_roots(dir: &Path) -> io::Result<Vec<(Arc<dyn ClasspathRoot>, RootKind)>> {
    let mut roots: Vec<Arc<dyn ClasspathRoot>> = Vec::new();

    let mut walker = WalkDir::new(dir).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            if path.join(METADATA_DIR_NAME).is_dir() {
                roots.push(Arc::new(DirRoot::open(path)?));
                walker.skip_current_dir();
            }
            continue;
        }

        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "jar")
        {
            match JarRoot::open(path) {
                Ok(root) => roots.push(Arc::new(root)),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable jar"),
            }
        }
    }

    roots.sort_by_key(|root| root.id());
    Ok(roots
        .into_iter()
        .map(|root| (root, RootKind::Binary))
        .collect())
}
