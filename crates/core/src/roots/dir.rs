use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ClasspathRoot, MetadataDir, MetadataEntry, RootId};
use crate::codec::METADATA_DIR_NAME;

/// Exploded-directory classpath root (e.g. a `classes/` output tree).
pub struct DirRoot {
    path: PathBuf,
    id: RootId,
}

impl DirRoot {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let canonical = path.canonicalize()?;
        if !canonical.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }
        let id = RootId::new(canonical.display().to_string());
        Ok(Self {
            path: canonical,
            id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClasspathRoot for DirRoot {
    fn id(&self) -> RootId {
        self.id.clone()
    }

    fn metadata_dir(&self) -> Option<Box<dyn MetadataDir>> {
        let dir = self.path.join(METADATA_DIR_NAME);
        if !dir.is_dir() {
            return None;
        }
        Some(Box::new(DirMetadataDir { path: dir }))
    }
}

struct DirMetadataDir {
    path: PathBuf,
}

impl MetadataDir for DirMetadataDir {
    fn children(&self) -> io::Result<Vec<Box<dyn MetadataEntry>>> {
        let mut entries: Vec<Box<dyn MetadataEntry>> = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(Box::new(DirMetadataEntry {
                path: entry.path(),
                name,
            }));
        }
        // read_dir order is platform-dependent; make scans deterministic.
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }
}

struct DirMetadataEntry {
    path: PathBuf,
    name: String,
}

impl MetadataEntry for DirMetadataEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}
