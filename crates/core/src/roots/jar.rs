use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::{ClasspathRoot, MetadataDir, MetadataEntry, RootId};
use crate::codec::METADATA_DIR_NAME;

/// Zip-archive-backed classpath root (a `.jar` library).
pub struct JarRoot {
    path: PathBuf,
    id: RootId,
}

impl JarRoot {
    /// Open an archive root. Sniffs the `PK` magic before handing the file
    /// to the zip parser, so a mislabeled non-archive fails here rather
    /// than deep inside a scan.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let canonical = path.canonicalize()?;

        let mut file = File::open(&canonical)?;
        let mut magic = [0u8; 2];
        file.read_exact(&mut magic)?;
        if magic != *b"PK" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not a zip archive", path.display()),
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

    fn open_archive(&self) -> io::Result<ZipArchive<File>> {
        let file = File::open(&self.path)?;
        ZipArchive::new(file).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl ClasspathRoot for JarRoot {
    fn id(&self) -> RootId {
        self.id.clone()
    }

    fn metadata_dir(&self) -> Option<Box<dyn MetadataDir>> {
        // Entry names are listed once up front; bytes are read on demand.
        let archive = self.open_archive().ok()?;
        let prefix = format!("{METADATA_DIR_NAME}/");
        let names: Vec<String> = archive
            .file_names()
            .filter(|name| {
                let Some(rest) = name.strip_prefix(prefix.as_str()) else {
                    return false;
                };
                // Direct children only, and not the directory entry itself.
                !rest.is_empty() && !rest.contains('/')
            })
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(Box::new(JarMetadataDir {
            path: self.path.clone(),
            entry_paths: names,
        }))
    }
}

struct JarMetadataDir {
    path: PathBuf,
    entry_paths: Vec<String>,
}

impl MetadataDir for JarMetadataDir {
    fn children(&self) -> io::Result<Vec<Box<dyn MetadataEntry>>> {
        Ok(self
            .entry_paths
            .iter()
            .map(|entry_path| {
                let name = entry_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(entry_path)
                    .to_string();
                Box::new(JarMetadataEntry {
                    path: self.path.clone(),
                    entry_path: entry_path.clone(),
                    name,
                }) as Box<dyn MetadataEntry>
            })
            .collect())
    }
}

struct JarMetadataEntry {
    path: PathBuf,
    entry_path: String,
    name: String,
}

impl MetadataEntry for JarMetadataEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all_bytes(&self) -> io::Result<Vec<u8>> {
        let file = File::open(&self.path)?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut entry = archive
            .by_name(&self.entry_path)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
