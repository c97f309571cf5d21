use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use partscope_api::{MetadataPartProvider, ModuleMapping, PackagePartProvider};
use tracing::{debug, trace};

use crate::codec::{MAPPING_FILE_SUFFIX, METADATA_DIR_NAME, decode_module_mapping};
use crate::config::DeserializationPolicy;
use crate::error::{IndexError, Result};
use crate::roots::{ClasspathRoot, ResolutionScope, RootId, RootKind};

/// Session-scoped index of package parts across binary classpath roots.
///
/// Created empty at session start, grown by [`add_roots`] as dependencies
/// are discovered, queried from parallel resolution workers through the
/// [`PackagePartProvider`] and [`MetadataPartProvider`] capabilities, and
/// discarded with the session. One instance per compilation session; there
/// is no ambient global.
///
/// All registry mutation and traversal happens under a single lock, so
/// readers never observe a partially appended entry. Scanning and decoding
/// run under the same lock; manifests are small and local, and correctness
/// beats add-path throughput here.
///
/// [`add_roots`]: PackagePartIndex::add_roots
pub struct PackagePartIndex {
    policy: DeserializationPolicy,
    scope: Arc<dyn ResolutionScope>,
    inner: Mutex<Vec<LoadedMapping>>,
}

struct LoadedMapping {
    root: RootId,
    mapping: Arc<ModuleMapping>,
}

impl PackagePartIndex {
    pub fn new(policy: DeserializationPolicy, scope: Arc<dyn ResolutionScope>) -> Self {
        Self {
            policy,
            scope,
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Scan candidate roots for module-mapping manifests and append every
    /// decoded mapping to the registry.
    ///
    /// Non-binary and out-of-scope roots are skipped silently, as are
    /// roots without a metadata directory. A read or decode failure aborts
    /// the call with the offending root and entry; mappings committed
    /// earlier — by this call or previous ones — stay visible (best
    /// effort, no rollback). Re-adding a root appends duplicate entries;
    /// query results are unchanged at the set level.
    pub fn add_roots(&self, candidates: &[(Arc<dyn ClasspathRoot>, RootKind)]) -> Result<()> {
        // One guard for the whole call: concurrent calls never interleave
        // their appends, and readers never observe a half-scanned batch.
        let mut entries = self.lock();
        for (root, kind) in candidates {
            if *kind != RootKind::Binary {
                trace!(root = %root.id(), "skipping non-binary root");
                continue;
            }
            let id = root.id();
            if !self.scope.contains(&id) {
                trace!(root = %id, "skipping root outside the resolution scope");
                continue;
            }
            let Some(metadata_dir) = root.metadata_dir() else {
                continue;
            };

            let children = metadata_dir.children().map_err(|e| IndexError::Io {
                root: id.to_string(),
                entry: METADATA_DIR_NAME.to_string(),
                source: e,
            })?;
            for entry in children {
                if !entry.name().ends_with(MAPPING_FILE_SUFFIX) {
                    continue;
                }
                let bytes = entry.read_all_bytes().map_err(|e| IndexError::Io {
                    root: id.to_string(),
                    entry: entry.name().to_string(),
                    source: e,
                })?;
                let label = format!("{id}!/{METADATA_DIR_NAME}/{}", entry.name());
                let mapping = decode_module_mapping(&bytes, &label, self.policy).map_err(|e| {
                    IndexError::Decode {
                        root: id.to_string(),
                        entry: entry.name().to_string(),
                        source: e,
                    }
                })?;
                debug!(
                    root = %id,
                    entry = entry.name(),
                    packages = mapping.package_count(),
                    "loaded module mapping"
                );
                entries.push(LoadedMapping {
                    root: id.clone(),
                    mapping: Arc::new(mapping),
                });
            }
        }
        Ok(())
    }

    /// Number of mapping entries loaded so far.
    pub fn mapping_count(&self) -> usize {
        self.lock().len()
    }

    /// Identities of the roots that contributed entries, in addition order.
    /// A root re-added or holding several manifests appears once per entry.
    pub fn contributing_roots(&self) -> Vec<RootId> {
        self.lock().iter().map(|loaded| loaded.root.clone()).collect()
    }

    /// Mappings holding a non-empty parts record for `package_fqn`, in
    /// entry-addition order.
    fn mappings_for_package(&self, package_fqn: &str) -> Vec<Arc<ModuleMapping>> {
        self.lock()
            .iter()
            .filter(|loaded| {
                loaded
                    .mapping
                    .package_parts(package_fqn)
                    .is_some_and(|parts| !parts.is_empty())
            })
            .map(|loaded| Arc::clone(&loaded.mapping))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LoadedMapping>> {
        self.inner.lock().expect("package part index lock poisoned")
    }
}

impl PackagePartProvider for PackagePartIndex {
    /// Walks the mappings in addition order, emitting each standalone part
    /// and the first-encountered part of every distinct multifile facade.
    /// The compiler must see one physical symbol per facade no matter how
    /// many constituent parts or separately added mappings mention it.
    ///
    /// The visited-facade set lives on this call's stack: it accumulates
    /// across mappings within one query and is never carried over to the
    /// next one.
    fn find_package_parts(&self, package_fqn: &str) -> Vec<(Arc<ModuleMapping>, String)> {
        let mappings = self.mappings_for_package(package_fqn);
        if mappings.is_empty() {
            return Vec::new();
        }

        let mut result = Vec::new();
        let mut visited_facades: HashSet<String> = HashSet::new();
        for mapping in &mappings {
            let Some(parts) = mapping.package_parts(package_fqn) else {
                continue;
            };
            for name in parts.parts() {
                match parts.multifile_facade_name(name) {
                    None => result.push((Arc::clone(mapping), name.to_string())),
                    Some(facade) => {
                        if visited_facades.insert(facade.to_string()) {
                            result.push((Arc::clone(mapping), name.to_string()));
                        }
                    }
                }
            }
        }
        result
    }
}

impl MetadataPartProvider for PackagePartIndex {
    fn find_metadata_package_parts(&self, package_fqn: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for mapping in self.mappings_for_package(package_fqn) {
            let Some(parts) = mapping.package_parts(package_fqn) else {
                continue;
            };
            for name in parts.metadata_parts() {
                if seen.insert(name.to_string()) {
                    result.push(name.to_string());
                }
            }
        }
        result
    }
}
