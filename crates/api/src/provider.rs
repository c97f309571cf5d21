use crate::model::ModuleMapping;
use std::sync::Arc;

/// Source of JVM-level package parts for compiled dependencies.
///
/// For example, if a file named `foo.kt` in package `org.test` was compiled
/// into a library, the provider for that library answers the query
/// `"org.test"` with `[(mapping-of-that-library, "org/test/FooKt")]`.
///
/// Implementations must be callable from parallel resolution workers.
pub trait PackagePartProvider: Send + Sync {
    /// JVM internal names of the parts implementing `package_fqn`, each
    /// paired with the mapping of the module that defines it. Parts merged
    /// behind a multifile facade are reported once per distinct facade.
    ///
    /// Total over any input: an unknown package yields an empty list.
    fn find_package_parts(&self, package_fqn: &str) -> Vec<(Arc<ModuleMapping>, String)>;
}

/// Secondary capability on top of [`PackagePartProvider`]: metadata-only
/// parts used for common/cross-platform source resolution.
///
/// Kept as a separate trait so callers that need it obtain the capability
/// explicitly instead of downcasting the base provider.
pub trait MetadataPartProvider: Send + Sync {
    /// Distinct metadata part names for `package_fqn`, first-occurrence
    /// order. No facade grouping applies to metadata parts.
    fn find_metadata_package_parts(&self, package_fqn: &str) -> Vec<String>;
}

/// Provider with no compiled dependencies behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPackagePartProvider;

impl PackagePartProvider for EmptyPackagePartProvider {
    fn find_package_parts(&self, _package_fqn: &str) -> Vec<(Arc<ModuleMapping>, String)> {
        Vec::new()
    }
}

impl MetadataPartProvider for EmptyPackagePartProvider {
    fn find_metadata_package_parts(&self, _package_fqn: &str) -> Vec<String> {
        Vec::new()
    }
}
