use indexmap::{IndexMap, IndexSet};

/// Decoded content of one module-mapping manifest found under a binary
/// classpath root.
///
/// Maps package FQNs to the [`PackageParts`] compiled from that package in
/// the originating module. A mapping is immutable once constructed; the
/// index hands it out behind an `Arc` so query results stay valid without
/// copying the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMapping {
    source_label: String,
    packages: IndexMap<String, PackageParts>,
}

impl ModuleMapping {
    /// Build a mapping from per-package records. If `packages` yields the
    /// same FQN twice, the later record replaces the earlier one.
    pub fn from_packages(
        source_label: impl Into<String>,
        packages: impl IntoIterator<Item = (String, PackageParts)>,
    ) -> Self {
        Self {
            source_label: source_label.into(),
            packages: packages.into_iter().collect(),
        }
    }

    /// Where this mapping was decoded from, e.g.
    /// `lib.jar!/META-INF/app.modmap`. Diagnostic only.
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// The parts record for `package_fqn`, or `None` if this module
    /// compiled nothing in that package.
    pub fn package_parts(&self, package_fqn: &str) -> Option<&PackageParts> {
        self.packages.get(package_fqn)
    }

    /// All per-package records, in the order the producer wrote them.
    pub fn packages(&self) -> impl Iterator<Item = (&str, &PackageParts)> {
        self.packages.iter().map(|(fqn, parts)| (fqn.as_str(), parts))
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

/// Implementing and metadata symbols for one package within one module.
///
/// `parts` holds JVM internal names of the physical classes carrying the
/// package's top-level declarations, in the producer's declaration order.
/// A part compiled into a multifile facade also records the facade's name;
/// single-file parts stand alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageParts {
    parts: IndexMap<String, Option<String>>,
    metadata_parts: IndexSet<String>,
}

impl PackageParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the record carries neither implementing nor metadata
    /// symbols. Empty records never reach the index.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.metadata_parts.is_empty()
    }

    /// Register an implementing part, optionally grouped under a multifile
    /// facade. Returns `false` if a part of that name is already present
    /// (the existing entry is kept).
    pub fn add_part(&mut self, name: impl Into<String>, facade: Option<String>) -> bool {
        match self.parts.entry(name.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(facade);
                true
            }
        }
    }

    /// Register a metadata-only part. Duplicates collapse silently.
    pub fn add_metadata_part(&mut self, name: impl Into<String>) {
        self.metadata_parts.insert(name.into());
    }

    /// Implementing part names, in stored order.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// The multifile facade subsuming `part`, or `None` when the part
    /// stands alone (or is unknown to this record).
    pub fn multifile_facade_name(&self, part: &str) -> Option<&str> {
        self.parts.get(part).and_then(|f| f.as_deref())
    }

    /// Metadata-only part names, in stored order.
    pub fn metadata_parts(&self) -> impl Iterator<Item = &str> {
        self.metadata_parts.iter().map(String::as_str)
    }

    pub fn metadata_part_count(&self) -> usize {
        self.metadata_parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_keep_insertion_order_and_reject_duplicates() {
        let mut parts = PackageParts::new();
        assert!(parts.add_part("org/test/FooKt", None));
        assert!(parts.add_part("org/test/BarKt", Some("org/test/All".to_string())));
        assert!(!parts.add_part("org/test/FooKt", Some("org/test/All".to_string())));

        let names: Vec<_> = parts.parts().collect();
        assert_eq!(names, ["org/test/FooKt", "org/test/BarKt"]);
        // The duplicate insert must not have attached a facade to FooKt.
        assert_eq!(parts.multifile_facade_name("org/test/FooKt"), None);
        assert_eq!(
            parts.multifile_facade_name("org/test/BarKt"),
            Some("org/test/All")
        );
    }

    #[test]
    fn metadata_parts_are_a_set() {
        let mut parts = PackageParts::new();
        parts.add_metadata_part("org/test/Common");
        parts.add_metadata_part("org/test/Common");
        assert_eq!(parts.metadata_part_count(), 1);
        assert!(parts.multifile_facade_name("org/test/Common").is_none());
    }
}
