//! The set of record types that received a synthesized initializer.
//!
//! Built once from every file's first-pass contributions, after all
//! first-pass workers have joined, and only read afterwards.

use rustc_hash::FxHashMap;

/// Frozen, case-insensitive set of initialized type names.
#[derive(Debug, Clone, Default)]
pub struct InitializerRegistry {
    /// Lowercased name -> name as first declared.
    names: FxHashMap<String, String>,
}

impl InitializerRegistry {
    /// Build the registry from per-file contributions.
    ///
    /// A name contributed by several files (same name, any case) is kept
    /// once, spelled as first seen.
    pub fn from_contributions<I, S>(contributions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = FxHashMap::default();
        for name in contributions {
            let name = name.as_ref();
            names
                .entry(name.to_ascii_lowercase())
                .or_insert_with(|| name.to_string());
        }
        Self { names }
    }

    /// Whether `type_name` has an initializer (case-insensitive).
    pub fn contains(&self, type_name: &str) -> bool {
        self.names.contains_key(&type_name.to_ascii_lowercase())
    }

    /// The declared spelling of `type_name`, if registered.
    pub fn canonical(&self, type_name: &str) -> Option<&str> {
        self.names
            .get(&type_name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let registry = InitializerRegistry::from_contributions(["Buf", "Matrix"]);
        assert!(registry.contains("buf"));
        assert!(registry.contains("MATRIX"));
        assert!(!registry.contains("Point"));
        assert_eq!(registry.canonical("BUF"), Some("Buf"));
    }

    #[test]
    fn duplicates_collapse_to_first_spelling() {
        let registry = InitializerRegistry::from_contributions(vec![
            "Buf".to_string(),
            "BUF".to_string(),
            "Alpha".to_string(),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Alpha", "Buf"]);
    }

    #[test]
    fn empty_registry() {
        let registry = InitializerRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.contains(""));
    }
}
