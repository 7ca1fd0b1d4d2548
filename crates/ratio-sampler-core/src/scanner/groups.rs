use ahash::AHashMap;
use std::path::{is_separator, Path, PathBuf};
use std::slice;

/// Files sharing one normalized extension, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionGroup {
    pub extension: String,
    pub paths: Vec<PathBuf>,
}

/// Extension → paths map that iterates in first-seen extension order.
#[derive(Debug, Clone, Default)]
pub struct ExtensionGroups {
    index: AHashMap<String, usize>,
    groups: Vec<ExtensionGroup>,
}

impl ExtensionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// File the path under its normalized extension, creating the group on first sight.
    pub fn insert(&mut self, path: PathBuf) {
        let extension = normalized_extension(&path);
        match self.index.get(&extension) {
            Some(&slot) => self.groups[slot].paths.push(path),
            None => {
                self.index.insert(extension.clone(), self.groups.len());
                self.groups.push(ExtensionGroup {
                    extension,
                    paths: vec![path],
                });
            }
        }
    }

    pub fn get(&self, extension: &str) -> Option<&ExtensionGroup> {
        self.index.get(extension).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> slice::Iter<'_, ExtensionGroup> {
        self.groups.iter()
    }

    /// Number of distinct extensions.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|group| group.paths.len()).sum()
    }
}

impl<'a> IntoIterator for &'a ExtensionGroups {
    type Item = &'a ExtensionGroup;
    type IntoIter = slice::Iter<'a, ExtensionGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Uppercased extension including the dot, or `""` when the file name has no dot.
///
/// The dot must come after the last path separator, so `dir.d/README`
/// has no extension while `.profile` is its own extension.
pub fn normalized_extension(path: &Path) -> String {
    let full = path.to_string_lossy();
    let name_start = full.rfind(is_separator).map(|i| i + 1).unwrap_or(0);
    match full[name_start..].rfind('.') {
        Some(dot) => full[name_start + dot..].to_uppercase(),
        None => String::new(),
    }
}
