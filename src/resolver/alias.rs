use std::path::{Path, PathBuf};

/// Non-relative specifier prefixes mapped to directories.
///
/// Empty by default, in which case no non-relative specifier ever resolves.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    /// Sorted by descending prefix length so the longest match is found first.
    entries: Vec<(String, PathBuf)>,
}

impl AliasMap {
    pub fn new(entries: &[(String, PathBuf)]) -> Self {
        let mut entries = entries.to_vec();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    /// Rewrite `specifier` through the longest matching prefix.
    ///
    /// A prefix ending in `/` matches anything that starts with it. Any other
    /// prefix matches the exact specifier or the prefix followed by `/`, so
    /// `@app` does not capture `@application`.
    pub fn rewrite(&self, specifier: &str) -> Option<PathBuf> {
        self.entries.iter().find_map(|(prefix, dir)| {
            let rest = specifier.strip_prefix(prefix.as_str())?;
            if prefix.ends_with('/') || rest.is_empty() {
                Some(join_rest(dir, rest))
            } else {
                rest.strip_prefix('/').map(|rest| join_rest(dir, rest))
            }
        })
    }
}

fn join_rest(dir: &Path, rest: &str) -> PathBuf {
    if rest.is_empty() {
        dir.to_path_buf()
    } else {
        dir.join(rest)
    }
}
