pub mod alias;
pub mod probe;

pub use alias::AliasMap;
pub use probe::{Probe, standard_probes};

use std::path::{Component, Path, PathBuf};

use crate::graph::node::SourceFile;

/// The outcome of resolving a single import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved to an existing file (not necessarily one the scanner found).
    Resolved(SourceFile),
    /// Non-relative specifier with no matching alias: a third-party package or
    /// runtime built-in. Never becomes an edge.
    External,
    /// Relative (or aliased) specifier for which no probe found a file.
    Unresolved,
}

/// Turns `(origin file, specifier)` into a target file.
///
/// Resolution runs an ordered list of [`Probe`]s against the normalized base
/// path; the first probe that finds a file wins.
pub struct PathResolver {
    probes: Vec<Box<dyn Probe>>,
    aliases: AliasMap,
}

impl PathResolver {
    /// Resolver with the standard probe order for `extensions`.
    pub fn new(extensions: &[String], aliases: AliasMap) -> Self {
        Self::with_probes(standard_probes(extensions), aliases)
    }

    pub fn with_probes(probes: Vec<Box<dyn Probe>>, aliases: AliasMap) -> Self {
        Self { probes, aliases }
    }

    /// Resolve `specifier` as written in `origin`.
    pub fn resolve(&self, origin: &SourceFile, specifier: &str) -> Resolution {
        let base = if is_relative_specifier(specifier) {
            let Some(dir) = origin.path().parent() else {
                return Resolution::Unresolved;
            };
            normalize_path(&dir.join(specifier))
        } else {
            match self.aliases.rewrite(specifier) {
                Some(aliased) => normalize_path(&aliased),
                None => return Resolution::External,
            }
        };

        match self.probe(&base) {
            Some(path) => Resolution::Resolved(SourceFile::new(path)),
            None => {
                tracing::debug!(
                    origin = %origin,
                    specifier,
                    base = %base.display(),
                    "no probe matched"
                );
                Resolution::Unresolved
            }
        }
    }

    fn probe(&self, base: &Path) -> Option<PathBuf> {
        self.probes.iter().find_map(|probe| {
            let hit = probe.probe(base)?;
            tracing::trace!(probe = %probe.describe(), path = %hit.display(), "probe hit");
            Some(hit)
        })
    }
}

/// `true` for `.`, `..`, and anything starting with `./` or `../`.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| (*e).to_owned()).collect()
    }

    /// A temp tree with `src/app.js` as the usual origin.
    fn tree(files: &[&str]) -> (TempDir, SourceFile) {
        let dir = tempfile::tempdir().expect("tempdir");
        for rel in files.iter().chain(std::iter::once(&"src/app.js")) {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        let origin = SourceFile::new(dir.path().join("src/app.js"));
        (dir, origin)
    }

    fn resolved(dir: &TempDir, rel: &str) -> Resolution {
        Resolution::Resolved(SourceFile::new(dir.path().join(rel)))
    }

    #[test]
    fn test_extension_is_appended() {
        let (dir, origin) = tree(&["src/util.js", "src/util/index.js"]);
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(resolver.resolve(&origin, "./util"), resolved(&dir, "src/util.js"));
    }

    #[test]
    fn test_directory_index_fallback() {
        let (dir, origin) = tree(&["src/util/index.js"]);
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(
            resolver.resolve(&origin, "./util"),
            resolved(&dir, "src/util/index.js")
        );
    }

    #[test]
    fn test_missing_target_is_unresolved() {
        let (_dir, origin) = tree(&[]);
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(resolver.resolve(&origin, "./util"), Resolution::Unresolved);
    }

    #[test]
    fn test_as_is_wins_over_appending() {
        let (dir, origin) = tree(&["src/state.js", "src/state.js.js"]);
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(
            resolver.resolve(&origin, "./state.js"),
            resolved(&dir, "src/state.js")
        );
    }

    #[test]
    fn test_extension_priority_order() {
        let (dir, origin) = tree(&["src/mod.js", "src/mod.mjs"]);
        let js_first = PathResolver::new(&exts(&["js", "mjs"]), AliasMap::default());
        let mjs_first = PathResolver::new(&exts(&["mjs", "js"]), AliasMap::default());
        assert_eq!(js_first.resolve(&origin, "./mod"), resolved(&dir, "src/mod.js"));
        assert_eq!(mjs_first.resolve(&origin, "./mod"), resolved(&dir, "src/mod.mjs"));
    }

    #[test]
    fn test_parent_directory_specifier() {
        let (dir, _) = tree(&["src/shared/i18n.js", "src/apps/admin/main.js"]);
        let origin = SourceFile::new(dir.path().join("src/apps/admin/main.js"));
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(
            resolver.resolve(&origin, "../../shared/i18n"),
            resolved(&dir, "src/shared/i18n.js")
        );
    }

    #[test]
    fn test_current_directory_specifier_uses_index() {
        let (dir, _) = tree(&["src/lib/index.js", "src/lib/a.js"]);
        let origin = SourceFile::new(dir.path().join("src/lib/a.js"));
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(resolver.resolve(&origin, "."), resolved(&dir, "src/lib/index.js"));
    }

    #[test]
    fn test_non_relative_without_alias_is_external() {
        let (_dir, origin) = tree(&["src/react.js"]);
        let resolver = PathResolver::new(&exts(&["js"]), AliasMap::default());
        assert_eq!(resolver.resolve(&origin, "react"), Resolution::External);
        assert_eq!(resolver.resolve(&origin, "@scope/pkg"), Resolution::External);
        assert_eq!(resolver.resolve(&origin, "/abs/path.js"), Resolution::External);
        assert_eq!(resolver.resolve(&origin, ".hidden"), Resolution::External);
    }

    #[test]
    fn test_alias_resolves_through_probes() {
        let (dir, origin) = tree(&["src/shared/router.js"]);
        let aliases = AliasMap::new(&[("@/".to_string(), dir.path().join("src"))]);
        let resolver = PathResolver::new(&exts(&["js"]), aliases);
        assert_eq!(
            resolver.resolve(&origin, "@/shared/router"),
            resolved(&dir, "src/shared/router.js")
        );
        assert_eq!(resolver.resolve(&origin, "@/shared/missing"), Resolution::Unresolved);
        assert_eq!(resolver.resolve(&origin, "lodash"), Resolution::External);
    }

    #[test]
    fn test_is_relative_specifier() {
        assert!(is_relative_specifier("./a"));
        assert!(is_relative_specifier("../a"));
        assert!(is_relative_specifier("."));
        assert!(is_relative_specifier(".."));
        assert!(!is_relative_specifier("react"));
        assert!(!is_relative_specifier("/abs"));
        assert!(!is_relative_specifier(".env"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/./c/../d")), PathBuf::from("/a/b/d"));
        assert_eq!(normalize_path(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("src/util/")), PathBuf::from("src/util"));
    }
}
