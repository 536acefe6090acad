use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// The import syntaxes the extractor recognizes.
///
/// Each kind is one textual pattern. This is a line-oriented scanner, not a
/// parser: specifiers computed at runtime are missed, and text inside string
/// literals or comments that looks like an import is matched anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `import X from './module'`, `import { a, b } from './module'`, `import * as ns from './module'`.
    /// The `from` clause must sit on the same line as whatever follows `import`.
    NamedFrom,
    /// `import './module'`
    SideEffect,
    /// `export { X } from './module'`, `export * from './module'`
    ReExport,
    /// `import('./module')` with a literal argument.
    Dynamic,
    /// `require('./module')` with a literal argument.
    Require,
}

impl ImportKind {
    /// Kinds enabled when nothing is configured.
    pub const DEFAULTS: &'static [ImportKind] = &[ImportKind::NamedFrom, ImportKind::SideEffect];

    fn pattern(self) -> &'static str {
        match self {
            ImportKind::NamedFrom => r#"import\s+.*?from\s+['"](.*?)['"]"#,
            ImportKind::SideEffect => r#"import\s+['"](.*?)['"]"#,
            ImportKind::ReExport => r#"export\s+.*?from\s+['"](.*?)['"]"#,
            ImportKind::Dynamic => r#"import\s*\(\s*['"](.*?)['"]\s*\)"#,
            ImportKind::Require => r#"require\s*\(\s*['"](.*?)['"]\s*\)"#,
        }
    }
}

/// A specifier found in a file, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatch {
    /// Which rule matched.
    pub kind: ImportKind,
    /// The raw specifier string, e.g. `"./utils"` or `"react"`.
    pub specifier: String,
    /// Byte offset of the specifier within the file text.
    pub offset: usize,
}

/// One extraction rule: an import kind and its compiled pattern.
/// Capture group 1 of the pattern is the specifier.
#[derive(Debug, Clone)]
struct ImportRule {
    kind: ImportKind,
    pattern: Regex,
}

/// The ordered set of extraction rules in effect for a run.
#[derive(Debug, Clone)]
pub struct ImportRules {
    rules: Vec<ImportRule>,
}

impl ImportRules {
    /// Compile rules for the given kinds. Duplicates are ignored; order is kept.
    pub fn new(kinds: &[ImportKind]) -> Self {
        let mut rules: Vec<ImportRule> = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if rules.iter().any(|r| r.kind == kind) {
                continue;
            }
            // The patterns are compile-time constants covered by tests.
            let pattern = Regex::new(kind.pattern()).expect("invalid import pattern");
            rules.push(ImportRule { kind, pattern });
        }
        Self { rules }
    }

    /// Every specifier match in `source`, ordered by position in the text.
    ///
    /// When two rules capture the same span, the earlier rule wins.
    pub fn matches(&self, source: &str) -> Vec<ImportMatch> {
        let mut found: Vec<(usize, usize, ImportMatch)> = Vec::new();

        for (rule_pos, rule) in self.rules.iter().enumerate() {
            for caps in rule.pattern.captures_iter(source) {
                let Some(spec) = caps.get(1) else { continue };
                found.push((
                    spec.start(),
                    rule_pos,
                    ImportMatch {
                        kind: rule.kind,
                        specifier: spec.as_str().to_owned(),
                        offset: spec.start(),
                    },
                ));
            }
        }

        found.sort_by_key(|(offset, rule_pos, _)| (*offset, *rule_pos));
        found.dedup_by_key(|(offset, _, _)| *offset);
        found.into_iter().map(|(_, _, m)| m).collect()
    }

    /// Specifier strings in `source`, in order of appearance.
    pub fn extract_specifiers(&self, source: &str) -> Vec<String> {
        self.matches(source).into_iter().map(|m| m.specifier).collect()
    }
}

impl Default for ImportRules {
    fn default() -> Self {
        Self::new(ImportKind::DEFAULTS)
    }
}
