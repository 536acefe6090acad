use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One resolution strategy: given the normalized base path of a specifier,
/// return the file it denotes, if this strategy finds one.
pub trait Probe: Send + Sync {
    fn probe(&self, base: &Path) -> Option<PathBuf>;

    /// Short label used in debug logs.
    fn describe(&self) -> String;
}

/// The base path itself, if it already ends with a recognized extension.
pub struct AsIs {
    extensions: Vec<String>,
}

impl AsIs {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
        }
    }
}

impl Probe for AsIs {
    fn probe(&self, base: &Path) -> Option<PathBuf> {
        let name = base.file_name()?.to_str()?;
        let recognized = self.extensions.iter().any(|ext| has_suffix(name, ext));
        (recognized && base.is_file()).then(|| base.to_path_buf())
    }

    fn describe(&self) -> String {
        "as-is".to_owned()
    }
}

/// `<base>.<ext>`
pub struct WithExtension {
    extension: String,
}

impl WithExtension {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_owned(),
        }
    }
}

impl Probe for WithExtension {
    fn probe(&self, base: &Path) -> Option<PathBuf> {
        // Append rather than `set_extension`: `./foo.config` must become `foo.config.js`.
        let mut raw: OsString = base.as_os_str().to_owned();
        raw.push(".");
        raw.push(&self.extension);
        let candidate = PathBuf::from(raw);
        candidate.is_file().then_some(candidate)
    }

    fn describe(&self) -> String {
        format!("append .{}", self.extension)
    }
}

/// `<base>/index.<ext>`
pub struct DirectoryIndex {
    file_name: String,
}

impl DirectoryIndex {
    pub fn new(extension: &str) -> Self {
        Self {
            file_name: format!("index.{extension}"),
        }
    }
}

impl Probe for DirectoryIndex {
    fn probe(&self, base: &Path) -> Option<PathBuf> {
        if !base.is_dir() {
            return None;
        }
        let candidate = base.join(&self.file_name);
        candidate.is_file().then_some(candidate)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.file_name)
    }
}

/// The probe order for a run: as-is, then every extension appended, then every
/// index file, extensions in configured priority order throughout.
pub fn standard_probes(extensions: &[String]) -> Vec<Box<dyn Probe>> {
    let mut probes: Vec<Box<dyn Probe>> = Vec::with_capacity(1 + 2 * extensions.len());
    probes.push(Box::new(AsIs::new(extensions)));
    for ext in extensions {
        probes.push(Box::new(WithExtension::new(ext)));
    }
    for ext in extensions {
        probes.push(Box::new(DirectoryIndex::new(ext)));
    }
    probes
}

/// True if `name` ends with `.<ext>` and has a non-empty stem.
pub(crate) fn has_suffix(name: &str, ext: &str) -> bool {
    name.len() > ext.len() + 1
        && name.ends_with(ext)
        && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
}
