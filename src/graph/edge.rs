use super::node::SourceFile;

/// Origin -> target: the origin file's code imports the target file.
///
/// Self-edges (`origin == target`) are legal and form a one-node cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'g> {
    pub origin: &'g SourceFile,
    pub target: &'g SourceFile,
}
