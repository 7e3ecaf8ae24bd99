/// A file or directory in the virtual filesystem.
///
/// Directories keep their children in insertion order, which is the order
/// `LIST` reports them in. Files carry a declared size that never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsNode {
    name: String,
    kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Directory(Vec<FsNode>),
    File { size: u64 },
}

impl FsNode {
    pub fn directory(name: impl Into<String>, children: Vec<FsNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory(children),
        }
    }

    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File { size },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Declared size in bytes. Always 0 for directories.
    pub fn size(&self) -> u64 {
        match self.kind {
            NodeKind::File { size } => size,
            NodeKind::Directory(_) => 0,
        }
    }

    pub fn children(&self) -> &[FsNode] {
        match &self.kind {
            NodeKind::Directory(children) => children,
            NodeKind::File { .. } => &[],
        }
    }

    /// Returns the child with exactly this name (case-sensitive).
    pub fn find_child(&self, name: &str) -> Option<&FsNode> {
        self.children().iter().find(|child| child.name == name)
    }
}

/// Immutable tree built once at startup and shared read-only by every session.
#[derive(Debug, Clone)]
pub struct Vfs {
    root: FsNode,
}

impl Vfs {
    pub fn new(root: FsNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &FsNode {
        &self.root
    }

    /// Resolves a slash-separated path from the root.
    ///
    /// Empty segments are skipped, so `//a//b` is the same as `/a/b`. Callers
    /// are expected to have cleaned `.` and `..` already; here they are just
    /// names that will not match anything.
    pub fn resolve(&self, path: &str) -> Option<&FsNode> {
        if path.is_empty() || path == "/" {
            return Some(&self.root);
        }

        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.root, |node, segment| node.find_child(segment))
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &FsNode) -> usize {
            1 + node.children().iter().map(count).sum::<usize>()
        }
        count(self.root())
    }
}
