//! Arena-backed radix tree vertices.
//!
//! Every method tree is a flat `Vec<Node>` addressed by [`NodeId`]. Node `0`
//! is always the root. Children are stored as ids, so splitting an edge or
//! bubbling a child forward never invalidates a parent's reference to it.
//!
//! Two parallel sequences describe the fan-out of a node:
//!
//! - `indices[i]` is the first byte of the static child at `children[i]`
//! - a param or catch-all child, when present, is the *last* element of
//!   `children`, is never listed in `indices`, and is flagged by `wild_child`
//!
//! The one exception is the empty-path catch-all marker created under a
//! catch-all's parent: it is keyed by the separator byte like a static child.

use std::sync::Arc;

/// Byte separating path sections.
pub(crate) const SEPARATOR: u8 = b'/';
/// Byte introducing a named parameter (`:name`).
pub(crate) const PARAM_PREFIX: u8 = b':';
/// Byte introducing a catch-all parameter (`*name`).
pub(crate) const CATCH_ALL_PREFIX: u8 = b'*';

/// Ordered, non-empty handler chain attached to a route endpoint.
pub type HandlerChain<H> = Arc<[H]>;

/// Stable index of a node inside its tree's arena.
pub(crate) type NodeId = usize;

/// Index of the root node in every tree.
pub(crate) const ROOT: NodeId = 0;

/// Kind of a radix tree vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Matches its path bytes literally.
    Static,
    /// The first node of a method tree.
    Root,
    /// Matches one non-empty section (`:name`).
    Param,
    /// Matches the rest of the path (`*name`); also used for the empty marker node above it.
    CatchAll,
}

/// A single vertex of a method tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<H> {
    /// Raw path bytes owned by this vertex. Static splits may cut a
    /// multi-byte character, so this is not guaranteed to be valid UTF-8 alone.
    pub(crate) path: Vec<u8>,
    pub(crate) kind: NodeKind,
    /// First byte of each static child, parallel to `children`.
    pub(crate) indices: Vec<u8>,
    pub(crate) wild_child: bool,
    pub(crate) priority: u32,
    pub(crate) children: Vec<NodeId>,
    pub(crate) handlers: Option<HandlerChain<H>>,
    /// Template this vertex was registered for (or the template prefix it ends).
    pub(crate) full_path: String,
    /// Parameter name for param and catch-all leaves, without the marker.
    pub(crate) key: Option<Arc<str>>,
}

impl<H> Node<H> {
    pub(crate) fn new(kind: NodeKind, full_path: &str) -> Self {
        Self {
            path: Vec::new(),
            kind,
            indices: Vec::new(),
            wild_child: false,
            priority: 0,
            children: Vec::new(),
            handlers: None,
            full_path: full_path.to_owned(),
            key: None,
        }
    }

    /// The wildcard child, if this node has one.
    #[inline]
    pub(crate) fn wildcard_child(&self) -> Option<NodeId> {
        if self.wild_child {
            self.children.last().copied()
        } else {
            None
        }
    }

    /// Static children in matching order, paired with their index byte.
    #[inline]
    pub(crate) fn static_children(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.children.iter().copied())
    }
}

/// One radix tree: an arena of nodes rooted at [`ROOT`].
#[derive(Debug, Clone)]
pub(crate) struct Tree<H> {
    pub(crate) nodes: Vec<Node<H>>,
}

impl<H> Tree<H> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Static, "/")],
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        &mut self.nodes[id]
    }

    pub(crate) fn alloc(&mut self, node: Node<H>) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn is_empty(&self) -> bool {
        let root = self.node(ROOT);
        root.path.is_empty() && root.children.is_empty()
    }

    /// Appends `child` under `parent`, keeping a wildcard child in last position.
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let node = self.node_mut(parent);
        if node.wild_child && !node.children.is_empty() {
            let last = node.children.len() - 1;
            node.children.insert(last, child);
        } else {
            node.children.push(child);
        }
    }

    /// Bumps the priority of the static child at `pos` and moves it forward
    /// past every left sibling with a lower priority. Returns its new position.
    pub(crate) fn increment_child_prio(&mut self, parent: NodeId, pos: usize) -> usize {
        let child = self.node(parent).children[pos];
        self.node_mut(child).priority += 1;
        let prio = self.node(child).priority;

        let mut new_pos = pos;
        while new_pos > 0 {
            let left = self.node(parent).children[new_pos - 1];
            if self.node(left).priority >= prio {
                break;
            }
            self.node_mut(parent).children.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }

        if new_pos != pos {
            let indices = &mut self.node_mut(parent).indices;
            let moved = indices.remove(pos);
            indices.insert(new_pos, moved);
        }
        new_pos
    }

    /// Number of nodes in the arena.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Handlers already registered for exactly the template `full_path`.
    pub(crate) fn registered(&self, full_path: &str) -> Option<&HandlerChain<H>> {
        self.nodes
            .iter()
            .filter(|n| n.full_path == full_path)
            .find_map(|n| n.handlers.as_ref())
    }
}

/// Length of the longest common byte prefix of `a` and `b`.
#[inline]
pub(crate) fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// A wildcard segment found in a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Wildcard<'a> {
    /// The segment from the marker up to the next separator or the end.
    pub(crate) segment: &'a [u8],
    /// Byte offset of the marker inside the scanned path.
    pub(crate) start: usize,
    /// False when the segment holds more than one marker.
    pub(crate) valid: bool,
}

impl Wildcard<'_> {
    #[inline]
    pub(crate) fn is_catch_all(&self) -> bool {
        self.segment[0] == CATCH_ALL_PREFIX
    }

    /// Name of the wildcard without its marker.
    pub(crate) fn key(&self) -> Arc<str> {
        Arc::from(String::from_utf8_lossy(&self.segment[1..]).as_ref())
    }
}

/// Finds the first `:name` or `*name` segment in `path`.
pub(crate) fn find_wildcard(path: &[u8]) -> Option<Wildcard<'_>> {
    let start = path
        .iter()
        .position(|&c| c == PARAM_PREFIX || c == CATCH_ALL_PREFIX)?;

    let mut valid = true;
    for (offset, &c) in path[start + 1..].iter().enumerate() {
        match c {
            SEPARATOR => {
                return Some(Wildcard {
                    segment: &path[start..start + 1 + offset],
                    start,
                    valid,
                })
            }
            PARAM_PREFIX | CATCH_ALL_PREFIX => valid = false,
            _ => {}
        }
    }
    Some(Wildcard {
        segment: &path[start..],
        start,
        valid,
    })
}

/// Lossy text view of raw tree bytes, for diagnostics.
pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
