//! Route registration: edge splitting, child insertion and conflict checks.
//!
//! Not thread safe. A tree is only mutated through [`super::RouterBuilder`],
//! which is consumed before any lookup can run.

use std::fmt;
use std::mem;

use super::error::{Result, RouteError};
use super::node::{
    find_wildcard, longest_common_prefix, lossy, HandlerChain, Node, NodeId, NodeKind, Tree,
    CATCH_ALL_PREFIX, PARAM_PREFIX, ROOT, SEPARATOR,
};

/// Shape of a validated path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TemplateStats {
    /// Number of `:name` and `*name` segments.
    pub(crate) params: usize,
    /// Number of separators, an upper bound on backtracking depth.
    pub(crate) sections: usize,
}

/// Checks everything about `path` that does not depend on the existing tree.
///
/// Runs before insertion so a malformed template never touches the tree.
pub(crate) fn validate_template(path: &str) -> Result<TemplateStats> {
    let bytes = path.as_bytes();
    if bytes.first() != Some(&SEPARATOR) {
        return Err(RouteError::MissingLeadingSlash {
            path: path.to_owned(),
        });
    }

    let mut params = 0;
    let mut offset = 0;
    while let Some(wildcard) = find_wildcard(&bytes[offset..]) {
        if !wildcard.valid {
            return Err(RouteError::MultipleWildcards {
                wildcard: lossy(wildcard.segment),
                path: path.to_owned(),
            });
        }
        if wildcard.segment.len() < 2 {
            return Err(RouteError::UnnamedWildcard {
                path: path.to_owned(),
            });
        }

        let start = offset + wildcard.start;
        if wildcard.is_catch_all() {
            if start + wildcard.segment.len() != bytes.len() {
                return Err(RouteError::MisplacedCatchAll {
                    path: path.to_owned(),
                });
            }
            if bytes[start - 1] != SEPARATOR {
                return Err(RouteError::MalformedCatchAll {
                    path: path.to_owned(),
                });
            }
        }

        params += 1;
        offset = start + wildcard.segment.len();
    }

    Ok(TemplateStats {
        params,
        sections: bytes.iter().filter(|&&b| b == SEPARATOR).count(),
    })
}

impl<H: fmt::Debug> Tree<H> {
    /// Registers `handlers` for the template `full_path`.
    ///
    /// `method` is only used to describe a duplicate registration.
    pub(crate) fn add_route(
        &mut self,
        method: &str,
        full_path: &str,
        handlers: HandlerChain<H>,
    ) -> Result<()> {
        self.node_mut(ROOT).priority += 1;

        if self.is_empty() {
            self.insert_child(ROOT, full_path.as_bytes(), full_path, handlers)?;
            self.node_mut(ROOT).kind = NodeKind::Root;
            return Ok(());
        }

        let full = full_path.as_bytes();
        let mut path = full;
        let mut parent_full_path_index = 0;
        let mut n = ROOT;

        loop {
            let i = longest_common_prefix(path, &self.node(n).path);

            if i < self.node(n).path.len() {
                let end = (parent_full_path_index + i).min(full.len());
                self.split_edge(n, i, lossy(&full[..end]));
            }

            if i < path.len() {
                path = &path[i..];
                let c = path[0];

                let (kind, node_path_len, single_child, static_pos, wildcard) = {
                    let node = self.node(n);
                    let single_child = match node.children.as_slice() {
                        [only] => Some(*only),
                        _ => None,
                    };
                    (
                        node.kind,
                        node.path.len(),
                        single_child,
                        node.indices.iter().position(|&b| b == c),
                        node.wildcard_child(),
                    )
                };

                // '/' after a param continues into the param's only child
                if kind == NodeKind::Param && c == SEPARATOR {
                    if let Some(child) = single_child {
                        parent_full_path_index += node_path_len;
                        n = child;
                        self.node_mut(n).priority += 1;
                        continue;
                    }
                }

                if let Some(pos) = static_pos {
                    parent_full_path_index += node_path_len;
                    let pos = self.increment_child_prio(n, pos);
                    n = self.node(n).children[pos];
                    continue;
                }

                if c != PARAM_PREFIX && c != CATCH_ALL_PREFIX && kind != NodeKind::CatchAll {
                    self.node_mut(n).indices.push(c);
                    let child = self.alloc(Node::new(NodeKind::Static, full_path));
                    self.add_child(n, child);
                    let last = self.node(n).indices.len() - 1;
                    self.increment_child_prio(n, last);
                    n = child;
                } else if let Some(wild) = wildcard {
                    n = wild;
                    self.node_mut(n).priority += 1;

                    let node = self.node(n);
                    let np = node.path.as_slice();
                    if path.starts_with(np)
                        && node.kind != NodeKind::CatchAll
                        // longer names like `:name` vs `:names` must not merge
                        && (np.len() >= path.len() || path[np.len()] == SEPARATOR)
                    {
                        continue;
                    }

                    return Err(self.wildcard_conflict(n, path, full_path));
                }

                return self.insert_child(n, path, full_path, handlers);
            }

            let node = self.node_mut(n);
            if let Some(existing) = &node.handlers {
                return Err(RouteError::DuplicateRoute {
                    method: method.to_owned(),
                    path: full_path.to_owned(),
                    existing: format!("{existing:?}"),
                });
            }
            node.handlers = Some(handlers);
            node.full_path = full_path.to_owned();
            return Ok(());
        }
    }

    /// Splits `n` after its first `i` path bytes. The suffix moves into a new
    /// static child that inherits every child, index and handler of `n`.
    fn split_edge(&mut self, n: NodeId, i: usize, full_prefix: String) {
        let node = self.node_mut(n);
        let suffix = node.path.split_off(i);
        let first = suffix[0];
        let child = Node {
            path: suffix,
            kind: NodeKind::Static,
            indices: mem::take(&mut node.indices),
            wild_child: mem::replace(&mut node.wild_child, false),
            priority: node.priority.saturating_sub(1),
            children: mem::take(&mut node.children),
            handlers: node.handlers.take(),
            full_path: mem::replace(&mut node.full_path, full_prefix),
            key: None,
        };

        let child = self.alloc(child);
        let node = self.node_mut(n);
        node.children.push(child);
        node.indices.push(first);
    }

    /// Builds the wildcard conflict error for a new template whose remaining
    /// `path` cannot share the existing wildcard node `wild`.
    fn wildcard_conflict(&self, wild: NodeId, path: &[u8], full_path: &str) -> RouteError {
        let node = self.node(wild);
        let segment = if node.kind == NodeKind::CatchAll {
            path
        } else {
            path.split(|&b| b == SEPARATOR).next().unwrap_or(path)
        };
        let consumed = full_path.len() - path.len();
        let mut prefix = lossy(&full_path.as_bytes()[..consumed]);
        prefix.push_str(&lossy(&node.path));

        RouteError::WildcardConflict {
            segment: lossy(segment),
            path: full_path.to_owned(),
            wildcard: lossy(&node.path),
            prefix,
        }
    }

    /// Writes the remaining template `path` below `n`, creating param and
    /// catch-all nodes for every wildcard it contains.
    fn insert_child(
        &mut self,
        mut n: NodeId,
        mut path: &[u8],
        full_path: &str,
        handlers: HandlerChain<H>,
    ) -> Result<()> {
        while let Some(wildcard) = find_wildcard(path) {
            if !wildcard.valid {
                return Err(RouteError::MultipleWildcards {
                    wildcard: lossy(wildcard.segment),
                    path: full_path.to_owned(),
                });
            }
            if wildcard.segment.len() < 2 {
                return Err(RouteError::UnnamedWildcard {
                    path: full_path.to_owned(),
                });
            }
            let i = wildcard.start;

            if !wildcard.is_catch_all() {
                if i > 0 {
                    self.node_mut(n).path = path[..i].to_vec();
                    path = &path[i..];
                }

                let mut param = Node::new(NodeKind::Param, full_path);
                param.path = wildcard.segment.to_vec();
                param.key = Some(wildcard.key());
                let param = self.alloc(param);
                self.add_child(n, param);
                self.node_mut(n).wild_child = true;
                n = param;
                self.node_mut(n).priority += 1;

                // more template follows: it starts with '/' and goes in a fresh static child
                if wildcard.segment.len() < path.len() {
                    path = &path[wildcard.segment.len()..];
                    let mut child = Node::new(NodeKind::Static, full_path);
                    child.priority = 1;
                    let child = self.alloc(child);
                    self.add_child(n, child);
                    n = child;
                    continue;
                }

                self.node_mut(n).handlers = Some(handlers);
                return Ok(());
            }

            if i + wildcard.segment.len() != path.len() {
                return Err(RouteError::MisplacedCatchAll {
                    path: full_path.to_owned(),
                });
            }

            let node = self.node(n);
            if node.path.last() == Some(&SEPARATOR) {
                let segment = node
                    .children
                    .first()
                    .map(|&c| {
                        let child_path = &self.node(c).path;
                        lossy(child_path.split(|&b| b == SEPARATOR).next().unwrap_or_default())
                    })
                    .unwrap_or_default();
                let mut prefix = lossy(&node.path);
                prefix.push_str(&segment);
                return Err(RouteError::CatchAllConflict {
                    wildcard: lossy(path),
                    path: full_path.to_owned(),
                    segment,
                    prefix,
                });
            }

            if i == 0 || path[i - 1] != SEPARATOR {
                return Err(RouteError::MalformedCatchAll {
                    path: full_path.to_owned(),
                });
            }
            let i = i - 1;
            self.node_mut(n).path = path[..i].to_vec();

            // first node: empty-path marker holding the catch-all as its wildcard child
            let mut marker = Node::new(NodeKind::CatchAll, full_path);
            marker.wild_child = true;
            let marker = self.alloc(marker);
            self.add_child(n, marker);
            self.node_mut(n).indices = vec![SEPARATOR];
            n = marker;
            self.node_mut(n).priority += 1;

            // second node: the variable itself, path "/*name"
            let mut leaf = Node::new(NodeKind::CatchAll, full_path);
            leaf.path = path[i..].to_vec();
            leaf.key = Some(wildcard.key());
            leaf.handlers = Some(handlers);
            leaf.priority = 1;
            let leaf = self.alloc(leaf);
            self.node_mut(n).children = vec![leaf];
            return Ok(());
        }

        let node = self.node_mut(n);
        node.path = path.to_vec();
        node.handlers = Some(handlers);
        node.full_path = full_path.to_owned();
        Ok(())
    }
}
