//! Read-only lookup over a frozen tree.
//!
//! Static children are always tried before the wildcard child. When a static
//! branch is taken at a node that also has a wildcard child, a [`SkipPoint`]
//! remembers the decision so a dead end deeper in the tree can resume at the
//! wildcard instead.

use std::borrow::Cow;

use super::node::{HandlerChain, NodeId, NodeKind, Tree, ROOT, SEPARATOR};
use super::params::Params;

/// A pending wildcard alternative recorded during one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SkipPoint {
    node: NodeId,
    /// Offset into the request where `node`'s own path starts.
    path_start: usize,
    params_len: usize,
}

/// Caller-owned backtracking buffer, reused across lookups.
///
/// Pre-size it with [`super::Router::new_skip_stack`] to avoid growth on the
/// hot path. Never share one between concurrent lookups.
#[derive(Debug, Clone, Default)]
pub struct SkipStack {
    points: Vec<SkipPoint>,
}

impl SkipStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Outcome of a single lookup.
///
/// A miss is not an error: `handlers` is `None` and `tsr` says whether the
/// same path with one separator added or removed would have matched.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub handlers: Option<&'a HandlerChain<H>>,
    /// Trailing slash redirect hint.
    pub tsr: bool,
    /// Template of the matched route.
    pub full_path: Option<&'a str>,
}

impl<H> Match<'_, H> {
    pub(crate) fn miss() -> Self {
        Self {
            handlers: None,
            tsr: false,
            full_path: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.handlers.is_some()
    }
}

/// Request text between two byte offsets. Offsets always fall on section
/// boundaries taken from valid templates, so the lossy path is a fallback only.
fn section(request: &str, start: usize, end: usize) -> Cow<'_, str> {
    request
        .get(start..end)
        .map(Cow::Borrowed)
        .unwrap_or_else(|| String::from_utf8_lossy(&request.as_bytes()[start..end]))
}

impl<H> Tree<H> {
    /// Walks the tree for `request`, filling `params` with every wildcard
    /// value on the way. Both scratch buffers are reset first.
    pub(crate) fn get_value<'t>(
        &'t self,
        request: &str,
        params: &mut Params,
        skipped: &mut SkipStack,
    ) -> Match<'t, H> {
        params.clear();
        skipped.clear();

        let bytes = request.as_bytes();
        let mut result = Match::miss();
        let mut n = ROOT;
        let mut offset = 0;
        // set after resuming at a skip point: that node's static children were already tried
        let mut resumed = false;

        macro_rules! backtrack {
            () => {
                if let Some(point) = skipped.points.pop() {
                    n = point.node;
                    offset = point.path_start;
                    params.truncate(point.params_len);
                    resumed = true;
                    continue;
                }
            };
        }

        loop {
            let node = self.node(n);
            let prefix = node.path.as_slice();
            let path = &bytes[offset..];
            let skip_static = std::mem::take(&mut resumed);

            if path.len() > prefix.len() && path.starts_with(prefix) {
                let rest_start = offset + prefix.len();
                let rest = &bytes[rest_start..];

                if !skip_static {
                    let first = rest[0];
                    if let Some((_, child)) = node.static_children().find(|&(c, _)| c == first) {
                        if node.wild_child {
                            skipped.points.push(SkipPoint {
                                node: n,
                                path_start: offset,
                                params_len: params.len(),
                            });
                        }
                        n = child;
                        offset = rest_start;
                        continue;
                    }
                }

                let Some(wild) = node.wildcard_child() else {
                    if rest != [SEPARATOR] {
                        backtrack!();
                    }
                    result.tsr = rest == [SEPARATOR] && node.handlers.is_some();
                    return result;
                };

                let wild = self.node(wild);
                match wild.kind {
                    NodeKind::Param => {
                        let end = rest
                            .iter()
                            .position(|&b| b == SEPARATOR)
                            .unwrap_or(rest.len());
                        if let Some(key) = &wild.key {
                            params.push(key, &section(request, rest_start, rest_start + end));
                        }

                        if end < rest.len() {
                            if let Some(&child) = wild.children.first() {
                                n = child;
                                offset = rest_start + end;
                                continue;
                            }
                            result.tsr = rest.len() == end + 1;
                            return result;
                        }

                        if let Some(handlers) = &wild.handlers {
                            result.handlers = Some(handlers);
                            result.full_path = Some(&wild.full_path);
                            return result;
                        }
                        if let [child] = wild.children.as_slice() {
                            let child = self.node(*child);
                            result.tsr = (child.path == [SEPARATOR] && child.handlers.is_some())
                                || (child.path.is_empty() && child.indices == [SEPARATOR]);
                        }
                        return result;
                    }
                    NodeKind::CatchAll => {
                        if let Some(key) = &wild.key {
                            params.push(key, &section(request, rest_start, bytes.len()));
                        }
                        result.handlers = wild.handlers.as_ref();
                        result.full_path = Some(&wild.full_path);
                        return result;
                    }
                    kind => unreachable!("wildcard slot holds a {kind:?} node"),
                }
            }

            if path == prefix {
                if node.handlers.is_none() && path != [SEPARATOR] {
                    backtrack!();
                }

                if let Some(handlers) = &node.handlers {
                    result.handlers = Some(handlers);
                    result.full_path = Some(&node.full_path);
                    return result;
                }

                // no handlers here, but a wildcard child means "<path>/" is routable
                if path == [SEPARATOR] && node.wild_child && node.kind != NodeKind::Root {
                    result.tsr = true;
                    return result;
                }
                if path == [SEPARATOR] && node.kind == NodeKind::Static {
                    result.tsr = true;
                    return result;
                }

                if let Some((_, child)) = node.static_children().find(|&(c, _)| c == SEPARATOR) {
                    let child = self.node(child);
                    result.tsr = (child.path.len() == 1 && child.handlers.is_some())
                        || (child.kind == NodeKind::CatchAll
                            && child
                                .children
                                .first()
                                .is_some_and(|&leaf| self.node(leaf).handlers.is_some()));
                }
                return result;
            }

            // prefix mismatch: a hint if only a trailing separator is missing
            result.tsr = path == [SEPARATOR]
                || (prefix.len() == path.len() + 1
                    && prefix[path.len()] == SEPARATOR
                    && path == &prefix[..path.len()]
                    && node.handlers.is_some());

            if !result.tsr && path != [SEPARATOR] {
                backtrack!();
            }
            return result;
        }
    }
}
