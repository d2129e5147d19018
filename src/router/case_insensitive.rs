//! Case-insensitive path resolution, used only to suggest a redirect target.
//!
//! Node paths are raw bytes and an edge split may fall inside a multi-byte
//! character, so the walk carries an incomplete character from a parent into
//! its children and compares whole characters only.

use super::node::{NodeId, NodeKind, Tree, ROOT, SEPARATOR};

/// Encoded length of the UTF-8 sequence introduced by `first`.
fn utf8_width(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

fn fold_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
}

/// Whether a static child keyed by `index` can continue the request
/// character `r`, of which the tree already consumed `prefix`.
fn may_continue(index: u8, prefix: &[u8], r: char) -> bool {
    let mut buf = [0u8; 4];
    std::iter::once(r)
        .chain(r.to_lowercase().next())
        .chain(r.to_uppercase().next())
        .any(|c| {
            let enc = c.encode_utf8(&mut buf).as_bytes();
            enc.len() > prefix.len() && enc.starts_with(prefix) && enc[prefix.len()] == index
        })
}

impl<H> Tree<H> {
    /// Returns the registered spelling of `path` if it matches a route when
    /// compared case-insensitively. Parameter values keep the request's case.
    ///
    /// With `fix_trailing_slash`, a single trailing separator may also be
    /// added or removed.
    pub(crate) fn find_case_insensitive_path(
        &self,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        let mut out = Vec::with_capacity(path.len() + 1);
        if self.walk_folded(ROOT, &[], path, &mut out, fix_trailing_slash) {
            String::from_utf8(out).ok()
        } else {
            None
        }
    }

    /// Matches `req` against the subtree at `n`. `pending` holds the leading
    /// bytes of a character whose encoding started in an ancestor.
    fn walk_folded(
        &self,
        n: NodeId,
        pending: &[u8],
        mut req: &str,
        out: &mut Vec<u8>,
        fix: bool,
    ) -> bool {
        let node = self.node(n);
        let mark = out.len();
        let mut rune = [0u8; 4];
        let mut len = pending.len();
        rune[..len].copy_from_slice(pending);

        for (i, &b) in node.path.iter().enumerate() {
            if len == 0 && req.is_empty() {
                // request ended inside this node: only a missing trailing separator is fixable
                if fix && node.path[i..] == [SEPARATOR] && node.handlers.is_some() {
                    out.push(SEPARATOR);
                    return true;
                }
                out.truncate(mark);
                return false;
            }

            rune[len] = b;
            len += 1;
            if len < utf8_width(rune[0]) {
                continue;
            }

            let tree_char = std::str::from_utf8(&rune[..len])
                .ok()
                .and_then(|s| s.chars().next());
            match (tree_char, req.chars().next()) {
                (Some(t), Some(r)) if fold_eq(t, r) => {
                    out.extend_from_slice(&rune[..len]);
                    req = &req[r.len_utf8()..];
                    len = 0;
                }
                _ => {
                    out.truncate(mark);
                    return false;
                }
            }
        }

        if len > 0 {
            if let Some(r) = req.chars().next() {
                for (index, child) in node.static_children() {
                    if may_continue(index, &rune[..len], r)
                        && self.walk_folded(child, &rune[..len], req, out, fix)
                    {
                        return true;
                    }
                }
            }
            out.truncate(mark);
            return false;
        }

        if req.is_empty() {
            if node.handlers.is_some() {
                return true;
            }
            if fix && self.has_slash_route(n) {
                out.push(SEPARATOR);
                return true;
            }
            out.truncate(mark);
            return false;
        }

        let matched = out.len();
        if let Some(r) = req.chars().next() {
            for (index, child) in node.static_children() {
                if may_continue(index, &[], r) && self.walk_folded(child, &[], req, out, fix) {
                    return true;
                }
            }
        }

        if let Some(wild) = node.wildcard_child() {
            if self.walk_wildcard(wild, req, out, fix) {
                return true;
            }
        }

        // drop a trailing separator the tree does not have
        out.truncate(matched);
        if fix && req.as_bytes() == [SEPARATOR] && node.handlers.is_some() {
            return true;
        }
        out.truncate(mark);
        false
    }

    fn walk_wildcard(&self, wild: NodeId, req: &str, out: &mut Vec<u8>, fix: bool) -> bool {
        let node = self.node(wild);
        let mark = out.len();
        match node.kind {
            NodeKind::Param => {
                let end = req.find(char::from(SEPARATOR)).unwrap_or(req.len());
                out.extend_from_slice(&req.as_bytes()[..end]);

                if end < req.len() {
                    if let Some(&child) = node.children.first() {
                        if self.walk_folded(child, &[], &req[end..], out, fix) {
                            return true;
                        }
                    } else if fix && req.len() == end + 1 {
                        return true;
                    }
                    out.truncate(mark);
                    return false;
                }

                if node.handlers.is_some() {
                    return true;
                }
                if fix {
                    if let [child] = node.children.as_slice() {
                        let child = self.node(*child);
                        if child.path == [SEPARATOR] && child.handlers.is_some() {
                            out.push(SEPARATOR);
                            return true;
                        }
                    }
                }
                out.truncate(mark);
                false
            }
            NodeKind::CatchAll => {
                if node.handlers.is_none() {
                    return false;
                }
                out.extend_from_slice(req.as_bytes());
                true
            }
            kind => unreachable!("wildcard slot holds a {kind:?} node"),
        }
    }

    /// Whether `n` has a route reachable by appending one separator.
    fn has_slash_route(&self, n: NodeId) -> bool {
        self.node(n)
            .static_children()
            .find(|&(c, _)| c == SEPARATOR)
            .is_some_and(|(_, child)| {
                let child = self.node(child);
                (child.path == [SEPARATOR] && child.handlers.is_some())
                    || (child.kind == NodeKind::CatchAll
                        && child
                            .children
                            .first()
                            .is_some_and(|&leaf| self.node(leaf).handlers.is_some()))
            })
    }
}
