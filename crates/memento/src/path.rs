//! Child-path resolution.
//!
//! A path is a `/`-separated list of child names, always relative to the node
//! it is resolved against. Empty segments are skipped, so `"a/b"`, `"/a/b"`
//! and `"a//b/"` are the same path and `""` names the starting node itself.
//! Every segment but the last picks the first child with that name; `.` and
//! `..` are ordinary names.
use crate::arena::TreeArena;
use core_types::NodeId;

pub const SEPARATOR: char = '/';

/// Non-empty segments of `path`, in order.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Walk every segment but the last; `None` if any step has no match.
fn walk_prefix<'p>(
    arena: &TreeArena,
    start: NodeId,
    path: &'p str,
) -> Option<(NodeId, Option<&'p str>)> {
    let mut segments = segments(path).peekable();
    let mut current = start;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            return Some((current, Some(segment)));
        }
        current = arena.first_child_named(current, segment)?;
    }
    Some((current, None))
}

pub(crate) fn resolve_first(arena: &TreeArena, start: NodeId, path: &str) -> Option<NodeId> {
    match walk_prefix(arena, start, path)? {
        (parent, Some(last)) => arena.first_child_named(parent, last),
        (node, None) => Some(node),
    }
}

pub(crate) fn resolve_all(arena: &TreeArena, start: NodeId, path: &str) -> Vec<NodeId> {
    match walk_prefix(arena, start, path) {
        Some((parent, Some(last))) => arena.children_named(parent, last),
        Some((node, None)) => vec![node],
        None => Vec::new(),
    }
}
