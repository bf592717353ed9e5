use std::collections::{hash_map, HashMap};

use crate::api::{Comment, CommentId, CommentWithReplies};

/// Nest a flat comment list into a reply forest.
///
/// Comments whose parent is absent from the list become roots. Roots keep
/// their input order, while each level of replies is sorted by creation date,
/// oldest first (the sort is stable, so equal dates keep input order).
///
/// If several comments share an id, only the first one is kept. Parent links
/// that would close a cycle are cut, turning the offending comment into a root,
/// so that each comment appears exactly once in the result.
pub fn build_comment_tree(flat: Vec<Comment>) -> Vec<CommentWithReplies> {
    let mut index: HashMap<CommentId, usize> = HashMap::with_capacity(flat.len());
    let mut comments = Vec::with_capacity(flat.len());
    for c in flat {
        match index.entry(c.id.clone()) {
            hash_map::Entry::Occupied(_) => {
                tracing::warn!(id = %c.id, "dropping comment with an already-seen id")
            }
            hash_map::Entry::Vacant(e) => {
                e.insert(comments.len());
                comments.push(c);
            }
        }
    }

    let mut parents = comments
        .iter()
        .map(|c| {
            c.parent_comment_id
                .as_ref()
                .and_then(|p| index.get(p).copied())
        })
        .collect::<Vec<_>>();
    break_cycles(&mut parents);

    let mut children = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();
    for (i, p) in parents.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    // parents come before their replies in `order`, so walking it backwards
    // builds every reply before the comment it answers
    let mut order = Vec::with_capacity(comments.len());
    let mut pending = roots.iter().rev().copied().collect::<Vec<_>>();
    while let Some(i) = pending.pop() {
        order.push(i);
        pending.extend(children[i].iter().rev());
    }

    let mut slots = comments.into_iter().map(Some).collect::<Vec<_>>();
    let mut built: Vec<Option<CommentWithReplies>> = Vec::new();
    built.resize_with(slots.len(), || None);
    for &i in order.iter().rev() {
        let comment = slots[i]
            .take()
            .expect("comment reached twice while assembling an acyclic tree");
        let mut replies = children[i]
            .iter()
            .map(|c| built[*c].take().expect("reply assembled before its parent"))
            .collect::<Vec<_>>();
        replies.sort_by_key(|r| r.comment.created_at);
        built[i] = Some(CommentWithReplies { comment, replies });
    }
    roots
        .into_iter()
        .map(|r| built[r].take().expect("root assembled"))
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    New,
    OnPath,
    Done,
}

/// Cut every parent link that points back into the chain that led to it
fn break_cycles(parents: &mut [Option<usize>]) {
    let mut state = vec![Visit::New; parents.len()];
    let mut path = Vec::new();
    for start in 0..parents.len() {
        if state[start] == Visit::Done {
            continue;
        }
        let mut cur = start;
        loop {
            state[cur] = Visit::OnPath;
            path.push(cur);
            match parents[cur] {
                Some(p) if state[p] == Visit::OnPath => {
                    tracing::warn!(comment = cur, parent = p, "comment parents form a cycle");
                    parents[cur] = None;
                    break;
                }
                Some(p) if state[p] == Visit::New => cur = p,
                _ => break,
            }
        }
        for i in path.drain(..) {
            state[i] = Visit::Done;
        }
    }
}

pub fn count_nodes(forest: &[CommentWithReplies]) -> usize {
    let mut count = 0;
    let mut pending = vec![forest];
    while let Some(level) = pending.pop() {
        count += level.len();
        pending.extend(level.iter().map(|c| &c.replies[..]));
    }
    count
}
