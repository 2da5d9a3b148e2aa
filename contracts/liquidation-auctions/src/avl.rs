//! Order statistic AVL trees over the shared node arena.
//!
//! Trees are ordered by insertion position, not by key: pushes go to either
//! end and `take` splits off a prefix by cached tez weight. Every node
//! carries a parent pointer so a leaf can find its tree in logarithmic
//! time, which is what lets slices move between the queue, the current lot
//! and completed lots without touching their ids.

use super::*;

use crate::arena::{Arena, BranchNode, LeafNode, Node, NodeId, RootNode};
use crate::state::{AuctionOutcome, Slice};

/// Pointer to a tree root node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType,
)]
pub struct TreeId(pub(crate) NodeId);

/// Pointer to a leaf node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType,
)]
pub struct LeafId(pub(crate) NodeId);

/// End of the ordered sequence an operation applies to. `Front` is the
/// oldest end, the one `take` and the drain consume; `Back` is the
/// youngest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Front,
    Back,
}

/// Allocate an empty tree.
pub fn mk_empty(arena: &mut Arena, data: Option<AuctionOutcome>) -> TreeId {
    TreeId(arena.alloc(Node::Root(RootNode { node: None, data })))
}

fn node_height(arena: &Arena, id: NodeId) -> u64 {
    match arena.read(id) {
        Node::Leaf(_) => 1,
        Node::Branch(branch) => 1 + branch.left_height.max(branch.right_height),
        Node::Root(_) => unreachable!(),
    }
}

fn node_tez(arena: &Arena, id: NodeId) -> Tez {
    match arena.read(id) {
        Node::Leaf(leaf) => leaf.value.contents.tez,
        Node::Branch(branch) => branch.left_tez + branch.right_tez,
        Node::Root(_) => unreachable!(),
    }
}

fn set_parent(arena: &mut Arena, id: NodeId, parent: NodeId) {
    match arena.read(id) {
        Node::Leaf(mut leaf) => {
            leaf.parent = parent;
            arena.write(id, Node::Leaf(leaf));
        }
        Node::Branch(mut branch) => {
            branch.parent = parent;
            arena.write(id, Node::Branch(branch));
        }
        Node::Root(_) => unreachable!(),
    }
}

/// Repoint the child slot of `parent` that holds `old` to `new` and
/// refresh the cached metrics of that side.
fn update_matching_child(arena: &mut Arena, parent: NodeId, old: NodeId, new: NodeId) {
    match arena.read(parent) {
        Node::Root(mut root) => {
            if root.node != Some(old) {
                unreachable!();
            }
            root.node = Some(new);
            arena.write(parent, Node::Root(root));
        }
        Node::Branch(mut branch) => {
            if branch.left == old {
                branch.left = new;
                branch.left_height = node_height(arena, new);
                branch.left_tez = node_tez(arena, new);
            } else if branch.right == old {
                branch.right = new;
                branch.right_height = node_height(arena, new);
                branch.right_tez = node_tez(arena, new);
            } else {
                unreachable!();
            }
            arena.write(parent, Node::Branch(branch));
        }
        Node::Leaf(_) => unreachable!(),
    }
}

fn mk_branch(arena: &mut Arena, left: NodeId, right: NodeId) -> NodeId {
    let branch = BranchNode {
        left,
        left_height: node_height(arena, left),
        left_tez: node_tez(arena, left),
        right,
        right_height: node_height(arena, right),
        right_tez: node_tez(arena, right),
        parent: left,
    };
    let id = arena.alloc(Node::Branch(branch));
    set_parent(arena, left, id);
    set_parent(arena, right, id);
    id
}

/// Left rotation: the right child becomes the subtree root. The caller
/// re-links the returned root into the grandparent.
fn rotate_left(arena: &mut Arena, id: NodeId) -> NodeId {
    let mut branch = arena.read_branch(id);
    let pivot_id = branch.right;
    let mut pivot = arena.read_branch(pivot_id);

    branch.right = pivot.left;
    branch.right_height = pivot.left_height;
    branch.right_tez = pivot.left_tez;
    set_parent(arena, pivot.left, id);

    pivot.left = id;
    pivot.left_height = 1 + branch.left_height.max(branch.right_height);
    pivot.left_tez = branch.left_tez + branch.right_tez;
    pivot.parent = branch.parent;

    branch.parent = pivot_id;
    arena.write(id, Node::Branch(branch));
    arena.write(pivot_id, Node::Branch(pivot));
    pivot_id
}

/// Right rotation: the left child becomes the subtree root.
fn rotate_right(arena: &mut Arena, id: NodeId) -> NodeId {
    let mut branch = arena.read_branch(id);
    let pivot_id = branch.left;
    let mut pivot = arena.read_branch(pivot_id);

    branch.left = pivot.right;
    branch.left_height = pivot.right_height;
    branch.left_tez = pivot.right_tez;
    set_parent(arena, pivot.right, id);

    pivot.right = id;
    pivot.right_height = 1 + branch.left_height.max(branch.right_height);
    pivot.right_tez = branch.left_tez + branch.right_tez;
    pivot.parent = branch.parent;

    branch.parent = pivot_id;
    arena.write(id, Node::Branch(branch));
    arena.write(pivot_id, Node::Branch(pivot));
    pivot_id
}

/// Rebalance a single branch whose cached child metrics are current.
/// Returns the possibly rotated subtree root; the caller re-links it.
fn balance(arena: &mut Arena, id: NodeId) -> NodeId {
    let branch = arena.read_branch(id);
    if branch.right_height > branch.left_height + 1 {
        let right = arena.read_branch(branch.right);
        if right.left_height > right.right_height {
            let new_right = rotate_right(arena, branch.right);
            let mut updated = arena.read_branch(id);
            updated.right = new_right;
            updated.right_height = node_height(arena, new_right);
            updated.right_tez = node_tez(arena, new_right);
            arena.write(id, Node::Branch(updated));
        }
        rotate_left(arena, id)
    } else if branch.left_height > branch.right_height + 1 {
        let left = arena.read_branch(branch.left);
        if left.right_height > left.left_height {
            let new_left = rotate_left(arena, branch.left);
            let mut updated = arena.read_branch(id);
            updated.left = new_left;
            updated.left_height = node_height(arena, new_left);
            updated.left_tez = node_tez(arena, new_left);
            arena.write(id, Node::Branch(updated));
        }
        rotate_right(arena, id)
    } else {
        id
    }
}

/// Concatenate two non-empty subtrees, every leaf of `left` older than
/// every leaf of `right`. Returns the merged subtree root with a stale
/// parent pointer; the caller re-links it.
fn join(arena: &mut Arena, left: NodeId, right: NodeId) -> NodeId {
    let left_height = node_height(arena, left);
    let right_height = node_height(arena, right);
    if left_height.abs_diff(right_height) <= 1 {
        mk_branch(arena, left, right)
    } else if left_height > right_height {
        let mut branch = arena.read_branch(left);
        let merged = join(arena, branch.right, right);
        branch.right = merged;
        branch.right_height = node_height(arena, merged);
        branch.right_tez = node_tez(arena, merged);
        arena.write(left, Node::Branch(branch));
        set_parent(arena, merged, left);
        balance(arena, left)
    } else {
        let mut branch = arena.read_branch(right);
        let merged = join(arena, left, branch.left);
        branch.left = merged;
        branch.left_height = node_height(arena, merged);
        branch.left_tez = node_tez(arena, merged);
        arena.write(right, Node::Branch(branch));
        set_parent(arena, merged, right);
        balance(arena, right)
    }
}

/// Append a leaf at either end of the tree.
pub fn push(arena: &mut Arena, tree: TreeId, value: Slice, end: End) -> LeafId {
    let mut root = arena.read_root(tree.0);
    let leaf = arena.alloc(Node::Leaf(LeafNode {
        value,
        parent: tree.0,
    }));
    let top = match root.node {
        None => leaf,
        Some(top) => match end {
            End::Front => join(arena, leaf, top),
            End::Back => join(arena, top, leaf),
        },
    };
    set_parent(arena, top, tree.0);
    root.node = Some(top);
    arena.write(tree.0, Node::Root(root));
    LeafId(leaf)
}

/// Oldest leaf of the tree, if any.
pub fn peek_front(arena: &Arena, tree: TreeId) -> Option<(LeafId, Slice)> {
    let mut cursor = arena.read_root(tree.0).node?;
    loop {
        match arena.read(cursor) {
            Node::Branch(branch) => cursor = branch.left,
            Node::Leaf(leaf) => return Some((LeafId(cursor), leaf.value)),
            Node::Root(_) => unreachable!(),
        }
    }
}

fn peek_back(arena: &Arena, tree: TreeId) -> Option<(LeafId, Slice)> {
    let mut cursor = arena.read_root(tree.0).node?;
    loop {
        match arena.read(cursor) {
            Node::Branch(branch) => cursor = branch.right,
            Node::Leaf(leaf) => return Some((LeafId(cursor), leaf.value)),
            Node::Root(_) => unreachable!(),
        }
    }
}

/// Remove and return the oldest leaf.
pub fn pop_front(arena: &mut Arena, tree: TreeId) -> Option<Slice> {
    let (leaf, value) = peek_front(arena, tree)?;
    del(arena, leaf);
    Some(value)
}

/// Remove and return the youngest leaf.
pub fn pop_back(arena: &mut Arena, tree: TreeId) -> Option<Slice> {
    let (leaf, value) = peek_back(arena, tree)?;
    del(arena, leaf);
    Some(value)
}

/// Delete a leaf, rebalancing up to the root. Returns the tree the leaf
/// was removed from, so the caller can notice it becoming empty.
pub fn del(arena: &mut Arena, leaf: LeafId) -> TreeId {
    let node = arena.read_leaf(leaf.0);
    arena.free(leaf.0);
    match arena.read(node.parent) {
        Node::Root(mut root) => {
            root.node = None;
            arena.write(node.parent, Node::Root(root));
            TreeId(node.parent)
        }
        Node::Branch(branch) => {
            let sibling = if branch.left == leaf.0 {
                branch.right
            } else {
                branch.left
            };
            let grandparent = branch.parent;
            set_parent(arena, sibling, grandparent);
            update_matching_child(arena, grandparent, node.parent, sibling);
            arena.free(node.parent);
            rebalance_to_root(arena, grandparent)
        }
        Node::Leaf(_) => unreachable!(),
    }
}

fn rebalance_to_root(arena: &mut Arena, start: NodeId) -> TreeId {
    let mut cursor = start;
    loop {
        match arena.read(cursor) {
            Node::Root(_) => return TreeId(cursor),
            Node::Branch(branch) => {
                let parent = branch.parent;
                let new_subtree = balance(arena, cursor);
                update_matching_child(arena, parent, cursor, new_subtree);
                cursor = parent;
            }
            Node::Leaf(_) => unreachable!(),
        }
    }
}

/// Split off the longest prefix of whole leaves whose tez sum stays within
/// `limit` into a fresh tree carrying `data`. The source keeps the suffix.
pub fn take(
    arena: &mut Arena,
    tree: TreeId,
    limit: Tez,
    data: Option<AuctionOutcome>,
) -> TreeId {
    let mut source = arena.read_root(tree.0);
    let new_tree = TreeId(arena.alloc(Node::Root(RootNode { node: None, data })));
    if let Some(top) = source.node {
        let (kept, rest) = split(arena, top, limit);
        if let Some(kept) = kept {
            set_parent(arena, kept, new_tree.0);
            let mut new_root = arena.read_root(new_tree.0);
            new_root.node = Some(kept);
            arena.write(new_tree.0, Node::Root(new_root));
        }
        source.node = rest;
        if let Some(rest) = rest {
            set_parent(arena, rest, tree.0);
        }
        arena.write(tree.0, Node::Root(source));
    }
    new_tree
}

fn split(arena: &mut Arena, node: NodeId, limit: Tez) -> (Option<NodeId>, Option<NodeId>) {
    match arena.read(node) {
        Node::Leaf(leaf) => {
            if leaf.value.contents.tez <= limit {
                (Some(node), None)
            } else {
                (None, Some(node))
            }
        }
        Node::Branch(branch) => {
            if branch.left_tez + branch.right_tez <= limit {
                return (Some(node), None);
            }
            if branch.left_tez <= limit {
                let (kept, rest) = split(arena, branch.right, limit - branch.left_tez);
                arena.free(node);
                let left_side = match kept {
                    Some(kept) => join(arena, branch.left, kept),
                    None => branch.left,
                };
                (Some(left_side), rest)
            } else {
                let (kept, rest) = split(arena, branch.left, limit);
                arena.free(node);
                let right_side = match rest {
                    Some(rest) => join(arena, rest, branch.right),
                    None => branch.right,
                };
                (kept, Some(right_side))
            }
        }
        Node::Root(_) => unreachable!(),
    }
}

/// Tree a leaf currently belongs to, by walking parent pointers.
pub fn find_root(arena: &Arena, leaf: LeafId) -> TreeId {
    let mut cursor = leaf.0;
    loop {
        match arena.read(cursor) {
            Node::Root(_) => return TreeId(cursor),
            Node::Branch(branch) => cursor = branch.parent,
            Node::Leaf(node) => cursor = node.parent,
        }
    }
}

pub fn root_data(arena: &Arena, tree: TreeId) -> Option<AuctionOutcome> {
    arena.read_root(tree.0).data
}

pub fn write_root_data(arena: &mut Arena, tree: TreeId, data: Option<AuctionOutcome>) {
    let mut root = arena.read_root(tree.0);
    root.data = data;
    arena.write(tree.0, Node::Root(root));
}

/// Cached tez content of the whole tree.
pub fn weight(arena: &Arena, tree: TreeId) -> Tez {
    match arena.read_root(tree.0).node {
        None => Tez::zero(),
        Some(top) => node_tez(arena, top),
    }
}

pub fn is_empty(arena: &Arena, tree: TreeId) -> bool {
    arena.read_root(tree.0).node.is_none()
}

pub fn height(arena: &Arena, tree: TreeId) -> u64 {
    match arena.read_root(tree.0).node {
        None => 0,
        Some(top) => node_height(arena, top),
    }
}

pub fn delete_empty_tree(arena: &mut Arena, tree: TreeId) {
    if arena.read_root(tree.0).node.is_some() {
        unreachable!();
    }
    arena.free(tree.0);
}

/// Mutate a leaf value in place. The owning tree must not change, and
/// neither may the slice tez: cached subtree weights are not recomputed.
pub fn update_leaf(arena: &mut Arena, leaf: LeafId, f: impl FnOnce(Slice) -> Slice) {
    let mut node = arena.read_leaf(leaf.0);
    let updated = f(node.value);
    if updated.contents.tez != node.value.contents.tez {
        unreachable!();
    }
    node.value = updated;
    arena.write(leaf.0, Node::Leaf(node));
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::state::SliceContents;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    const BURROW: AccountAddress = AccountAddress([7u8; 32]);

    fn slice(micro_tez: u64) -> Slice {
        Slice {
            contents: SliceContents {
                burrow: BURROW,
                tez: Tez::from_micro_tez(micro_tez),
                min_kit_for_unwarranted: Kit::zero(),
            },
            older: None,
            younger: None,
        }
    }

    fn audit_subtree(arena: &Arena, id: NodeId, parent: NodeId) -> (u64, Tez) {
        match arena.read(id) {
            Node::Leaf(leaf) => {
                claim_eq!(leaf.parent, parent);
                (1, leaf.value.contents.tez)
            }
            Node::Branch(branch) => {
                claim_eq!(branch.parent, parent);
                let (left_height, left_tez) = audit_subtree(arena, branch.left, id);
                let (right_height, right_tez) = audit_subtree(arena, branch.right, id);
                claim_eq!(left_height, branch.left_height);
                claim_eq!(right_height, branch.right_height);
                claim_eq!(left_tez, branch.left_tez);
                claim_eq!(right_tez, branch.right_tez);
                claim!(left_height.abs_diff(right_height) <= 1);
                (1 + left_height.max(right_height), left_tez + right_tez)
            }
            Node::Root(_) => fail!("dangling root below a root"),
        }
    }

    /// Recompute heights, weights and parent pointers of the whole tree and
    /// compare them against the cached values.
    fn audit_tree(arena: &Arena, tree: TreeId) -> (u64, Tez) {
        match arena.read_root(tree.0).node {
            None => (0, Tez::zero()),
            Some(top) => audit_subtree(arena, top, tree.0),
        }
    }

    #[concordium_test]
    fn test_push_back_pop_front_is_fifo() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        for tez in 1..=8 {
            push(&mut arena, tree, slice(tez), End::Back);
            audit_tree(&arena, tree);
        }
        for tez in 1..=8 {
            let popped = pop_front(&mut arena, tree).expect("tree ran out early");
            claim_eq!(popped.contents.tez, Tez::from_micro_tez(tez));
            audit_tree(&arena, tree);
        }
        claim!(is_empty(&arena, tree));
    }

    #[concordium_test]
    fn test_push_front_prepends() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        push(&mut arena, tree, slice(1), End::Back);
        push(&mut arena, tree, slice(2), End::Back);
        push(&mut arena, tree, slice(0), End::Front);
        for tez in 0..=2 {
            claim_eq!(
                pop_front(&mut arena, tree).expect("tree ran out early").contents.tez,
                Tez::from_micro_tez(tez)
            );
        }
    }

    #[concordium_test]
    fn test_pop_back_takes_youngest() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        for tez in 1..=5 {
            push(&mut arena, tree, slice(tez), End::Back);
        }
        claim_eq!(
            pop_back(&mut arena, tree).expect("tree is empty").contents.tez,
            Tez::from_micro_tez(5)
        );
        claim_eq!(
            pop_back(&mut arena, tree).expect("tree is empty").contents.tez,
            Tez::from_micro_tez(4)
        );
        audit_tree(&arena, tree);
    }

    #[concordium_test]
    fn test_take_splits_on_leaf_boundary() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        for _ in 0..3 {
            push(&mut arena, tree, slice(5), End::Back);
        }
        let taken = take(&mut arena, tree, Tez::from_micro_tez(12), None);
        claim_eq!(weight(&arena, taken), Tez::from_micro_tez(10));
        claim_eq!(weight(&arena, tree), Tez::from_micro_tez(5));
        audit_tree(&arena, taken);
        audit_tree(&arena, tree);
    }

    #[concordium_test]
    fn test_take_below_first_leaf_is_empty() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        for _ in 0..3 {
            push(&mut arena, tree, slice(5), End::Back);
        }
        let taken = take(&mut arena, tree, Tez::from_micro_tez(3), None);
        claim!(is_empty(&arena, taken));
        claim_eq!(weight(&arena, tree), Tez::from_micro_tez(15));
        delete_empty_tree(&mut arena, taken);
    }

    #[concordium_test]
    fn test_take_everything() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        for tez in 1..=4 {
            push(&mut arena, tree, slice(tez), End::Back);
        }
        let taken = take(&mut arena, tree, Tez::from_micro_tez(100), None);
        claim_eq!(weight(&arena, taken), Tez::from_micro_tez(10));
        claim!(is_empty(&arena, tree));
        for tez in 1..=4 {
            claim_eq!(
                pop_front(&mut arena, taken).expect("tree ran out early").contents.tez,
                Tez::from_micro_tez(tez)
            );
        }
    }

    #[concordium_test]
    fn test_take_moves_leaves_to_the_new_root() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        let mut leaves = Vec::new();
        for _ in 0..4 {
            leaves.push(push(&mut arena, tree, slice(5), End::Back));
        }
        let taken = take(&mut arena, tree, Tez::from_micro_tez(10), None);
        claim_eq!(find_root(&arena, leaves[0]), taken);
        claim_eq!(find_root(&arena, leaves[1]), taken);
        claim_eq!(find_root(&arena, leaves[2]), tree);
        claim_eq!(find_root(&arena, leaves[3]), tree);
    }

    #[concordium_test]
    fn test_del_middle_leaf_rebalances() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        let mut leaves = Vec::new();
        for tez in 1..=9 {
            leaves.push(push(&mut arena, tree, slice(tez), End::Back));
        }
        del(&mut arena, leaves[4]);
        audit_tree(&arena, tree);
        del(&mut arena, leaves[1]);
        audit_tree(&arena, tree);
        del(&mut arena, leaves[7]);
        let (_, total) = audit_tree(&arena, tree);
        claim_eq!(total, Tez::from_micro_tez(1 + 3 + 4 + 6 + 7 + 9));
    }

    #[concordium_test]
    fn test_root_data_round_trip() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        claim_eq!(root_data(&arena, tree), None);
        let outcome = AuctionOutcome {
            winning_bid: crate::state::Bid {
                address: BURROW,
                kit: Kit::from_kit(7),
            },
            sold_tez: Tez::from_tez(1),
            younger_auction: None,
            older_auction: None,
        };
        write_root_data(&mut arena, tree, Some(outcome));
        claim_eq!(root_data(&arena, tree), Some(outcome));
    }

    #[concordium_test]
    fn test_update_leaf_keeps_cached_weights() {
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        let mut leaves = Vec::new();
        for tez in 1..=6 {
            leaves.push(push(&mut arena, tree, slice(tez), End::Back));
        }
        update_leaf(&mut arena, leaves[3], |mut value| {
            value.older = Some(leaves[2]);
            value.younger = Some(leaves[4]);
            value
        });
        audit_tree(&arena, tree);
        claim_eq!(arena.read_leaf(leaves[3].0).value.older, Some(leaves[2]));
    }

    #[concordium_test]
    fn test_structure_under_random_operations() {
        let mut rng = XorShiftRng::from_seed([0x5au8; 16]);
        let mut arena = Arena::new();
        let tree = mk_empty(&mut arena, None);
        // Mirror of the tree contents, oldest first.
        let mut model: Vec<(LeafId, u64)> = Vec::new();

        for step in 0..600 {
            match rng.gen_range(0..6) {
                0 | 1 => {
                    let tez = rng.gen_range(1..50u64);
                    let leaf = push(&mut arena, tree, slice(tez), End::Back);
                    model.push((leaf, tez));
                }
                2 => {
                    let tez = rng.gen_range(1..50u64);
                    let leaf = push(&mut arena, tree, slice(tez), End::Front);
                    model.insert(0, (leaf, tez));
                }
                3 => {
                    let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                    let popped = pop_front(&mut arena, tree);
                    claim_eq!(
                        popped.map(|value| value.contents.tez),
                        expected.map(|(_, tez)| Tez::from_micro_tez(tez))
                    );
                }
                4 => {
                    if !model.is_empty() {
                        let victim = rng.gen_range(0..model.len());
                        let (leaf, _) = model.remove(victim);
                        claim_eq!(del(&mut arena, leaf), tree);
                    }
                }
                5 => {
                    let limit = rng.gen_range(0..120u64);
                    let taken = take(&mut arena, tree, Tez::from_micro_tez(limit), None);
                    audit_tree(&arena, taken);
                    let mut budget = limit;
                    let mut prefix = 0;
                    while prefix < model.len() && model[prefix].1 <= budget {
                        budget -= model[prefix].1;
                        prefix += 1;
                    }
                    for (leaf, tez) in model.drain(..prefix) {
                        claim_eq!(find_root(&arena, leaf), taken);
                        claim_eq!(
                            pop_front(&mut arena, taken).map(|value| value.contents.tez),
                            Some(Tez::from_micro_tez(tez))
                        );
                    }
                    claim!(is_empty(&arena, taken));
                    delete_empty_tree(&mut arena, taken);
                }
                _ => unreachable!(),
            }

            let (height, total) = audit_tree(&arena, tree);
            let expected_total: u64 = model.iter().map(|(_, tez)| tez).sum();
            claim_eq!(total, Tez::from_micro_tez(expected_total));
            // classic AVL bound over the node count (leaves plus branches)
            let nodes = 2 * model.len().max(1) - 1;
            let bound = (1.44 * ((nodes + 2) as f64).log2()).floor() as u64;
            claim!(
                height <= bound,
                "height {} over bound {} at step {}",
                height,
                bound,
                step
            );
            for (leaf, _) in model.iter() {
                claim_eq!(find_root(&arena, *leaf), tree);
            }
        }
    }
}
