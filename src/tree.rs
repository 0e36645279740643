use alloc::vec::Vec;

/// Sentinel arena index standing in for an absent node.
const NIL: usize = usize::MAX;

/// A vertex of the recency tree, stored in the arena.
///
/// Links are arena indices rather than pointers; `NIL` marks an absent
/// parent or child. `height` and `count` are derived values kept current
/// by every structural mutation.
#[derive(Debug, Clone)]
struct Node<T> {
    /// The access token this slot currently represents
    token: T,
    /// Arena index of the parent node (`NIL` for the root)
    parent: usize,
    /// Arena index of the left child (`NIL` if none)
    left: usize,
    /// Arena index of the right child (`NIL` if none)
    right: usize,
    /// Height of the subtree rooted here, a leaf has height 1
    height: u32,
    /// Number of nodes in the subtree rooted here, including this one
    count: usize,
}

impl<T> Node<T> {
    const fn new(token: T, parent: usize) -> Self {
        Self {
            token,
            parent,
            left: NIL,
            right: NIL,
            height: 1,
            count: 1,
        }
    }
}

/// An order-statistics AVL tree over token recency.
///
/// Unlike a sorted map, this tree never compares tokens: a node's
/// in-order position is decided purely by *when* it was inserted. Every
/// insertion lands at the leftmost position, so in-order position grows
/// left to right with decreasing recency, and the rank of a node is
/// exactly the number of distinct tokens touched more recently than the
/// token it holds.
///
/// Nodes live in a growable arena and are addressed by `usize` slots
/// returned from [`insert_most_recent`](Self::insert_most_recent).
/// Removed slots are recycled through a free list, which keeps the
/// delete-then-reinsert cycle of a repeating token allocation-free once
/// the arena has grown to the distinct-token count.
///
/// `insert_most_recent`, `rank` and `remove` are all O(log n) in the
/// number of live nodes.
#[derive(Debug, Clone)]
pub struct RecencyTree<T> {
    /// Node arena; slots currently on the free list are logically absent
    nodes: Vec<Node<T>>,
    /// Recycled arena slots, reused before the arena grows
    free: Vec<usize>,
    /// Arena index of the root (`NIL` when the tree is empty)
    root: usize,
}

impl<T> RecencyTree<T> {
    /// Creates an empty tree.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NIL,
        }
    }

    /// Creates an empty tree with arena capacity for `capacity` live
    /// nodes, typically the expected distinct-token count.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: NIL,
        }
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.subtree_count(self.root)
    }

    /// Returns `true` if no node is live.
    pub const fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Returns the token held by a live node.
    ///
    /// The slot must have been returned by
    /// [`insert_most_recent`](Self::insert_most_recent) and not removed
    /// since; after a two-children removal the relocated slot reported by
    /// [`remove`](Self::remove) holds a different token than before.
    pub fn token(&self, node: usize) -> &T {
        &self.nodes[node].token
    }

    /// Drops every node and recycled slot, keeping allocations.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = NIL;
    }

    /// Inserts `token` as the most recent entry and returns its slot.
    ///
    /// The new node becomes the global leftmost node, so its rank is 0.
    /// The caller must ensure the token has no live node already; the
    /// tree itself holds no token index and cannot detect a duplicate.
    pub fn insert_most_recent(&mut self, token: T) -> usize {
        let node = self.allocate(token);
        if self.root == NIL {
            self.root = node;
        } else {
            let mut current = self.root;
            while self.nodes[current].left != NIL {
                current = self.nodes[current].left;
            }
            self.nodes[current].left = node;
            self.nodes[node].parent = current;
            self.rebalance_from(node);
        }
        #[cfg(debug_assertions)]
        debug_assert!(self.invariants_hold(), "tree invariants violated after insert");
        node
    }

    /// Returns the number of nodes strictly left of `node` in-order,
    /// i.e. the count of distinct tokens inserted more recently.
    ///
    /// `node` must be attached to the tree; querying a detached slot is
    /// a programming error.
    pub fn rank(&self, node: usize) -> usize {
        let mut rank = self.subtree_count(self.nodes[node].left);
        let mut current = node;
        let mut parent = self.nodes[current].parent;
        while parent != NIL {
            if self.nodes[parent].right == current {
                rank += self.subtree_count(self.nodes[parent].left) + 1;
            }
            current = parent;
            parent = self.nodes[current].parent;
        }
        debug_assert_eq!(current, self.root, "rank queried on a detached node");
        rank
    }

    /// Removes a live node from the tree and recycles its slot.
    ///
    /// The three structural cases are handled separately: a leaf is
    /// detached, a node with one child is spliced out, and a node with
    /// two children swaps tokens with its in-order successor and the
    /// removal continues at the successor, which has at most a right
    /// child. The loop is bounded by tree height.
    ///
    /// Returns the slot whose token was relocated by a successor swap,
    /// if any, so callers keeping a token → slot index can repair it.
    pub fn remove(&mut self, node: usize) -> Option<usize> {
        let mut node = node;
        let mut relocated = None;
        loop {
            let left = self.nodes[node].left;
            let right = self.nodes[node].right;

            if left != NIL && right != NIL {
                let mut successor = right;
                while self.nodes[successor].left != NIL {
                    successor = self.nodes[successor].left;
                }
                self.swap_tokens(node, successor);
                relocated = Some(node);
                node = successor;
                continue;
            }

            let parent = self.nodes[node].parent;
            let child = if left != NIL { left } else { right };
            if child == NIL {
                if node == self.root {
                    self.root = NIL;
                } else if self.nodes[parent].left == node {
                    self.nodes[parent].left = NIL;
                } else {
                    self.nodes[parent].right = NIL;
                }
            } else {
                self.nodes[child].parent = parent;
                if node == self.root {
                    self.root = child;
                } else if self.nodes[parent].left == node {
                    self.nodes[parent].left = child;
                } else {
                    self.nodes[parent].right = child;
                }
            }
            self.release(node);
            if parent != NIL {
                self.rebalance_from(parent);
            }
            #[cfg(debug_assertions)]
            debug_assert!(self.invariants_hold(), "tree invariants violated after removal");
            return relocated;
        }
    }

    fn allocate(&mut self, token: T) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Node::new(token, NIL);
                slot
            }
            None => {
                self.nodes.push(Node::new(token, NIL));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, node: usize) {
        self.free.push(node);
    }

    fn swap_tokens(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(hi);
        core::mem::swap(&mut head[lo].token, &mut tail[0].token);
    }

    fn height(&self, node: usize) -> u32 {
        if node == NIL { 0 } else { self.nodes[node].height }
    }

    fn subtree_count(&self, node: usize) -> usize {
        if node == NIL { 0 } else { self.nodes[node].count }
    }

    fn balance(&self, node: usize) -> i32 {
        if node == NIL {
            0
        } else {
            self.height(self.nodes[node].left) as i32 - self.height(self.nodes[node].right) as i32
        }
    }

    /// Recomputes the derived `height`/`count` of one node from its
    /// children, which must already be current.
    fn refresh(&mut self, node: usize) {
        let left = self.nodes[node].left;
        let right = self.nodes[node].right;
        let height = 1 + self.height(left).max(self.height(right));
        let count = 1 + self.subtree_count(left) + self.subtree_count(right);
        let entry = &mut self.nodes[node];
        entry.height = height;
        entry.count = count;
    }

    /// Walks from `start` to the root, refreshing derived values and
    /// resolving any AVL imbalance at each ancestor. A left-right or
    /// right-left shape is reduced by rotating the child first.
    fn rebalance_from(&mut self, start: usize) {
        let mut node = start;
        while node != NIL {
            self.refresh(node);
            let balance = self.balance(node);
            if balance > 1 {
                if self.balance(self.nodes[node].left) < 0 {
                    self.rotate_left(self.nodes[node].left);
                }
                node = self.rotate_right(node);
            } else if balance < -1 {
                if self.balance(self.nodes[node].right) > 0 {
                    self.rotate_right(self.nodes[node].right);
                }
                node = self.rotate_left(node);
            }
            node = self.nodes[node].parent;
        }
    }

    /// Rotates `x` down to the left; `x.right` takes its place and is
    /// returned. Derived values are recomputed child-then-parent.
    fn rotate_left(&mut self, x: usize) -> usize {
        let y = self.nodes[x].right;
        debug_assert_ne!(y, NIL);

        let y_left = self.nodes[y].left;
        self.nodes[x].right = y_left;
        if y_left != NIL {
            self.nodes[y_left].parent = x;
        }

        let x_parent = self.nodes[x].parent;
        self.nodes[y].parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if self.nodes[x_parent].left == x {
            self.nodes[x_parent].left = y;
        } else {
            self.nodes[x_parent].right = y;
        }

        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        self.refresh(x);
        self.refresh(y);
        y
    }

    /// Rotates `y` down to the right; `y.left` takes its place and is
    /// returned. Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, y: usize) -> usize {
        let x = self.nodes[y].left;
        debug_assert_ne!(x, NIL);

        let x_right = self.nodes[x].right;
        self.nodes[y].left = x_right;
        if x_right != NIL {
            self.nodes[x_right].parent = y;
        }

        let y_parent = self.nodes[y].parent;
        self.nodes[x].parent = y_parent;
        if y_parent == NIL {
            self.root = x;
        } else if self.nodes[y_parent].left == y {
            self.nodes[y_parent].left = x;
        } else {
            self.nodes[y_parent].right = x;
        }

        self.nodes[x].right = y;
        self.nodes[y].parent = x;

        self.refresh(y);
        self.refresh(x);
        x
    }

    #[cfg(debug_assertions)]
    fn invariants_hold(&self) -> bool {
        self.check_subtree(self.root, NIL).is_some()
    }

    /// Validates parent links, AVL balance and subtree counts below
    /// `node`, returning its `(height, count)`. Recursion depth is
    /// bounded by tree height.
    #[cfg(debug_assertions)]
    fn check_subtree(&self, node: usize, parent: usize) -> Option<(u32, usize)> {
        if node == NIL {
            return Some((0, 0));
        }
        let entry = &self.nodes[node];
        if entry.parent != parent {
            return None;
        }
        let (left_height, left_count) = self.check_subtree(entry.left, node)?;
        let (right_height, right_count) = self.check_subtree(entry.right, node)?;
        if left_height.abs_diff(right_height) > 1 {
            return None;
        }
        if entry.height != 1 + left_height.max(right_height) {
            return None;
        }
        if entry.count != 1 + left_count + right_count {
            return None;
        }
        Some((entry.height, entry.count))
    }
}

impl<T> Default for RecencyTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::RandomState;
    use hashbrown::HashMap;

    fn lcg(seed: u64) -> impl FnMut() -> u64 {
        let mut state = seed;
        move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            state >> 33
        }
    }

    #[test]
    fn empty_tree() {
        let tree: RecencyTree<u64> = RecencyTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn inserted_node_has_rank_zero() {
        let mut tree = RecencyTree::new();
        for token in 0..50_u64 {
            let node = tree.insert_most_recent(token);
            assert_eq!(tree.rank(node), 0);
        }
        assert_eq!(tree.len(), 50);
    }

    #[test]
    fn ranks_follow_insertion_order() {
        let mut tree = RecencyTree::new();
        let a = tree.insert_most_recent('a');
        let b = tree.insert_most_recent('b');
        let c = tree.insert_most_recent('c');

        assert_eq!(tree.rank(c), 0);
        assert_eq!(tree.rank(b), 1);
        assert_eq!(tree.rank(a), 2);
    }

    #[test]
    fn left_spine_insertion_stays_balanced() {
        let mut tree = RecencyTree::new();
        for token in 0..100_u64 {
            tree.insert_most_recent(token);
        }
        assert_eq!(tree.len(), 100);
        // AVL bound: 100 nodes fit in height at most 9.
        assert!(tree.nodes[tree.root].height <= 9);
    }

    #[test]
    fn remove_leaf() {
        let mut tree = RecencyTree::new();
        let a = tree.insert_most_recent('a');
        assert_eq!(tree.remove(a), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_node_with_one_child() {
        let mut tree = RecencyTree::new();
        let a = tree.insert_most_recent('a');
        let b = tree.insert_most_recent('b');
        // 'b' is the root's left child; removing the root splices it up.
        assert_eq!(tree.remove(a), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.rank(b), 0);
        assert_eq!(*tree.token(b), 'b');
    }

    #[test]
    fn remove_node_with_two_children_relocates_successor() {
        let mut tree = RecencyTree::new();
        tree.insert_most_recent('a');
        let b = tree.insert_most_recent('b');
        let c = tree.insert_most_recent('c');
        // After the left-left rotation 'b' is the root with children
        // 'c' (left) and 'a' (right).
        assert_eq!(tree.rank(b), 1);

        let relocated = tree.remove(b);
        let moved = relocated.unwrap();
        assert_eq!(*tree.token(moved), 'a');
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.rank(c), 0);
        assert_eq!(tree.rank(moved), 1);
    }

    #[test]
    fn clear_empties_the_arena() {
        let mut tree = RecencyTree::new();
        for token in 0..10_u64 {
            tree.insert_most_recent(token);
        }
        tree.clear();
        assert!(tree.is_empty());
        let node = tree.insert_most_recent(99);
        assert_eq!(tree.rank(node), 0);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn slots_are_recycled_after_removal() {
        let mut tree = RecencyTree::new();
        let a = tree.insert_most_recent('a');
        tree.insert_most_recent('b');
        tree.remove(a);
        let c = tree.insert_most_recent('c');
        assert_eq!(c, a);
        assert_eq!(tree.len(), 2);
    }

    /// Replays a delete-reinsert access pattern against a plain
    /// most-recent-first list: the rank of a live node must equal the
    /// token's position in the list.
    #[test]
    fn ranks_match_recency_list_model() {
        let mut next = lcg(0x5eed);
        let mut tree = RecencyTree::new();
        let mut slots: HashMap<u64, usize, RandomState> =
            HashMap::with_hasher(RandomState::default());
        let mut recency: Vec<u64> = Vec::new();

        for _ in 0..600 {
            let token = next() % 24;
            match slots.get(&token).copied() {
                None => {
                    let slot = tree.insert_most_recent(token);
                    slots.insert(token, slot);
                    recency.insert(0, token);
                }
                Some(slot) => {
                    let expected = recency.iter().position(|&t| t == token).unwrap();
                    assert_eq!(tree.rank(slot), expected);

                    if let Some(moved) = tree.remove(slot) {
                        slots.insert(*tree.token(moved), moved);
                    }
                    let fresh = tree.insert_most_recent(token);
                    slots.insert(token, fresh);
                    recency.retain(|&t| t != token);
                    recency.insert(0, token);
                }
            }
            assert_eq!(tree.len(), recency.len());
        }
    }
}
