use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use super::arena::Arena;
use super::augment::{Augment, MaxHigh, Size};
use super::handle::Handle;
use super::node::{Color, RbNode};
use crate::interval::Interval;

/// The Red-Black core shared by both public collections.
///
/// Generic over the augmentation `A`; the rebalancing machinery below never
/// inspects the concrete augmentation, it only invokes
/// [`Augment::recompute`] at the points where a node's child set changed.
/// The variant-specific read paths (`kth`/`rank_of`, `search_overlap`) live
/// in dedicated impl blocks at the bottom of this file.
pub(crate) struct RawRbTree<K, A> {
    nodes: Arena<RbNode<K, A>>,
    root: Option<Handle>,
    len: usize,
}

impl<K, A> RawRbTree<K, A> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.nodes.get(handle).key
    }

    /// Handle of the smallest key, if any.
    pub(crate) fn min_handle(&self) -> Option<Handle> {
        self.root.map(|root| self.subtree_min(root))
    }

    /// Handle of the largest key, if any.
    pub(crate) fn max_handle(&self) -> Option<Handle> {
        self.root.map(|root| self.subtree_max(root))
    }

    fn subtree_min(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left {
            handle = left;
        }
        handle
    }

    fn subtree_max(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right {
            handle = right;
        }
        handle
    }

    /// In-order successor, walking parent links when the right subtree is
    /// empty. Used by the batch traversal so it needs no stack.
    fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes.get(handle).right {
            return Some(self.subtree_min(right));
        }
        let mut child = handle;
        let mut parent = self.nodes.get(handle).parent;
        while let Some(parent_handle) = parent {
            if self.nodes.get(parent_handle).left == Some(child) {
                return Some(parent_handle);
            }
            child = parent_handle;
            parent = self.nodes.get(parent_handle).parent;
        }
        None
    }

    /// Copies every key out in ascending order.
    pub(crate) fn inorder_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::with_capacity(self.len);
        let mut cursor = self.min_handle();
        while let Some(handle) = cursor {
            keys.push(self.nodes.get(handle).key.clone());
            cursor = self.successor(handle);
        }
        keys
    }

    // ─── Nil-safe link plumbing ──────────────────────────────────────────
    //
    // An absent link is the NIL sentinel: uniformly Black, empty subtree.
    // Routing every color/child read through these keeps the fixup loops
    // free of per-link presence checks.

    #[inline]
    fn color_of(&self, link: Option<Handle>) -> Color {
        link.map_or(Color::Black, |handle| self.nodes.get(handle).color)
    }

    #[inline]
    fn is_red(&self, link: Option<Handle>) -> bool {
        self.color_of(link) == Color::Red
    }

    #[inline]
    fn is_black(&self, link: Option<Handle>) -> bool {
        self.color_of(link) == Color::Black
    }

    /// Recolors the linked node; painting NIL is a no-op (it stays Black).
    #[inline]
    fn set_color(&mut self, link: Option<Handle>, color: Color) {
        if let Some(handle) = link {
            self.nodes.get_mut(handle).color = color;
        }
    }

    #[inline]
    fn left_link(&self, link: Option<Handle>) -> Option<Handle> {
        link.and_then(|handle| self.nodes.get(handle).left)
    }

    #[inline]
    fn right_link(&self, link: Option<Handle>) -> Option<Handle> {
        link.and_then(|handle| self.nodes.get(handle).right)
    }
}

impl<K: Ord, A: Augment<K>> RawRbTree<K, A> {
    /// Finds the handle holding `key`, by plain search-tree descent.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => cursor = node.left,
                Ordering::Greater => cursor = node.right,
            }
        }
        None
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(key).is_some()
    }

    /// Inserts `key`, returning `false` (tree untouched) if an equal key is
    /// already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let mut parent = None;
        let mut attach_left = false;
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.nodes.get(handle);
            parent = Some(handle);
            match key.cmp(&node.key) {
                Ordering::Less => {
                    attach_left = true;
                    cursor = node.left;
                }
                Ordering::Greater => {
                    attach_left = false;
                    cursor = node.right;
                }
                Ordering::Equal => return false,
            }
        }

        // A fresh leaf's augmentation is its own value over two NIL children.
        let augment = A::recompute(&key, &A::NIL, &A::NIL);
        let handle = self.nodes.alloc(RbNode::new_leaf(key, parent, augment));
        match parent {
            None => self.root = Some(handle),
            Some(parent_handle) => {
                let parent_node = self.nodes.get_mut(parent_handle);
                if attach_left {
                    parent_node.left = Some(handle);
                } else {
                    parent_node.right = Some(handle);
                }
            }
        }
        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len);

        // Every ancestor gained one descendant; repair before rebalancing so
        // the rotations inside the fixup read consistent child values.
        self.update_augment_to_root(parent);
        self.insert_fixup(handle);
        true
    }

    /// Removes `key` if present, returning the stored key.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(self.remove_at(handle))
    }

    fn remove_at(&mut self, handle: Handle) -> K {
        let (removed_color, fixup_node, fixup_parent) = self.splice_out(handle);

        // Only a Black splice shortens a path's black count.
        if removed_color == Color::Black {
            self.delete_fixup(fixup_node, fixup_parent);
        }

        // The stale augmentations sit on the ancestors of the splice point;
        // the fixup rotations already repaired their own two nodes.
        if fixup_parent.is_some() {
            self.update_augment_to_root(fixup_parent);
        } else {
            self.update_augment_to_root(self.root);
        }

        self.len -= 1;
        let key = self.nodes.take(handle).key;
        debug_assert_eq!(self.nodes.len(), self.len);
        key
    }

    // ─── Augmentation repair ─────────────────────────────────────────────

    /// Recomputes one node's augmentation from the values currently stored
    /// on its children. Never recurses.
    fn recompute_augment(&mut self, handle: Handle) {
        let nil = A::NIL;
        let node = self.nodes.get(handle);
        let left = node.left.map_or(&nil, |child| &self.nodes.get(child).augment);
        let right = node.right.map_or(&nil, |child| &self.nodes.get(child).augment);
        let updated = A::recompute(&node.key, left, right);
        self.nodes.get_mut(handle).augment = updated;
    }

    /// Bottom-up repair along the parent chain, ending at the root.
    fn update_augment_to_root(&mut self, mut cursor: Option<Handle>) {
        while let Some(handle) = cursor {
            self.recompute_augment(handle);
            cursor = self.nodes.get(handle).parent;
        }
    }

    // ─── Rotations ───────────────────────────────────────────────────────

    /// Promotes `x`'s right child, demoting `x` to its left child. O(1);
    /// preserves in-order key order. The demoted node is recomputed first:
    /// the promoted node's augmentation reads the already-corrected child.
    fn rotate_left(&mut self, x: Handle) {
        let Some(y) = self.nodes.get(x).right else {
            debug_assert!(false, "rotate_left: right child is NIL");
            return;
        };

        let y_left = self.nodes.get(y).left;
        self.nodes.get_mut(x).right = y_left;
        if let Some(moved) = y_left {
            self.nodes.get_mut(moved).parent = Some(x);
        }

        let x_parent = self.nodes.get(x).parent;
        self.nodes.get_mut(y).parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(parent) => {
                let parent_node = self.nodes.get_mut(parent);
                if parent_node.left == Some(x) {
                    parent_node.left = Some(y);
                } else {
                    parent_node.right = Some(y);
                }
            }
        }

        self.nodes.get_mut(y).left = Some(x);
        self.nodes.get_mut(x).parent = Some(y);

        self.recompute_augment(x);
        self.recompute_augment(y);
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, y: Handle) {
        let Some(x) = self.nodes.get(y).left else {
            debug_assert!(false, "rotate_right: left child is NIL");
            return;
        };

        let x_right = self.nodes.get(x).right;
        self.nodes.get_mut(y).left = x_right;
        if let Some(moved) = x_right {
            self.nodes.get_mut(moved).parent = Some(y);
        }

        let y_parent = self.nodes.get(y).parent;
        self.nodes.get_mut(x).parent = y_parent;
        match y_parent {
            None => self.root = Some(x),
            Some(parent) => {
                let parent_node = self.nodes.get_mut(parent);
                if parent_node.left == Some(y) {
                    parent_node.left = Some(x);
                } else {
                    parent_node.right = Some(x);
                }
            }
        }

        self.nodes.get_mut(x).right = Some(y);
        self.nodes.get_mut(y).parent = Some(x);

        self.recompute_augment(y);
        self.recompute_augment(x);
    }

    // ─── Insert fixup ────────────────────────────────────────────────────

    /// Restores the Red-Black invariants after attaching a Red leaf: while
    /// the parent is Red, either recolor (Red uncle) and continue from the
    /// grandparent, or straighten a zig-zag and rotate at the grandparent,
    /// which terminates the loop. The root is forced Black at the end.
    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.nodes.get(node).parent {
            if self.is_black(Some(parent)) {
                break;
            }
            // A Red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.nodes.get(parent).parent else {
                break;
            };

            if Some(parent) == self.nodes.get(grandparent).left {
                let uncle = self.nodes.get(grandparent).right;
                if self.is_red(uncle) {
                    self.nodes.get_mut(parent).color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes.get_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if Some(node) == self.nodes.get(parent).right {
                        node = parent;
                        self.rotate_left(node);
                    }
                    // The straightening rotation may have moved `node` down a
                    // level; re-read the chain before the final rotation.
                    let Some(new_parent) = self.nodes.get(node).parent else {
                        break;
                    };
                    let Some(new_grandparent) = self.nodes.get(new_parent).parent else {
                        break;
                    };
                    self.nodes.get_mut(new_parent).color = Color::Black;
                    self.nodes.get_mut(new_grandparent).color = Color::Red;
                    self.rotate_right(new_grandparent);
                }
            } else {
                let uncle = self.nodes.get(grandparent).left;
                if self.is_red(uncle) {
                    self.nodes.get_mut(parent).color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes.get_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if Some(node) == self.nodes.get(parent).left {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let Some(new_parent) = self.nodes.get(node).parent else {
                        break;
                    };
                    let Some(new_grandparent) = self.nodes.get(new_parent).parent else {
                        break;
                    };
                    self.nodes.get_mut(new_parent).color = Color::Black;
                    self.nodes.get_mut(new_grandparent).color = Color::Red;
                    self.rotate_left(new_grandparent);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    // ─── Deletion ────────────────────────────────────────────────────────

    /// Rewires `old`'s parent to point at `new` instead. Augmentations on
    /// the ancestor chain are the caller's responsibility.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.nodes.get(old).parent;
        match parent {
            None => self.root = new,
            Some(parent_handle) => {
                let parent_node = self.nodes.get_mut(parent_handle);
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    parent_node.right = new;
                }
            }
        }
        if let Some(new_handle) = new {
            self.nodes.get_mut(new_handle).parent = parent;
        }
    }

    /// Detaches `handle` from the tree, leaving its slot untouched for the
    /// caller to reclaim. Returns the color of the node physically spliced
    /// out (the successor's, in the two-children case), the link that took
    /// its place, and that link's parent - the fixup needs the parent
    /// explicitly because the replacement link may be NIL.
    fn splice_out(&mut self, handle: Handle) -> (Color, Option<Handle>, Option<Handle>) {
        let node = self.nodes.get(handle);
        let color = node.color;
        let left = node.left;
        let right = node.right;
        let parent = node.parent;

        match (left, right) {
            (None, _) => {
                self.transplant(handle, right);
                (color, right, parent)
            }
            (_, None) => {
                self.transplant(handle, left);
                (color, left, parent)
            }
            (Some(left_handle), Some(right_handle)) => {
                // Splice out the in-order successor and move it into the
                // removed node's position, inheriting its color.
                let successor = self.subtree_min(right_handle);
                let successor_color = self.nodes.get(successor).color;
                let fixup_node = self.nodes.get(successor).right;
                let fixup_parent;

                if self.nodes.get(successor).parent == Some(handle) {
                    fixup_parent = Some(successor);
                } else {
                    fixup_parent = self.nodes.get(successor).parent;
                    let successor_right = self.nodes.get(successor).right;
                    self.transplant(successor, successor_right);
                    self.nodes.get_mut(successor).right = Some(right_handle);
                    self.nodes.get_mut(right_handle).parent = Some(successor);
                }

                self.transplant(handle, Some(successor));
                self.nodes.get_mut(successor).left = Some(left_handle);
                self.nodes.get_mut(left_handle).parent = Some(successor);
                self.nodes.get_mut(successor).color = color;

                (successor_color, fixup_node, fixup_parent)
            }
        }
    }

    /// Restores the Red-Black invariants after a Black splice. `node` is the
    /// doubly-black link, `parent` its parent (tracked separately since the
    /// link may be NIL). Four cases per side: Red sibling (rotate toward the
    /// deficit and retry), Black sibling with two Black children (push the
    /// deficit up), Black sibling with a Red near child (straighten), Black
    /// sibling with a Red far child (rotate and terminate).
    fn delete_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && self.is_black(node) {
            if let Some(handle) = node {
                parent = self.nodes.get(handle).parent;
            }
            let Some(parent_handle) = parent else {
                break;
            };

            if node == self.nodes.get(parent_handle).left {
                let mut sibling = self.nodes.get(parent_handle).right;

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.nodes.get_mut(parent_handle).color = Color::Red;
                    self.rotate_left(parent_handle);
                    sibling = self.nodes.get(parent_handle).right;
                }

                if self.is_black(self.left_link(sibling)) && self.is_black(self.right_link(sibling)) {
                    self.set_color(sibling, Color::Red);
                    node = Some(parent_handle);
                } else {
                    // A deficit with a Red nephew implies the sibling exists.
                    let Some(mut sibling_handle) = sibling else {
                        debug_assert!(false, "delete_fixup: black-height deficit without a sibling");
                        break;
                    };
                    if self.is_black(self.nodes.get(sibling_handle).right) {
                        let near = self.nodes.get(sibling_handle).left;
                        self.set_color(near, Color::Black);
                        self.nodes.get_mut(sibling_handle).color = Color::Red;
                        self.rotate_right(sibling_handle);
                        let Some(rotated) = self.nodes.get(parent_handle).right else {
                            debug_assert!(false, "delete_fixup: sibling lost while straightening");
                            break;
                        };
                        sibling_handle = rotated;
                    }
                    let parent_color = self.nodes.get(parent_handle).color;
                    self.nodes.get_mut(sibling_handle).color = parent_color;
                    self.nodes.get_mut(parent_handle).color = Color::Black;
                    let far = self.nodes.get(sibling_handle).right;
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent_handle);
                    node = self.root;
                }
            } else {
                let mut sibling = self.nodes.get(parent_handle).left;

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.nodes.get_mut(parent_handle).color = Color::Red;
                    self.rotate_right(parent_handle);
                    sibling = self.nodes.get(parent_handle).left;
                }

                if self.is_black(self.left_link(sibling)) && self.is_black(self.right_link(sibling)) {
                    self.set_color(sibling, Color::Red);
                    node = Some(parent_handle);
                } else {
                    let Some(mut sibling_handle) = sibling else {
                        debug_assert!(false, "delete_fixup: black-height deficit without a sibling");
                        break;
                    };
                    if self.is_black(self.nodes.get(sibling_handle).left) {
                        let near = self.nodes.get(sibling_handle).right;
                        self.set_color(near, Color::Black);
                        self.nodes.get_mut(sibling_handle).color = Color::Red;
                        self.rotate_left(sibling_handle);
                        let Some(rotated) = self.nodes.get(parent_handle).left else {
                            debug_assert!(false, "delete_fixup: sibling lost while straightening");
                            break;
                        };
                        sibling_handle = rotated;
                    }
                    let parent_color = self.nodes.get(parent_handle).color;
                    self.nodes.get_mut(sibling_handle).color = parent_color;
                    self.nodes.get_mut(parent_handle).color = Color::Black;
                    let far = self.nodes.get(sibling_handle).left;
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent_handle);
                    node = self.root;
                }
            }
        }
        self.set_color(node, Color::Black);
    }
}

// ─── Order-statistics read path ──────────────────────────────────────────

impl<K> RawRbTree<K, Size> {
    #[inline]
    fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |handle| self.nodes.get(handle).augment.to_usize())
    }

    /// Zero-based selection: the key with exactly `k` keys before it.
    pub(crate) fn kth(&self, mut k: usize) -> Option<&K> {
        if k >= self.len {
            return None;
        }
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.nodes.get(handle);
            let left_size = self.size_of(node.left);
            match k.cmp(&left_size) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Some(&node.key),
                Ordering::Greater => {
                    k -= left_size + 1;
                    cursor = node.right;
                }
            }
        }
        None
    }

    /// Zero-based rank of `key`, accumulating left-subtree sizes during the
    /// search descent.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let mut cursor = self.root;
        let mut preceding = 0;
        while let Some(handle) = cursor {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cursor = node.left,
                Ordering::Greater => {
                    preceding += self.size_of(node.left) + 1;
                    cursor = node.right;
                }
                Ordering::Equal => return Some(preceding + self.size_of(node.left)),
            }
        }
        None
    }
}

// ─── Interval read path ──────────────────────────────────────────────────

impl<T: Ord + Clone> RawRbTree<Interval<T>, MaxHigh<T>> {
    /// Returns any one stored interval overlapping `query`, or `None`.
    ///
    /// Descends from the root: a node that overlaps is returned outright;
    /// otherwise go left exactly when the left subtree's maximum high
    /// endpoint reaches the query's low endpoint (if it does not, no
    /// interval on that side can overlap, and because the left side holds
    /// the smaller low endpoints, a reachable overlap can only sit right).
    pub(crate) fn search_overlap(&self, query: &Interval<T>) -> Option<&Interval<T>> {
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.nodes.get(handle);
            if node.key.overlaps(query) {
                return Some(&node.key);
            }
            cursor = if self.max_high_reaches(node.left, query.low()) {
                node.left
            } else {
                node.right
            };
        }
        None
    }

    #[inline]
    fn max_high_reaches(&self, link: Option<Handle>, low: &T) -> bool {
        link.is_some_and(|handle| {
            self.nodes.get(handle).augment.get().is_some_and(|high| high >= low)
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::fmt::Debug;
    use proptest::prelude::*;

    impl<K, A> RawRbTree<K, A>
    where
        K: Ord + Debug,
        A: Augment<K> + PartialEq + Debug,
    {
        /// Validates every tree invariant: search order, parent links, root
        /// color, no Red node with a Red child, equal black counts on every
        /// root-to-NIL path, and the augmentation equation at every node.
        /// Panics with a description of all violations found.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "empty tree should have len 0");
                return;
            };

            let mut errors: Vec<String> = Vec::new();
            if self.nodes.get(root).parent.is_some() {
                errors.push("root has a parent link".into());
            }
            if self.nodes.get(root).color != Color::Black {
                errors.push("root is not Black".into());
            }

            let mut count = 0;
            self.validate_node(root, None, None, &mut count, &mut errors);
            if count != self.len {
                errors.push(format!("len mismatch: self.len={}, counted={}", self.len, count));
            }

            assert!(errors.is_empty(), "tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the black-height of the subtree at `handle`.
        fn validate_node(
            &self,
            handle: Handle,
            low: Option<&K>,
            high: Option<&K>,
            count: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            let node = self.nodes.get(handle);
            *count += 1;

            if let Some(low) = low
                && node.key <= *low
            {
                errors.push(format!("key {:?} violates lower bound {:?}", node.key, low));
            }
            if let Some(high) = high
                && node.key >= *high
            {
                errors.push(format!("key {:?} violates upper bound {:?}", node.key, high));
            }

            for child in [node.left, node.right] {
                if let Some(child_handle) = child
                    && self.nodes.get(child_handle).parent != Some(handle)
                {
                    errors.push(format!("child of {:?} has a stale parent link", node.key));
                }
            }

            if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
                errors.push(format!("Red node {:?} has a Red child", node.key));
            }

            let nil = A::NIL;
            let left_augment = node.left.map_or(&nil, |child| &self.nodes.get(child).augment);
            let right_augment = node.right.map_or(&nil, |child| &self.nodes.get(child).augment);
            let expected = A::recompute(&node.key, left_augment, right_augment);
            if node.augment != expected {
                errors.push(format!(
                    "augment mismatch at {:?}: stored {:?}, expected {:?}",
                    node.key, node.augment, expected
                ));
            }

            let left_height = node.left.map_or(1, |child| {
                self.validate_node(child, low, Some(&node.key), count, errors)
            });
            let right_height = node.right.map_or(1, |child| {
                self.validate_node(child, Some(&node.key), high, count, errors)
            });
            if left_height != right_height {
                errors.push(format!(
                    "black-height mismatch at {:?}: left {}, right {}",
                    node.key, left_height, right_height
                ));
            }

            left_height + usize::from(node.color == Color::Black)
        }
    }

    // ─── Directed cases ──────────────────────────────────────────────────

    #[test]
    fn insert_remove_keeps_invariants() {
        let mut tree: RawRbTree<i64, Size> = RawRbTree::new();
        for key in [41, 38, 31, 12, 19, 8] {
            assert!(tree.insert(key));
            tree.validate_invariants();
        }
        assert_eq!(tree.inorder_keys(), [8, 12, 19, 31, 38, 41]);

        assert_eq!(tree.remove(&38), Some(38));
        tree.validate_invariants();
        assert_eq!(tree.inorder_keys(), [8, 12, 19, 31, 41]);

        assert_eq!(tree.remove(&38), None);
        assert_eq!(tree.inorder_keys(), [8, 12, 19, 31, 41]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut tree: RawRbTree<i64, Size> = RawRbTree::new();
        assert!(tree.insert(7));
        assert!(!tree.insert(7));
        assert_eq!(tree.len(), 1);
        tree.validate_invariants();
    }

    #[test]
    fn remove_last_node_empties_tree() {
        let mut tree: RawRbTree<i64, Size> = RawRbTree::new();
        assert!(tree.insert(1));
        assert_eq!(tree.remove(&1), Some(1));
        assert!(tree.is_empty());
        tree.validate_invariants();
        // The tree stays usable after emptying.
        assert!(tree.insert(2));
        tree.validate_invariants();
    }

    #[test]
    fn kth_and_rank_agree() {
        let mut tree: RawRbTree<i64, Size> = RawRbTree::new();
        for key in [26, 17, 41, 14, 21, 30, 47, 10, 16, 19, 28, 38, 7, 12, 20, 35, 39, 3] {
            tree.insert(key);
        }
        tree.validate_invariants();
        for k in 0..tree.len() {
            let key = *tree.kth(k).unwrap();
            assert_eq!(tree.rank_of(&key), Some(k));
        }
        assert!(tree.kth(tree.len()).is_none());
    }

    // ─── Property tests ──────────────────────────────────────────────────

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i64),
        Remove(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            5 => (-64i64..64).prop_map(Op::Insert),
            3 => (-64i64..64).prop_map(Op::Remove),
        ]
    }

    proptest! {
        /// Random op sequences against a `BTreeSet` model, validating every
        /// invariant after each mutation.
        #[test]
        fn ops_match_btreeset(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawRbTree<i64, Size> = RawRbTree::new();
            let mut model: BTreeSet<i64> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(tree.insert(key), model.insert(key));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove(&key), model.take(&key));
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let keys: Vec<i64> = model.iter().copied().collect();
            prop_assert_eq!(tree.inorder_keys(), keys);
        }

        /// Selection and rank agree with the sorted model at every position.
        #[test]
        fn order_statistics_match_sorted_model(keys in prop::collection::btree_set(-512i64..512, 0..128)) {
            let mut tree: RawRbTree<i64, Size> = RawRbTree::new();
            for &key in &keys {
                tree.insert(key);
            }

            for (k, key) in keys.iter().enumerate() {
                prop_assert_eq!(tree.kth(k), Some(key));
                prop_assert_eq!(tree.rank_of(key), Some(k));
            }
            prop_assert!(tree.kth(keys.len()).is_none());
            prop_assert!(tree.rank_of(&1000).is_none());
        }

        /// Interval trees keep their max-high augmentation consistent and
        /// report overlaps exactly when a brute-force scan finds one.
        #[test]
        fn interval_ops_match_brute_force(
            spans in prop::collection::vec((0i32..64, 0i32..64), 0..96),
            removals in prop::collection::vec(any::<prop::sample::Index>(), 0..32),
            query in (0i32..64, 0i32..64),
        ) {
            let mut tree: RawRbTree<Interval<i32>, MaxHigh<i32>> = RawRbTree::new();
            let mut model: Vec<Interval<i32>> = Vec::new();

            for &(a, b) in &spans {
                let interval = Interval::new(a, b);
                if tree.insert(interval) {
                    model.push(interval);
                }
                tree.validate_invariants();
            }

            for index in removals {
                if model.is_empty() {
                    break;
                }
                let interval = model.swap_remove(index.index(model.len()));
                prop_assert_eq!(tree.remove(&interval), Some(interval));
                tree.validate_invariants();
            }

            let query = Interval::new(query.0, query.1);
            match tree.search_overlap(&query) {
                Some(found) => {
                    prop_assert!(found.overlaps(&query));
                    prop_assert!(model.contains(found));
                }
                None => {
                    prop_assert!(model.iter().all(|interval| !interval.overlaps(&query)));
                }
            }
        }
    }
}
