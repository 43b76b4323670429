use core::borrow::Borrow;
use core::fmt;

use alloc::vec::Vec;

use crate::TreeError;
use crate::raw::{RawRbTree, Size};

/// An ordered set augmented with subtree sizes, adding O(log n) positional
/// queries to the usual search-tree operations.
///
/// Beyond `insert`/`remove`/`contains`, the size augmentation provides:
///
/// - [`select`](Self::select) - the i-th smallest key (1-based)
/// - [`rank`](Self::rank) - the 1-based position of a key in sorted order
///
/// Both hold `rank(select(i)) == i` for every `i` in `1..=len`.
///
/// Duplicate keys are rejected: inserting a key that is already present
/// returns `false` and leaves the tree untouched.
///
/// All failures a caller can trigger are reported as [`TreeError`] values or
/// `bool`/`Option` returns; no operation panics on a missing key or an empty
/// tree.
///
/// # Examples
///
/// ```
/// use cardinal_tree::OrderStatTree;
///
/// let mut tree = OrderStatTree::new();
/// for key in [26, 17, 41, 14, 21] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.select(1), Ok(&14));
/// assert_eq!(tree.rank(&26), Ok(4));
/// assert_eq!(tree.inorder(), [14, 17, 21, 26, 41]);
///
/// assert!(tree.remove(&17));
/// assert_eq!(tree.rank(&26), Ok(3));
/// ```
pub struct OrderStatTree<K> {
    raw: RawRbTree<K, Size>,
}

impl<K: Ord> OrderStatTree<K> {
    /// Creates an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::OrderStatTree;
    ///
    /// let tree: OrderStatTree<i32> = OrderStatTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawRbTree::new() }
    }

    /// Creates an empty tree with room for `capacity` keys before the node
    /// arena reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of keys the node arena can hold before
    /// reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Removes every key, releasing all nodes.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Inserts `key`, returning `false` if an equal key was already present
    /// (the tree is left untouched).
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::OrderStatTree;
    ///
    /// let mut tree = OrderStatTree::new();
    /// assert!(tree.insert(7));
    /// assert!(!tree.insert(7));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes `key`, returning `false` if it was not present. Removing an
    /// absent key leaves the tree unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::OrderStatTree;
    ///
    /// let mut tree = OrderStatTree::from([3, 1, 2]);
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.inorder(), [1, 3]);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).is_some()
    }

    /// Returns `true` if `key` is stored in the tree.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(key)
    }

    /// Returns the smallest key, or [`TreeError::EmptyTree`].
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree holds no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::{OrderStatTree, TreeError};
    ///
    /// let mut tree = OrderStatTree::new();
    /// assert_eq!(tree.minimum(), Err(TreeError::EmptyTree));
    /// tree.insert(5);
    /// assert_eq!(tree.minimum(), Ok(&5));
    /// ```
    pub fn minimum(&self) -> Result<&K, TreeError> {
        self.raw
            .min_handle()
            .map(|handle| self.raw.key(handle))
            .ok_or(TreeError::EmptyTree)
    }

    /// Returns the largest key, or [`TreeError::EmptyTree`].
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree holds no keys.
    pub fn maximum(&self) -> Result<&K, TreeError> {
        self.raw
            .max_handle()
            .map(|handle| self.raw.key(handle))
            .ok_or(TreeError::EmptyTree)
    }

    /// Returns the `rank`-th smallest key, 1-based.
    ///
    /// # Errors
    ///
    /// [`TreeError::OutOfRange`] unless `1 <= rank <= len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::{OrderStatTree, TreeError};
    ///
    /// let tree = OrderStatTree::from([30, 10, 20]);
    /// assert_eq!(tree.select(1), Ok(&10));
    /// assert_eq!(tree.select(3), Ok(&30));
    /// assert_eq!(tree.select(0), Err(TreeError::OutOfRange));
    /// assert_eq!(tree.select(4), Err(TreeError::OutOfRange));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&K, TreeError> {
        if rank == 0 {
            return Err(TreeError::OutOfRange);
        }
        self.raw.kth(rank - 1).ok_or(TreeError::OutOfRange)
    }

    /// Returns the 1-based position of `key` in sorted order.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if `key` is not stored in the tree.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::{OrderStatTree, TreeError};
    ///
    /// let tree = OrderStatTree::from([30, 10, 20]);
    /// assert_eq!(tree.rank(&20), Ok(2));
    /// assert_eq!(tree.rank(&15), Err(TreeError::NotFound));
    /// ```
    pub fn rank<Q>(&self, key: &Q) -> Result<usize, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key).map(|rank| rank + 1).ok_or(TreeError::NotFound)
    }

    /// Copies every key out in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinal_tree::OrderStatTree;
    ///
    /// let tree = OrderStatTree::from([41, 38, 31, 12, 19, 8]);
    /// assert_eq!(tree.inorder(), [8, 12, 19, 31, 38, 41]);
    /// ```
    #[must_use]
    pub fn inorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.raw.inorder_keys()
    }
}

impl<K: Ord> Default for OrderStatTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Extend<K> for OrderStatTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for OrderStatTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for OrderStatTree<K> {
    /// ```
    /// use cardinal_tree::OrderStatTree;
    ///
    /// let tree = OrderStatTree::from([3, 1, 2]);
    /// assert_eq!(tree.inorder(), [1, 2, 3]);
    /// ```
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: Ord + Clone + fmt::Debug> fmt::Debug for OrderStatTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inorder()).finish()
    }
}
