use core::fmt;

/// The reasons a tree query can fail.
///
/// Every failure a caller can trigger is reported as a value; the trees never
/// panic on a missing key or an empty tree. Internal consistency violations
/// are debug assertions, not variants of this type.
///
/// # Examples
///
/// ```
/// use cardinal_tree::{OrderStatTree, TreeError};
///
/// let tree: OrderStatTree<i32> = OrderStatTree::new();
/// assert_eq!(tree.minimum(), Err(TreeError::EmptyTree));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TreeError {
    /// The operation requires at least one element, but the tree is empty.
    EmptyTree,
    /// The requested key is not stored in the tree.
    NotFound,
    /// The requested rank is outside `1..=len`.
    OutOfRange,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::EmptyTree => f.write_str("tree is empty"),
            TreeError::NotFound => f.write_str("key not found"),
            TreeError::OutOfRange => f.write_str("rank out of range"),
        }
    }
}

impl core::error::Error for TreeError {}
