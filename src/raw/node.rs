use super::handle::Handle;

/// Node color for Red-Black rebalancing.
///
/// An absent (`None`) link counts as `Black`; the accessors on
/// [`RawRbTree`](super::rbtree::RawRbTree) encode that convention so the
/// fixup loops never branch on link presence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// One tree node: an ordered key, the rebalancing color, arena links to the
/// two children and the parent, and a single augmentation slot maintained
/// bottom-up by the core.
///
/// Child links are the ownership edges (the arena frees a node only when the
/// tree unlinks it); the parent link exists purely so fixups and successor
/// walks can move upward without a stack.
pub(crate) struct RbNode<K, A> {
    pub(crate) key: K,
    pub(crate) color: Color,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
    pub(crate) augment: A,
}

impl<K, A> RbNode<K, A> {
    /// Creates the freshly attached leaf: `Red`, no children, augment already
    /// at its leaf value.
    pub(crate) fn new_leaf(key: K, parent: Option<Handle>, augment: A) -> Self {
        Self {
            key,
            color: Color::Red,
            left: None,
            right: None,
            parent,
            augment,
        }
    }
}
