use super::handle::Handle;
use crate::interval::Interval;

/// Per-node bookkeeping maintained through every structural change.
///
/// `recompute` must be a pure function of the node's own key and the values
/// *currently stored* on its two children - it never recurses. The core calls
/// it bottom-up after linking a new leaf, on both endpoints of every rotation
/// (relocated child first, promoted node second), and from the lowest changed
/// node to the root after a delete splice. Extensions only ever read the
/// slot; they never bypass the core's rebalancing to write it.
pub(crate) trait Augment<K>: Sized {
    /// The value of an absent (NIL) subtree.
    const NIL: Self;

    /// Combines a node's own data with its children's stored values.
    fn recompute(key: &K, left: &Self, right: &Self) -> Self;
}

/// Subtree size for the order-statistics variant.
///
/// Backed by [`Handle`] so the niche optimization applies and the count can
/// never exceed the number of nodes an arena can address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(Handle);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ZERO: Self = Self::from_usize(0);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        Self(Handle::from_index(size))
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.to_index()
    }
}

impl<K> Augment<K> for Size {
    const NIL: Self = Size::ZERO;

    fn recompute(_key: &K, left: &Self, right: &Self) -> Self {
        // Cannot overflow Size::MAX: the arena refuses to hold more nodes.
        Size::from_usize(left.to_usize() + right.to_usize() + 1)
    }
}

/// Maximum high endpoint over a subtree, for the interval variant.
///
/// `None` is the identity (the max over an empty subtree), standing in for
/// negative infinity without requiring a bound on the endpoint type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MaxHigh<T>(Option<T>);

impl<T> MaxHigh<T> {
    pub(crate) fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T: Ord + Clone> Augment<Interval<T>> for MaxHigh<T> {
    const NIL: Self = MaxHigh(None);

    fn recompute(key: &Interval<T>, left: &Self, right: &Self) -> Self {
        let mut high = key.high();
        if let Some(left_high) = left.get()
            && left_high > high
        {
            high = left_high;
        }
        if let Some(right_high) = right.get()
            && right_high > high
        {
            high = right_high;
        }
        MaxHigh(Some(high.clone()))
    }
}
