mod arena;
mod augment;
mod handle;
mod node;
mod rbtree;

pub(crate) use augment::{MaxHigh, Size};
pub(crate) use rbtree::RawRbTree;
