//! Content module - item records, response normalization and static data

mod item;
mod kind;
pub mod loader;
mod normalize;

pub use item::{field, Item, OTHER_CATEGORY};
pub use kind::ContentKind;
pub use normalize::normalize;
