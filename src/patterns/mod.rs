//! Built-in pattern families
//!
//! Each family module provides its pattern, its factory and a `register`
//! function. [`register_all`] is the single place that decides registration
//! order.

pub mod one_sided_and_tree;

pub use one_sided_and_tree::{OneSidedAndTree, OneSidedAndTreeFactory};

use crate::registry::PatternRegistry;

pub fn register_all(registry: &mut PatternRegistry) {
    one_sided_and_tree::register(registry);
}
