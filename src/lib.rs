//! Composable component trees with type-directed visitor traversal.
//!
//! A [`domain::ComponentTree`] stores leaves and containers in an arena;
//! containers own ordered children and aggregate their results. Operations
//! over the tree are written as [`domain::Visitor`]s, dispatched by each
//! node's variant.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
