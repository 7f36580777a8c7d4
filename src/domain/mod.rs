//! Domain layer: component trees and visitors
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod notation;
pub mod parser;
pub mod render;
pub mod visitor;
pub mod visitors;

pub use arena::{ComponentTree, Container, Leaf, NodeId, NodeKind, TreeNode};
pub use builder::{Shape, TreeBuilder};
pub use error::{DomainError, TreeResult};
pub use notation::Notation;
pub use parser::{parse_shape, MAX_NESTING};
pub use render::{TreeNodeConvert, MAX_RENDER_DEPTH};
pub use visitor::{visit_all, Accept, Visitor, Walk};
pub use visitors::{Annotator, Dispatch, DispatchLog, NotationWriter, ShapeStats, Variant};
