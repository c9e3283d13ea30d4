//! Graph model, sentinel normalization, overlay application and layout.
//!
//! Nothing in here touches the browser.

pub mod layout;
pub mod model;
pub mod overlay;
pub mod sentinel;
pub mod style;

pub use layout::{LayoutName, LayoutStrategy, select_layout};
pub use model::{Edge, EdgeKind, Graph, Node, NodeKind, Overlay};
pub use overlay::{RenderState, VisualClass, apply};
pub use sentinel::normalize;
