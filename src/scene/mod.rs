//! Scene backend module
//!
//! The rig builder never touches a host directly: everything goes through
//! [`SceneBackend`]. [`MemoryScene`] is a self-contained implementation used
//! by the demo and the tests.

pub mod attribute;
pub mod backend;
pub mod memory;

pub use attribute::{AttrPath, AttrRange, Expression, Mapping, IK_BLEND, VISIBILITY};
pub use backend::{IkSolver, NodeType, SceneBackend, SceneResult};
pub use memory::{MemoryScene, NodeKind, SceneNode};
