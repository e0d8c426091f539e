//! Limb rig construction
//!
//! Joint chain validation, controller shapes, the IK/FK blend network and the
//! assembler that ties them into one rig.

pub mod blend;
pub mod chain;
pub mod hierarchy;
pub mod names;
pub mod rigger;
pub mod shape;

pub use blend::{wire_blend, BlendState, BlendTargets, BlendWiring, BLEND_ATTRIBUTE};
pub use chain::JointChain;
pub use hierarchy::RigHierarchy;
pub use rigger::{rig_limb, LimbRigger, LimbRiggerBuilder};
pub use shape::{create_controller, Controller, ShapeKind};
