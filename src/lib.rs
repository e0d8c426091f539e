//! # limb-rigger
//!
//! Builds an IK/FK rig for a three-joint limb (root, mid, end) through an
//! abstract scene backend.
//!
//! ## Features
//! - Joint chain validation from a selection
//! - Box, circle, plus and locator controller shapes wrapped in offset groups
//! - Two-bone rotate-plane IK with a pole-vector control placed from limb geometry
//! - A single `ikfkBlend` attribute driving visibility and orient weights live
//! - [`MemoryScene`], an in-memory backend for tests and tooling
//!
//! ## Example
//! ```rust,ignore
//! use limb_rigger::{LimbRigger, MemoryScene};
//! use glam::Vec3;
//!
//! let mut scene = MemoryScene::new();
//! scene.add_joint("joint1", None, Vec3::new(0.0, 10.0, 0.0))?;
//! scene.add_joint("joint2", Some("joint1"), Vec3::new(10.0, 10.0, -2.0))?;
//! scene.add_joint("joint3", Some("joint2"), Vec3::new(20.0, 10.0, 0.0))?;
//!
//! let mut rigger = LimbRigger::builder().controller_size(20.0).build()?;
//! rigger.set_joints(&scene, &["joint1", "joint2", "joint3"])?;
//! let rig = rigger.rig(&mut scene)?;
//!
//! rig.set_blend(&mut scene, 1.0)?; // switch to IK
//! ```

pub mod config;
pub mod error;
pub mod math;
pub mod rig;
pub mod scene;

pub use config::RigConfig;
pub use error::{Result, RigError, SceneError, SelectionError};
pub use math::Transform;
pub use rig::{
    create_controller, rig_limb, BlendState, Controller, JointChain, LimbRigger, RigHierarchy,
    ShapeKind,
};
pub use scene::{AttrPath, AttrRange, Expression, MemoryScene, SceneBackend};
