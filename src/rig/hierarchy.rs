use glam::Vec3;

use super::blend::{BlendState, BlendWiring};
use super::shape::Controller;
use crate::error::Result;
use crate::scene::{AttrPath, SceneBackend, IK_BLEND};

/// Everything one `rig_limb` call created, rooted at `<root>_rig_grp`.
#[derive(Debug, Clone, PartialEq)]
pub struct RigHierarchy {
    pub top_group: String,
    /// Root, mid and end FK controllers.
    pub fk: [Controller; 3],
    pub ik_end: Controller,
    pub ik_handle: String,
    pub pole_vector: Controller,
    pub pole_position: Vec3,
    pub blend: Controller,
    pub blend_attribute: AttrPath,
    pub wiring: BlendWiring,
}

impl RigHierarchy {
    /// Groups parented directly under the top group.
    pub fn child_groups(&self) -> [&str; 4] {
        [
            self.fk[0].group.as_str(),
            self.ik_end.group.as_str(),
            self.pole_vector.group.as_str(),
            self.blend.group.as_str(),
        ]
    }

    pub fn fk_root(&self) -> &Controller {
        &self.fk[0]
    }

    pub fn fk_end(&self) -> &Controller {
        &self.fk[2]
    }

    pub fn set_blend<B: SceneBackend + ?Sized>(&self, backend: &mut B, value: f32) -> Result<()> {
        backend.set_attribute(&self.blend_attribute, value)?;
        Ok(())
    }

    pub fn blend<B: SceneBackend + ?Sized>(&self, backend: &B) -> Result<f32> {
        Ok(backend.attribute(&self.blend_attribute)?)
    }

    /// Reads back every attribute the blend drives, as the scene currently has them.
    pub fn read_blend_state<B: SceneBackend + ?Sized>(&self, backend: &B) -> Result<BlendState> {
        Ok(BlendState {
            ik_handle_weight: backend.attribute(&AttrPath::new(&self.ik_handle, IK_BLEND))?,
            ik_visibility: backend.attribute(&AttrPath::visibility(&self.ik_end.group))?,
            pole_visibility: backend.attribute(&AttrPath::visibility(&self.pole_vector.group))?,
            fk_visibility: backend.attribute(&AttrPath::visibility(&self.fk[0].group))?,
            fk_orient_weight: backend.attribute(&self.wiring.fk_weight)?,
            ik_orient_weight: backend.attribute(&self.wiring.ik_weight)?,
        })
    }
}
