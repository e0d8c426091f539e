use super::blend::{wire_blend, BlendTargets, BLEND_ATTRIBUTE};
use super::chain::JointChain;
use super::hierarchy::RigHierarchy;
use super::names;
use super::shape::{create_controller, Controller, ShapeKind};
use crate::config::{validate_controller_size, RigConfig};
use crate::error::{Result, RigError};
use crate::math::{blend_control_position, pole_vector_position};
use crate::scene::{AttrPath, AttrRange, IkSolver, NodeType, SceneBackend};

struct FkControl {
    controller: Controller,
    weight: AttrPath,
}

/// Circle controller snapped to `joint`, driving its rotation.
fn fk_control<B: SceneBackend + ?Sized>(backend: &mut B, joint: &str, size: f32) -> Result<FkControl> {
    let controller = create_controller(backend, ShapeKind::Circle, &names::fk_control(joint), size)?;
    backend.match_transform(&controller.group, joint)?;
    let weight = backend.orient_constraint(&controller.name, joint)?;
    Ok(FkControl { controller, weight })
}

/// Builds the FK chain, IK handle, pole-vector control and blend switch for
/// `chain` and groups them under `<root>_rig_grp`.
///
/// Steps run in order and are not retried. A backend failure aborts the build
/// and leaves whatever was already created in the scene. Running this twice
/// on the same chain collides on names; the backend decides what happens.
pub fn rig_limb<B: SceneBackend + ?Sized>(
    backend: &mut B,
    chain: &JointChain,
    config: &RigConfig,
) -> Result<RigHierarchy> {
    chain.ensure_initialized()?;
    config.validate()?;
    let size = config.controller_size;
    let (root, mid, end) = (chain.root(), chain.mid(), chain.end());
    log::info!("Rigging limb with {root}, {mid}, {end}");

    let root_fk = fk_control(backend, root, size)?;
    let mid_fk = fk_control(backend, mid, size)?;
    let end_fk = fk_control(backend, end, size)?;
    backend.parent(&mid_fk.controller.group, &root_fk.controller.name)?;
    backend.parent(&end_fk.controller.group, &mid_fk.controller.name)?;
    log::debug!("FK chain built from {}", root_fk.controller.name);

    let ik_end = create_controller(backend, ShapeKind::Box, &names::ik_control(end), size)?;
    backend.match_transform(&ik_end.group, end)?;

    let root_pos = backend.world_position(root)?;
    let end_pos = backend.world_position(end)?;
    let ik_handle =
        backend.create_ik_handle(&names::ik_handle(end), root, end, IkSolver::RotatePlane)?;
    let pole_direction = backend.pole_vector(&ik_handle)?;

    let pole_position = pole_vector_position(root_pos, end_pos, pole_direction)?;
    log::debug!("pole vector {pole_direction} placed at {pole_position}");

    let pole_vector =
        create_controller(backend, ShapeKind::Locator, &names::pole_control(end), size)?;
    backend.set_world_position(&pole_vector.group, pole_position)?;
    backend.pole_vector_constraint(&pole_vector.name, &ik_handle)?;

    let blend = create_controller(backend, ShapeKind::Plus, &names::blend_control(root), size)?;
    backend.set_world_position(&blend.group, blend_control_position(root_pos))?;
    let blend_attribute = backend.add_attribute(
        &blend.name,
        BLEND_ATTRIBUTE,
        AttrRange::UNIT,
        config.initial_blend,
    )?;

    let wiring = wire_blend(
        backend,
        &BlendTargets {
            blend: blend_attribute.clone(),
            ik_handle: ik_handle.clone(),
            ik_group: ik_end.group.clone(),
            pole_group: pole_vector.group.clone(),
            fk_group: root_fk.controller.group.clone(),
            fk_weight: end_fk.weight,
            ik_end_controller: ik_end.name.clone(),
            end_joint: end.to_string(),
        },
    )?;

    backend.parent(&ik_handle, &ik_end.name)?;
    if config.hide_ik_handle {
        backend.set_visibility(&ik_handle, false)?;
    }

    let top_group = backend.group(
        &names::rig_group(root),
        &[
            root_fk.controller.group.as_str(),
            ik_end.group.as_str(),
            pole_vector.group.as_str(),
            blend.group.as_str(),
        ],
    )?;
    log::info!("Limb rig {top_group} complete");

    Ok(RigHierarchy {
        top_group,
        fk: [root_fk.controller, mid_fk.controller, end_fk.controller],
        ik_end,
        ik_handle,
        pole_vector,
        pole_position,
        blend,
        blend_attribute,
        wiring,
    })
}

/// A rigging session: a validated joint chain plus the settings to rig it with.
#[derive(Debug, Clone, Default)]
pub struct LimbRigger {
    chain: Option<JointChain>,
    config: RigConfig,
}

impl LimbRigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> LimbRiggerBuilder {
        LimbRiggerBuilder::new()
    }

    pub fn from_config(config: RigConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chain: None,
            config,
        })
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn chain(&self) -> Option<&JointChain> {
        self.chain.as_ref()
    }

    pub fn controller_size(&self) -> f32 {
        self.config.controller_size
    }

    pub fn set_controller_size(&mut self, size: f32) -> Result<()> {
        validate_controller_size(size)?;
        self.config.controller_size = size;
        Ok(())
    }

    /// Validates `candidates` as root, mid, end and keeps the chain. On
    /// failure the previously set chain is kept.
    pub fn set_joints<B, S>(&mut self, backend: &B, candidates: &[S]) -> Result<&JointChain>
    where
        B: SceneBackend + ?Sized,
        S: AsRef<str>,
    {
        let chain = JointChain::validate(backend, candidates)?;
        log::debug!("joints set to {chain}");
        Ok(&*self.chain.insert(chain))
    }

    /// Like [`LimbRigger::set_joints`] with the backend's current selection,
    /// skipping anything that is not a joint.
    pub fn set_joints_from_selection<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&JointChain> {
        let mut joints = Vec::new();
        for node in backend.selection() {
            if backend.node_type(&node)? == NodeType::Joint {
                joints.push(node);
            }
        }
        self.set_joints(backend, joints.as_slice())
    }

    pub fn rig<B: SceneBackend + ?Sized>(&self, backend: &mut B) -> Result<RigHierarchy> {
        let chain = self
            .chain
            .as_ref()
            .ok_or(RigError::NotInitialized { missing: "chain" })?;
        rig_limb(backend, chain, &self.config)
    }
}

pub struct LimbRiggerBuilder {
    config: RigConfig,
}

impl LimbRiggerBuilder {
    pub fn new() -> Self {
        Self {
            config: RigConfig::default(),
        }
    }

    pub fn controller_size(mut self, size: f32) -> Self {
        self.config.controller_size = size;
        self
    }

    pub fn initial_blend(mut self, blend: f32) -> Self {
        self.config.initial_blend = blend;
        self
    }

    pub fn hide_ik_handle(mut self, hide: bool) -> Self {
        self.config.hide_ik_handle = hide;
        self
    }

    pub fn build(self) -> Result<LimbRigger> {
        LimbRigger::from_config(self.config)
    }
}

impl Default for LimbRiggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use glam::Vec3;

    fn arm() -> MemoryScene {
        let mut scene = MemoryScene::new();
        scene.add_joint("shoulder", None, Vec3::new(5.0, 20.0, 0.0)).unwrap();
        scene
            .add_joint("elbow", Some("shoulder"), Vec3::new(15.0, 20.0, -2.0))
            .unwrap();
        scene
            .add_joint("wrist", Some("elbow"), Vec3::new(25.0, 20.0, 0.0))
            .unwrap();
        scene
    }

    #[test]
    fn rig_without_joints_is_not_initialized() {
        let mut scene = arm();
        let err = LimbRigger::new().rig(&mut scene).unwrap_err();
        assert!(matches!(err, RigError::NotInitialized { missing: "chain" }));
        assert_eq!(scene.history().len(), 0);
    }

    #[test]
    fn empty_chain_member_fails_before_touching_scene() {
        let mut scene = arm();
        let chain = JointChain::new("shoulder", "elbow", "");
        let err = rig_limb(&mut scene, &chain, &RigConfig::default()).unwrap_err();
        assert!(matches!(err, RigError::NotInitialized { missing: "end" }));
        assert!(scene.history().is_empty());
    }

    #[test]
    fn selection_skips_non_joints() {
        let mut scene = arm();
        scene.create_locator("loc").unwrap();
        scene.select(&["loc", "shoulder", "elbow", "wrist"]);

        let mut rigger = LimbRigger::new();
        let chain = rigger.set_joints_from_selection(&scene).unwrap();
        assert_eq!(chain.to_string(), "shoulder,elbow,wrist");
    }

    #[test]
    fn failed_selection_keeps_previous_chain() {
        let scene = arm();
        let mut rigger = LimbRigger::new();
        rigger.set_joints(&scene, &["shoulder", "elbow", "wrist"]).unwrap();
        assert!(rigger.set_joints(&scene, &["wrist", "elbow", "shoulder"]).is_err());
        assert_eq!(rigger.chain().map(JointChain::root), Some("shoulder"));
    }

    #[test]
    fn controller_size_must_be_positive() {
        let mut rigger = LimbRigger::new();
        assert!(rigger.set_controller_size(-1.0).is_err());
        assert!(rigger.set_controller_size(f32::NAN).is_err());
        rigger.set_controller_size(35.0).unwrap();
        assert_eq!(rigger.controller_size(), 35.0);
        assert!(LimbRigger::builder().controller_size(0.0).build().is_err());
    }

    #[test]
    fn fk_controllers_nest_under_parent_controllers() {
        let mut scene = arm();
        let rig = rig_limb(
            &mut scene,
            &JointChain::new("shoulder", "elbow", "wrist"),
            &RigConfig::default(),
        )
        .unwrap();

        assert_eq!(scene.parent_of("ac_elbow_grp"), Some("ac_shoulder"));
        assert_eq!(scene.parent_of("ac_wrist_grp"), Some("ac_elbow"));
        assert_eq!(rig.fk_end().name, "ac_wrist");

        let elbow_ctrl = scene.world_position("ac_elbow").unwrap();
        assert!(elbow_ctrl.abs_diff_eq(Vec3::new(15.0, 20.0, -2.0), 1e-3));
    }

    #[test]
    fn ik_handle_visibility_follows_config() {
        let mut scene = arm();
        let mut rigger = LimbRigger::builder().hide_ik_handle(false).build().unwrap();
        rigger.set_joints(&scene, &["shoulder", "elbow", "wrist"]).unwrap();
        let rig = rigger.rig(&mut scene).unwrap();
        assert!(scene.is_visible(&rig.ik_handle).unwrap());
    }
}
