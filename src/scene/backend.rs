use glam::Vec3;

use super::attribute::{AttrPath, AttrRange, Expression, VISIBILITY};
use crate::error::SceneError;

pub type SceneResult<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Joint,
    Group,
    Curve,
    Locator,
    IkHandle,
    Constraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IkSolver {
    /// Two-bone solver that keeps the bend in the plane of root, end and pole vector.
    #[default]
    RotatePlane,
}

impl IkSolver {
    pub fn host_name(self) -> &'static str {
        match self {
            IkSolver::RotatePlane => "ikRPsolver",
        }
    }
}

/// Scene-graph operations the rig builder needs from its host.
///
/// Creation methods return the name the node actually received. Calls are
/// synchronous; any error aborts the rig build that issued it.
pub trait SceneBackend {
    fn node_type(&self, node: &str) -> SceneResult<NodeType>;

    /// Direct children of `node` that are joints, in scene order.
    fn joint_children(&self, node: &str) -> SceneResult<Vec<String>>;

    /// Currently selected nodes, in selection order.
    fn selection(&self) -> Vec<String>;

    /// Degree-1 curve through `points`.
    fn create_curve(&mut self, name: &str, points: &[Vec3], closed: bool) -> SceneResult<String>;

    fn create_circle(&mut self, name: &str, normal: Vec3, radius: f32) -> SceneResult<String>;

    fn scale(&mut self, node: &str, factor: Vec3) -> SceneResult<()>;

    /// Bakes the node's current scale into its shape and resets the scale to one.
    fn freeze_transform(&mut self, node: &str) -> SceneResult<()>;

    /// Creates a new group `name` at the origin holding `children`.
    fn group(&mut self, name: &str, children: &[&str]) -> SceneResult<String>;

    /// Reparents `child` under `parent`, preserving its world transform.
    fn parent(&mut self, child: &str, parent: &str) -> SceneResult<()>;

    fn world_position(&self, node: &str) -> SceneResult<Vec3>;

    fn set_world_position(&mut self, node: &str, position: Vec3) -> SceneResult<()>;

    /// Snaps `node` to the world position and orientation of `target`.
    fn match_transform(&mut self, node: &str, target: &str) -> SceneResult<()>;

    /// Makes `target` follow the rotation of `source`. Repeated calls on the
    /// same target add sources to one constraint. Returns the weight
    /// attribute for `source`.
    fn orient_constraint(&mut self, source: &str, target: &str) -> SceneResult<AttrPath>;

    fn create_ik_handle(
        &mut self,
        name: &str,
        start_joint: &str,
        end_joint: &str,
        solver: IkSolver,
    ) -> SceneResult<String>;

    /// Solver-assigned pole vector of an IK handle. Not necessarily unit length.
    fn pole_vector(&self, handle: &str) -> SceneResult<Vec3>;

    fn create_locator(&mut self, name: &str) -> SceneResult<String>;

    fn pole_vector_constraint(&mut self, locator: &str, handle: &str) -> SceneResult<String>;

    fn add_attribute(
        &mut self,
        node: &str,
        attribute: &str,
        range: AttrRange,
        default: f32,
    ) -> SceneResult<AttrPath>;

    fn attribute(&self, path: &AttrPath) -> SceneResult<f32>;

    fn set_attribute(&mut self, path: &AttrPath, value: f32) -> SceneResult<()>;

    /// Registers a live expression that the host re-evaluates whenever its
    /// source changes.
    fn create_expression(&mut self, name: &str, expression: &Expression) -> SceneResult<String>;

    fn set_visibility(&mut self, node: &str, visible: bool) -> SceneResult<()> {
        let value = if visible { 1.0 } else { 0.0 };
        self.set_attribute(&AttrPath::new(node, VISIBILITY), value)
    }

    fn is_visible(&self, node: &str) -> SceneResult<bool> {
        Ok(self.attribute(&AttrPath::new(node, VISIBILITY))? != 0.0)
    }
}
