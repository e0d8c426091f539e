use std::collections::{BTreeMap, HashMap, VecDeque};

use glam::{Mat4, Quat, Vec3};

use super::attribute::{AttrPath, AttrRange, Expression, IK_BLEND, VISIBILITY};
use super::backend::{IkSolver, NodeType, SceneBackend, SceneResult};
use crate::error::SceneError;
use crate::math::Transform;

const PROPAGATION_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Joint,
    Group,
    Curve {
        points: Vec<Vec3>,
        closed: bool,
    },
    Circle {
        normal: Vec3,
        radius: f32,
    },
    Locator,
    IkHandle {
        start: String,
        end: String,
        solver: IkSolver,
        pole_vector: Vec3,
    },
    OrientConstraint {
        target: String,
        sources: Vec<String>,
    },
    PoleVectorConstraint {
        locator: String,
        handle: String,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Joint => NodeType::Joint,
            NodeKind::Group => NodeType::Group,
            NodeKind::Curve { .. } | NodeKind::Circle { .. } => NodeType::Curve,
            NodeKind::Locator => NodeType::Locator,
            NodeKind::IkHandle { .. } => NodeType::IkHandle,
            NodeKind::OrientConstraint { .. } | NodeKind::PoleVectorConstraint { .. } => {
                NodeType::Constraint
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Attribute {
    value: f32,
    range: Option<AttrRange>,
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub local: Transform,
    attributes: BTreeMap<String, Attribute>,
}

impl SceneNode {
    fn new(kind: NodeKind, local: Transform) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            VISIBILITY.to_string(),
            Attribute {
                value: 1.0,
                range: None,
            },
        );
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            local,
            attributes,
        }
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

/// In-memory scene graph implementing [`SceneBackend`].
///
/// Keeps local transforms per node and composes them through the parent
/// chain, so groups carry their children the way a host would. Every
/// mutating call is appended to [`MemoryScene::history`].
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: HashMap<String, SceneNode>,
    selection: Vec<String>,
    expressions: Vec<(String, Expression)>,
    history: Vec<String>,
    fail_on: Option<String>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a joint at a world position, under `parent` when given.
    pub fn add_joint(&mut self, name: &str, parent: Option<&str>, position: Vec3) -> SceneResult<()> {
        self.add_joint_oriented(name, parent, position, Quat::IDENTITY)
    }

    pub fn add_joint_oriented(
        &mut self,
        name: &str,
        parent: Option<&str>,
        position: Vec3,
        rotation: Quat,
    ) -> SceneResult<()> {
        self.insert(name, NodeKind::Joint, None, Transform::IDENTITY)?;
        self.set_world_matrix(
            name,
            Transform::from_position_rotation(position, rotation).to_matrix(),
        )?;
        if let Some(parent) = parent {
            self.reparent(name, parent)?;
        }
        Ok(())
    }

    pub fn select(&mut self, nodes: &[&str]) {
        self.selection = nodes.iter().map(|n| n.to_string()).collect();
    }

    /// Makes the next call of `command` (e.g. `"ikHandle"`) fail.
    pub fn fail_on(&mut self, command: &str) {
        self.fail_on = Some(command.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.get(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.nodes.get(name)?.parent.as_deref()
    }

    pub fn children_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn world_transform(&self, name: &str) -> SceneResult<Transform> {
        Ok(Transform::from_matrix(self.world_matrix(name)?))
    }

    /// Shape points of a curve in its local space.
    pub fn curve_points(&self, name: &str) -> Option<&[Vec3]> {
        match &self.nodes.get(name)?.kind {
            NodeKind::Curve { points, .. } => Some(points),
            _ => None,
        }
    }

    pub fn circle_radius(&self, name: &str) -> Option<f32> {
        match self.nodes.get(name)?.kind {
            NodeKind::Circle { radius, .. } => Some(radius),
            _ => None,
        }
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.expressions.iter().map(|(_, e)| e)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn command(&mut self, command: &str, detail: String) -> SceneResult<()> {
        log::debug!("{command} {detail}");
        self.history.push(format!("{command} {detail}"));
        if self.fail_on.as_deref() == Some(command) {
            self.fail_on = None;
            return Err(SceneError::Command {
                command: command.to_string(),
                message: format!("scripted failure on {detail}"),
            });
        }
        Ok(())
    }

    fn get(&self, name: &str) -> SceneResult<&SceneNode> {
        self.nodes
            .get(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> SceneResult<&mut SceneNode> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    fn insert(
        &mut self,
        name: &str,
        kind: NodeKind,
        parent: Option<&str>,
        local: Transform,
    ) -> SceneResult<()> {
        if self.nodes.contains_key(name) {
            return Err(SceneError::NameCollision(name.to_string()));
        }
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.push(name.to_string());
        }
        let mut node = SceneNode::new(kind, local);
        node.parent = parent.map(str::to_string);
        self.nodes.insert(name.to_string(), node);
        Ok(())
    }

    fn world_matrix(&self, name: &str) -> SceneResult<Mat4> {
        let node = self.get(name)?;
        let local = node.local.to_matrix();
        match &node.parent {
            Some(parent) => Ok(self.world_matrix(parent)? * local),
            None => Ok(local),
        }
    }

    fn parent_matrix(&self, name: &str) -> SceneResult<Mat4> {
        match &self.get(name)?.parent {
            Some(parent) => self.world_matrix(parent),
            None => Ok(Mat4::IDENTITY),
        }
    }

    fn set_world_matrix(&mut self, name: &str, world: Mat4) -> SceneResult<()> {
        let local = self.parent_matrix(name)?.inverse() * world;
        self.get_mut(name)?.local = Transform::from_matrix(local);
        Ok(())
    }

    fn is_ancestor(&self, ancestor: &str, node: &str) -> bool {
        let mut current = self.parent_of(node);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.parent_of(name);
        }
        false
    }

    fn reparent(&mut self, child: &str, parent: &str) -> SceneResult<()> {
        self.get(parent)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Command {
                command: "parent".to_string(),
                message: format!("{parent} is a descendant of {child}"),
            });
        }
        let world = self.world_matrix(child)?;

        if let Some(old) = self.get(child)?.parent.clone() {
            self.get_mut(&old)?.children.retain(|c| c != child);
        }
        self.get_mut(parent)?.children.push(child.to_string());
        self.get_mut(child)?.parent = Some(parent.to_string());

        self.set_world_matrix(child, world)
    }

    fn read(&self, path: &AttrPath) -> SceneResult<f32> {
        self.get(&path.node)?
            .attributes
            .get(&path.attribute)
            .map(|a| a.value)
            .ok_or_else(|| SceneError::AttributeNotFound(path.to_string()))
    }

    fn write(&mut self, path: &AttrPath, value: f32) -> SceneResult<()> {
        if !value.is_finite() {
            return Err(SceneError::Command {
                command: "setAttr".to_string(),
                message: format!("{path} cannot be set to {value}"),
            });
        }
        let attr = self
            .get_mut(&path.node)?
            .attributes
            .get_mut(&path.attribute)
            .ok_or_else(|| SceneError::AttributeNotFound(path.to_string()))?;
        attr.value = match attr.range {
            Some(range) if !range.contains(value) => {
                log::warn!("{path} = {value} is outside [{}, {}], clamping", range.min, range.max);
                range.clamp(value)
            }
            _ => value,
        };
        Ok(())
    }

    /// Re-evaluates every expression downstream of `changed`.
    fn propagate(&mut self, changed: &AttrPath) -> SceneResult<()> {
        let limit = PROPAGATION_LIMIT * (self.expressions.len() + 1);
        let mut steps = 0;
        let mut queue = VecDeque::from([changed.clone()]);

        while let Some(source) = queue.pop_front() {
            let value = self.read(&source)?;
            let driven: Vec<(AttrPath, f32)> = self
                .expressions
                .iter()
                .filter(|(_, e)| e.source == source)
                .map(|(_, e)| (e.target.clone(), e.evaluate(value)))
                .collect();

            for (target, v) in driven {
                steps += 1;
                if steps > limit {
                    return Err(SceneError::ExpressionCycle(changed.to_string()));
                }
                self.write(&target, v)?;
                queue.push_back(target);
            }
        }
        Ok(())
    }

    fn attribute_snapshot(&self) -> Vec<(String, BTreeMap<String, Attribute>)> {
        self.nodes
            .iter()
            .map(|(name, node)| (name.clone(), node.attributes.clone()))
            .collect()
    }

    fn restore_attributes(&mut self, snapshot: Vec<(String, BTreeMap<String, Attribute>)>) {
        for (name, attributes) in snapshot {
            if let Some(node) = self.nodes.get_mut(&name) {
                node.attributes = attributes;
            }
        }
    }

    fn two_bone_mid(&self, start: &str, end: &str) -> SceneResult<String> {
        let mid = self
            .parent_of(end)
            .filter(|mid| self.parent_of(mid) == Some(start))
            .ok_or_else(|| SceneError::Command {
                command: "ikHandle".to_string(),
                message: format!("{end} is not two joints below {start}"),
            })?;
        Ok(mid.to_string())
    }

    fn require_joint(&self, name: &str) -> SceneResult<()> {
        match self.get(name)?.kind {
            NodeKind::Joint => Ok(()),
            _ => Err(SceneError::NotAJoint(name.to_string())),
        }
    }
}

impl SceneBackend for MemoryScene {
    fn node_type(&self, node: &str) -> SceneResult<NodeType> {
        Ok(self.get(node)?.kind.node_type())
    }

    fn joint_children(&self, node: &str) -> SceneResult<Vec<String>> {
        Ok(self
            .get(node)?
            .children
            .iter()
            .filter(|c| matches!(self.nodes.get(*c).map(|n| &n.kind), Some(NodeKind::Joint)))
            .cloned()
            .collect())
    }

    fn selection(&self) -> Vec<String> {
        self.selection.clone()
    }

    fn create_curve(&mut self, name: &str, points: &[Vec3], closed: bool) -> SceneResult<String> {
        self.command("curve", format!("-n {name} ({} points)", points.len()))?;
        self.insert(
            name,
            NodeKind::Curve {
                points: points.to_vec(),
                closed,
            },
            None,
            Transform::IDENTITY,
        )?;
        Ok(name.to_string())
    }

    fn create_circle(&mut self, name: &str, normal: Vec3, radius: f32) -> SceneResult<String> {
        self.command("circle", format!("-n {name} -r {radius}"))?;
        self.insert(
            name,
            NodeKind::Circle { normal, radius },
            None,
            Transform::IDENTITY,
        )?;
        Ok(name.to_string())
    }

    fn scale(&mut self, node: &str, factor: Vec3) -> SceneResult<()> {
        self.command("scale", format!("{node} {factor}"))?;
        self.get_mut(node)?.local.scale = factor;
        Ok(())
    }

    fn freeze_transform(&mut self, node: &str) -> SceneResult<()> {
        self.command("makeIdentity", format!("-apply {node}"))?;
        let node = self.get_mut(node)?;
        let (frozen, baked) = node.local.frozen_scale();
        node.local = frozen;
        match &mut node.kind {
            NodeKind::Curve { points, .. } => points.iter_mut().for_each(|p| *p *= baked),
            NodeKind::Circle { radius, .. } => *radius *= baked.max_element(),
            _ => {}
        }
        Ok(())
    }

    fn group(&mut self, name: &str, children: &[&str]) -> SceneResult<String> {
        self.command("group", format!("-n {name} {}", children.join(" ")))?;
        for child in children {
            self.get(child)?;
        }
        let parent = children
            .first()
            .and_then(|c| self.parent_of(c))
            .map(str::to_string);
        self.insert(name, NodeKind::Group, parent.as_deref(), Transform::IDENTITY)?;
        for child in children {
            self.reparent(child, name)?;
        }
        Ok(name.to_string())
    }

    fn parent(&mut self, child: &str, parent: &str) -> SceneResult<()> {
        self.command("parent", format!("{child} {parent}"))?;
        self.reparent(child, parent)
    }

    fn world_position(&self, node: &str) -> SceneResult<Vec3> {
        Ok(self.world_matrix(node)?.w_axis.truncate())
    }

    fn set_world_position(&mut self, node: &str, position: Vec3) -> SceneResult<()> {
        self.command("move", format!("{node} {position}"))?;
        let mut world = self.world_transform(node)?;
        world.position = position;
        self.set_world_matrix(node, world.to_matrix())
    }

    fn match_transform(&mut self, node: &str, target: &str) -> SceneResult<()> {
        self.command("matchTransform", format!("{node} {target}"))?;
        let matched = self
            .world_transform(node)?
            .matched_to(&self.world_transform(target)?);
        self.set_world_matrix(node, matched.to_matrix())
    }

    fn orient_constraint(&mut self, source: &str, target: &str) -> SceneResult<AttrPath> {
        self.command("orientConstraint", format!("{source} {target}"))?;
        self.get(source)?;
        self.get(target)?;

        let constraint = format!("{target}_orientConstraint1");
        if !self.contains(&constraint) {
            self.insert(
                &constraint,
                NodeKind::OrientConstraint {
                    target: target.to_string(),
                    sources: Vec::new(),
                },
                Some(target),
                Transform::IDENTITY,
            )?;
        }

        let node = self.get_mut(&constraint)?;
        let NodeKind::OrientConstraint { sources, .. } = &mut node.kind else {
            return Err(SceneError::NameCollision(constraint));
        };
        let index = match sources.iter().position(|s| s == source) {
            Some(index) => index,
            None => {
                sources.push(source.to_string());
                sources.len() - 1
            }
        };
        let weight = format!("{source}W{index}");
        node.attributes.entry(weight.clone()).or_insert(Attribute {
            value: 1.0,
            range: Some(AttrRange::new(0.0, f32::MAX)),
        });
        Ok(AttrPath::new(constraint, weight))
    }

    fn create_ik_handle(
        &mut self,
        name: &str,
        start_joint: &str,
        end_joint: &str,
        solver: IkSolver,
    ) -> SceneResult<String> {
        self.command(
            "ikHandle",
            format!("-n {name} -sj {start_joint} -ee {end_joint} -sol {}", solver.host_name()),
        )?;
        self.require_joint(start_joint)?;
        self.require_joint(end_joint)?;
        let mid = self.two_bone_mid(start_joint, end_joint)?;

        let root = self.world_position(start_joint)?;
        let elbow = self.world_position(&mid)?;
        let end = self.world_position(end_joint)?;
        let axis = end - root;
        let bend = elbow - root;
        let pole_vector = if axis.length_squared() > 0.0 {
            bend - axis * (bend.dot(axis) / axis.length_squared())
        } else {
            Vec3::ZERO
        };

        self.insert(
            name,
            NodeKind::IkHandle {
                start: start_joint.to_string(),
                end: end_joint.to_string(),
                solver,
                pole_vector,
            },
            None,
            Transform::from_position(end),
        )?;
        self.get_mut(name)?.attributes.insert(
            IK_BLEND.to_string(),
            Attribute {
                value: 1.0,
                range: Some(AttrRange::UNIT),
            },
        );
        Ok(name.to_string())
    }

    fn pole_vector(&self, handle: &str) -> SceneResult<Vec3> {
        match &self.get(handle)?.kind {
            NodeKind::IkHandle { pole_vector, .. } => Ok(*pole_vector),
            _ => Err(SceneError::AttributeNotFound(format!("{handle}.poleVector"))),
        }
    }

    fn create_locator(&mut self, name: &str) -> SceneResult<String> {
        self.command("spaceLocator", format!("-n {name}"))?;
        self.insert(name, NodeKind::Locator, None, Transform::IDENTITY)?;
        Ok(name.to_string())
    }

    fn pole_vector_constraint(&mut self, locator: &str, handle: &str) -> SceneResult<String> {
        self.command("poleVectorConstraint", format!("{locator} {handle}"))?;
        let target = self.world_position(locator)?;
        let start = match &self.get(handle)?.kind {
            NodeKind::IkHandle { start, .. } => start.clone(),
            _ => {
                return Err(SceneError::Command {
                    command: "poleVectorConstraint".to_string(),
                    message: format!("{handle} is not an IK handle"),
                })
            }
        };
        let root = self.world_position(&start)?;

        let name = format!("{handle}_poleVectorConstraint1");
        self.insert(
            &name,
            NodeKind::PoleVectorConstraint {
                locator: locator.to_string(),
                handle: handle.to_string(),
            },
            Some(handle),
            Transform::IDENTITY,
        )?;
        if let NodeKind::IkHandle { pole_vector, .. } = &mut self.get_mut(handle)?.kind {
            *pole_vector = target - root;
        }
        Ok(name)
    }

    fn add_attribute(
        &mut self,
        node: &str,
        attribute: &str,
        range: AttrRange,
        default: f32,
    ) -> SceneResult<AttrPath> {
        self.command(
            "addAttr",
            format!("-ln {attribute} -min {} -max {} -dv {default} {node}", range.min, range.max),
        )?;
        let path = AttrPath::new(node, attribute);
        if !range.is_valid() || !default.is_finite() {
            return Err(SceneError::Command {
                command: "addAttr".to_string(),
                message: format!(
                    "{path}: bad range [{}, {}] or default {default}",
                    range.min, range.max
                ),
            });
        }
        let node = self.get_mut(node)?;
        if node.attributes.contains_key(attribute) {
            return Err(SceneError::NameCollision(path.to_string()));
        }
        node.attributes.insert(
            attribute.to_string(),
            Attribute {
                value: range.clamp(default),
                range: Some(range),
            },
        );
        Ok(path)
    }

    fn attribute(&self, path: &AttrPath) -> SceneResult<f32> {
        self.read(path)
    }

    fn set_attribute(&mut self, path: &AttrPath, value: f32) -> SceneResult<()> {
        self.command("setAttr", format!("{path} {value}"))?;
        self.write(path, value)?;
        self.propagate(path)
    }

    fn create_expression(&mut self, name: &str, expression: &Expression) -> SceneResult<String> {
        self.command("expression", format!("-n {name} -s \"{expression}\""))?;
        if self.expressions.iter().any(|(n, _)| n == name) {
            return Err(SceneError::NameCollision(name.to_string()));
        }
        let value = self.read(&expression.source)?;
        self.read(&expression.target)?;

        let snapshot = self.attribute_snapshot();
        self.expressions.push((name.to_string(), expression.clone()));
        let applied = self
            .write(&expression.target, expression.evaluate(value))
            .and_then(|()| self.propagate(&expression.target));
        if let Err(e) = applied {
            self.expressions.pop();
            self.restore_attributes(snapshot);
            return Err(e);
        }
        Ok(name.to_string())
    }
}
