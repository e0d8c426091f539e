//! IK/FK switching driven by one scalar attribute.
//!
//! `ikfkBlend` at 0 shows the FK controls and lets them orient the end joint;
//! at 1 the IK controls take over. Values in between weight both orient
//! sources on the end joint; positions are not blended.

use crate::error::Result;
use crate::scene::{AttrPath, Expression, SceneBackend, IK_BLEND};

pub const BLEND_ATTRIBUTE: &str = "ikfkBlend";

/// What the blend attribute drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendTargets {
    pub blend: AttrPath,
    pub ik_handle: String,
    pub ik_group: String,
    pub pole_group: String,
    pub fk_group: String,
    /// Orient-constraint weight of the FK end controller on the end joint.
    pub fk_weight: AttrPath,
    pub ik_end_controller: String,
    pub end_joint: String,
}

/// Result of [`wire_blend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendWiring {
    pub fk_weight: AttrPath,
    pub ik_weight: AttrPath,
    pub expressions: Vec<String>,
}

/// Values every driven attribute takes for a given blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    pub ik_handle_weight: f32,
    pub ik_visibility: f32,
    pub pole_visibility: f32,
    pub fk_visibility: f32,
    pub fk_orient_weight: f32,
    pub ik_orient_weight: f32,
}

impl BlendState {
    pub fn at(blend: f32) -> Self {
        let blend = blend.clamp(0.0, 1.0);
        Self {
            ik_handle_weight: blend,
            ik_visibility: blend,
            pole_visibility: blend,
            fk_visibility: 1.0 - blend,
            fk_orient_weight: 1.0 - blend,
            ik_orient_weight: blend,
        }
    }

    pub fn ik_visible(&self) -> bool {
        self.ik_visibility != 0.0
    }

    pub fn fk_visible(&self) -> bool {
        self.fk_visibility != 0.0
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let a = self.values();
        let b = other.values();
        a.iter().zip(b).all(|(x, y)| (x - y).abs() <= epsilon)
    }

    fn values(&self) -> [f32; 6] {
        [
            self.ik_handle_weight,
            self.ik_visibility,
            self.pole_visibility,
            self.fk_visibility,
            self.fk_orient_weight,
            self.ik_orient_weight,
        ]
    }
}

/// The live bindings from the blend attribute to each driven attribute.
pub fn blend_expressions(targets: &BlendTargets, ik_weight: &AttrPath) -> Vec<Expression> {
    let blend = &targets.blend;
    vec![
        Expression::follow(AttrPath::new(&targets.ik_handle, IK_BLEND), blend.clone()),
        Expression::follow(AttrPath::visibility(&targets.ik_group), blend.clone()),
        Expression::follow(AttrPath::visibility(&targets.pole_group), blend.clone()),
        Expression::complement(AttrPath::visibility(&targets.fk_group), blend.clone()),
        Expression::complement(targets.fk_weight.clone(), blend.clone()),
        Expression::follow(ik_weight.clone(), blend.clone()),
    ]
}

fn expression_name(expression: &Expression) -> String {
    format!("{}_{}_expr", expression.target.node, expression.target.attribute)
}

/// Adds the IK end controller as a second orient source on the end joint and
/// registers the expressions that keep everything in step with the blend.
pub fn wire_blend<B: SceneBackend + ?Sized>(
    backend: &mut B,
    targets: &BlendTargets,
) -> Result<BlendWiring> {
    let ik_weight = backend.orient_constraint(&targets.ik_end_controller, &targets.end_joint)?;

    let mut expressions = Vec::new();
    for expression in blend_expressions(targets, &ik_weight) {
        log::debug!("blend expression: {expression}");
        expressions.push(backend.create_expression(&expression_name(&expression), &expression)?);
    }

    Ok(BlendWiring {
        fk_weight: targets.fk_weight.clone(),
        ik_weight,
        expressions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Mapping;

    fn targets() -> BlendTargets {
        BlendTargets {
            blend: AttrPath::new("ac_ikfk_blend_hip", BLEND_ATTRIBUTE),
            ik_handle: "ikHandle_ankle".to_string(),
            ik_group: "ac_ik_ankle_grp".to_string(),
            pole_group: "ac_pv_ankle_grp".to_string(),
            fk_group: "ac_hip_grp".to_string(),
            fk_weight: AttrPath::new("ankle_orientConstraint1", "ac_ankleW0"),
            ik_end_controller: "ac_ik_ankle".to_string(),
            end_joint: "ankle".to_string(),
        }
    }

    #[test]
    fn every_expression_reads_the_blend() {
        let t = targets();
        let ik_weight = AttrPath::new("ankle_orientConstraint1", "ac_ik_ankleW1");
        let exprs = blend_expressions(&t, &ik_weight);
        assert_eq!(exprs.len(), 6);
        assert!(exprs.iter().all(|e| e.source == t.blend));

        let complements: Vec<_> = exprs
            .iter()
            .filter(|e| e.mapping == Mapping::Complement)
            .map(|e| e.target.to_string())
            .collect();
        assert_eq!(
            complements,
            ["ac_hip_grp.visibility", "ankle_orientConstraint1.ac_ankleW0"]
        );
    }

    #[test]
    fn blend_state_endpoints() {
        let fk = BlendState::at(0.0);
        assert!(fk.fk_visible() && !fk.ik_visible());
        assert_eq!(fk.fk_orient_weight, 1.0);
        assert_eq!(fk.ik_orient_weight, 0.0);

        let ik = BlendState::at(1.0);
        assert!(ik.ik_visible() && !ik.fk_visible());
        assert_eq!(ik.ik_handle_weight, 1.0);
        assert_eq!(ik.fk_orient_weight, 0.0);
    }

    #[test]
    fn blend_state_mixes_weights_in_between() {
        let half = BlendState::at(0.25);
        assert!(half.ik_visible() && half.fk_visible());
        assert!((half.fk_orient_weight + half.ik_orient_weight - 1.0).abs() < 1e-6);
        assert!(BlendState::at(2.0).approx_eq(&BlendState::at(1.0), 0.0));
    }
}
