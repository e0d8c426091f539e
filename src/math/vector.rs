//! Vector helpers for placing rig controls.
//!
//! Subtraction, addition, scaling and length come straight from [`Vec3`];
//! this module adds the checked normalize and the two placement formulas.

use glam::Vec3;

use crate::error::{Result, RigError};

const EPSILON: f32 = 0.0001;

/// Normalizes `v`, failing instead of returning NaN or zero for a
/// zero-length input. `what` names the vector in the error.
pub fn normalize(v: Vec3, what: &'static str) -> Result<Vec3> {
    let len = v.length();
    if !len.is_finite() || len <= EPSILON {
        return Err(RigError::DegenerateVector { what });
    }
    Ok(v / len)
}

/// Axis from the root joint to the end joint of a limb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbAxis {
    pub vector: Vec3,
    pub length: f32,
    pub direction: Vec3,
}

impl LimbAxis {
    pub fn new(root: Vec3, end: Vec3) -> Result<Self> {
        let vector = end - root;
        let length = vector.length();
        let direction = normalize(vector, "limb vector")?;
        Ok(Self {
            vector,
            length,
            direction,
        })
    }
}

/// Pole-vector control position: `root + (pole_dir + limb_dir) * limb_length / 2`.
///
/// `pole_direction` is the solver-assigned pole vector and need not be unit
/// length; it is normalized here.
pub fn pole_vector_position(root: Vec3, end: Vec3, pole_direction: Vec3) -> Result<Vec3> {
    let pole_dir = normalize(pole_direction, "pole vector")?;
    let axis = LimbAxis::new(root, end)?;
    Ok(root + (pole_dir + axis.direction) * (axis.length / 2.0))
}

/// Blend switch position next to the root joint.
pub fn blend_control_position(root: Vec3) -> Vec3 {
    // Likely unintended: the offset is the root's own X, so the control lands
    // at twice the root's X rather than beside the limb.
    root + Vec3::new(root.x, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3_approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn normalize_rejects_zero_length() {
        let err = normalize(Vec3::ZERO, "pole vector").unwrap_err();
        assert!(matches!(err, RigError::DegenerateVector { what: "pole vector" }));
    }

    #[test]
    fn normalize_returns_unit_vector() {
        let n = normalize(Vec3::new(0.0, 3.0, 4.0), "v").unwrap();
        assert!(vec3_approx(n, Vec3::new(0.0, 0.6, 0.8)));
    }

    #[test]
    fn limb_axis_measures_root_to_end() {
        let axis = LimbAxis::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, -10.0, 0.0)).unwrap();
        assert!((axis.length - 10.0).abs() < 1e-5);
        assert!(vec3_approx(axis.direction, Vec3::NEG_Y));
        assert!(vec3_approx(axis.vector, Vec3::new(0.0, -10.0, 0.0)));
    }

    #[test]
    fn limb_axis_rejects_coincident_joints() {
        assert!(LimbAxis::new(Vec3::ONE, Vec3::ONE).is_err());
    }

    #[test]
    fn pole_vector_sits_half_a_limb_out_along_combined_direction() {
        let root = Vec3::new(0.0, 10.0, 0.0);
        let end = Vec3::new(20.0, 10.0, 0.0);
        let pole = Vec3::new(0.0, 0.0, -5.0);

        let pos = pole_vector_position(root, end, pole).unwrap();
        // (0,0,-1) + (1,0,0) scaled by 20 / 2
        assert!(vec3_approx(pos, Vec3::new(10.0, 10.0, -10.0)));
    }

    #[test]
    fn pole_vector_lies_in_bend_plane() {
        let root = Vec3::new(2.0, 5.0, -1.0);
        let end = Vec3::new(9.0, -3.0, 4.0);
        let pole = Vec3::new(0.3, 1.0, 0.2);

        let pos = pole_vector_position(root, end, pole).unwrap();
        let offset = pos - root;
        let dir = pole.normalize();
        let arm = (end - root).normalize();
        let limb_length = (end - root).length();

        let normal = dir.cross(arm);
        assert!(offset.dot(normal).abs() < 1e-3);
        let expected = limb_length / 2.0 * (dir + arm).length();
        assert!((offset.length() - expected).abs() < 1e-3);
    }

    #[test]
    fn pole_vector_needs_a_direction() {
        let err = pole_vector_position(Vec3::ZERO, Vec3::X, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, RigError::DegenerateVector { what: "pole vector" }));
    }

    #[test]
    fn blend_control_doubles_root_x() {
        let pos = blend_control_position(Vec3::new(4.0, 7.0, -2.0));
        assert_eq!(pos, Vec3::new(8.0, 7.0, -2.0));
    }
}
