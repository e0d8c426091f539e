//! Controller shapes.
//!
//! Every controller is created inside a `<name>_grp` group so later snapping
//! and offsets are applied to the group and the curve keeps a clean local
//! transform.

use glam::Vec3;

use crate::error::Result;
use crate::scene::SceneBackend;

pub const GROUP_SUFFIX: &str = "_grp";

/// Unit cube outline traced as one degree-1 curve.
pub const BOX_POINTS: [Vec3; 16] = [
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, -0.5, 0.5),
];

/// Plus-sign outline in the XY plane. Used at its literal size.
pub const PLUS_POINTS: [Vec3; 12] = [
    Vec3::new(-0.5, 1.5, 0.0),
    Vec3::new(0.5, 1.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(1.5, 0.5, 0.0),
    Vec3::new(1.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.5, -1.5, 0.0),
    Vec3::new(-0.5, -1.5, 0.0),
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(-1.5, -0.5, 0.0),
    Vec3::new(-1.5, 0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
];

/// Circle controllers face down the joint's X axis.
pub const CIRCLE_NORMAL: Vec3 = Vec3::X;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Circle,
    Plus,
    /// Point locator, for controls that need no curve.
    Locator,
}

/// A drawable control and the group that offsets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    pub name: String,
    pub group: String,
    pub shape: ShapeKind,
}

pub fn group_name(name: &str) -> String {
    format!("{name}{GROUP_SUFFIX}")
}

/// Creates a controller curve of the given shape and wraps it in `<name>_grp`.
///
/// Box controllers are scaled by `size` and frozen, circles get `size` as
/// their radius, plus signs and locators ignore `size`.
pub fn create_controller<B: SceneBackend + ?Sized>(
    backend: &mut B,
    shape: ShapeKind,
    name: &str,
    size: f32,
) -> Result<Controller> {
    let name = match shape {
        ShapeKind::Box => {
            let name = backend.create_curve(name, &BOX_POINTS, true)?;
            backend.scale(&name, Vec3::splat(size))?;
            backend.freeze_transform(&name)?;
            name
        }
        ShapeKind::Circle => backend.create_circle(name, CIRCLE_NORMAL, size)?,
        ShapeKind::Plus => backend.create_curve(name, &PLUS_POINTS, true)?,
        ShapeKind::Locator => backend.create_locator(name)?,
    };
    let group = backend.group(&group_name(&name), &[name.as_str()])?;

    Ok(Controller { name, group, shape })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    #[test]
    fn group_is_named_after_controller() {
        let mut scene = MemoryScene::new();
        for (shape, name) in [
            (ShapeKind::Box, "ac_ik_wrist"),
            (ShapeKind::Circle, "ac_elbow"),
            (ShapeKind::Plus, "ac_ikfk_blend_shoulder"),
        ] {
            let ctrl = create_controller(&mut scene, shape, name, 20.0).unwrap();
            assert_eq!(ctrl.group, format!("{name}_grp"));
            assert_eq!(scene.parent_of(name), Some(ctrl.group.as_str()));
        }
    }

    #[test]
    fn box_scale_is_baked_into_points() {
        let mut scene = MemoryScene::new();
        create_controller(&mut scene, ShapeKind::Box, "box", 20.0).unwrap();

        assert!(scene.world_transform("box").unwrap().has_identity_scale());
        let points = scene.curve_points("box").unwrap();
        assert_eq!(points.len(), 16);
        for (baked, template) in points.iter().zip(BOX_POINTS) {
            assert!(baked.abs_diff_eq(template * 20.0, 1e-4));
        }
    }

    #[test]
    fn circle_radius_is_size() {
        let mut scene = MemoryScene::new();
        create_controller(&mut scene, ShapeKind::Circle, "ring", 7.5).unwrap();
        assert_eq!(scene.circle_radius("ring"), Some(7.5));
        assert!(scene.world_transform("ring").unwrap().has_identity_scale());
    }

    #[test]
    fn plus_keeps_template_size() {
        let mut scene = MemoryScene::new();
        create_controller(&mut scene, ShapeKind::Plus, "plus", 20.0).unwrap();
        assert_eq!(scene.curve_points("plus").unwrap(), &PLUS_POINTS[..]);
    }

    #[test]
    fn locator_is_grouped() {
        let mut scene = MemoryScene::new();
        let ctrl = create_controller(&mut scene, ShapeKind::Locator, "pv", 20.0).unwrap();
        assert_eq!(ctrl.group, "pv_grp");
        assert_eq!(scene.parent_of("pv"), Some("pv_grp"));
    }
}
