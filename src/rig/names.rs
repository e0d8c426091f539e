//! Scene names of generated rig nodes, derived from joint names.

pub const CONTROL_PREFIX: &str = "ac_";
pub const IK_CONTROL_PREFIX: &str = "ac_ik_";
pub const POLE_CONTROL_PREFIX: &str = "ac_pv_";
pub const BLEND_CONTROL_PREFIX: &str = "ac_ikfk_blend_";
pub const IK_HANDLE_PREFIX: &str = "ikHandle_";
pub const RIG_GROUP_SUFFIX: &str = "_rig_grp";

pub fn fk_control(joint: &str) -> String {
    format!("{CONTROL_PREFIX}{joint}")
}

pub fn ik_control(end: &str) -> String {
    format!("{IK_CONTROL_PREFIX}{end}")
}

pub fn pole_control(end: &str) -> String {
    format!("{POLE_CONTROL_PREFIX}{end}")
}

pub fn blend_control(root: &str) -> String {
    format!("{BLEND_CONTROL_PREFIX}{root}")
}

pub fn ik_handle(end: &str) -> String {
    format!("{IK_HANDLE_PREFIX}{end}")
}

pub fn rig_group(root: &str) -> String {
    format!("{root}{RIG_GROUP_SUFFIX}")
}
