use std::fmt;

use crate::error::{Result, RigError, SelectionError};
use crate::scene::{NodeType, SceneBackend};

/// Root, mid and end joint of a limb, each a direct joint child of the one before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointChain {
    pub(crate) root: String,
    pub(crate) mid: String,
    pub(crate) end: String,
}

impl JointChain {
    /// Builds a chain without checking the scene. [`JointChain::validate`]
    /// is the checked constructor.
    pub fn new(root: impl Into<String>, mid: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            mid: mid.into(),
            end: end.into(),
        }
    }

    /// Takes the first three candidates as root, mid and end and checks the
    /// parent links against the scene. Extra candidates are ignored. The first
    /// broken link is reported.
    pub fn validate<B, S>(backend: &B, candidates: &[S]) -> Result<Self>
    where
        B: SceneBackend + ?Sized,
        S: AsRef<str>,
    {
        let [root, mid, end, ..] = candidates else {
            return Err(SelectionError::TooFewJoints {
                found: candidates.len(),
            }
            .into());
        };
        let (root, mid, end) = (root.as_ref(), mid.as_ref(), end.as_ref());

        if backend.node_type(root)? != NodeType::Joint {
            return Err(SelectionError::NotAJoint {
                node: root.to_string(),
            }
            .into());
        }
        Self::require_child(backend, root, mid)?;
        Self::require_child(backend, mid, end)?;

        Ok(Self::new(root, mid, end))
    }

    fn require_child<B: SceneBackend + ?Sized>(backend: &B, parent: &str, child: &str) -> Result<()> {
        if backend.joint_children(parent)?.iter().any(|c| c == child) {
            Ok(())
        } else {
            Err(SelectionError::NotAChild {
                parent: parent.to_string(),
                child: child.to_string(),
            }
            .into())
        }
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        for (member, name) in [("root", &self.root), ("mid", &self.mid), ("end", &self.end)] {
            if name.is_empty() {
                return Err(RigError::NotInitialized { missing: member });
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn mid(&self) -> &str {
        &self.mid
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn joints(&self) -> [&str; 3] {
        [&self.root, &self.mid, &self.end]
    }
}

impl fmt::Display for JointChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.root, self.mid, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryScene, SceneBackend};
    use glam::Vec3;

    fn leg() -> MemoryScene {
        let mut scene = MemoryScene::new();
        scene.add_joint("hip", None, Vec3::new(0.0, 10.0, 0.0)).unwrap();
        scene.add_joint("knee", Some("hip"), Vec3::new(0.0, 5.0, 1.0)).unwrap();
        scene.add_joint("ankle", Some("knee"), Vec3::ZERO).unwrap();
        scene.add_joint("toe", Some("ankle"), Vec3::new(0.0, 0.0, 2.0)).unwrap();
        scene
    }

    #[test]
    fn valid_chain_is_returned_as_selected() {
        let scene = leg();
        let chain = JointChain::validate(&scene, &["hip", "knee", "ankle"]).unwrap();
        assert_eq!(chain, JointChain::new("hip", "knee", "ankle"));
        assert_eq!(chain.to_string(), "hip,knee,ankle");
    }

    #[test]
    fn extra_candidates_are_ignored() {
        let scene = leg();
        let chain = JointChain::validate(&scene, &["knee", "ankle", "toe", "hip"]).unwrap();
        assert_eq!(chain.joints(), ["knee", "ankle", "toe"]);
    }

    #[test]
    fn short_selection_is_rejected() {
        let scene = leg();
        for selection in [&[][..], &["hip"][..], &["hip", "knee"][..]] {
            let err = JointChain::validate(&scene, selection).unwrap_err();
            assert!(matches!(
                err,
                RigError::InvalidSelection(SelectionError::TooFewJoints { found }) if found == selection.len()
            ));
        }
    }

    #[test]
    fn mid_must_be_child_of_root() {
        let scene = leg();
        // end is valid or invalid, the root/mid link fails first either way
        for end in ["ankle", "hip"] {
            let err = JointChain::validate(&scene, &["hip", "ankle", end]).unwrap_err();
            match err {
                RigError::InvalidSelection(SelectionError::NotAChild { parent, child }) => {
                    assert_eq!(parent, "hip");
                    assert_eq!(child, "ankle");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn end_must_be_child_of_mid() {
        let scene = leg();
        let err = JointChain::validate(&scene, &["hip", "knee", "toe"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid selection: toe is not a child joint of knee");
    }

    #[test]
    fn root_must_be_a_joint() {
        let mut scene = MemoryScene::new();
        scene.create_locator("grp").unwrap();
        scene.add_joint("j1", Some("grp"), Vec3::ZERO).unwrap();
        scene.add_joint("j2", Some("j1"), Vec3::X).unwrap();

        let err = JointChain::validate(&scene, &["grp", "j1", "j2"]).unwrap_err();
        assert!(matches!(
            err,
            RigError::InvalidSelection(SelectionError::NotAJoint { ref node }) if node == "grp"
        ));
        assert_eq!(err.to_string(), "invalid selection: grp is not a joint");
    }

    #[test]
    fn empty_member_is_not_initialized() {
        let err = JointChain::new("hip", "", "ankle").ensure_initialized().unwrap_err();
        assert!(matches!(err, RigError::NotInitialized { missing: "mid" }));
        assert!(JointChain::new("a", "b", "c").ensure_initialized().is_ok());
    }
}
