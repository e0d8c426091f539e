use std::fmt;

/// Name of the per-node visibility attribute. Nonzero means visible.
pub const VISIBILITY: &str = "visibility";

/// Name of an IK handle's IK/FK weight attribute.
pub const IK_BLEND: &str = "ikBlend";

/// Address of a scalar attribute on a scene node, displayed as `node.attribute`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrPath {
    pub node: String,
    pub attribute: String,
}

impl AttrPath {
    pub fn new(node: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            attribute: attribute.into(),
        }
    }

    pub fn visibility(node: impl Into<String>) -> Self {
        Self::new(node, VISIBILITY)
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.attribute)
    }
}

/// Inclusive bounds of a user-added attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrRange {
    pub min: f32,
    pub max: f32,
}

impl AttrRange {
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// False for reversed or NaN bounds, which [`AttrRange::clamp`] cannot use.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How an expression derives its target from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// `target = source`
    Identity,
    /// `target = 1 - source`
    Complement,
}

impl Mapping {
    pub fn apply(self, source: f32) -> f32 {
        match self {
            Mapping::Identity => source,
            Mapping::Complement => 1.0 - source,
        }
    }
}

/// A live one-way binding of one attribute to a function of another.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub target: AttrPath,
    pub source: AttrPath,
    pub mapping: Mapping,
}

impl Expression {
    pub fn follow(target: AttrPath, source: AttrPath) -> Self {
        Self {
            target,
            source,
            mapping: Mapping::Identity,
        }
    }

    pub fn complement(target: AttrPath, source: AttrPath) -> Self {
        Self {
            target,
            source,
            mapping: Mapping::Complement,
        }
    }

    pub fn evaluate(&self, source_value: f32) -> f32 {
        self.mapping.apply(source_value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mapping {
            Mapping::Identity => write!(f, "{} = {};", self.target, self.source),
            Mapping::Complement => write!(f, "{} = 1 - {};", self.target, self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_text_matches_host_syntax() {
        let blend = AttrPath::new("ac_ikfk_blend_joint1", "ikfkBlend");
        let fk = Expression::complement(AttrPath::visibility("ac_joint1_grp"), blend.clone());
        let ik = Expression::follow(AttrPath::new("ikHandle_joint3", IK_BLEND), blend);

        assert_eq!(
            fk.to_string(),
            "ac_joint1_grp.visibility = 1 - ac_ikfk_blend_joint1.ikfkBlend;"
        );
        assert_eq!(
            ik.to_string(),
            "ikHandle_joint3.ikBlend = ac_ikfk_blend_joint1.ikfkBlend;"
        );
    }

    #[test]
    fn complement_mirrors_source() {
        let e = Expression::complement(AttrPath::new("a", "x"), AttrPath::new("b", "y"));
        assert_eq!(e.evaluate(0.0), 1.0);
        assert_eq!(e.evaluate(1.0), 0.0);
        assert!((e.evaluate(0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn unit_range_clamps() {
        assert_eq!(AttrRange::UNIT.clamp(1.5), 1.0);
        assert_eq!(AttrRange::UNIT.clamp(-0.5), 0.0);
        assert!(AttrRange::UNIT.contains(0.5));
    }
}
