use thiserror::Error;

/// Why a candidate selection could not be turned into a joint chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("expected the root, mid and end joint of the limb, got {found} joint(s)")]
    TooFewJoints { found: usize },

    #[error("{node} is not a joint")]
    NotAJoint { node: String },

    #[error("{child} is not a child joint of {parent}")]
    NotAChild { parent: String, child: String },
}

/// Failures reported by a scene backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("a node named {0} already exists")]
    NameCollision(String),

    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("{0} is not a joint")]
    NotAJoint(String),

    #[error("expression network did not settle after writing {0}")]
    ExpressionCycle(String),

    #[error("{command} failed: {message}")]
    Command { command: String, message: String },
}

#[derive(Error, Debug)]
pub enum RigError {
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    #[error("rig joints are not set ({missing} is empty)")]
    NotInitialized { missing: &'static str },

    #[error("cannot normalize zero-length {what}")]
    DegenerateVector { what: &'static str },

    #[error("controller size must be a positive number, got {0}")]
    InvalidControllerSize(f32),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RigError>;
