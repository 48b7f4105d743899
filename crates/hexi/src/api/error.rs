//! Error types for the Hexi facade.

use crate::api::types::NodeId;
use crate::assets::resources::AssetKind;

/// Everything that can go wrong while configuring the facade, loading
/// resources or manipulating the display tree.
#[derive(thiserror::Error, Debug)]
pub enum HexiError {
    /// The configuration had no one-shot setup function.
    #[error("no setup function was supplied")]
    MissingSetup,

    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A resource lookup named something that was never loaded.
    #[error("resource `{0}` has not been loaded")]
    MissingResource(String),

    /// A resource exists but is a different kind than requested.
    #[error("resource `{name}` is {found:?}, not {expected:?}")]
    WrongKind {
        name: String,
        expected: AssetKind,
        found: AssetKind,
    },

    /// The host delivered a path the current batch never asked for.
    #[error("`{0}` is not part of the current load")]
    UnexpectedResource(String),

    /// The payload delivered for a path does not fit its file type.
    #[error("payload for `{0}` does not match its file type")]
    PayloadMismatch(String),

    /// A JSON resource failed to parse.
    #[error("invalid JSON in `{path}`: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// No node with this id exists in the scene.
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The node is not an immediate child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Parenting would put a node under itself or re-parent the stage.
    #[error("cannot add {child:?} under {parent:?}: it would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// Pivot was set on a node without an anchor (groups, lines).
    #[error("node {0:?} has no anchor to pivot around")]
    NoAnchor(NodeId),

    /// Scale mode was set on a node without a texture.
    #[error("node {0:?} has no texture")]
    NoTexture(NodeId),

    /// Diameter or radius was set on a node that is not circular.
    #[error("node {0:?} is not circular")]
    NotCircular(NodeId),
}

/// Result type for Hexi operations.
pub type Result<T> = std::result::Result<T, HexiError>;
