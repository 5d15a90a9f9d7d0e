//! Stream semantics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of data a vertex stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticKind {
    /// Vertex position
    Position,
    /// Surface normal
    Normal,
    /// Surface tangent
    Tangent,
    /// Surface bitangent
    Bitangent,
    /// Vertex color
    Color,
    /// Texture coordinate
    Texcoord,
    /// Skinning bone indices
    BoneIndices,
    /// Skinning bone weights
    BoneWeights,
    /// Anything the capture could not classify
    Unknown,
}

/// Semantic tag of a stream: kind plus index
///
/// Two streams match during conversion when their semantics are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Semantic {
    /// What the stream carries
    pub kind: SemanticKind,
    /// Distinguishes streams of the same kind (e.g. texcoord 0 and 1)
    #[serde(default)]
    pub index: u32,
}

impl Semantic {
    /// Create a semantic
    #[inline]
    #[must_use]
    pub const fn new(kind: SemanticKind, index: u32) -> Self {
        Self { kind, index }
    }

    /// Position, index 0
    #[inline]
    #[must_use]
    pub const fn position() -> Self {
        Self::new(SemanticKind::Position, 0)
    }

    /// Normal, index 0
    #[inline]
    #[must_use]
    pub const fn normal() -> Self {
        Self::new(SemanticKind::Normal, 0)
    }

    /// Color with the given index
    #[inline]
    #[must_use]
    pub const fn color(index: u32) -> Self {
        Self::new(SemanticKind::Color, index)
    }

    /// Texture coordinate with the given index
    #[inline]
    #[must_use]
    pub const fn texcoord(index: u32) -> Self {
        Self::new(SemanticKind::Texcoord, index)
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{}", self.kind, self.index)
    }
}
