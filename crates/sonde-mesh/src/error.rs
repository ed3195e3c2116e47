//! Error types for mesh registry and entity operations.

use crate::id::{EntityRank, FieldId, PartId};
use std::fmt;

/// Errors arising from mesh registry or entity operations.
///
/// These are integration errors: the probe module drives the mesh seam
/// through a fixed two-phase protocol, so any of these surfacing at
/// runtime means a caller broke the protocol or the configuration asked
/// for something the registry cannot satisfy. None are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A field was redeclared with a different component count.
    FieldSizeMismatch {
        /// Field name as registered.
        name: String,
        /// Component count of the existing declaration.
        existing: u32,
        /// Component count of the conflicting declaration.
        requested: u32,
    },
    /// A part was redeclared with a different entity rank.
    PartRankMismatch {
        /// Part name as registered.
        name: String,
        /// Entity rank of the existing declaration.
        existing: EntityRank,
        /// Entity rank of the conflicting declaration.
        requested: EntityRank,
    },
    /// An operation referenced a part ID the registry does not know.
    UnknownPart {
        /// The offending part ID.
        part: PartId,
    },
    /// An operation referenced a field ID the registry does not know.
    UnknownField {
        /// The offending field ID.
        field: FieldId,
    },
    /// A registry operation was attempted after mesh finalization.
    Finalized {
        /// The operation that was attempted.
        operation: &'static str,
    },
    /// A bulk operation was attempted before mesh finalization.
    NotFinalized {
        /// The operation that was attempted.
        operation: &'static str,
    },
    /// Modification brackets were nested or unbalanced.
    ModificationState {
        /// What went wrong with the bracketing.
        reason: &'static str,
    },
    /// An entity was declared outside a modification bracket.
    OutsideModification,
    /// The identifier generator cannot satisfy the request.
    IdExhaustion {
        /// Entity rank of the exhausted identifier pool.
        rank: EntityRank,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldSizeMismatch {
                name,
                existing,
                requested,
            } => write!(
                f,
                "field '{name}' already declared with {existing} components, requested {requested}"
            ),
            Self::PartRankMismatch {
                name,
                existing,
                requested,
            } => write!(
                f,
                "part '{name}' already declared with rank {existing}, requested {requested}"
            ),
            Self::UnknownPart { part } => write!(f, "unknown part {part}"),
            Self::UnknownField { field } => write!(f, "unknown field {field}"),
            Self::Finalized { operation } => {
                write!(f, "{operation} attempted after mesh finalization")
            }
            Self::NotFinalized { operation } => {
                write!(f, "{operation} attempted before mesh finalization")
            }
            Self::ModificationState { reason } => {
                write!(f, "modification bracket misuse: {reason}")
            }
            Self::OutsideModification => {
                write!(f, "entity declared outside a modification bracket")
            }
            Self::IdExhaustion { rank } => {
                write!(f, "identifier pool exhausted for rank {rank}")
            }
        }
    }
}

impl std::error::Error for MeshError {}
