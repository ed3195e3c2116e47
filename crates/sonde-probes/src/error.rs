//! Error types for probe loading and lifecycle operations.

use crate::post::Phase;
use sonde_mesh::MeshError;
use std::error::Error;
use std::fmt;

/// Configuration errors raised while loading a `data_probes` section.
///
/// All variants are fatal at load time and abort startup; there is no
/// partial or best-effort parsing. Each message names the offending key
/// so the user can fix the input directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A required key is absent.
    MissingKey {
        /// The enclosing document node.
        context: &'static str,
        /// The missing key.
        key: &'static str,
    },
    /// A key that must hold a sequence holds something else.
    NotASequence {
        /// The offending key.
        key: &'static str,
    },
    /// A key holds a scalar of the wrong type.
    BadScalar {
        /// The enclosing document node.
        context: &'static str,
        /// The offending key.
        key: &'static str,
    },
    /// The `specifications` sequence is present but empty.
    EmptySpecifications,
    /// A specification carries no `line_of_site_specifications`;
    /// no other probe kind is supported.
    UnsupportedProbeKind {
        /// Name of the offending specification.
        spec: String,
    },
    /// A probe requested fewer than two sample points.
    TooFewPoints {
        /// Name of the offending probe.
        probe: String,
        /// The configured point count.
        points: u64,
    },
    /// Tip or tail coordinates are malformed.
    BadCoordinates {
        /// Name of the offending probe.
        probe: String,
        /// The offending key (`tip_coordinates` or `tail_coordinates`).
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// `output_frequency` is zero; sampling every `0` steps is undefined.
    ZeroOutputFrequency,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { context, key } => {
                write!(f, "{context}: required key '{key}' is missing")
            }
            Self::NotASequence { key } => {
                write!(f, "'{key}' must be a sequence")
            }
            Self::BadScalar { context, key } => {
                write!(f, "{context}: '{key}' has the wrong type")
            }
            Self::EmptySpecifications => {
                write!(f, "data_probes: 'specifications' is empty")
            }
            Self::UnsupportedProbeKind { spec } => write!(
                f,
                "specification '{spec}': only line_of_site_specifications are supported"
            ),
            Self::TooFewPoints { probe, points } => write!(
                f,
                "probe '{probe}': number_of_points must be at least 2, got {points}"
            ),
            Self::BadCoordinates { probe, key, reason } => {
                write!(f, "probe '{probe}': '{key}' is invalid: {reason}")
            }
            Self::ZeroOutputFrequency => {
                write!(f, "data_probes: output_frequency must be at least 1")
            }
        }
    }
}

impl Error for LoadError {}

/// Errors raised by the probe lifecycle operations.
///
/// These surface synchronously to the driver; nothing is retried, and
/// a lifecycle violation or mesh failure leaves the run unrecoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// A lifecycle operation was invoked out of order.
    Lifecycle {
        /// The operation that was attempted.
        operation: &'static str,
        /// The phase the operation requires.
        expected: Phase,
        /// The phase the probes are actually in.
        actual: Phase,
    },
    /// The mesh seam rejected an operation.
    Mesh(MeshError),
    /// The coordinate field is not registered on the mesh.
    MissingCoordinates,
    /// A probe part handle is absent where the declare phase should
    /// have stored one.
    PartNotDeclared {
        /// Name of the offending probe.
        probe: String,
    },
    /// A probe's endpoint coordinates carry fewer components than the
    /// mesh's spatial dimension.
    CoordinateDim {
        /// Name of the offending probe.
        probe: String,
        /// Components available in the configured endpoints.
        have: usize,
        /// Components the mesh requires.
        need: usize,
    },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifecycle {
                operation,
                expected,
                actual,
            } => write!(
                f,
                "{operation} requires phase {expected}, but probes are {actual}"
            ),
            Self::Mesh(e) => write!(f, "mesh operation failed: {e}"),
            Self::MissingCoordinates => {
                write!(f, "coordinate field is not registered on the mesh")
            }
            Self::PartNotDeclared { probe } => {
                write!(f, "probe '{probe}' has no declared part")
            }
            Self::CoordinateDim { probe, have, need } => write!(
                f,
                "probe '{probe}': endpoints carry {have} components, mesh needs {need}"
            ),
        }
    }
}

impl Error for ProbeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for ProbeError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}
