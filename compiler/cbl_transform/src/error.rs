use cbl_ir::Locality;

/// Why an edit was rejected.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InvalidReason {
    /// No document in the transformation has the locality's URI.
    UnknownDocument,
    /// The span is out of bounds or splits a character.
    OutOfBounds,
    /// The span overlaps text already consumed by an earlier edit.
    AlreadyConsumed,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::UnknownDocument => f.write_str("unknown document"),
            InvalidReason::OutOfBounds => f.write_str("span out of bounds"),
            InvalidReason::AlreadyConsumed => f.write_str("span already consumed"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum TransformError {
    #[error("invalid locality {locality} ({reason})")]
    InvalidLocality {
        locality: Locality,
        reason: InvalidReason,
    },
}

impl TransformError {
    pub fn locality(&self) -> &Locality {
        match self {
            TransformError::InvalidLocality { locality, .. } => locality,
        }
    }
}
