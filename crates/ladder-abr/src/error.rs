#![forbid(unsafe_code)]

use thiserror::Error;

use crate::ProgramId;

/// Variant selection errors.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum AbrError {
    #[error("Variants span multiple programs: expected {expected}, found {found}")]
    MixedProgramIds {
        expected: ProgramId,
        found: ProgramId,
    },
}

pub type AbrResult<T> = Result<T, AbrError>;
