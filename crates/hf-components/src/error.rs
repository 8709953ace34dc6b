//! Error types for catalog lookups and preset construction.

use hf_core::error::HfError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Unknown hose kind: {kind}")]
    UnknownHose { kind: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<HfError> for ComponentError {
    fn from(e: HfError) -> Self {
        match e {
            HfError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            HfError::InvalidArg { what } => ComponentError::InvalidArg { what },
        }
    }
}

impl From<ComponentError> for HfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::UnknownHose { .. } => HfError::InvalidArg {
                what: "unknown hose kind",
            },
            ComponentError::NonPhysical { what } => HfError::InvalidArg { what },
            ComponentError::InvalidArg { what } => HfError::InvalidArg { what },
        }
    }
}
