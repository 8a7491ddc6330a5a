use thiserror::Error;

use crate::model::BinaryKind;

/// A model record that cannot be treated as a native binary of this build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("binary '{key}' has unsupported kind '{kind}'")]
    UnsupportedKind { key: String, kind: BinaryKind },
}

/// Failure to read an artifact key back into an identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("artifact key '{0}' needs the form <module>:<component>:<variant>")]
    MissingSeparators(String),
    #[error("artifact key '{0}' ends with a dangling escape")]
    DanglingEscape(String),
    #[error("artifact key '{0}' has an empty module path")]
    EmptyModulePath(String),
}
