use thiserror::Error;

use crate::validation::SecurityError;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse world seed {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: SecurityError,
    },

    #[error("{kind} '{id}' referenced by '{referenced_by}' does not exist")]
    Dangling {
        kind: &'static str,
        id: String,
        referenced_by: String,
    },

    #[error("duplicate id '{0}' in world seed")]
    DuplicateId(String),
}
