//! Typed failure kinds raised while packing containers and disc images.
//!
//! Everything above this module propagates with [`anyhow`] and attaches
//! context (table, asset, level, disc region) on the way up. The typed
//! kinds stay reachable through `anyhow::Error::downcast_ref`.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    /// A caller-supplied identity or name field has the wrong length.
    #[error("{field} was {len} bytes, expected {expected}")]
    Validation {
        field: &'static str,
        len: usize,
        expected: &'static str,
    },

    /// An input file could not be read.
    #[error("failed to read \"{}\"", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The encoder met data it cannot resolve. This is a defect in the
    /// input graph, never a recoverable condition.
    #[error("{0}")]
    Encoding(String),

    /// A table or offset outgrew the width of its wire field.
    #[error("{what} grew past {limit} bytes")]
    Capacity { what: &'static str, limit: u64 },
}

impl ComposeError {
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }
}
