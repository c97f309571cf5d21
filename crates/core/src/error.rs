use thiserror::Error;

/// Failure of decoding one module-mapping manifest blob.
///
/// `Truncated` and `Malformed` are deliberately distinct: the first means
/// the byte sequence ended before a required field completed, the second
/// means the bytes were all there but structurally invalid.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input truncated while reading {context}")]
    Truncated { context: &'static str },
    #[error("malformed module mapping: {reason}")]
    Malformed { reason: String },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        DecodeError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Failure surfaced by [`PackagePartIndex::add_roots`], carrying the
/// identity of the root and manifest entry that caused it.
///
/// [`PackagePartIndex::add_roots`]: crate::index::PackagePartIndex::add_roots
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("error on reading package parts from {entry} in {root}")]
    Decode {
        root: String,
        entry: String,
        #[source]
        source: DecodeError,
    },
    #[error("error on reading {entry} in {root}")]
    Io {
        root: String,
        entry: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IndexError>;
