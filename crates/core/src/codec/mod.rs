//! Binary codec for `.modmap` module-mapping manifests.
//!
//! A manifest is a compact, versioned blob embedded in a binary root under
//! `META-INF/`. Layout (little-endian, LEB128 varints):
//!
//! - magic `b"PMAP"`, then `u16` major and `u16` minor format version
//! - varint package count, then per package:
//!   - package FQN (varint length + UTF-8)
//!   - facade name table: varint count + strings
//!   - parts: varint count, then per part a name and a varint facade
//!     reference (`0` = standalone, `k` = 1-based index into the table)
//!   - metadata parts: varint count + strings
//!   - extension sections: varint count, then per section a `u8` tag, a
//!     varint payload length and the payload
//!
//! A major-version mismatch is always malformed. Newer minors may add
//! extension sections; whether an unrecognized tag is skipped or rejected
//! is decided per occurrence by the [`DeserializationPolicy`].
//!
//! [`DeserializationPolicy`]: crate::config::DeserializationPolicy

mod decode;
mod encode;
mod reader;

pub use decode::decode_module_mapping;
pub use encode::encode_module_mapping;

/// Conventional subdirectory of a binary root that holds manifests.
pub const METADATA_DIR_NAME: &str = "META-INF";

/// File-name suffix identifying a module-mapping manifest.
pub const MAPPING_FILE_SUFFIX: &str = ".modmap";

pub(crate) const MAGIC: [u8; 4] = *b"PMAP";
pub(crate) const FORMAT_MAJOR: u16 = 1;
pub(crate) const FORMAT_MINOR: u16 = 0;
