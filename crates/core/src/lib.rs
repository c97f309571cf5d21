pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod roots;

pub use codec::{
    MAPPING_FILE_SUFFIX, METADATA_DIR_NAME, decode_module_mapping, encode_module_mapping,
};
pub use config::DeserializationPolicy;
pub use error::{DecodeError, IndexError, Result};
pub use index::PackagePartIndex;
pub use partscope_api::{
    EmptyPackagePartProvider, MetadataPartProvider, ModuleMapping, PackagePartProvider,
    PackageParts,
};
