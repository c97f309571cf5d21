use partscope_api::{ModuleMapping, PackageParts};
use tracing::debug;

use super::reader::ByteReader;
use super::{FORMAT_MAJOR, MAGIC};
use crate::config::DeserializationPolicy;
use crate::error::DecodeError;

/// Decode one manifest blob into a [`ModuleMapping`].
///
/// Pure and stateless; safe to call concurrently on independent inputs.
/// `source_label` is recorded on the mapping for diagnostics only — wrapping
/// failures with the originating root is the caller's job.
pub fn decode_module_mapping(
    bytes: &[u8],
    source_label: &str,
    policy: DeserializationPolicy,
) -> Result<ModuleMapping, DecodeError> {
    let mut r = ByteReader::new(bytes);

    let magic = r.read_bytes(MAGIC.len(), "format magic")?;
    if magic != MAGIC {
        return Err(DecodeError::malformed(format!(
            "unexpected magic {magic:02x?}"
        )));
    }
    let major = r.read_u16_le("major format version")?;
    if major != FORMAT_MAJOR {
        return Err(DecodeError::malformed(format!(
            "unsupported major format version {major} (decoder supports {FORMAT_MAJOR})"
        )));
    }
    let _minor = r.read_u16_le("minor format version")?;

    let package_count = r.read_varint_u32("package count")?;
    let mut seen = std::collections::HashSet::new();
    let mut packages = Vec::new();
    for _ in 0..package_count {
        let fqn = r.read_string("package name")?.to_string();
        let parts = decode_package(&mut r, &fqn, policy)?;
        if !seen.insert(fqn.clone()) {
            return Err(DecodeError::malformed(format!(
                "duplicate record for package `{fqn}`"
            )));
        }
        packages.push((fqn, parts));
    }

    if r.remaining() != 0 {
        return Err(DecodeError::malformed(format!(
            "{} trailing bytes after the last package record",
            r.remaining()
        )));
    }

    Ok(ModuleMapping::from_packages(source_label, packages))
}

fn decode_package(
    r: &mut ByteReader<'_>,
    fqn: &str,
    policy: DeserializationPolicy,
) -> Result<PackageParts, DecodeError> {
    let facade_count = r.read_varint_u32("facade table size")?;
    let mut facades = Vec::new();
    for _ in 0..facade_count {
        let name = r.read_string("facade name")?;
        if name.is_empty() {
            return Err(DecodeError::malformed(format!(
                "empty facade name in package `{fqn}`"
            )));
        }
        facades.push(name);
    }

    let mut parts = PackageParts::new();

    let part_count = r.read_varint_u32("part count")?;
    for _ in 0..part_count {
        let name = r.read_string("part name")?;
        let facade_ref = r.read_varint_u32("facade reference")? as usize;
        let facade = match facade_ref {
            0 => None,
            k => Some(
                facades
                    .get(k - 1)
                    .copied()
                    .ok_or_else(|| {
                        DecodeError::malformed(format!(
                            "facade reference {k} out of range in package `{fqn}` \
                             (table has {} entries)",
                            facades.len()
                        ))
                    })?
                    .to_string(),
            ),
        };
        if !parts.add_part(name, facade) {
            return Err(DecodeError::malformed(format!(
                "duplicate part `{name}` in package `{fqn}`"
            )));
        }
    }

    let metadata_count = r.read_varint_u32("metadata part count")?;
    for _ in 0..metadata_count {
        let name = r.read_string("metadata part name")?;
        parts.add_metadata_part(name);
    }

    let extension_count = r.read_varint_u32("extension section count")?;
    for _ in 0..extension_count {
        let tag = r.read_u8("extension tag")?;
        let payload_len = r.read_varint_u32("extension payload length")? as usize;
        // No tags are recognized at the current baseline; the policy decides
        // per occurrence whether an unknown section is survivable.
        if !policy.skip_unknown_format_features {
            return Err(DecodeError::malformed(format!(
                "unknown extension tag {tag} in package `{fqn}`"
            )));
        }
        r.skip(payload_len, "extension payload")?;
        debug!(tag, payload_len, package = fqn, "skipped unknown manifest extension");
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::super::encode::{encode_module_mapping, write_string, write_varint};
    use super::super::{FORMAT_MAJOR, FORMAT_MINOR, MAGIC};
    use super::*;

    fn sample_mapping() -> ModuleMapping {
        let mut app = PackageParts::new();
        app.add_part("org/app/AKt", Some("org/app/Merged".to_string()));
        app.add_part("org/app/BKt", Some("org/app/Merged".to_string()));
        app.add_part("org/app/CKt", None);
        app.add_metadata_part("org/app/Shared");

        let mut util = PackageParts::new();
        util.add_part("org/app/util/UtilKt", None);

        ModuleMapping::from_packages(
            "test.modmap",
            [
                ("org.app".to_string(), app),
                ("org.app.util".to_string(), util),
            ],
        )
    }

    fn header(package_count: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&FORMAT_MAJOR.to_le_bytes());
        out.extend_from_slice(&FORMAT_MINOR.to_le_bytes());
        write_varint(&mut out, package_count);
        out
    }

    #[test]
    fn round_trips_a_representative_mapping() {
        let mapping = sample_mapping();
        let bytes = encode_module_mapping(&mapping);
        let decoded =
            decode_module_mapping(&bytes, "test.modmap", DeserializationPolicy::strict()).unwrap();
        assert_eq!(decoded, mapping);
    }

    #[test]
    fn every_strict_prefix_is_truncated() {
        let bytes = encode_module_mapping(&sample_mapping());
        for len in 0..bytes.len() {
            match decode_module_mapping(&bytes[..len], "t", DeserializationPolicy::strict()) {
                Err(DecodeError::Truncated { .. }) => {}
                other => panic!("prefix of {len} bytes: expected Truncated, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_unexpected_magic() {
        let mut bytes = encode_module_mapping(&sample_mapping());
        bytes[0] = b'Q';
        assert!(matches!(
            decode_module_mapping(&bytes, "t", DeserializationPolicy::strict()),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_major_version() {
        let mut bytes = encode_module_mapping(&sample_mapping());
        bytes[4..6].copy_from_slice(&(FORMAT_MAJOR + 1).to_le_bytes());
        let err =
            decode_module_mapping(&bytes, "t", DeserializationPolicy::tolerant()).unwrap_err();
        assert!(err.to_string().contains("major format version"));
    }

    #[test]
    fn rejects_facade_reference_out_of_range() {
        let mut bytes = header(1);
        write_string(&mut bytes, "org.app");
        write_varint(&mut bytes, 1); // facade table: one entry
        write_string(&mut bytes, "org/app/Merged");
        write_varint(&mut bytes, 1); // one part
        write_string(&mut bytes, "org/app/AKt");
        write_varint(&mut bytes, 2); // refers past the table
        write_varint(&mut bytes, 0); // metadata parts
        write_varint(&mut bytes, 0); // extensions

        let err = decode_module_mapping(&bytes, "t", DeserializationPolicy::strict()).unwrap_err();
        assert!(err.to_string().contains("facade reference 2 out of range"));
    }

    #[test]
    fn rejects_duplicate_part_names() {
        let mut bytes = header(1);
        write_string(&mut bytes, "org.app");
        write_varint(&mut bytes, 0);
        write_varint(&mut bytes, 2);
        write_string(&mut bytes, "org/app/AKt");
        write_varint(&mut bytes, 0);
        write_string(&mut bytes, "org/app/AKt");
        write_varint(&mut bytes, 0);
        write_varint(&mut bytes, 0);
        write_varint(&mut bytes, 0);

        let err = decode_module_mapping(&bytes, "t", DeserializationPolicy::strict()).unwrap_err();
        assert!(err.to_string().contains("duplicate part"));
    }

    #[test]
    fn rejects_duplicate_package_records() {
        let mut bytes = header(2);
        for _ in 0..2 {
            write_string(&mut bytes, "org.app");
            write_varint(&mut bytes, 0);
            write_varint(&mut bytes, 1);
            write_string(&mut bytes, "org/app/AKt");
            write_varint(&mut bytes, 0);
            write_varint(&mut bytes, 0);
            write_varint(&mut bytes, 0);
        }

        let err = decode_module_mapping(&bytes, "t", DeserializationPolicy::strict()).unwrap_err();
        assert!(err.to_string().contains("duplicate record"));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode_module_mapping(&sample_mapping());
        bytes.push(0);
        let err = decode_module_mapping(&bytes, "t", DeserializationPolicy::strict()).unwrap_err();
        assert!(err.to_string().contains("trailing bytes"));
    }

    fn with_unknown_extension() -> Vec<u8> {
        let mut bytes = header(1);
        write_string(&mut bytes, "org.app");
        write_varint(&mut bytes, 0);
        write_varint(&mut bytes, 1);
        write_string(&mut bytes, "org/app/AKt");
        write_varint(&mut bytes, 0);
        write_varint(&mut bytes, 0);
        write_varint(&mut bytes, 1); // one extension section
        bytes.push(7); // tag unknown to the baseline decoder
        write_varint(&mut bytes, 3);
        bytes.extend_from_slice(&[1, 2, 3]);
        bytes
    }

    #[test]
    fn unknown_extension_skipped_under_tolerant_policy() {
        let bytes = with_unknown_extension();
        let mapping =
            decode_module_mapping(&bytes, "t", DeserializationPolicy::tolerant()).unwrap();
        let parts = mapping.package_parts("org.app").unwrap();
        assert_eq!(parts.parts().collect::<Vec<_>>(), ["org/app/AKt"]);
    }

    #[test]
    fn unknown_extension_rejected_under_strict_policy() {
        let bytes = with_unknown_extension();
        let err = decode_module_mapping(&bytes, "t", DeserializationPolicy::strict()).unwrap_err();
        assert!(err.to_string().contains("unknown extension tag 7"));
    }

    #[test]
    fn truncated_extension_payload_is_truncated_even_when_tolerated() {
        let mut bytes = with_unknown_extension();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            decode_module_mapping(&bytes, "t", DeserializationPolicy::tolerant()),
            Err(DecodeError::Truncated { context: "extension payload" })
        ));
    }
}
