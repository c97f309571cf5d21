use partscope_api::ModuleMapping;

use super::{FORMAT_MAJOR, FORMAT_MINOR, MAGIC};

/// Encode a mapping into manifest bytes.
///
/// The inverse of [`decode_module_mapping`]: decoding the result under any
/// policy yields a mapping equal to the input. Only baseline features are
/// emitted (no extension sections).
///
/// [`decode_module_mapping`]: super::decode_module_mapping
pub fn encode_module_mapping(mapping: &ModuleMapping) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_MAJOR.to_le_bytes());
    out.extend_from_slice(&FORMAT_MINOR.to_le_bytes());

    write_varint(&mut out, mapping.package_count() as u32);
    for (fqn, parts) in mapping.packages() {
        write_string(&mut out, fqn);

        // Facade table in first-use order.
        let mut facades: Vec<&str> = Vec::new();
        for part in parts.parts() {
            if let Some(facade) = parts.multifile_facade_name(part) {
                if !facades.contains(&facade) {
                    facades.push(facade);
                }
            }
        }
        write_varint(&mut out, facades.len() as u32);
        for facade in &facades {
            write_string(&mut out, facade);
        }

        write_varint(&mut out, parts.part_count() as u32);
        for part in parts.parts() {
            write_string(&mut out, part);
            let facade_ref = parts
                .multifile_facade_name(part)
                .and_then(|f| facades.iter().position(|known| *known == f))
                .map(|idx| idx as u32 + 1)
                .unwrap_or(0);
            write_varint(&mut out, facade_ref);
        }

        write_varint(&mut out, parts.metadata_part_count() as u32);
        for name in parts.metadata_parts() {
            write_string(&mut out, name);
        }

        write_varint(&mut out, 0); // extension sections
    }
    out
}

pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub(crate) fn write_string(out: &mut Vec<u8>, s: &str) {
    write_varint(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}
