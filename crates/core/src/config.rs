/// Format-version baseline this build of the decoder was written against,
/// expressed as the language version whose compiler produced it.
pub const BASELINE_LANGUAGE_VERSION: (u16, u16) = (1, 0);

/// Gates how the decoder treats manifest features newer than its baseline.
///
/// The gate is consulted once per unknown-feature occurrence (an extension
/// section with an unrecognized tag), never as a global abort: a tolerant
/// decoder skips the section and keeps going, a strict one rejects the
/// whole manifest as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeserializationPolicy {
    pub skip_unknown_format_features: bool,
}

impl DeserializationPolicy {
    /// Reject any format feature the decoder does not understand.
    pub fn strict() -> Self {
        Self {
            skip_unknown_format_features: false,
        }
    }

    /// Skip unrecognized extension sections instead of failing.
    pub fn tolerant() -> Self {
        Self {
            skip_unknown_format_features: true,
        }
    }

    /// Derive the policy from the language version the compiler session is
    /// configured for. A session targeting a version newer than the
    /// decoder's baseline opts into tolerating manifest features this
    /// build does not know about.
    pub fn for_language_version(major: u16, minor: u16) -> Self {
        Self {
            skip_unknown_format_features: (major, minor) > BASELINE_LANGUAGE_VERSION,
        }
    }
}

impl Default for DeserializationPolicy {
    fn default() -> Self {
        Self::strict()
    }
}
