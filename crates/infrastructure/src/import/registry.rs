//! Decoder dispatch.

use super::{DecodeError, FormatTag, ImportBundle, ImportLimits, curl, har, insomnia, native,
            openapi, postman};

/// Routes detected formats to their decoders under one set of limits.
#[derive(Debug, Default)]
pub struct DecoderRegistry {
    limits: ImportLimits,
}

impl DecoderRegistry {
    /// Creates a registry with the given limits.
    #[must_use]
    pub const fn new(limits: ImportLimits) -> Self {
        Self { limits }
    }

    /// The limits every decode runs under.
    #[must_use]
    pub const fn limits(&self) -> &ImportLimits {
        &self.limits
    }

    /// Returns true when a decoder exists for the format.
    #[must_use]
    pub const fn supports(&self, format: FormatTag) -> bool {
        !matches!(format, FormatTag::Unknown)
    }

    /// Decodes `text` as the given format.
    ///
    /// # Errors
    ///
    /// Propagates the decoder's [`DecodeError`]; an [`FormatTag::Unknown`]
    /// input is malformed by definition.
    pub fn decode(&self, format: FormatTag, text: &str) -> Result<ImportBundle, DecodeError> {
        match format {
            FormatTag::PostmanCollection => postman::decode_collection(text, &self.limits),
            FormatTag::PostmanEnvironment => postman::decode_environment(text),
            FormatTag::InsomniaExport => insomnia::decode(text, &self.limits),
            FormatTag::OpenapiSpec => openapi::decode(text, &self.limits),
            FormatTag::NativeExport => native::decode(text, &self.limits),
            FormatTag::HarFile => har::decode(text, &self.limits),
            FormatTag::CurlText => curl::decode(text, &self.limits),
            FormatTag::Unknown => Err(DecodeError::MalformedInput(
                "no decoder for unrecognized input".to_string(),
            )),
        }
    }
}
