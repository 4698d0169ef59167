/// How an input buffer has to be handled before decoding
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputKind {
    Archive, // vendor ZIP wrapping the capsule
    Image,   // raw .CAP capsule
}

const ZIP_MEDIA_TYPES: [&str; 2] = ["application/zip", "application/x-zip-compressed"];

/// Check a declared media type for a ZIP archive
pub fn is_archive_media_type(media_type: &str) -> bool {
    ZIP_MEDIA_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(media_type.trim()))
}

/// Decide whether the input is a ZIP or a capsule.
///
/// A `.zip` name or a ZIP media type marks an archive. Any other name means
/// a capsule. Without either, fall back to the local file header magic.
pub fn detect_input_kind(
    data: &[u8],
    filename: Option<&str>,
    media_type: Option<&str>,
) -> InputKind {
    if media_type.is_some_and(is_archive_media_type) {
        return InputKind::Archive;
    }

    match filename {
        Some(name) if name.to_ascii_lowercase().ends_with(".zip") => InputKind::Archive,
        Some(_) => InputKind::Image,
        None if data.starts_with(b"PK\x03\x04") => InputKind::Archive,
        None => InputKind::Image,
    }
}

/// Get a human-readable name for the input kind
pub fn input_kind_name(kind: &InputKind) -> &'static str {
    match kind {
        InputKind::Archive => "ZIP archive",
        InputKind::Image => "BIOS capsule",
    }
}
