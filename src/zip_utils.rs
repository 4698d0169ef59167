use std::io::{Cursor, Read};

use thiserror::Error;
use zip::read::ZipArchive;
use zip::result::ZipError;

/// Extension of the capsule member inside a vendor ZIP
pub const CAP_EXTENSION: &str = ".cap";

#[derive(Debug, Error)]
pub enum UnwrapError {
    #[error("failed to read ZIP archive: {0}")]
    Archive(#[source] ZipError),

    #[error("no .CAP file found in the ZIP archive")]
    NotFound,

    #[error("found a directory named like a .CAP file ({name}), but it's not a file")]
    InvalidEntry { name: String },

    #[error("failed to extract {name} from ZIP: {source}")]
    ExtractionFailed {
        name: String,
        #[source]
        source: ZipError,
    },
}

/// A capsule member extracted from a ZIP archive
#[derive(Debug)]
pub struct CapEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Slice the data to include only up to the end of the ZIP's EOCD record
/// Returns None if no valid EOCD marker is found
pub fn slice_to_eocd(data: &[u8]) -> Option<&[u8]> {
    if data.len() < 22 {
        return None;
    }

    let i = (0..=data.len() - 22).rev().find(|&i| &data[i..i + 4] == b"PK\x05\x06")?;
    let comment_len = u16::from_le_bytes([data[i + 20], data[i + 21]]) as usize;
    let end = i + 22 + comment_len;
    if end <= data.len() {
        Some(&data[..end])
    } else {
        Some(data)
    }
}

fn is_cap_name(name: &str) -> bool {
    name.trim_end_matches('/')
        .to_ascii_lowercase()
        .ends_with(CAP_EXTENSION)
}

const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;

/// Extract the first `.cap` file member of a ZIP archive.
///
/// Directories named like a capsule are skipped; they only surface as
/// `InvalidEntry` when no capsule file follows them.
pub fn extract_cap_entry(data: &[u8]) -> Result<CapEntry, UnwrapError> {
    let zip_slice = slice_to_eocd(data).unwrap_or(data);
    let mut archive = ZipArchive::new(Cursor::new(zip_slice)).map_err(UnwrapError::Archive)?;
    let mut cap_dir = None;

    for i in 0..archive.len() {
        let (name, is_dir) = {
            let entry = archive.by_index_raw(i).map_err(UnwrapError::Archive)?;
            let dir_mode = entry.unix_mode().is_some_and(|m| m & S_IFMT == S_IFDIR);
            (entry.name().to_string(), entry.is_dir() || dir_mode)
        };

        if !is_cap_name(&name) {
            continue;
        }

        if is_dir {
            cap_dir.get_or_insert(name);
            continue;
        }

        let mut file = match archive.by_index(i) {
            Ok(f) => f,
            Err(source) => return Err(UnwrapError::ExtractionFailed { name, source }),
        };

        let mut data = Vec::with_capacity(file.size() as usize);
        if let Err(e) = file.read_to_end(&mut data) {
            return Err(UnwrapError::ExtractionFailed {
                name,
                source: ZipError::Io(e),
            });
        }

        return Ok(CapEntry { name, data });
    }

    match cap_dir {
        Some(name) => Err(UnwrapError::InvalidEntry { name }),
        None => Err(UnwrapError::NotFound),
    }
}

/// Extract the bytes of the first `.cap` member of a ZIP archive
pub fn extract_cap(data: &[u8]) -> Result<Vec<u8>, UnwrapError> {
    extract_cap_entry(data).map(|entry| entry.data)
}
