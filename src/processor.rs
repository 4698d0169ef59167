use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::descriptor::FirmwareDescriptor;
use crate::display::{print_descriptor, print_descriptor_json, print_hexdump_preview_indented};
use crate::error::{Error, Result};
use crate::file_types::{detect_input_kind, input_kind_name, InputKind};
use crate::parser::{decode_record, record_window, RECORD_SIZE};
use crate::zip_utils::extract_cap_entry;

/// What to do with a decoded capsule
#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Save the capsule as `<output_dir>/<expected name>`
    pub output_dir: Option<PathBuf>,
    /// Declared media type of the input, e.g. `application/zip`
    pub media_type: Option<String>,
    pub json: bool,
    /// Hexdump the BIOS info record
    pub dump: bool,
}

/// Capsule bytes ready for decoding, unwrapped from a ZIP if needed
#[derive(Debug)]
pub struct LoadedImage {
    pub name: Option<String>,
    pub data: Vec<u8>,
}

/// Turn the raw input into capsule bytes
pub fn load_image(
    data: &[u8],
    filename: Option<&str>,
    media_type: Option<&str>,
) -> Result<LoadedImage> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let kind = detect_input_kind(data, filename, media_type);
    info!(
        "[{}] {} ({} bytes)",
        input_kind_name(&kind),
        filename.unwrap_or("<unknown>"),
        data.len()
    );

    match kind {
        InputKind::Archive => {
            let entry = extract_cap_entry(data)?;
            info!("Extracted {} from ZIP ({} bytes)", entry.name, entry.data.len());
            Ok(LoadedImage {
                name: Some(entry.name),
                data: entry.data,
            })
        }
        InputKind::Image => Ok(LoadedImage {
            name: filename.map(str::to_string),
            data: data.to_vec(),
        }),
    }
}

/// Write the capsule to `output_dir` under the name its BIOS info expects
pub fn save_renamed(
    image: &LoadedImage,
    descriptor: &FirmwareDescriptor,
    output_dir: &Path,
) -> Result<PathBuf> {
    let name = &descriptor.expected_name;
    let mut components = Path::new(name).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !is_plain || name.contains(['/', '\\']) {
        return Err(Error::InvalidExpectedName(name.clone()));
    }

    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(name);
    fs::write(&output_path, &image.data)?;

    Ok(output_path)
}

/// Load, decode, show and optionally save a capsule
pub fn process_file(
    data: &[u8],
    filename: Option<&str>,
    options: &Options,
) -> Result<FirmwareDescriptor> {
    let image = load_image(data, filename, options.media_type.as_deref())?;
    let record = record_window(&image.data)?;
    let descriptor = decode_record(record);
    debug!("Decoded {:?}", descriptor);

    if options.json {
        print_descriptor_json(&descriptor).map_err(std::io::Error::from)?;
    } else {
        println!("BIOS info of {}:", image.name.as_deref().unwrap_or("<unknown>"));
        print_descriptor(&descriptor, "");
    }

    if options.dump {
        println!();
        println!("Record ({} bytes):", RECORD_SIZE);
        print_hexdump_preview_indented(record, RECORD_SIZE.div_ceil(16), "");
    }

    if let Some(out_dir) = &options.output_dir {
        let output_path = save_renamed(&image, &descriptor, out_dir)?;
        info!("Saved renamed capsule to {}", output_path.display());
    }

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::build_test_image;
    use crate::parser::DecodeError;
    use crate::zip_utils::tests::{build_test_zip, Member};
    use crate::zip_utils::UnwrapError;
    use zip::CompressionMethod;

    #[test]
    fn test_load_empty() {
        assert!(matches!(load_image(b"", Some("x.cap"), None), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_load_raw_image() {
        let image = load_image(b"raw capsule", Some("PZ790EF.CAP"), None).unwrap();
        assert_eq!(image.name.as_deref(), Some("PZ790EF.CAP"));
        assert_eq!(image.data, b"raw capsule");
    }

    #[test]
    fn test_load_from_zip() {
        let zip = build_test_zip(
            &[Member::File("PZ790EF.CAP", b"zipped capsule")],
            CompressionMethod::Deflated,
        );

        let image = load_image(&zip, Some("PRIME-Z790.zip"), None).unwrap();
        assert_eq!(image.name.as_deref(), Some("PZ790EF.CAP"));
        assert_eq!(image.data, b"zipped capsule");
    }

    #[test]
    fn test_load_zip_without_cap() {
        let zip = build_test_zip(&[Member::File("readme.txt", b"")], CompressionMethod::Stored);

        assert!(matches!(
            load_image(&zip, Some("bios.zip"), None),
            Err(Error::Unwrap(UnwrapError::NotFound))
        ));
    }

    #[test]
    fn test_load_zip_by_media_type() {
        let zip = build_test_zip(
            &[Member::File("PB650P.CAP", b"capsule")],
            CompressionMethod::Stored,
        );

        let media_type = Some("application/x-zip-compressed");
        let image = load_image(&zip, Some("download"), media_type).unwrap();
        assert_eq!(image.name.as_deref(), Some("PB650P.CAP"));
        assert_eq!(image.data, b"capsule");

        let image = load_image(&zip, Some("download"), None).unwrap();
        assert_eq!(image.data, zip);
    }

    #[test]
    fn test_process_zip_end_to_end() {
        let capsule = build_test_image(100, b"ROG STRIX Z790-E", b"ASUS", b"03/14/2024");
        let zip = build_test_zip(
            &[Member::File("ROG-STRIX-Z790-E.CAP", &capsule)],
            CompressionMethod::Deflated,
        );
        let out = tempfile::tempdir().unwrap();
        let options = Options {
            output_dir: Some(out.path().to_path_buf()),
            dump: true,
            ..Options::default()
        };

        let descriptor = process_file(&zip, Some("ROG-STRIX-Z790-E.zip"), &options).unwrap();
        assert_eq!(descriptor.board_name, "ROG STRIX Z790-E");
        assert_eq!(descriptor.expected_name, "RSZ790E.CAP");

        let saved = fs::read(out.path().join("RSZ790E.CAP")).unwrap();
        assert_eq!(saved, capsule);
    }

    #[test]
    fn test_process_not_a_capsule() {
        let result = process_file(b"nothing to see", Some("x.cap"), &Options::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::SignatureNotFound))
        ));
    }

    #[test]
    fn test_process_json() {
        let capsule = build_test_image(0, b"TUF GAMING B650", b"ASUS", b"bad date");
        let options = Options {
            json: true,
            ..Options::default()
        };

        let descriptor = process_file(&capsule, None, &options).unwrap();
        assert_eq!(descriptor.board_name, "TUF GAMING B650");
        assert_eq!(descriptor.build_date, None);
    }

    #[test]
    fn test_save_rejects_unsafe_names() {
        let out = tempfile::tempdir().unwrap();
        let image = LoadedImage {
            name: None,
            data: vec![1, 2, 3],
        };

        for name in ["", ".", "..", "../EVIL.CAP", "dir/X.CAP", "a\\b.CAP"] {
            let descriptor = FirmwareDescriptor {
                board_name: String::new(),
                brand: String::new(),
                build_date: None,
                build_number: String::new(),
                expected_name: name.to_string(),
            };
            assert!(
                matches!(
                    save_renamed(&image, &descriptor, out.path()),
                    Err(Error::InvalidExpectedName(_))
                ),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_save_creates_output_dir() {
        let out = tempfile::tempdir().unwrap();
        let nested = out.path().join("renamed");
        let image = LoadedImage {
            name: Some("download.cap".to_string()),
            data: vec![0xde, 0xad],
        };
        let descriptor = FirmwareDescriptor {
            board_name: String::new(),
            brand: String::new(),
            build_date: None,
            build_number: String::new(),
            expected_name: "PB650P.CAP".to_string(),
        };

        let path = save_renamed(&image, &descriptor, &nested).unwrap();
        assert_eq!(path, nested.join("PB650P.CAP"));
        assert_eq!(fs::read(path).unwrap(), vec![0xde, 0xad]);
    }
}
