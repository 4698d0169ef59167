use crate::descriptor::FirmwareDescriptor;

/// Print a hexdump preview of data with indentation
pub fn print_hexdump_preview_indented(data: &[u8], max_lines: usize, indent: &str) {
    print!("{}", format_hexdump(data, max_lines, indent));
}

fn format_hexdump(data: &[u8], max_lines: usize, indent: &str) -> String {
    let mut out = String::new();

    for (line, chunk) in data.chunks(16).take(max_lines).enumerate() {
        out.push_str(&format!("{}  {:08x}  ", indent, line * 16));
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => out.push_str(&format!("{:02x} ", b)),
                None => out.push_str("   "),
            }

            if i == 7 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        for &b in chunk {
            out.push(if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            });
        }
        out.push_str("|\n");
    }

    if data.len() > max_lines * 16 {
        out.push_str(&format!(
            "{}  ... ({} more bytes)\n",
            indent,
            data.len() - max_lines * 16
        ));
    }

    out
}

fn descriptor_rows(descriptor: &FirmwareDescriptor) -> [(&'static str, String); 5] {
    let build_date = descriptor
        .build_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or("unknown".to_string());

    [
        ("Board name", descriptor.board_name.clone()),
        ("Brand", descriptor.brand.clone()),
        ("Build date", build_date),
        ("Build number", descriptor.build_number.clone()),
        ("Expected name", descriptor.expected_name.clone()),
    ]
}

/// Print the decoded BIOS info as a labeled table
pub fn print_descriptor(descriptor: &FirmwareDescriptor, indent: &str) {
    for (label, value) in descriptor_rows(descriptor) {
        println!("{}  {:<14} {}", indent, format!("{}:", label), value);
    }
}

/// Print the decoded BIOS info as pretty JSON
pub fn print_descriptor_json(descriptor: &FirmwareDescriptor) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(descriptor)?);
    Ok(())
}
