//! Spreadsheet export.
//!
//! The byte layout is fixed for Google Sheets / Excel compatibility: UTF-8 BOM,
//! unquoted header row, `\n` between rows and no trailing newline. Text fields
//! are always double-quoted with embedded quotes doubled; the mobile-friendly
//! column is a bare localized yes/no.

use crate::errors::{AppError, ResultExt};
use crate::locale::Locale;
use crate::models::Lead;
use crate::validation::validate_lead;
use std::path::{Path, PathBuf};

pub const BOM: char = '\u{FEFF}';

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_row(lead: &Lead, locale: Locale) -> String {
    let text = |value: &Option<String>| quote(value.as_deref().unwrap_or(""));

    [
        quote(&lead.name),
        quote(&lead.address),
        text(&lead.clean_website),
        text(&lead.clean_email),
        text(&lead.clean_phone),
        locale
            .yes_no(lead.mobile_friendly.unwrap_or(false))
            .to_string(),
        text(&lead.weakness),
        text(&lead.pitch),
    ]
    .join(",")
}

/// Validates every lead and renders the full CSV document.
pub fn render_csv(leads: &[Lead], locale: Locale) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&locale.csv_headers().join(","));

    for lead in leads {
        let validated = validate_lead(lead.clone(), locale);
        out.push('\n');
        out.push_str(&csv_row(&validated, locale));
    }

    out
}

/// `prospects_{city}_sheets_ready.csv`, with path separators and control
/// characters in the city replaced by `_`.
pub fn export_filename(city: Option<&str>) -> String {
    let city = city.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("export");
    let safe: String = city
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '"' | '*' | '?' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("prospects_{}_sheets_ready.csv", safe)
}

/// `Content-Disposition` value with an ASCII `filename` and an RFC 5987
/// `filename*` carrying the exact UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .map(|c| if c == '"' { '_' } else { c })
        .collect();

    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii, encoded
    )
}

/// Writes the export into `dir` and returns the final path.
///
/// The document is rendered in memory, written to a temporary sibling and
/// renamed into place, so a failed export never leaves a partial file.
pub fn write_csv_file(
    dir: &Path,
    city: Option<&str>,
    leads: &[Lead],
    locale: Locale,
) -> Result<PathBuf, AppError> {
    let csv = render_csv(leads, locale);
    let path = dir.join(export_filename(city));
    let tmp = path.with_extension("csv.partial");

    if let Err(e) = std::fs::write(&tmp, csv.as_bytes()) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Writing {}", tmp.display()));
    }
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Moving export to {}", path.display()));
    }

    tracing::info!("✓ Exported {} lead(s) to {}", leads.len(), path.display());
    Ok(path)
}
