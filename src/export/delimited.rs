//! Delimited text (CSV/TSV) writer for content maps.

use crate::common::{BomKind, Result};
use crate::scorm::ContentMapRow;
use std::io::Write;

/// Column headers of the content map, in output order.
pub const CONTENT_MAP_HEADER: [&str; 3] = ["Path", "File", "Identifier"];

#[derive(Debug, Clone)]
pub struct DelimitedConfig {
    pub delimiter: u8,
    pub quote: u8,
    pub write_header: bool,
    pub write_bom: Option<BomKind>,
}

impl Default for DelimitedConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            write_header: true,
            write_bom: None,
        }
    }
}

impl DelimitedConfig {
    pub fn csv() -> Self {
        Self::default()
    }

    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    pub fn with_write_bom(mut self, bom: Option<BomKind>) -> Self {
        self.write_bom = bom;
        self
    }

    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }
}

/// Write content map rows, one record per line, each terminated by `\n`.
///
/// A field is quoted only when it contains the delimiter, the quote
/// character or a line break; embedded quotes are doubled.
pub fn write_content_map<W: Write>(
    rows: &[ContentMapRow],
    writer: &mut W,
    config: &DelimitedConfig,
) -> Result<()> {
    if let Some(bom) = config.write_bom {
        writer.write_all(bom.as_bytes())?;
    }

    if config.write_header {
        write_record(writer, &CONTENT_MAP_HEADER, config)?;
    }

    for row in rows {
        write_record(
            writer,
            &[row.path.as_str(), row.file.as_str(), row.identifier.as_str()],
            config,
        )?;
    }

    Ok(())
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str], config: &DelimitedConfig) -> Result<()> {
    for (col_idx, field) in fields.iter().enumerate() {
        if col_idx > 0 {
            writer.write_all(&[config.delimiter])?;
        }
        write_field(writer, field, config)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

fn write_field<W: Write>(writer: &mut W, field: &str, config: &DelimitedConfig) -> Result<()> {
    let delimiter = char::from(config.delimiter);
    let quote = char::from(config.quote);

    let needs_quote = field.contains(delimiter)
        || field.contains('\n')
        || field.contains('\r')
        || field.contains(quote);

    if needs_quote {
        let escaped = field.replace(quote, &format!("{0}{0}", quote));
        let mut quoted = String::with_capacity(escaped.len() + 2);
        quoted.push(quote);
        quoted.push_str(&escaped);
        quoted.push(quote);
        writer.write_all(quoted.as_bytes())?;
    } else {
        writer.write_all(field.as_bytes())?;
    }

    Ok(())
}
