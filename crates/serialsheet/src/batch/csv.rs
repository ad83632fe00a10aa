//! Tabular export: one row per serial, in generation order.

use std::io::Write;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Batch, Result};

/// Column names of the export, in order.
pub const CSV_HEADER: [&str; 5] = ["batch_id", "batch_name", "created_at", "sticker_size", "serial"];

/// One exported row, borrowing from its [`Batch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExportRow<'a> {
    pub batch_id: u64,
    pub batch_name: &'a str,
    pub created_at: chrono::NaiveDateTime,
    pub sticker_size: &'a str,
    pub serial: &'a str,
}

impl Batch {
    /// Export rows, one per serial.
    pub fn rows(&self) -> impl Iterator<Item = ExportRow<'_>> {
        self.serials().iter().map(move |serial| ExportRow {
            batch_id: self.id,
            batch_name: &self.name,
            created_at: self.created_at,
            sticker_size: &self.geometry_name,
            serial,
        })
    }

    /// Writes the header and one line per serial to `writer`.
    ///
    /// Fields containing a comma, a double quote or a line break are quoted,
    /// with embedded quotes doubled. Lines end in `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the writer fails.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(batch = self.id)))]
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        write_record(&mut writer, CSV_HEADER)?;
        for row in self.rows() {
            let id = row.batch_id.to_string();
            let created = row.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
            write_record(
                &mut writer,
                [&id, row.batch_name, &created, row.sticker_size, row.serial],
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn write_record<W: Write>(writer: &mut W, fields: [&str; 5]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        if field.contains([',', '"', '\n', '\r']) {
            write!(writer, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            writer.write_all(field.as_bytes())?;
        }
    }
    writer.write_all(b"\n")?;
    Ok(())
}
