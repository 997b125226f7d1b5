//! JSON and CSV renderings of a listing record

use std::io::Write;

use crate::types::ListingRecord;

/// Output format for the record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Csv,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

/// Pretty JSON with keys in schema order. Native text stays unescaped.
pub fn to_json(record: &ListingRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// Header row of schema keys followed by one data row; null becomes an empty cell
pub fn write_csv<W: Write>(record: &ListingRecord, writer: W) -> csv::Result<()> {
    let entries = record.entries();
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(entries.iter().map(|(key, _)| key.as_str()))?;
    wtr.write_record(entries.iter().map(|(_, value)| value.unwrap_or("")))?;
    wtr.flush()?;
    Ok(())
}

pub fn to_csv(record: &ListingRecord) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_csv(record, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

pub fn render(record: &ListingRecord, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(to_json(record)?),
        Format::Csv => to_csv(record),
    }
}
