use std::{io::Write, str::FromStr};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::types::book::{BookEntry, BookId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => bail!("Unknown export format {other:?}"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    #[serde(rename = "Id")]
    id:    Option<BookId>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Pages")]
    pages: i64,
    #[serde(rename = "Cover")]
    cover: Option<String>,
}

impl From<&BookEntry> for Export {
    fn from(entry: &BookEntry) -> Self {
        Self {
            id:    entry.id,
            title: entry.title.clone(),
            genre: entry.genre.clone(),
            pages: entry.page_count,
            cover: entry.cover().map(str::to_string),
        }
    }
}

impl Export {
    pub fn new(entries: &[BookEntry]) -> Vec<Self> {
        entries.iter().map(Self::from).collect()
    }

    pub fn export(data: &[Self], format: ExportFormat, writer: impl Write) -> Result<()> {
        match format {
            ExportFormat::Csv => Self::write_csv(data, writer),
            ExportFormat::Json => Self::write_json(data, writer),
        }
    }

    fn write_csv(data: &[Self], writer: impl Write) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in data {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_json(data: &[Self], mut writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, data)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn books() -> Vec<BookEntry> {
        vec![
            BookEntry {
                id:         Some(1),
                title:      "Dom Casmurro".into(),
                genre:      "Romance".into(),
                page_count: 256,
                cover_url:  "".into(),
            },
            BookEntry {
                id:         Some(2),
                title:      "Vidas Secas, 1938".into(),
                genre:      "Romance".into(),
                page_count: 176,
                cover_url:  "https://example.com/vidas.jpg".into(),
            },
        ]
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let mut out = vec![];
        Export::export(&Export::new(&books()), ExportFormat::Csv, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Id,Title,Genre,Pages,Cover\n\
             1,Dom Casmurro,Romance,256,\n\
             2,\"Vidas Secas, 1938\",Romance,176,https://example.com/vidas.jpg\n"
        );
    }

    #[test]
    fn json_uses_export_names() {
        let mut out = vec![];
        Export::export(&Export::new(&books()[..1]), ExportFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "Id": 1,
                "Title": "Dom Casmurro",
                "Genre": "Romance",
                "Pages": 256,
                "Cover": null,
            }])
        );
    }

    #[test]
    fn format_names() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
