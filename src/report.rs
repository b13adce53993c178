//! CSV reports
//!
//! Every report starts with a header row, even when there are no entries.
//! Hex codes are written with a leading `#`.

use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::extraction::ColorSample;
use crate::matching::ColorDivergence;
use crate::scan::{CatalogEntry, GroupMember};
use crate::{AnalysisError, Result};

pub const DIVERGENCE_HEADERS: [&str; 7] =
    ["color_name", "file1", "hex1", "file2", "hex2", "path1", "path2"];
pub const MEMBER_HEADERS: [&str; 3] = ["color_name", "hex_code", "path"];
pub const CATALOG_HEADERS: [&str; 2] = ["Color", "Color Code"];

/// One divergent pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivergenceRow {
    pub color_name: String,
    pub file1: String,
    pub hex1: String,
    pub file2: String,
    pub hex2: String,
    pub path1: String,
    pub path2: String,
}

impl From<&ColorDivergence> for DivergenceRow {
    fn from(d: &ColorDivergence) -> Self {
        Self {
            color_name: d.group_name.clone(),
            file1: d.sample_a.file_name(),
            hex1: display_hex(&d.sample_a),
            file2: d.sample_b.file_name(),
            hex2: display_hex(&d.sample_b),
            path1: d.category_a.clone(),
            path2: d.category_b.clone(),
        }
    }
}

/// One group member or name lookup hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRow {
    pub color_name: String,
    pub hex_code: String,
    pub path: String,
}

impl From<&GroupMember> for MemberRow {
    fn from(m: &GroupMember) -> Self {
        Self {
            color_name: m.group_name.clone(),
            hex_code: display_hex(&m.sample),
            path: m.category.clone(),
        }
    }
}

/// One catalog line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Color Code")]
    pub color_code: String,
}

impl From<&CatalogEntry> for CatalogRow {
    fn from(e: &CatalogEntry) -> Self {
        Self {
            color: e.name.clone(),
            color_code: display_hex(&e.sample),
        }
    }
}

/// `#`-prefixed hex as written in reports
pub fn display_hex(sample: &ColorSample) -> String {
    format!("#{}", sample.hex())
}

pub fn write_divergences<W: io::Write>(writer: W, divergences: &[ColorDivergence]) -> Result<()> {
    write_rows(writer, &DIVERGENCE_HEADERS, divergences.iter().map(DivergenceRow::from))
}

pub fn write_divergences_to_path(path: &Path, divergences: &[ColorDivergence]) -> Result<()> {
    write_divergences(create(path)?, divergences)
}

pub fn write_members<W: io::Write>(writer: W, members: &[GroupMember]) -> Result<()> {
    write_rows(writer, &MEMBER_HEADERS, members.iter().map(MemberRow::from))
}

pub fn write_members_to_path(path: &Path, members: &[GroupMember]) -> Result<()> {
    write_members(create(path)?, members)
}

pub fn write_catalog<W: io::Write>(writer: W, entries: &[CatalogEntry]) -> Result<()> {
    write_rows(writer, &CATALOG_HEADERS, entries.iter().map(CatalogRow::from))
}

pub fn write_catalog_to_path(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    write_catalog(create(path)?, entries)
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AnalysisError::report(format!("Failed to create {}", parent.display()), e)
        })?;
    }
    File::create(path)
        .map_err(|e| AnalysisError::report(format!("Failed to create {}", path.display()), e))
}

/// Header row first, then one serialized row per item
fn write_rows<W, R, I>(writer: W, headers: &[&str], rows: I) -> Result<()>
where
    W: io::Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    csv.write_record(headers)
        .map_err(|e| AnalysisError::report("Failed to write header", e))?;
    for row in rows {
        csv.serialize(row)
            .map_err(|e| AnalysisError::report("Failed to write row", e))?;
    }
    csv.flush()
        .map_err(|e| AnalysisError::report("Failed to flush report", e))?;
    Ok(())
}
