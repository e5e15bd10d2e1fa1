//! Output rendering for a computed subnet
//!
//! - Human: tab-aligned table (header plus one row)
//! - JSON: pretty-printed object
//! - CSV: header plus one record

use anyhow::Result;
use snet_cidr::SubnetSummary;
use std::io::Write;

use crate::OutputFormat;

const HEADER: [&str; 5] = ["NETWORK", "USEABLE", "BROADCAST", "MASK", "CIDR"];

/// Spaces added after the widest cell of each column
const PADDING: usize = 2;

pub fn write_summary(out: &mut dyn Write, summary: &SubnetSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => write_human(out, summary)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?,
        OutputFormat::Csv => write_csv(out, summary)?,
    }
    Ok(())
}

fn write_human(out: &mut dyn Write, summary: &SubnetSummary) -> Result<()> {
    let row = [
        summary.network.to_string(),
        summary.useable.to_string(),
        summary.broadcast.to_string(),
        summary.mask.to_string(),
        format!("/{}", summary.cidr),
    ];
    let header = HEADER.map(String::from);
    out.write_all(align(&[header, row]).as_bytes())?;
    Ok(())
}

fn write_csv(out: &mut dyn Write, summary: &SubnetSummary) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.serialize(summary)?;
    wtr.flush()?;
    Ok(())
}

/// Left-align every cell to its column's widest entry plus padding
fn align<const N: usize>(rows: &[[String; N]]) -> String {
    let mut widths = [0usize; N];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    for row in rows {
        for (width, cell) in widths.iter().zip(row) {
            table.push_str(&format!("{:<w$}", cell, w = width + PADDING));
        }
        table.push('\n');
    }
    table
}
