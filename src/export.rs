use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::input::OutputFormat;
use crate::model::Order;

/// Fixed header: id, order date, total, order URL, first-item columns, then
/// the full item list as one JSON field.
const CSV_HEADER: &str = "ID,注文日時,金額,注文URL,Item1 種別,Item1 名前,Item1 URL,All Items";

/// Render the accumulated orders; returns (file extension, payload).
pub fn serialize(orders: &[Order], format: OutputFormat) -> Result<(&'static str, String)> {
    match format {
        OutputFormat::Json => Ok(("json", serde_json::to_string_pretty(orders)?)),
        OutputFormat::Csv => Ok(("csv", to_csv(orders)?)),
    }
}

/// File name the export is saved under.
pub fn file_name(year: &str, extension: &str) -> String {
    format!("amazon-{year}.{extension}")
}

/// Serialize and write the export file, returning its path.
pub fn write_export(
    out_dir: &Path,
    year: &str,
    format: OutputFormat,
    orders: &[Order],
) -> Result<PathBuf> {
    let (extension, payload) = serialize(orders, format)?;
    let path = out_dir.join(file_name(year, extension));
    std::fs::write(&path, payload)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn to_csv(orders: &[Order]) -> Result<String> {
    let rows = orders
        .iter()
        .map(|order| {
            let first = order.items.first();
            let items_json = serde_json::to_string(&order.items)?;
            let cols = [
                order.id.as_str(),
                order.ordered_at.as_str(),
                order.total.as_str(),
                order.url.as_str(),
                first.map(|i| i.kind.as_str()).unwrap_or(""),
                first.map(|i| i.title.as_str()).unwrap_or(""),
                first.map(|i| i.url.as_str()).unwrap_or(""),
                items_json.as_str(),
            ];
            Ok(cols.iter().map(|c| quote(c)).collect::<Vec<_>>().join(","))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{CSV_HEADER}\n{}", rows.join("\n")))
}

/// Wrap in double quotes, doubling internal quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

// ── Tests ──
