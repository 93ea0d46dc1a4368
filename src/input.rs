use std::sync::LazyLock;

use anyhow::{bail, Result};
use chrono::Datelike;
use regex::Regex;

static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([1-9][0-9]{3})(csv|json)?").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parse a trigger token like "2021", "2020json" or "1999csv" into a year
/// and an output format. No token at all means the current year, CSV.
/// An unrecognized token is rejected before any network activity.
pub fn parse_target(token: Option<&str>) -> Result<(String, OutputFormat)> {
    let Some(token) = token else {
        let year = chrono::Local::now().year().to_string();
        return Ok((year, OutputFormat::Csv));
    };

    let Some(caps) = TARGET_RE.captures(token) else {
        bail!("Invalid target {token:?}, expected e.g. \"2021\", \"2020json\", \"1999csv\"");
    };

    let year = caps[1].to_string();
    let format = match caps.get(2).map(|m| m.as_str()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Csv,
    };
    Ok((year, format))
}
