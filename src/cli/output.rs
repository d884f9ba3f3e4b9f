//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::warn;

use crate::cli::OutputFormat;
use crate::core::Config;

/// Determine the effective output format
///
/// `auto` falls back to the configured format, then to a table.
pub fn effective_format(format: OutputFormat, config: &Config) -> OutputFormat {
    match format {
        OutputFormat::Auto => match config.format.as_deref().map(str::parse::<OutputFormat>) {
            Some(Ok(OutputFormat::Auto)) | None => OutputFormat::Table,
            Some(Ok(configured)) => configured,
            Some(Err(e)) => {
                warn!("ignoring configured output format: {}", e);
                OutputFormat::Table
            }
        },
        other => other,
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

pub fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

/// Write flat records as CSV with a header row
pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

pub fn print_table<T: Tabled>(rows: &[T]) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

/// Render a record in whichever format was asked for
///
/// `structured` is used for JSON/YAML, `rows` for table/CSV output.
pub fn emit<S, R>(format: OutputFormat, structured: &S, rows: &[R], ids: &[String]) -> Result<()>
where
    S: Serialize + ?Sized,
    R: Serialize + Tabled,
{
    match format {
        OutputFormat::Json => print_json(structured),
        OutputFormat::Yaml => print_yaml(structured),
        OutputFormat::Csv => print_csv(rows),
        OutputFormat::Id => {
            for id in ids {
                println!("{}", id);
            }
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Auto => {
            print_table(rows);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_format_wins() {
        let config = Config {
            format: Some("json".to_string()),
            ..Config::default()
        };
        assert_eq!(effective_format(OutputFormat::Csv, &config), OutputFormat::Csv);
    }

    #[test]
    fn test_auto_uses_config_then_table() {
        let mut config = Config::default();
        assert_eq!(effective_format(OutputFormat::Auto, &config), OutputFormat::Table);

        config.format = Some("YAML".to_string());
        assert_eq!(effective_format(OutputFormat::Auto, &config), OutputFormat::Yaml);

        config.format = Some("xml".to_string());
        assert_eq!(effective_format(OutputFormat::Auto, &config), OutputFormat::Table);
    }
}
