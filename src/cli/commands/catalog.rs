//! `fmeda catalog` command - predefined failure-mode distributions

use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::output::{effective_format, emit};
use crate::cli::GlobalOpts;
use crate::core::catalog::{self, CATALOG};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// Component type to show; omit to list all types
    #[arg(value_name = "TYPE")]
    pub component_type: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct TypeRow {
    #[tabled(rename = "TYPE")]
    component_type: &'static str,
    #[tabled(rename = "MODES")]
    modes: usize,
    #[tabled(rename = "COVERED %")]
    share: f64,
}

#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    #[tabled(rename = "FAILURE MODE")]
    description: &'static str,
    #[tabled(rename = "SHARE %")]
    share: f64,
    #[tabled(rename = "SYSTEM EFFECT")]
    system_effect: &'static str,
}

pub fn run(args: CatalogArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = effective_format(global.output, &config);

    let Some(requested) = args.component_type else {
        let rows: Vec<TypeRow> = CATALOG
            .iter()
            .map(|(name, entries)| TypeRow {
                component_type: *name,
                modes: entries.len(),
                share: entries.iter().map(|e| e.share).sum(),
            })
            .collect();
        let ids: Vec<String> = rows.iter().map(|r| r.component_type.to_string()).collect();
        return emit(format, &rows, &rows, &ids);
    };

    let entries = catalog::lookup(&requested).ok_or_else(|| {
        miette::miette!(
            help = format!(
                "known types: {}",
                catalog::component_types().collect::<Vec<_>>().join(", ")
            ),
            "Unknown component type: {}",
            requested
        )
    })?;

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            description: e.description,
            share: e.share,
            system_effect: e.system_effect,
        })
        .collect();
    let ids: Vec<String> = rows.iter().map(|r| r.description.to_string()).collect();

    if rows.is_empty() && format == crate::cli::OutputFormat::Table {
        println!("No predefined failure modes for {}.", requested.trim());
        return Ok(());
    }
    emit(format, &rows, &rows, &ids)
}
