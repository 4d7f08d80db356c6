use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{format_table, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::matching::MatchedProduct;
use crate::products::{FieldAccess, SortDirection};
use crate::services::{ProductViewRequest, ProductViewService};

#[derive(Subcommand)]
pub enum ProductsCommands {
    #[command(about = "Render a product view from a JSON file (product array or full view request)")]
    View {
        #[arg(help = "Path to JSON input")]
        file: PathBuf,
        #[arg(long, help = "Field to sort by")]
        key: Option<String>,
        #[arg(long, value_parser = parse_direction, help = "asc or desc")]
        direction: Option<SortDirection>,
        #[arg(long, help = "Case-insensitive search over name, vendor, category")]
        search: Option<String>,
        #[arg(long, help = "Field to group by")]
        group_by: Option<String>,
    },
}

fn parse_direction(s: &str) -> Result<SortDirection, String> {
    s.parse().map_err(|e: crate::products::SortError| e.to_string())
}

pub fn handle(cmd: ProductsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProductsCommands::View { file, key, direction, search, group_by } => {
            let mut request = read_request(&file)?;

            if key.is_some() || direction.is_some() {
                let defaults = &config::config().products;
                let key = key.unwrap_or_else(|| defaults.default_sort_key.clone());
                let direction = direction.unwrap_or(defaults.default_sort_direction);
                request.sort = Some(json!({ "key": key, "direction": direction }));
            }
            if search.is_some() {
                request.search = search;
            }
            if group_by.is_some() {
                request.group_by = group_by;
            }

            let view = ProductViewService::new(&config::config().products).render(request)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("{} products sorted by {}", view.total, view.sort),
                    Some(serde_json::to_value(&view)?),
                ),
                OutputFormat::Text => {
                    let rows: Vec<Vec<String>> = view.items.iter().map(row_for).collect();
                    println!("{}", format_table(&["id", "name", "vendor", "match", "catalog"], &rows));
                    if let Some(groups) = &view.groups {
                        println!();
                        for (group, keys) in groups {
                            let label = if group.is_empty() { "(none)" } else { group.as_str() };
                            println!("{}: {}", label, keys.join(", "));
                        }
                    }
                    Ok(())
                }
            }
        }
    }
}

fn read_request(path: &Path) -> anyhow::Result<ProductViewRequest> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))?;
    let request = match value {
        Value::Array(_) => ProductViewRequest { products: serde_json::from_value(value)?, ..Default::default() },
        other => serde_json::from_value(other).context("expected a product array or a view request object")?,
    };
    Ok(request)
}

fn row_for(row: &MatchedProduct) -> Vec<String> {
    let text = |key: &str| {
        let value = row.field(key);
        if value.is_missing() {
            "-".to_string()
        } else {
            value.as_text().into_owned()
        }
    };
    vec![text("id"), text("name"), text("vendor"), text("match"), text("catalog")]
}
