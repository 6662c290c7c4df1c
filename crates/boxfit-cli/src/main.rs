use anyhow::{bail, Result};
use boxfit_core::{BoxReport, Catalog, GroupEnumerator, DEFAULT_MAX_ITEMS};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Largest `--max-items` value accepted on the command line.
const MAX_ITEMS_LIMIT: u32 = 10;

#[derive(Parser)]
#[command(name = "boxfit")]
#[command(about = "Shipping box finder - Which boxes fit which products", long_about = None)]
struct Cli {
    /// Catalog file (YAML or JSON). Uses the built-in catalog when omitted.
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalog
    Products,

    /// List boxes in the catalog
    Boxes,

    /// Show the boxes a product fits into
    Fit {
        /// Product id
        #[arg(short, long)]
        product: u32,
    },

    /// Enumerate product groups that can ship together
    Groups {
        /// Only report this box
        #[arg(short, long = "box")]
        box_id: Option<String>,

        /// Maximum copies of a single product in one group
        #[arg(short, long, default_value_t = DEFAULT_MAX_ITEMS)]
        max_items: u32,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog)?;

    match cli.command {
        Commands::Products => products_command(&catalog),
        Commands::Boxes => boxes_command(&catalog),
        Commands::Fit { product } => fit_command(&catalog, product)?,
        Commands::Groups {
            box_id,
            max_items,
            output,
        } => groups_command(&catalog, box_id, max_items, output)?,
    }

    Ok(())
}

fn load_catalog(path: Option<PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => {
            println!(
                "{} {}",
                "🔍 Loading catalog from".bright_blue(),
                path.display().to_string().bright_white()
            );
            Ok(Catalog::from_path(&path)?)
        }
        None => Ok(Catalog::builtin()),
    }
}

fn format_dims(dims: &[f64; 3]) -> String {
    format!("{} × {} × {} cm", dims[0], dims[1], dims[2])
}

fn products_command(catalog: &Catalog) {
    println!("{}", "📦 Products:".bright_yellow().bold());
    for product in catalog.products() {
        println!(
            "  {:>3} {} {} ({}, {} g)",
            product.id,
            product.glyph,
            product.name.bright_white(),
            format_dims(&product.dims),
            product.weight
        );
    }
}

fn boxes_command(catalog: &Catalog) {
    println!("{}", "📮 Boxes:".bright_yellow().bold());
    for shipping_box in catalog.boxes() {
        println!(
            "  {} {} ({}, max {} kg)",
            shipping_box.id.bright_cyan(),
            shipping_box.name.bright_white(),
            format_dims(&shipping_box.dims),
            shipping_box.max_weight
        );
        if !shipping_box.aliases.is_empty() {
            println!("      also: {}", shipping_box.aliases.join(", "));
        }
    }
}

fn fit_command(catalog: &Catalog, product_id: u32) -> Result<()> {
    let product = catalog.product(product_id)?;
    let boxes = catalog.compatible_boxes(product);

    println!(
        "{} {} {} ({})",
        "🔎".bright_blue(),
        product.glyph,
        product.name.bright_white().bold(),
        format_dims(&product.dims)
    );

    if boxes.is_empty() {
        println!("  {}", "No compatible boxes".bright_red());
        return Ok(());
    }

    let label = if boxes.len() == 1 {
        "compatible box"
    } else {
        "compatible boxes"
    };
    println!("  {} {}", boxes.len().to_string().bright_green().bold(), label);
    for shipping_box in boxes {
        println!(
            "    • {} {} ({})",
            shipping_box.id.bright_cyan(),
            shipping_box.name,
            format_dims(&shipping_box.dims)
        );
    }

    Ok(())
}

fn groups_command(
    catalog: &Catalog,
    box_id: Option<String>,
    max_items: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    if !(2..=MAX_ITEMS_LIMIT).contains(&max_items) {
        bail!("--max-items must be between 2 and {}", MAX_ITEMS_LIMIT);
    }

    let enumerator = GroupEnumerator::new(catalog);
    let reports = match box_id {
        Some(id) => vec![enumerator.report(catalog.shipping_box(&id)?, max_items)],
        None => enumerator.report_all(max_items),
    };

    for report in &reports {
        print_report(catalog, report)?;
    }

    let json = serde_json::to_string_pretty(&reports)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved report to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_report(catalog: &Catalog, report: &BoxReport) -> Result<()> {
    let shipping_box = catalog.shipping_box(&report.box_id)?;

    println!(
        "{} {} ({}, max {} kg)",
        report.box_id.bright_cyan().bold(),
        report.box_name.bright_white(),
        format_dims(&report.dims),
        report.max_weight
    );
    println!(
        "  {} single products, {} combinations",
        report.compatible_products.len().to_string().bright_white(),
        report.groups.len().to_string().bright_white()
    );

    for group in &report.groups {
        let items: Vec<String> = group
            .items
            .iter()
            .map(|item| {
                if item.quantity > 1 {
                    format!("{} ×{}", item.product.name, item.quantity)
                } else {
                    item.product.name.clone()
                }
            })
            .collect();

        let weight = format!("{:.2} kg", group.weight_kg());
        let weight = if group.near_capacity(shipping_box) {
            weight.bright_yellow()
        } else {
            weight.bright_green()
        };

        println!(
            "    • {} ({} items, ≈ {:.1} × {:.1} × {:.1} cm, {})",
            items.join(" + "),
            group.total_items(),
            group.stack_dims[0],
            group.stack_dims[1],
            group.stack_dims[2],
            weight
        );
    }
    println!();

    Ok(())
}
