//! Kopiverse CLI: browse the coffee catalog from a terminal
//!
//! Talks to the SPARQL endpoint directly through the kopiverse library.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use kopiverse::{
    Catalog, CatalogConfig, DetailPage, FilterOptions, FilterSet, Role, RolePage, ViewRecord,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kopiverse", version, about = "Kopiverse coffee catalog CLI")]
struct Cli {
    /// SPARQL query endpoint URL
    #[arg(long, global = true, env = "KOPIVERSE_ENDPOINT")]
    url: Option<String>,

    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog as one role sees it
    Role {
        /// grower (or petani), roaster, barista
        role: Role,

        /// Keyword matched against names, flavors and ingredients
        #[arg(long)]
        q: Option<String>,

        /// Origin label
        #[arg(long)]
        origin: Option<String>,

        /// Process label
        #[arg(long)]
        process: Option<String>,

        /// Hide beverages containing dairy
        #[arg(long)]
        vegan: bool,
    },
    /// Show one item with similar suggestions
    Detail {
        /// Item local name, e.g. GayoWineLot
        id: String,
    },
    /// List the available origin and process filters
    Options,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::from_file(path)?,
        None => CatalogConfig::default(),
    }
    .with_env_overrides()?;
    if let Some(url) = cli.url {
        config.endpoint = url;
    }

    let catalog = Catalog::connect(config)?;

    match cli.command {
        Commands::Role {
            role,
            q,
            origin,
            process,
            vegan,
        } => {
            let mut builder = FilterSet::builder().vegan(vegan);
            if let Some(q) = q {
                builder = builder.keyword(q);
            }
            if let Some(origin) = origin {
                builder = builder.origin(origin);
            }
            if let Some(process) = process {
                builder = builder.process(process);
            }
            let page = catalog.role_page(role, &builder.build()?).await?;
            print_role_page(&page, &cli.format)
        }
        Commands::Detail { id } => {
            let page = catalog.detail_page(&id).await?;
            print_detail_page(&page, &cli.format)
        }
        Commands::Options => {
            let options = catalog.filter_options().await;
            print_options(&options, &cli.format)
        }
    }
}

fn print_role_page(
    page: &RolePage,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    println!("{}", page.title);
    if let Some(stats) = &page.stats {
        println!("Total asset: {}   Total stock: {}", stats.total_asset, stats.total_kg);
    }

    if page.records.is_empty() {
        println!("(no results)");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(role_header(page.role));
    for record in &page.records {
        table.add_row(role_row(record));
    }

    println!("{}", table);
    println!("{} item(s)", page.records.len());
    Ok(())
}

fn role_header(role: Role) -> Vec<&'static str> {
    match role {
        Role::Grower => vec!["ID", "Name", "Price", "Score", "Harvest", "Farming", "Flavors"],
        Role::Roaster => vec![
            "ID", "Name", "Price", "Origin", "Process", "Score", "Stock", "Level", "Flavors",
        ],
        Role::Barista => vec!["ID", "Name", "Price", "Shop", "Base", "Ingredients", "Flavors"],
    }
}

fn role_row(record: &ViewRecord) -> Vec<String> {
    match record {
        ViewRecord::Grower(r) => vec![
            r.id.clone(),
            r.title.clone(),
            r.price.clone(),
            r.score.clone(),
            r.harvest.clone(),
            r.organic.clone(),
            r.flavors.join(", "),
        ],
        ViewRecord::Roaster(r) => vec![
            r.id.clone(),
            r.title.clone(),
            r.price.clone(),
            r.origin.clone(),
            r.process.clone(),
            r.score.clone(),
            format!("{} Kg", r.stock_kg),
            r.stock_level.label().to_string(),
            r.flavors.join(", "),
        ],
        ViewRecord::Barista(r) => vec![
            r.id.clone(),
            r.title.clone(),
            r.price.clone(),
            r.shop.clone(),
            r.base_coffee.clone(),
            r.ingredients.join(", "),
            r.flavors.join(", "),
        ],
        ViewRecord::Detail(r) => vec![r.id.clone(), r.name.clone(), r.price.clone()],
    }
}

fn print_detail_page(
    page: &DetailPage,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    let item = &page.item;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", item.name.as_str()]);
    let fields: [(&str, &str); 14] = [
        ("ID", item.id.as_str()),
        ("Price", item.price.as_str()),
        ("Score", item.score.as_str()),
        ("Description", item.description.as_str()),
        ("Shop", item.shop.as_str()),
        ("Farm", item.farm.as_str()),
        ("Altitude", item.altitude.as_str()),
        ("Origin", item.origin.as_str()),
        ("Process", item.process.as_str()),
        ("Harvest", item.harvest.as_str()),
        ("Moisture", item.moisture.as_str()),
        ("Density", item.density.as_str()),
        ("Roast profile", item.roast_profile.as_str()),
        ("Base coffee", item.base_coffee.as_str()),
    ];
    for (label, value) in fields {
        table.add_row(vec![label, value]);
    }
    let brew = format!(
        "{} / {} / {}",
        item.specs.temperature, item.specs.time, item.specs.ratio
    );
    table.add_row(vec!["Brew".to_string(), brew]);
    table.add_row(vec!["Ingredients".to_string(), item.ingredients.join(", ")]);
    table.add_row(vec!["Flavors".to_string(), item.flavors.join(", ")]);
    println!("{}", table);

    if page.recommendations.is_empty() {
        return Ok(());
    }
    println!("\nFrom the same origin:");
    for rec in &page.recommendations {
        println!("  {:<24} {:<32} {}", rec.id, rec.name, rec.price);
    }
    Ok(())
}

fn print_options(
    options: &FilterOptions,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(options)?);
        }
        OutputFormat::Table => {
            println!("Origins:   {}", options.origins.join(", "));
            println!("Processes: {}", options.processes.join(", "));
        }
    }
    Ok(())
}
