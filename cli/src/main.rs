mod harvest;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use barcart_core::measure::convert_to_oz_with_ml;
use barcart_core::{Category, Inventory, InventoryItem, SearchResponse};

#[derive(Parser)]
#[command(name = "barcart")]
#[command(about = "Barcart CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the local ingredient inventory
    Inventory {
        /// Inventory file
        #[arg(long, default_value = "barcart-inventory.json")]
        file: PathBuf,
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// List cocktails makeable from the local inventory
    Available {
        /// Server URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Inventory file
        #[arg(long, default_value = "barcart-inventory.json")]
        file: PathBuf,
    },
    /// Print one recipe in full
    Show {
        /// Recipe id (numeric, local-, ninja-, custom-)
        id: String,
        /// Server URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Harvest the bundled static dataset from public recipe sources
    GenerateDataset {
        /// Output path for the dataset document
        #[arg(long, default_value = "data/cocktails.json")]
        out: PathBuf,
        /// Required number of recipes after dedup
        #[arg(long, default_value_t = 1000)]
        target: usize,
    },
}

#[derive(Subcommand)]
enum InventoryAction {
    /// Add an ingredient (a duplicate name is a no-op)
    Add {
        /// Display name
        name: String,
        /// Canonical English name used for matching (defaults to the name)
        #[arg(long)]
        name_en: Option<String>,
        /// One of: base, liqueur, mixer, other
        #[arg(long, default_value = "base")]
        category: String,
    },
    /// Remove an ingredient by id
    Remove { id: String },
    /// Print the inventory
    List,
    /// Remove every ingredient
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inventory { file, action } => inventory_command(&file, action),
        Commands::Available { server, file } => available(&server, &file).await,
        Commands::Show { id, server } => show(&server, &id).await,
        Commands::GenerateDataset { out, target } => harvest::generate_dataset(&out, target).await,
    }
}

fn load_inventory(path: &Path) -> Inventory {
    match std::fs::read_to_string(path) {
        Ok(raw) => Inventory::parse_lenient(&raw),
        Err(_) => Inventory::new(),
    }
}

fn save_inventory(path: &Path, inventory: &Inventory) -> Result<()> {
    let json = serde_json::to_string_pretty(inventory.items())?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write inventory to {}", path.display()))
}

fn inventory_command(file: &Path, action: InventoryAction) -> Result<()> {
    let mut inventory = load_inventory(file);

    match action {
        InventoryAction::Add {
            name,
            name_en,
            category,
        } => {
            let category = Category::parse(&category)
                .with_context(|| format!("unknown category {category:?}"))?;
            let name_en = name_en.unwrap_or_else(|| name.clone());
            let item = InventoryItem::new(name, name_en, category);
            if inventory.add(item) {
                save_inventory(file, &inventory)?;
                println!("Added. {} ingredient(s) owned.", inventory.len());
            } else {
                println!("Already owned, nothing to do.");
            }
        }
        InventoryAction::Remove { id } => {
            if inventory.remove(&id) {
                save_inventory(file, &inventory)?;
                println!("Removed.");
            } else {
                println!("No ingredient with id {id}.");
            }
        }
        InventoryAction::List => {
            if inventory.is_empty() {
                println!("Inventory is empty.");
            }
            for item in inventory.items() {
                println!(
                    "{}  {} ({})  [{}]",
                    item.id,
                    item.name,
                    item.name_en,
                    item.category.as_str()
                );
            }
        }
        InventoryAction::Clear => {
            inventory.clear();
            save_inventory(file, &inventory)?;
            println!("Inventory cleared.");
        }
    }

    Ok(())
}

async fn available(server: &str, file: &Path) -> Result<()> {
    let inventory = load_inventory(file);
    if inventory.is_empty() {
        println!("Inventory is empty; nothing can be mixed.");
        return Ok(());
    }

    let url = format!("{}/api/available", server.trim_end_matches('/'));
    let response: SearchResponse = reqwest::Client::new()
        .get(&url)
        .query(&[("ingredients", inventory.owned_names().join(","))])
        .send()
        .await
        .context("request to server failed")?
        .error_for_status()
        .context("server returned an error")?
        .json()
        .await
        .context("invalid response body")?;

    if response.drinks.is_empty() {
        println!("Nothing can be mixed from the current inventory.");
        return Ok(());
    }

    println!("{} cocktail(s) available:", response.drinks.len());
    for drink in response.drinks {
        println!("  {}  ({})", drink.name, drink.id);
    }

    Ok(())
}

async fn show(server: &str, id: &str) -> Result<()> {
    let url = format!("{}/api/search/{}", server.trim_end_matches('/'), id);
    let response = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .context("request to server failed")?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        println!("No cocktail with id {id}.");
        return Ok(());
    }

    let response: SearchResponse = response
        .error_for_status()
        .context("server returned an error")?
        .json()
        .await
        .context("invalid response body")?;

    let Some(drink) = response.drinks.into_iter().next() else {
        println!("No cocktail with id {id}.");
        return Ok(());
    };

    println!("{}  ({})", drink.name, drink.id);
    if !drink.glass.is_empty() {
        println!("Glass: {}", drink.glass);
    }
    println!();
    for slot in &drink.ingredients {
        // Metric measures are shown in oz with the ml equivalent.
        match slot.measure.as_deref() {
            Some(measure) => println!(
                "  {} {}",
                convert_to_oz_with_ml(measure),
                slot.ingredient
            ),
            None => println!("  {}", slot.ingredient),
        }
    }
    if !drink.instructions.is_empty() {
        println!("\n{}", drink.instructions);
    }

    Ok(())
}
