//! Ro-Ro deck layout CLI
//!
//! Each invocation loads a layout file, applies one operation and writes the
//! layout back.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use roro_deck::{
    DeckConfig, Direction, EditOutcome, LayoutStore, VehicleCategory, VehicleEdit, VehiclePreset,
    VehicleSpec,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "roro")]
#[command(about = "Vehicle layout planner for Ro-Ro ship decks")]
#[command(version)]
struct Cli {
    /// Layout file (JSON snapshot)
    #[arg(short, long, global = true, default_value = "layout.json")]
    layout: PathBuf,

    /// Deck configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an empty layout
    New {
        /// Deck length in metres
        #[arg(long)]
        length: Option<f64>,

        /// Deck width in metres
        #[arg(long)]
        width: Option<f64>,

        /// Maximum number of vehicles
        #[arg(short, long)]
        max_vehicles: Option<usize>,
    },

    /// Add a vehicle at the first free slot
    Add {
        /// Standard vehicle size
        #[arg(short, long, value_enum)]
        preset: Option<PresetArg>,

        /// Vehicle name
        #[arg(short, long)]
        name: Option<String>,

        /// Category of a custom vehicle
        #[arg(long, value_enum, default_value = "custom")]
        category: CategoryArg,

        /// Length of a custom vehicle in metres
        #[arg(long)]
        length: Option<f64>,

        /// Width of a custom vehicle in metres
        #[arg(long)]
        width: Option<f64>,

        /// Colour token (picked at random if omitted)
        #[arg(long)]
        color: Option<String>,

        /// Icon token
        #[arg(long)]
        icon: Option<String>,
    },

    /// Remove a vehicle
    Remove { id: u64 },

    /// Move a vehicle to an absolute position
    Move { id: u64, x: f64, y: f64 },

    /// Move a vehicle relative to its position
    Nudge {
        id: u64,

        #[arg(value_enum)]
        direction: DirectionArg,

        /// Distance in metres
        #[arg(short, long, default_value = "0.5")]
        distance: f64,
    },

    /// Change the deck dimensions
    Resize { length: f64, width: f64 },

    /// Change a vehicle's dimensions or name
    Edit {
        id: u64,

        #[arg(long)]
        length: Option<f64>,

        #[arg(long)]
        width: Option<f64>,

        #[arg(short, long)]
        name: Option<String>,
    },

    /// Re-place every vehicle, largest first
    Repack,

    /// Remove every vehicle
    Clear,

    /// Change the vehicle limit
    Capacity { max: usize },

    /// Print layout statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List vehicles
    List,

    /// Verify the layout invariants
    Check,

    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Motor,
    SmallCar,
    MediumCar,
    Truck,
    Bus,
}

impl From<PresetArg> for VehiclePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Motor => VehiclePreset::Motor,
            PresetArg::SmallCar => VehiclePreset::SmallCar,
            PresetArg::MediumCar => VehiclePreset::MediumCar,
            PresetArg::Truck => VehiclePreset::Truck,
            PresetArg::Bus => VehiclePreset::Bus,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Motor,
    Car,
    MediumCar,
    Truck,
    Bus,
    Custom,
}

impl From<CategoryArg> for VehicleCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Motor => VehicleCategory::Light2Wheel,
            CategoryArg::Car => VehicleCategory::SmallVehicle,
            CategoryArg::MediumCar => VehicleCategory::MediumVehicle,
            CategoryArg::Truck => VehicleCategory::HeavyVehicle,
            CategoryArg::Bus => VehicleCategory::Bus,
            CategoryArg::Custom => VehicleCategory::Custom,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Forward,
    Back,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Direction::Forward,
            DirectionArg::Back => Direction::Back,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DeckConfig> {
    let Some(path) = path else {
        return Ok(DeckConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: DeckConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn open_store(config: DeckConfig, layout: &Path) -> anyhow::Result<LayoutStore> {
    let mut store = LayoutStore::new(config)?;
    if layout.exists() {
        let json = std::fs::read_to_string(layout)
            .with_context(|| format!("reading layout {}", layout.display()))?;
        store
            .import_json(&json)
            .with_context(|| format!("importing layout {}", layout.display()))?;
    }
    Ok(store)
}

fn save_store(store: &LayoutStore, layout: &Path) -> anyhow::Result<()> {
    std::fs::write(layout, store.export_json()?)
        .with_context(|| format!("writing layout {}", layout.display()))?;
    Ok(())
}

fn print_vehicles(store: &LayoutStore) {
    println!(
        "{:>4}  {:<16} {:<10} {:>7} {:>7} {:>7} {:>7}",
        "id", "name", "type", "length", "width", "x", "y"
    );
    println!("{:-<66}", "");
    for v in store.vehicles() {
        println!(
            "{:>4}  {:<16} {:<10} {:>7.2} {:>7.2} {:>7.2} {:>7.2}",
            v.id, v.name, v.category, v.length, v.width, v.x, v.y
        );
    }
}

/// Reports where a moved vehicle ended up after snapping.
fn moved_message(store: &LayoutStore, id: u64) -> Option<String> {
    store
        .get(id)
        .map(|v| format!("Moved vehicle {} to ({:.2}, {:.2})", id, v.x, v.y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::New {
            length,
            width,
            max_vehicles,
        } => {
            let mut config = config;
            config.length = length.unwrap_or(config.length);
            config.width = width.unwrap_or(config.width);
            config.max_vehicles = max_vehicles.unwrap_or(config.max_vehicles);
            let store = LayoutStore::new(config)?;
            save_store(&store, &cli.layout)?;
            let surface = store.surface();
            println!(
                "Created {} ({}m x {}m, up to {} vehicles)",
                cli.layout.display(),
                surface.length,
                surface.width,
                store.max_vehicles()
            );
        }

        Commands::Add {
            preset,
            name,
            category,
            length,
            width,
            color,
            icon,
        } => {
            let mut store = open_store(config, &cli.layout)?;
            let mut spec = match (preset, length, width) {
                (Some(preset), _, _) => VehiclePreset::from(preset).spec(),
                (None, Some(length), Some(width)) => {
                    VehicleSpec::new("Custom", category.into(), length, width)
                }
                _ => anyhow::bail!("give either --preset or both --length and --width"),
            };
            if let Some(name) = name {
                spec.name = name;
            }
            if let Some(color) = color {
                spec = spec.with_color(color);
            }
            if let Some(icon) = icon {
                spec = spec.with_icon(icon);
            }

            let id = store.add_vehicle(spec)?;
            save_store(&store, &cli.layout)?;
            if let Some(v) = store.get(id) {
                println!("Added vehicle {} ({}) at ({:.2}, {:.2})", id, v.name, v.x, v.y);
            }
        }

        Commands::Remove { id } => {
            let mut store = open_store(config, &cli.layout)?;
            match store.remove_vehicle(id) {
                Some(v) => {
                    save_store(&store, &cli.layout)?;
                    println!("Removed vehicle {} ({})", v.id, v.name);
                }
                None => println!("No vehicle {}", id),
            }
        }

        Commands::Move { id, x, y } => {
            let mut store = open_store(config, &cli.layout)?;
            store.move_vehicle(id, x, y)?;
            save_store(&store, &cli.layout)?;
            if let Some(message) = moved_message(&store, id) {
                println!("{}", message);
            }
        }

        Commands::Nudge {
            id,
            direction,
            distance,
        } => {
            let mut store = open_store(config, &cli.layout)?;
            store.nudge(id, direction.into(), distance)?;
            save_store(&store, &cli.layout)?;
            if let Some(v) = store.get(id) {
                println!("Vehicle {} now at ({:.2}, {:.2})", id, v.x, v.y);
            }
        }

        Commands::Resize { length, width } => {
            let mut store = open_store(config, &cli.layout)?;
            let report = store.resize_surface(length, width)?;
            save_store(&store, &cli.layout)?;
            println!("Deck resized to {}m x {}m", length, width);
            for r in &report.relocated {
                println!(
                    "  moved {}: ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                    r.id, r.from.x, r.from.y, r.to.x, r.to.y
                );
            }
            for v in &report.evicted {
                println!("  removed {} ({}): no space left", v.id, v.name);
            }
        }

        Commands::Edit {
            id,
            length,
            width,
            name,
        } => {
            let mut store = open_store(config, &cli.layout)?;
            let edit = VehicleEdit {
                name,
                length,
                width,
            };
            let outcome = store.edit_vehicle(id, edit)?;
            save_store(&store, &cli.layout)?;
            match outcome {
                EditOutcome::InPlace => println!("Updated vehicle {}", id),
                EditOutcome::Relocated { to, .. } => {
                    println!("Updated vehicle {}, moved to ({:.2}, {:.2})", id, to.x, to.y)
                }
            }
        }

        Commands::Repack => {
            let mut store = open_store(config, &cli.layout)?;
            let report = store.repack();
            save_store(&store, &cli.layout)?;
            println!("Repacked {} vehicles", report.placed.len());
            for v in &report.rejected {
                println!("  removed {} ({}): no space left", v.id, v.name);
            }
        }

        Commands::Clear => {
            let mut store = open_store(config, &cli.layout)?;
            let removed = store.clear();
            save_store(&store, &cli.layout)?;
            println!("Removed {} vehicles", removed);
        }

        Commands::Capacity { max } => {
            let mut store = open_store(config, &cli.layout)?;
            store.set_max_vehicles(max)?;
            save_store(&store, &cli.layout)?;
            println!("Vehicle limit set to {}", max);
        }

        Commands::Stats { json } => {
            let store = open_store(config, &cli.layout)?;
            let stats = store.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Deck Statistics:");
                println!("================");
                println!("  Deck area:     {:.2} m²", stats.surface_area);
                println!("  Used area:     {:.2} m² ({:.1}%)", stats.used_area, stats.usage_percent);
                println!("  Free area:     {:.2} m²", stats.free_area);
                println!(
                    "  Vehicles:      {} / {} ({:.1}%)",
                    stats.vehicle_count, stats.max_vehicles, stats.capacity_percent
                );
                for (category, count) in &stats.count_by_category {
                    println!("    {:<12} {}", category, count);
                }
            }
        }

        Commands::List => {
            let store = open_store(config, &cli.layout)?;
            print_vehicles(&store);
        }

        Commands::Check => {
            let store = open_store(config, &cli.layout)?;
            store.check_invariants()?;
            println!("Layout OK ({} vehicles)", store.len());
        }

        Commands::ShowConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roro_deck::FixedColor;

    #[test]
    fn test_moved_message_reports_stored_position() {
        let mut store = LayoutStore::new(DeckConfig::new().with_precision(0))
            .unwrap()
            .with_color_picker(FixedColor::new("#EF476F"));
        let id = store.add_preset(VehiclePreset::Motor).unwrap();
        store.move_vehicle(id, 1.4, 2.6).unwrap();
        assert_eq!(
            moved_message(&store, id).as_deref(),
            Some("Moved vehicle 1 to (1.00, 3.00)")
        );
        assert_eq!(moved_message(&store, 99), None);
    }
}
