//! Set management commands.
//!
//! Lists factory and user sets, prints a set as TOML, and exports factory
//! sets into the user sets directory for editing.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rackmap_config::paths::{ensure_user_sets_dir, set_name_from_path};
use rackmap_config::{
    LiveSet, config_file, factory_sets, get_factory_set, list_user_sets, load_set,
    user_config_dir, user_sets_dir,
};

#[derive(Args)]
pub struct SetsArgs {
    #[command(subcommand)]
    command: SetsCommand,
}

#[derive(Subcommand)]
enum SetsCommand {
    /// List available sets (factory and user)
    List {
        /// Show only factory sets
        #[arg(long)]
        factory: bool,

        /// Show only user sets
        #[arg(long)]
        user: bool,
    },

    /// Print a set as TOML
    Show {
        /// Set name or path
        name: String,
    },

    /// Copy a factory set into the user sets directory
    Export {
        /// Factory set name
        name: String,

        /// Destination file (default: <user sets>/<name>.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config and set directories
    Paths,
}

pub fn run(args: SetsArgs) -> anyhow::Result<()> {
    match args.command {
        SetsCommand::List { factory, user } => list_sets(factory, user),
        SetsCommand::Show { name } => show_set(&name),
        SetsCommand::Export {
            name,
            output,
            force,
        } => export_set(&name, output, force),
        SetsCommand::Paths => show_paths(),
    }
}

fn list_sets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Sets:");
        println!("=============");
        for set in factory_sets() {
            let desc = set.description.as_deref().unwrap_or("");
            println!("  {:20} - {desc}", set.name);
        }
        println!();
    }

    if !factory_only {
        println!("User Sets:");
        println!("==========");
        let paths = list_user_sets();
        if paths.is_empty() {
            println!("  (none)");
            println!();
            println!("  Export one with: rackmap sets export <factory set>");
        }
        for path in paths {
            let name = set_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
            match LiveSet::load(&path) {
                Ok(set) => {
                    let desc = set.description.as_deref().unwrap_or("");
                    println!("  {name:20} - {desc}");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable set");
                    println!("  {name:20} - (error loading)");
                }
            }
        }
        println!();
    }
    Ok(())
}

fn show_set(name: &str) -> anyhow::Result<()> {
    let set = load_set(name)?;
    print!("{}", set.to_toml()?);
    Ok(())
}

fn export_set(name: &str, output: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let set = get_factory_set(name)
        .ok_or_else(|| anyhow::anyhow!("Factory set '{name}' not found."))?;

    let path = match output {
        Some(path) => path,
        None => ensure_user_sets_dir()?.join(format!("{name}.toml")),
    };
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    set.save(&path)?;
    println!("Exported factory set '{}' to {}", set.name, path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("Config dir:  {}", user_config_dir().display());
    println!("Config file: {}", config_file().display());
    println!("User sets:   {}", user_sets_dir().display());
    Ok(())
}
