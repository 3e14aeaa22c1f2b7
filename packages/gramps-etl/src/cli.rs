//! Command-line interface for the Gramps XML translator.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::DEFAULT_STORE_PATH;
use crate::entity::EntityKind;
use crate::error::{EtlError, Result};
use crate::etl::{export_gramps_xml, import_gramps_xml, write_gramps_xml};
use crate::store::{Store, YamlStore};
use crate::translator::create_gramps_registry;

/// Output path meaning "write plain XML to stdout".
const STDOUT_PATH: &str = "-";

/// WTFamily ETL - Convert Gramps XML to native records and back.
#[derive(Parser)]
#[command(name = "wtfamily-etl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a Gramps XML file (plain or gzipped) into the store.
    Import {
        /// Path to the .gramps or .xml file
        path: PathBuf,

        /// Store file (default: wtfamily.yaml)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Translate and validate without committing
        #[arg(long)]
        dry_run: bool,
    },

    /// Export the store as a Gramps XML file.
    Export {
        /// Output file, or "-" for plain XML on stdout
        output: PathBuf,

        /// Store file (default: wtfamily.yaml)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Write plain XML instead of gzip
        #[arg(long)]
        plain: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            path,
            store,
            dry_run,
        } => import_command(&path, store.as_deref(), dry_run),
        Commands::Export {
            output,
            store,
            plain,
        } => export_command(&output, store.as_deref(), plain),
    }
}

fn store_path(store: Option<&Path>) -> &Path {
    store.unwrap_or(Path::new(DEFAULT_STORE_PATH))
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the import command.
fn import_command(path: &Path, store: Option<&Path>, dry_run: bool) -> Result<()> {
    if !path.is_file() {
        return Err(EtlError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file does not exist: {}", path.display()),
        )));
    }

    let store_path = store_path(store);

    println!(
        "{} {} into {}",
        style("Importing").bold(),
        style(path.display()).cyan(),
        style(store_path.display()).green()
    );
    println!();

    let mut store = YamlStore::open(store_path)?;
    let registry = create_gramps_registry();

    let pb = spinner("Translating entities...");
    let summary = match import_gramps_xml(path, &mut store, &registry, dry_run) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    for (kind, count) in &summary.counts {
        println!("  {kind}: {count}");
    }
    println!();

    if summary.committed {
        println!(
            "{} {} entities",
            style("Imported").green().bold(),
            summary.total()
        );
    } else {
        println!(
            "{} {} entities translated, nothing saved",
            style("Dry run:").yellow().bold(),
            summary.total()
        );
    }

    Ok(())
}

/// Execute the export command.
fn export_command(output: &Path, store: Option<&Path>, plain: bool) -> Result<()> {
    let store_path = store_path(store);
    if !store_path.is_file() {
        return Err(EtlError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Store file does not exist: {}", store_path.display()),
        )));
    }

    let store = YamlStore::open(store_path)?;
    let registry = create_gramps_registry();

    if output.as_os_str() == STDOUT_PATH {
        let xml = export_gramps_xml(&store, &registry)?;
        std::io::stdout().write_all(xml.as_bytes())?;
        return Ok(());
    }

    println!(
        "{} {} to {}",
        style("Exporting").bold(),
        style(store_path.display()).cyan(),
        style(output.display()).green()
    );
    println!();

    let pb = spinner("Rendering Gramps XML...");
    let result = export_gramps_xml(&store, &registry)
        .and_then(|xml| write_gramps_xml(output, &xml, !plain));
    pb.finish_and_clear();
    result?;

    for kind in EntityKind::ALL {
        let count = store.records(kind).len();
        if count > 0 {
            println!("  {kind}: {count}");
        }
    }
    println!();
    println!("{} {}", style("Saved to:").green().bold(), output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from(["wtfamily-etl", "import", "family.gramps"]);

        let Commands::Import {
            path,
            store,
            dry_run,
        } = cli.command
        else {
            panic!("expected import command");
        };
        assert_eq!(path, PathBuf::from("family.gramps"));
        assert!(store.is_none());
        assert!(!dry_run);
    }

    #[test]
    fn test_cli_parse_export_with_options() {
        let cli = Cli::parse_from([
            "wtfamily-etl",
            "export",
            "out.gramps",
            "--store",
            "data.yaml",
            "--plain",
        ]);

        let Commands::Export {
            output,
            store,
            plain,
        } = cli.command
        else {
            panic!("expected export command");
        };
        assert_eq!(output, PathBuf::from("out.gramps"));
        assert_eq!(store, Some(PathBuf::from("data.yaml")));
        assert!(plain);
    }

    #[test]
    fn test_store_path_default() {
        assert_eq!(store_path(None), Path::new(DEFAULT_STORE_PATH));
    }
}
