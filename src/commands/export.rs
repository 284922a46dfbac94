use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::core::{Exporter, FolderLibrary, Loader, FOLDER_SOURCE_ID};
use crate::ui::format_count;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let destination = matches
        .get_one::<String>("destination")
        .context("missing destination argument")?;
    let library_root = matches
        .get_one::<String>("library")
        .context("missing library argument")?;
    let quiet = matches.get_flag("quiet");

    let library = FolderLibrary::new(Path::new(library_root))
        .with_context(|| format!("cannot open library at {}", library_root))?;

    if !quiet {
        println!("{}", "Loading media library...".cyan());
    }

    let tree = Loader::new(library, FOLDER_SOURCE_ID)
        .load()
        .context("failed to load the media library")?;

    if !quiet {
        println!(
            "Loaded {} with {}",
            format_count(tree.group_count(), "group").yellow(),
            format_count(tree.item_count(), "item").yellow()
        );
        println!("{}", "Exporting...".cyan());
    }

    Exporter::new(Path::new(destination))
        .export(&tree)
        .with_context(|| format!("export to {} failed", destination))?;

    if !quiet {
        println!(
            "{} {}",
            "Exported to".green().bold(),
            destination.white().bold()
        );
    }

    Ok(())
}
