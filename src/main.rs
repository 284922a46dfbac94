use anyhow::Result;
use clap::{Arg, Command};

fn main() -> Result<()> {
    photo_export::init_logging();

    let matches = Command::new("photo-export")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export a photo library into a deduplicated, browsable directory tree")
        .arg(
            Arg::new("destination")
                .help("Directory to export into (must not exist)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("library")
                .short('l')
                .long("library")
                .value_name("PATH")
                .help("Path to the photo library root directory")
                .required(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress progress output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    photo_export::commands::export(&matches)
}
