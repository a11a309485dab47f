// Tooolbar - render a toolbar definition file
//
// Usage: tooolbar [FILE] [--dump]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tooolbar::ToolbarFile;

#[derive(Parser)]
#[command(name = "tooolbar")]
#[command(about = "Render a toolbar definition file", long_about = None)]
struct Cli {
    /// Toolbar file (default: the toolbar.toml in the config directory)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the tool configurations as JSON instead of markup
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so the markup on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let file = match &args.file {
        Some(path) => ToolbarFile::load(path)
            .with_context(|| format!("Failed to load toolbar file {}", path.display()))?,
        None => ToolbarFile::load_default().context("Failed to load the default toolbar file")?,
    };

    let bar = file.build_bar().context("Failed to build the toolbar")?;
    tracing::info!(items = bar.len(), theme = %bar.theme(), "Toolbar ready");

    if args.dump {
        let dump = serde_json::to_string_pretty(&bar.dump())?;
        println!("{}", dump);
    } else {
        if let Some(css) = bar.theme_css() {
            println!("<style>\n{}\n</style>", css);
        }
        println!("{}", bar.render().to_markup());
    }

    Ok(())
}
