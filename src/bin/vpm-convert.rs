use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use vpm_convert::convert;

const USAGE_EXAMPLES: &str = "\
Examples:
  vpm-convert Car.Shape.Gbx                 export Car.Shape.json
  vpm-convert Car.Shape.json Car.Shape.Gbx  merge into Car.Shape.json.Gbx";

#[derive(Parser)]
#[command(name = "vpm-convert")]
#[command(about = "Convert vehicle physical shapes between Gbx and editable JSON")]
#[command(version)]
struct Cli {
    /// `<shape.Gbx>` to export, or `<document.json> <base.Gbx>` to merge
    paths: Vec<PathBuf>,

    /// Output path (defaults next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the exported document to stdout
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so `--print` output stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.paths.as_slice() {
        [input] => {
            let output = cli.output.clone().unwrap_or_else(|| convert::document_path(input));
            let export = convert::export_file(input, &output)
                .with_context(|| format!("failed to export {:?}", input))?;
            if cli.print {
                println!("{}", export.document.to_json()?);
            }
            tracing::info!("Done! ({} warnings)", export.diagnostics.len());
        },
        [a, b] => {
            let (document, base) = convert::merge_order(a, b);
            let output = cli.output.clone().unwrap_or_else(|| convert::merged_path(document));
            let diags = convert::merge_files(document, base, &output)
                .with_context(|| format!("failed to merge {:?} into {:?}", document, base))?;
            tracing::info!("Done! ({} warnings)", diags.len());
        },
        _ => {
            Cli::command().print_help()?;
            println!("\n\n{}", USAGE_EXAMPLES);
        },
    }

    Ok(())
}
