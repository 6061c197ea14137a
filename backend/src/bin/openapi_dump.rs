//! Print the OpenAPI document for the events API.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr as _};
use events_api::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the events API OpenAPI document",
    version
)]
struct CliArgs {
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let doc = ApiDoc::openapi();
    let rendered = match args.format {
        Format::Json => doc
            .to_pretty_json()
            .wrap_err("failed to render OpenAPI document as JSON")?,
        Format::Yaml => doc
            .to_yaml()
            .wrap_err("failed to render OpenAPI document as YAML")?,
    };
    println!("{rendered}");
    Ok(())
}
