use clap::{Parser, Subcommand};
use insta_clip::config::{self, Project};
use insta_clip::{export, loader, output, pdf, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "insta-clip")]
#[command(about = "Render a spreadsheet of social-media posts as a site, report and PDF clipping")]
#[command(long_about = "\
Render a spreadsheet of social-media posts as a site, report and PDF clipping

The spreadsheet is the data source: one row per post, one column per field.
Columns may appear in any order and any of them may be missing.

Project structure:

  project/
  ├── config.toml            # Optional, see 'insta-clip gen-config'
  ├── data/
  │   └── posts.xlsx         # First sheet is read
  └── static/                # Local images; cells use /static/avatars/ana.png

Recognized columns:
  post_id, post_image_url, post_caption, post_datetime,
  likes, comments_count, shares_count, comment_1 .. comment_10,
  actor_username, actor_name, actor_avatar_url, actor_bio,
  actor_followers, actor_following

Image cells accept /static/... paths or http(s) URLs; anything else shows
a placeholder.

Set RUST_LOG to control log verbosity (default: info).")]
#[command(version)]
struct Cli {
    /// Project directory holding config.toml, data/ and static/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the live view, re-reading the spreadsheet on every request
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Write a static snapshot of every page
    Export,
    /// Print the clipping and the report to PDF with headless Chrome
    Pdf {
        /// Print from a running live server instead of a temporary snapshot
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Show what the loader reads from the spreadsheet
    Inspect {
        /// Print the dataset as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let load = || Project::load(&cli.root);

    match cli.command {
        Command::Serve { port } => {
            let project = load()?;
            let port = port.unwrap_or(project.config.server.port);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(project, port))?;
        }
        Command::Export => {
            let project = load()?;
            let dataset = loader::load_file(&project.data_path());
            let report = export::export_project(&project, &dataset)?;
            output::print_export_output(&report);
        }
        Command::Pdf { base_url } => {
            let project = load()?;
            let dataset = loader::load_file(&project.data_path());
            let files = pdf::print_project(&project, &dataset, base_url.as_deref())?;
            output::print_pdf_output(&files);
        }
        Command::Inspect { json } => {
            let project = load()?;
            let dataset = loader::load_file(&project.data_path());
            if json {
                println!("{}", serde_json::to_string_pretty(&dataset)?);
            } else {
                output::print_inspect_output(
                    &dataset,
                    &project.config.data.path,
                    &project.config.site.date_format,
                );
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
