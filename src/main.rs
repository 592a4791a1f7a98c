use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docweave::cli::CommandContext;
use docweave::cli::commands;

#[derive(Parser)]
#[command(name = "docweave")]
#[command(
    version,
    about = "Restructure Markdown documents into template-conformant pages and site navigation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Use this config file instead of the global and project files")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report heading structure and write navigation.yml and analysis.json
    Analyze {
        #[arg(help = "Markdown document")]
        file: PathBuf,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Reformat a document with a template
    Apply {
        #[arg(help = "Markdown document")]
        file: PathBuf,
        #[arg(long, short, help = "Template name (default from config)")]
        template: Option<String>,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long = "meta", short = 'm', help = "Frontmatter value as key=value")]
        meta: Vec<String>,
    },

    /// Run the full pipeline and publish site directories
    Process {
        #[arg(required = true, help = "Markdown documents")]
        files: Vec<PathBuf>,
        #[arg(long, short, help = "Template name (default from config)")]
        template: Option<String>,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long, short, help = "Documents processed concurrently")]
        jobs: Option<usize>,
        #[arg(long = "meta", short = 'm', help = "Frontmatter value as key=value")]
        meta: Vec<String>,
    },

    /// Fetch a document from a source directory and publish it
    Publish {
        #[arg(help = "Document id (file name without .md)")]
        id: String,
        #[arg(long, short, default_value = ".", help = "Source directory")]
        source: PathBuf,
        #[arg(long, short, help = "Template name (default from config)")]
        template: Option<String>,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long = "meta", short = 'm', help = "Frontmatter value as key=value")]
        meta: Vec<String>,
    },

    /// List, show and export templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List registered templates
    List {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Print a template definition as YAML
    Show { name: String },
    /// Write a template definition to a YAML file
    Export { name: String, path: PathBuf },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mdocweave encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace with RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            file,
            output,
            format,
        } => {
            let ctx = CommandContext::load(config_file)?;
            commands::analyze::run(&ctx, &file, output, &format)?;
        }
        Commands::Apply {
            file,
            template,
            output,
            meta,
        } => {
            let ctx = CommandContext::load(config_file)?;
            commands::apply::run(&ctx, &file, template, output, &meta)?;
        }
        Commands::Process {
            files,
            template,
            output,
            jobs,
            meta,
        } => {
            let ctx = CommandContext::load(config_file)?;
            let metadata = commands::apply::parse_metadata(&meta)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::process::run(
                &ctx, &files, template, output, jobs, &metadata,
            ))?;
        }
        Commands::Publish {
            id,
            source,
            template,
            output,
            meta,
        } => {
            let ctx = CommandContext::load(config_file)?;
            let metadata = commands::apply::parse_metadata(&meta)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::process::publish_from_source(
                &ctx, &source, &id, template, output, &metadata,
            ))?;
        }
        Commands::Templates { action } => {
            let ctx = CommandContext::load(config_file)?;
            match action {
                TemplateAction::List { format } => commands::templates::list(&ctx, &format)?,
                TemplateAction::Show { name } => commands::templates::show(&ctx, &name)?,
                TemplateAction::Export { name, path } => {
                    commands::templates::export(&ctx, &name, &path)?
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                let ctx = CommandContext::load(config_file)?;
                commands::config::show(&ctx.config, global, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    commands::config::init_global(force)?;
                } else {
                    commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
