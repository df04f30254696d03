use clap::{Parser, Subcommand};
use reqpub::references::ProjectFiles;
use reqpub::{PublishOptions, Publisher, Tree, config, output, publish};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let hash = env!("REQPUB_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "reqpub")]
#[command(about = "Publish requirement documents as text, Markdown, or HTML")]
#[command(long_about = "\
Publish requirement documents as text, Markdown, or HTML

Input is a JSON publishing manifest describing a tree of documents:

  {
    \"documents\": [
      { \"prefix\": \"REQ\",
        \"items\": [
          { \"id\": \"REQ001\", \"level\": \"1.0\", \"heading\": true, \"text\": \"Overview\" },
          { \"id\": \"REQ002\", \"level\": \"1.1\", \"text\": \"The system shall...\",
            \"ref\": \"main.rs\", \"links\": [\"SYS001\"] }
        ],
        \"children\": [] }
    ]
  }

Publishing to a directory writes one file per document plus index.html.
Publishing to a file (with --document) writes that one document.

Run 'reqpub gen-config' to generate a documented reqpub.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log progress (otherwise RUST_LOG applies)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct PublishArgs {
    /// JSON publishing manifest
    manifest: PathBuf,

    /// Output directory (tree) or file (with --document)
    path: PathBuf,

    /// Output format extension (.txt, .md, .html); defaults to PATH's extension
    #[arg(long, short)]
    format: Option<String>,

    /// Publish only the document with this prefix, to a single file
    #[arg(long)]
    document: Option<String>,

    /// Render links as hyperlinks
    #[arg(long, conflicts_with = "no_linkify")]
    linkify: bool,

    /// Render links as plain ids
    #[arg(long)]
    no_linkify: bool,

    /// Skip writing index.html
    #[arg(long)]
    no_index: bool,

    /// Show references verbatim instead of resolving them
    #[arg(long)]
    no_check_ref: bool,

    /// Omit child links
    #[arg(long)]
    no_child_links: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Publish a manifest's documents
    Publish(PublishArgs),
    /// Write index.html for an already-published directory
    Index {
        /// Directory containing published files
        directory: PathBuf,
    },
    /// Print a stock reqpub.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Publish(args) => {
            let mut publish_config = config::load_config(&cli.config)?;
            if args.no_check_ref {
                publish_config.check_ref = false;
            }
            if args.no_child_links {
                publish_config.publish_child_links = false;
            }
            let options = PublishOptions {
                format: args.format,
                linkify: linkify_flag(args.linkify, args.no_linkify),
                create_index: publish_config.create_index && !args.no_index,
            };

            let tree = Tree::from_json_file(&args.manifest)?;
            // Earlier output and the manifest itself hold every reference verbatim.
            let locator = ProjectFiles::new(publish_config.project_root.clone())
                .excluding(&args.manifest)
                .excluding(&args.path);
            let publisher = Publisher::new(publish_config).with_locator(locator);
            let report = match &args.document {
                Some(prefix) => {
                    let document = tree
                        .walk()
                        .into_iter()
                        .find(|d| &d.prefix == prefix)
                        .ok_or_else(|| format!("no document with prefix '{prefix}'"))?;
                    publisher.publish(document, &args.path, &options)?
                }
                None => publisher.publish(&tree, &args.path, &options)?,
            };
            output::print_publish_output(&report, &args.path);
        }
        Command::Index { directory } => {
            let index = publish::index(&directory)?;
            output::print_index_output(index.as_deref(), &directory);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--linkify` / `--no-linkify`; neither leaves the publisher's default.
fn linkify_flag(linkify: bool, no_linkify: bool) -> Option<bool> {
    match (linkify, no_linkify) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
