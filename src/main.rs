//! `uimap` command line interface.
//!
//! Compiles declarative UI-map files and answers the questions the library
//! answers at runtime: does everything compile, which pages exist, which
//! page matches a URL, and what XPath a locator resolves to.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uimap_model::{Locator, NodeKind};
use uimap_selector::UimapSelector;
use uimap_source::{PageRegistry, PageSource, SourceEntry};

#[derive(Parser)]
#[command(
    name = "uimap",
    version,
    about = "Compile UI-map page definitions and translate locators to XPath"
)]
struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every UI map under the given locations and report problems
    Check(SourceArgs),

    /// List compiled pages with their URL patterns
    Pages(PagesArgs),

    /// Find the page whose URL pattern matches a URL
    MatchUrl(MatchUrlArgs),

    /// Translate a locator to an XPath expression
    Xpath(XpathArgs),
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// UI-map files or directories scanned recursively for *.yml
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// URL prefix prepended to every compiled page's pattern
    #[arg(long, default_value = "")]
    prefix: String,

    /// Skip unrecognized sections instead of failing
    #[arg(long)]
    lenient: bool,
}

#[derive(Args)]
struct PagesArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MatchUrlArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Candidate URL
    #[arg(long)]
    url: String,
}

#[derive(Args)]
struct XpathArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Resolve the page by key
    #[arg(long)]
    page_key: Option<String>,

    /// Resolve the page by URL
    #[arg(long)]
    page_url: Option<String>,

    /// Element key
    #[arg(long)]
    key: Option<String>,

    /// Element type (field, select, button, checkbox, link, element, tab, fieldset)
    #[arg(long = "type")]
    kind: Option<NodeKind>,

    /// Fieldset scope
    #[arg(long)]
    fieldset: Option<String>,

    /// Tab scope
    #[arg(long)]
    tab: Option<String>,

    /// Substitution parameter, repeatable
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => check(args),
        Commands::Pages(args) => pages(args),
        Commands::MatchUrl(args) => match_url(args),
        Commands::Xpath(args) => xpath(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn registry(args: &SourceArgs) -> Result<PageRegistry> {
    let entries = args
        .paths
        .iter()
        .map(|path| SourceEntry::new(args.prefix.clone(), path))
        .collect();
    let registry = PageRegistry::new(entries).context("cannot create page registry")?;
    Ok(if args.lenient {
        registry.lenient()
    } else {
        registry
    })
}

fn check(args: SourceArgs) -> Result<()> {
    let documents = registry(&args)?
        .documents()
        .context("compilation failed")?;
    println!("OK: {} pages", documents.len());
    Ok(())
}

fn pages(args: PagesArgs) -> Result<()> {
    let documents = registry(&args.source)?.documents()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    } else {
        for page in documents {
            println!("{}\t{}\t{}", page.key(), page.url(), page.title());
        }
    }
    Ok(())
}

fn match_url(args: MatchUrlArgs) -> Result<()> {
    let page = registry(&args.source)?.page_by_url(&args.url)?;
    println!("{}", page.key());
    Ok(())
}

fn xpath(args: XpathArgs) -> Result<()> {
    if args.page_key.is_none() && args.page_url.is_none() {
        bail!("either --page-key or --page-url is required");
    }

    let mut locator = Locator::new();
    if let Some(page_key) = args.page_key {
        locator = locator.with_page_key(page_key);
    }
    if let Some(page_url) = args.page_url {
        locator = locator.with_page_url(page_url);
    }
    if let Some(key) = args.key {
        locator = locator.with_key(key);
    }
    if let Some(kind) = args.kind {
        locator = locator.with_kind(kind);
    }
    if let Some(fieldset) = args.fieldset {
        locator = locator.with_fieldset(fieldset);
    }
    if let Some(tab) = args.tab {
        locator = locator.with_tab(tab);
    }
    for param in &args.params {
        let Some((name, value)) = param.split_once('=') else {
            bail!("parameter '{param}' is not of the form NAME=VALUE");
        };
        locator = locator.with_parameter(name, value);
    }

    let selector = UimapSelector::new(Arc::new(registry(&args.source)?));
    println!("{}", selector.to_xpath(&locator)?);
    Ok(())
}
