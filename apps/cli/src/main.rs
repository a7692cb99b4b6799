use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rceditor_container::{validate, ResourceContainer};
use rceditor_core::initial_manifest;

#[derive(Parser)]
#[command(
    name = "rceditor-cli",
    about = "Headless commands for Resource Containers",
    author,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 建立新的 Resource Container。 / Create a Resource Container with a default manifest.
    Init(InitArgs),
    /// 以 JSON 輸出 manifest。 / Print the manifest as JSON.
    Inspect(ContainerArgs),
    /// 檢查 manifest 是否可儲存。 / Check whether the manifest would pass the save gate.
    Validate(ContainerArgs),
}

#[derive(Args)]
struct InitArgs {
    /// 容器目錄；不存在時會建立。 / Container directory; created when missing.
    dir: PathBuf,

    #[arg(long)]
    identifier: Option<String>,

    /// 內容語言代碼，例如 `en`。 / Content language code, e.g. `en`.
    #[arg(long, value_name = "CODE")]
    language: Option<String>,

    #[arg(long)]
    title: Option<String>,
}

#[derive(Args)]
struct ContainerArgs {
    /// 容器目錄。 / Container directory.
    dir: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli { command } = Cli::parse();
    match command {
        Commands::Init(args) => execute_init(args),
        Commands::Inspect(args) => execute_inspect(&args.dir),
        Commands::Validate(args) => execute_validate(&args.dir),
    }
}

fn execute_init(args: InitArgs) -> Result<()> {
    let InitArgs {
        dir,
        identifier,
        language,
        title,
    } = args;
    let container = ResourceContainer::create(&dir, |manifest| {
        *manifest = initial_manifest();
        let dc = &mut manifest.dublin_core;
        if let Some(identifier) = identifier {
            dc.identifier = identifier;
        }
        if let Some(language) = language {
            dc.language.identifier = language;
        }
        if let Some(title) = title {
            dc.title = title;
        }
    })
    .with_context(|| format!("failed to create Resource Container in {}", dir.display()))?;
    println!(
        "Created Resource Container at {}",
        container.manifest_path().display()
    );
    Ok(())
}

fn execute_inspect(dir: &Path) -> Result<()> {
    let container = open(dir)?;
    let json = serde_json::to_string_pretty(&container.manifest)
        .context("failed to render manifest as JSON")?;
    println!("{json}");
    Ok(())
}

fn execute_validate(dir: &Path) -> Result<()> {
    let container = open(dir)?;
    let report = validate(&container);
    if report.is_valid() {
        println!("{}: manifest is valid", dir.display());
        return Ok(());
    }
    for issue in &report.issues {
        println!("  - {issue}");
    }
    bail!(
        "{} has {} validation issue(s)",
        dir.display(),
        report.issues.len()
    );
}

fn open(dir: &Path) -> Result<ResourceContainer> {
    ResourceContainer::open(dir)
        .with_context(|| format!("failed to open Resource Container {}", dir.display()))
}
