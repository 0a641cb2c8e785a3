use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;

use opaf::document::{ActionDef, BlockDef, ChartDef, ColorDef, ConfigDef, ValueDef};

#[derive(Parser, Debug)]
#[command(name = "opaf", version)]
struct Cli {
    /// Log level: error, warn, info, debug or trace.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve includes and write a self-contained package.
    Package(PackageArgs),
    /// Compile a package into instructions.
    Compile(CompileArgs),
    /// Write the images embedded in a package to a directory.
    ExtractImages(ExtractArgs),
    /// Print the configs, colours and definitions of a pattern as JSON.
    Describe(DescribeArgs),
}

#[derive(Parser, Debug)]
struct PackageArgs {
    /// Source pattern.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file; defaults to `<stem>_<version>.opafpkg` next to the input.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Packaged pattern.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; the compiled document goes to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Config overrides, `name=value,...`.
    #[arg(long, default_value = "")]
    values: String,

    /// Colour overrides, `name=value,...`.
    #[arg(long, default_value = "")]
    colors: String,
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Packaged pattern.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DescribeArgs {
    /// Source or packaged pattern.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.cmd {
        Command::Package(args) => cmd_package(args),
        Command::Compile(args) => cmd_compile(args),
        Command::ExtractImages(args) => cmd_extract_images(args),
        Command::Describe(args) => cmd_describe(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let level = match level.to_ascii_lowercase().as_str() {
        l @ ("error" | "warn" | "info" | "debug" | "trace") => l.to_owned(),
        _ => "info".to_owned(),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

fn read_pattern(path: &Path) -> anyhow::Result<opaf::PatternDocument> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !ext.starts_with("opaf") {
        anyhow::bail!(
            "'{}' is not an OPAF file (expected a .opaf extension)",
            path.display()
        );
    }
    opaf::Parser::default()
        .parse(path)
        .with_context(|| format!("parse pattern '{}'", path.display()))
}

fn read_package(path: &Path) -> anyhow::Result<opaf::PatternDocument> {
    let doc = read_pattern(path)?;
    if !doc.is_packaged() {
        anyhow::bail!("'{}' has not been packaged", path.display());
    }
    Ok(doc)
}

fn cmd_package(args: PackageArgs) -> anyhow::Result<()> {
    let doc = read_pattern(&args.in_path)?;
    let xml = opaf::Packager.to_xml_string(&doc)?;

    let out = match args.out {
        Some(out) => out,
        None => {
            let stem = args
                .in_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("pattern");
            let version = doc
                .version
                .as_deref()
                .unwrap_or(opaf::package::DEFAULT_VERSION);
            args.in_path
                .with_file_name(format!("{stem}_{version}.opafpkg"))
        }
    };
    std::fs::write(&out, xml).with_context(|| format!("write package '{}'", out.display()))?;
    tracing::info!(path = %out.display(), "package written");
    Ok(())
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let doc = read_package(&args.in_path)?;
    let input = opaf::CompileInput {
        values: opaf::parse_override_list(&args.values),
        colors: opaf::parse_override_list(&args.colors),
    };
    let xml = opaf::Compiler::new(&doc).to_xml_string(&input)?;

    match args.out {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create output dir '{}'", dir.display()))?;
            let file = dir.join(format!("{}.xml", doc.name.to_lowercase().replace(' ', "_")));
            std::fs::write(&file, xml)
                .with_context(|| format!("write compiled pattern '{}'", file.display()))?;
            tracing::info!(path = %file.display(), "compiled pattern written");
        }
        None => {
            std::io::stdout()
                .write_all(xml.as_bytes())
                .context("write compiled pattern to stdout")?;
        }
    }
    Ok(())
}

fn cmd_extract_images(args: ExtractArgs) -> anyhow::Result<()> {
    let doc = read_package(&args.in_path)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    for img in &doc.images {
        let ext = image::guess_format(&img.data)
            .ok()
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("bin");
        let file = args.out.join(format!("{}.{ext}", img.name));
        std::fs::write(&file, &img.data)
            .with_context(|| format!("write image '{}'", file.display()))?;
        tracing::info!(path = %file.display(), "image extracted");
    }
    Ok(())
}

#[derive(Serialize)]
struct Description<'a> {
    name: &'a str,
    version: Option<&'a str>,
    unique_id: Option<&'a str>,
    packaged: bool,
    configs: &'a [ConfigDef],
    values: &'a [ValueDef],
    colors: &'a [ColorDef],
    actions: &'a [ActionDef],
    blocks: &'a [BlockDef],
    charts: &'a [ChartDef],
    components: Vec<&'a str>,
    images: Vec<&'a str>,
}

fn cmd_describe(args: DescribeArgs) -> anyhow::Result<()> {
    let doc = read_pattern(&args.in_path)?;
    let description = Description {
        name: &doc.name,
        version: doc.version.as_deref(),
        unique_id: doc.unique_id.as_deref(),
        packaged: doc.is_packaged(),
        configs: &doc.configs,
        values: &doc.values,
        colors: &doc.colors,
        actions: &doc.actions,
        blocks: &doc.blocks,
        charts: &doc.charts,
        components: doc.components.iter().map(|c| c.name.as_str()).collect(),
        images: doc.images.iter().map(|i| i.name.as_str()).collect(),
    };
    let json = serde_json::to_string_pretty(&description).context("serialize description")?;
    println!("{json}");
    Ok(())
}
