use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "colrpaint", version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add paints to a font document from a paint script.
    Compile(CompileArgs),
    /// Print the paints of a font document as a paint script.
    Decompile(DecompileArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input font document (JSON).
    font: PathBuf,

    /// Add a variation axis, as 'tag:min:default:max:name'. May be repeated.
    #[arg(long = "add-axis")]
    add_axis: Vec<String>,

    /// Drop the document's existing axes.
    #[arg(long, default_value_t = false)]
    drop_axes: bool,

    /// Paint script.
    #[arg(short, long, default_value = "paints.py")]
    paints: PathBuf,

    /// Output font document (defaults to the input).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DecompileArgs {
    /// Input font document (JSON).
    font: PathBuf,

    /// Output script (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fractional bits numbers are snapped to.
    #[arg(long, default_value_t = colrpaint::DEFAULT_PRECISION)]
    precision: u8,

    /// Line width for re-wrapping statements.
    #[arg(long, default_value_t = 78)]
    width: usize,

    /// Print one line per glyph instead of re-wrapping.
    #[arg(long, default_value_t = false)]
    no_format: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Decompile(args) => cmd_decompile(args),
    }
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let mut doc = colrpaint::FontDocument::from_path(&args.font)?;
    let add_axes = args
        .add_axis
        .iter()
        .map(|s| {
            s.parse::<colrpaint::AxisDef>()
                .with_context(|| format!("--add-axis '{s}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let opts = colrpaint::CompileOptions {
        add_axes,
        drop_axes: args.drop_axes,
    };

    let source = std::fs::read_to_string(&args.paints)
        .with_context(|| format!("read paint script '{}'", args.paints.display()))?;
    colrpaint::compile_document(&mut doc, &source, &opts)
        .with_context(|| format!("compile paints from '{}'", args.paints.display()))?;

    let out = args.output.unwrap_or(args.font);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, doc.to_json()?)
        .with_context(|| format!("write font document '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_decompile(args: DecompileArgs) -> anyhow::Result<()> {
    let doc = colrpaint::FontDocument::from_path(&args.font)?;
    let opts = colrpaint::DecompileOptions {
        precision: args.precision,
        line_width: (!args.no_format).then_some(args.width),
    };
    let text = colrpaint::decompile_document(&doc, &opts)
        .with_context(|| format!("decompile '{}'", args.font.display()))?;

    match args.output {
        Some(out) => {
            std::fs::write(&out, text)
                .with_context(|| format!("write script '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
