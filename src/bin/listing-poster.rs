use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "listing-poster", version)]
#[command(group(ArgGroup::new("text_source").required(true).args(["text", "description"])))]
struct Cli {
    /// Photograph to place on the grid (repeat for more; order is kept).
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// File with already-summarized poster text.
    #[arg(long)]
    text: Option<PathBuf>,

    /// File with a raw description, passed through the summarizer first.
    #[arg(long)]
    description: Option<PathBuf>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path, or a directory to write the suggested file name into.
    #[arg(long)]
    out: PathBuf,

    /// Print the composition report as JSON on stderr.
    #[arg(long)]
    dump_report: bool,

    /// Print which glyph source was resolved.
    #[arg(long)]
    dump_fonts: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => listing_poster::PosterConfig::from_path(path)?,
        None => listing_poster::PosterConfig::default(),
    };

    let text = match (&cli.text, &cli.description) {
        (Some(path), _) => read_text(path)?,
        (None, Some(path)) => {
            let description = read_text(path)?;
            listing_poster::summarize_or_placeholder(
                &listing_poster::Verbatim,
                &description,
                &config.summary,
            )
        }
        (None, None) => anyhow::bail!("one of --text or --description is required"),
    };

    let images = cli
        .images
        .iter()
        .map(|p| std::fs::read(p).with_context(|| format!("read image '{}'", p.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let engine = listing_poster::PosterEngine::new(config)?;
    if cli.dump_fonts {
        eprintln!("glyph source: {:?}", engine.face());
    }

    let output = engine.compose(&listing_poster::PosterRequest::new(images, text))?;
    if cli.dump_report {
        eprintln!("{}", serde_json::to_string_pretty(&output.report)?);
    }

    let out = resolve_out_path(&cli.out, &output.file_name);
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &output.png).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        out.display(),
        output.width,
        output.height
    );
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read text '{}'", path.display()))
}

fn resolve_out_path(out: &Path, file_name: &str) -> PathBuf {
    if out.is_dir() {
        out.join(file_name)
    } else {
        out.to_path_buf()
    }
}
