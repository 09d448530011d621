use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pow5tab::{emit, table_ctx, PowerTables, MIN_PRECISION, PRECISION};
use tempfile::NamedTempFile;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pow5tab")]
#[command(about = "Generates the power-of-five multiplier tables", long_about = None)]
struct Cli {
    /// Where to write the generated source.
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// A license to copy into a comment at the top of the output.
    #[arg(long, value_name = "PATH")]
    license: Option<PathBuf>,

    /// The output language.
    #[arg(long, value_enum, default_value_t = Lang::Rust)]
    format: Lang,

    /// The `::`-separated module or namespace to put the tables in.
    #[arg(long, default_value = "numeric")]
    namespace: String,

    /// Significant decimal digits used for the arithmetic.
    #[arg(
        long,
        value_name = "DIGITS",
        default_value_t = PRECISION,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_PRECISION)..),
    )]
    precision: u32,

    /// Check every entry with exact integer arithmetic before
    /// writing.
    #[arg(long)]
    verify: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Lang {
    Rust,
    Cpp,
}

impl From<Lang> for emit::Format {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Rust => Self::Rust,
            Lang::Cpp => Self::Cpp,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let license = cli
        .license
        .as_deref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("unable to read license `{}`", path.display()))
        })
        .transpose()?;

    let ctx = table_ctx().with_precision(cli.precision);
    info!(precision = ctx.precision(), "computing power tables");
    let tables = PowerTables::generate(&ctx).context("unable to compute power tables")?;
    if cli.verify {
        tables.verify().context("generated tables failed verification")?;
        info!("verified power tables");
    }

    let opts = emit::Options {
        format: cli.format.into(),
        namespace: &cli.namespace,
        license: license.as_deref(),
    };
    publish(&cli.output, |w| emit::write(w, &tables, &opts))
        .with_context(|| format!("unable to write `{}`", cli.output.display()))?;
    info!(output = %cli.output.display(), "wrote power tables");
    Ok(())
}

/// Writes `path` by filling a temporary file next to it and
/// renaming it into place, so readers never see a partial file.
fn publish<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("unable to create a temporary file in `{}`", dir.display()))?;
    {
        let mut w = BufWriter::new(&mut tmp);
        fill(&mut w)?;
        w.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
