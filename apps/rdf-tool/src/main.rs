//! CLI tool for record schemas and record files.
//!
//! Provides commands for:
//! - Printing the layout a schema file produces
//! - Printing a schema's layout fingerprint
//! - Dumping the records of a binary data file

mod cli;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use memmap2::Mmap;
use rdf_core::{Descriptor, RecordView, SchemaFile};
use tracing::Level;

use cli::{Cli, Commands};

fn load_descriptor(path: &Path) -> anyhow::Result<Descriptor> {
    let schema = SchemaFile::from_path(path)?;
    schema
        .into_descriptor()
        .with_context(|| format!("invalid schema {}", path.display()))
}

fn dump(
    descriptor: &Descriptor,
    data: &Path,
    limit: Option<usize>,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let file = File::open(data).with_context(|| format!("failed to open {}", data.display()))?;
    let len = file.metadata()?.len();

    writeln!(out, "{}", descriptor.header())?;
    if len == 0 {
        return Ok(0);
    }
    if len % descriptor.mem_size() as u64 != 0 {
        bail!(
            "{} is {} bytes, not a whole number of {}-byte records",
            data.display(),
            len,
            descriptor.mem_size()
        );
    }

    // SAFETY: the mapping is read-only and dropped before returning; the tool
    // does not guard against other processes truncating the file meanwhile.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map {}", data.display()))?;
    let view = RecordView::new(descriptor, &map)?;
    tracing::debug!(records = view.len(), path = %data.display(), "mapped data file");

    let mut written = 0;
    for (index, record) in view.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        let line = record
            .render()
            .with_context(|| format!("record {} of {}", index, data.display()))?;
        writeln!(out, "{line}")?;
        written += 1;
    }
    Ok(written)
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Describe { schema, by_offset } => {
            let descriptor = load_descriptor(&schema)?;
            write!(out, "{}", descriptor.describe(by_offset))?;
        }
        Commands::Fingerprint { schema } => {
            let descriptor = load_descriptor(&schema)?;
            writeln!(out, "{:08x}", descriptor.fingerprint())?;
        }
        Commands::Dump {
            schema,
            data,
            limit,
        } => {
            let descriptor = load_descriptor(&schema)?;
            let count = dump(&descriptor, &data, limit, out)?;
            tracing::info!(records = count, "dump complete");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}
