use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::TagsArgs;
use crate::model::FIELD_NAMES;
use crate::notes::{TagAccumulator, load_records, normalize_record};

pub fn run(args: TagsArgs) -> Result<()> {
    let loaded = load_records(&args.inputs, &FIELD_NAMES)?;

    let mut accumulator = TagAccumulator::default();
    for record in &loaded.records {
        normalize_record(record, &mut accumulator);
    }

    info!(
        records = loaded.records.len(),
        tags = accumulator.tags.len(),
        notebooks = accumulator.notebooks.len(),
        "collected tags and notebooks"
    );

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &accumulator)
            .context("failed to serialize tags")?;
        writeln!(stdout)?;
        return Ok(());
    }

    writeln!(stdout, "Tags:")?;
    for tag in &accumulator.tags {
        writeln!(stdout, "  {tag}")?;
    }
    writeln!(stdout, "Notebooks:")?;
    for notebook in &accumulator.notebooks {
        writeln!(stdout, "  {notebook}")?;
    }

    Ok(())
}
