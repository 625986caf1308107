use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use super::load_display_names;
use crate::cli::CiteArgs;
use crate::notes::{grammar_for, parse_citation, render_reference_line};

pub fn run(args: CiteArgs) -> Result<()> {
    let names = load_display_names(&args.data.names_path())?;
    let grammar = grammar_for(&args.url)?;
    info!(url = %args.url, grammar = grammar.as_str(), "parsing citation");

    let mut stdout = io::stdout().lock();
    if args.json {
        let citation = parse_citation(&args.url, &names)?;
        serde_json::to_writer_pretty(&mut stdout, &citation)
            .context("failed to serialize citation")?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", render_reference_line(&args.url, &names)?)?;
    }

    Ok(())
}
