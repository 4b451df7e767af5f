//! Ranking output for stdout.
use skyrank_common::OutputFormat;
use skyrank_graph::{AccountRef, Rankings};
use std::io::{self, Write};

pub fn write_rankings<W: Write>(out: &mut W, rankings: &Rankings, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, rankings),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rankings)?;
            writeln!(out)
        }
    }
}

fn write_text<W: Write>(out: &mut W, rankings: &Rankings) -> io::Result<()> {
    for entry in &rankings.absolute {
        writeln!(out, "{}: {}", entry.count, label(&entry.account))?;
    }
    writeln!(out)?;
    for entry in &rankings.relative {
        writeln!(
            out,
            "{:.4}: {}",
            entry.share.unwrap_or_default(),
            label(&entry.account)
        )?;
    }
    Ok(())
}

fn label(account: &AccountRef) -> String {
    match &account.display_name {
        Some(name) => format!("{} ({})", account.handle, name),
        None => account.handle.clone(),
    }
}
