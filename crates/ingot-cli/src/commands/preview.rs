//! Preview command: parse and display the bounded preview of a file.

use std::path::PathBuf;

use colored::Colorize;
use ingot::{IngestPolicy, RawDocument, parse_preview};

pub async fn run(file: PathBuf, json: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Previewing is local inspection, so any extension is admitted here.
    let document = RawDocument::load(&file, &IngestPolicy::admit_all()).await?;
    let preview = parse_preview(document.text())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    if preview.is_empty() {
        println!("{}", "Nothing to preview (no data rows).".yellow());
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Previewing".cyan().bold(),
        file.display().to_string().white(),
        format!("(first {} rows)", preview.len()).dimmed()
    );
    println!();
    super::print_preview_table(&preview);

    if verbose {
        let info = document.info();
        println!();
        println!(
            "{} {} bytes, {}",
            "Source:".yellow().bold(),
            info.size_bytes,
            info.hash.dimmed()
        );
    }

    Ok(())
}
