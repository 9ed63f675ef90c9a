//! Convert command: drive a session end to end and write the artifact.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use ingot::{
    AnthropicService, ConvertOutcome, GeminiService, IngestPolicy, InferenceService, MockService,
    Session,
};

use crate::cli::ProviderChoice;

pub struct ConvertArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub provider: ProviderChoice,
    pub model: Option<String>,
    pub print: bool,
    pub any_extension: bool,
    pub verbose: bool,
}

pub async fn run(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = build_service(args.provider, args.model)?;

    println!(
        "{} {} {}",
        "Converting".cyan().bold(),
        args.file.display().to_string().white(),
        format!("(provider: {})", service.name()).dimmed()
    );

    let mut session = Session::new(service);
    if args.any_extension {
        session = session.with_policy(IngestPolicy::admit_all());
    }

    let preview = session.ingest_file(&args.file).await?;
    if args.verbose && !preview.is_empty() {
        println!();
        println!("{}", "Preview:".yellow().bold());
        super::print_preview_table(&preview);
        println!();
    }

    match session.convert().await? {
        ConvertOutcome::Completed(result) => {
            let artifact = result.download();
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            artifact.write_to(&output)?;

            println!(
                "{} {}",
                "Saved".green().bold(),
                output.display().to_string().white()
            );

            if args.print {
                println!();
                println!("{}", result.text());
            }
            Ok(())
        }
        // One fresh session drives exactly one request, so neither arm is
        // reachable from this command; report instead of silently passing.
        ConvertOutcome::AlreadyConverting => Err("a conversion is already in flight".into()),
        ConvertOutcome::Discarded => Err("the conversion was superseded before it finished".into()),
    }
}

fn build_service(
    choice: ProviderChoice,
    model: Option<String>,
) -> Result<Arc<dyn InferenceService>, Box<dyn std::error::Error>> {
    let service: Arc<dyn InferenceService> = match choice {
        ProviderChoice::Gemini => {
            let mut service = GeminiService::from_env()?;
            if let Some(model) = model {
                service = service.with_model(model);
            }
            Arc::new(service)
        }
        ProviderChoice::Anthropic => {
            let mut service = AnthropicService::from_env()?;
            if let Some(model) = model {
                service = service.with_model(model);
            }
            Arc::new(service)
        }
        ProviderChoice::Mock => Arc::new(MockService::new()),
    };
    Ok(service)
}
