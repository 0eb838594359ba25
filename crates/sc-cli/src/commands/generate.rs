//! Generate command implementation

use anyhow::{Context, Result};
use sc_db::Catalog;
use sc_gen::{GenerateOptions, GenerationReport, Generator, RunOutcome};
use sc_template::{RenderContext, TemplateRenderer};
use std::path::PathBuf;

use crate::cli::{GenerateArgs, GenerateOutput, GlobalArgs};
use crate::commands::common::{self, ExitCode, EXIT_PHASE_FAILED};

/// Execute the generate command
pub async fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = common::load_config(global)?;

    let mut options = GenerateOptions::from_config(&config, &root);
    if let Some(path) = &args.output_path {
        options.output_dir = PathBuf::from(path);
    }
    if let Some(test_class) = &args.test_class {
        options.test_class = test_class.clone();
    }
    options.skip.extend(args.skip.iter().copied());
    options.filters = common::merge_filters(options.filters, &args.filters);
    options.dry_run = args.dry_run;
    if let Some(source) = &args.objects_from {
        let objects = common::read_objects(source).await?;
        if global.verbose {
            eprintln!("[verbose] Read {} objects from {}", objects.len(), source);
        }
        options.explicit = Some(objects);
    }

    let template_folder = args
        .template_folder
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| config.template_folder_absolute(&root));
    let renderer = TemplateRenderer::for_folder(template_folder.as_deref())
        .context("Failed to load templates")?;
    if global.verbose {
        match template_folder {
            Some(folder) => eprintln!("[verbose] Templates from {}", folder.display()),
            None => eprintln!("[verbose] Using built-in templates"),
        }
    }

    let catalog = common::open_catalog(&args.connection, &config, global, &root)?;
    let creator = common::resolve_creator(args.creator.as_deref(), config.creator.as_deref());

    if global.verbose {
        eprintln!(
            "[verbose] Test class {} -> {}{}",
            options.test_class,
            options.output_dir.display(),
            if options.dry_run { " (dry run)" } else { "" }
        );
    }

    let generator = Generator::new(
        catalog.as_ref().map(|c| c as &dyn Catalog),
        &renderer,
        RenderContext::new(&creator),
        options,
    );
    let report = generator.run().await.context("Test generation failed")?;

    match args.output {
        GenerateOutput::Text => print_summary(&report, args.dry_run, global.verbose),
        GenerateOutput::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
    }

    if report.has_phase_failures() {
        return Err(ExitCode(EXIT_PHASE_FAILED).into());
    }
    Ok(())
}

/// Print a human-readable run summary
fn print_summary(report: &GenerationReport, dry_run: bool, verbose: bool) {
    let verb = if dry_run { "Would write" } else { "Wrote" };
    for result in &report.results {
        if verbose {
            println!(
                "  {} {} ({}, {})",
                verb,
                result.file_name.display(),
                result.category,
                result.target
            );
        } else {
            println!("  {} {}", verb, result.file_name.display());
        }
    }

    for skipped in &report.skipped {
        eprintln!(
            "  Skipped {} test for {} in phase {}: {}",
            skipped.category, skipped.target, skipped.phase, skipped.error
        );
    }
    for failure in &report.phase_failures {
        eprintln!("  Phase {} failed: {}", failure.phase, failure.error);
    }
    if report.collisions > 0 {
        eprintln!(
            "  Warning: {} test name collision(s); later tests replaced earlier files",
            report.collisions
        );
    }

    println!();
    match report.outcome() {
        RunOutcome::Clean => println!("Generated {} tests", report.results.len()),
        RunOutcome::CompletedWithSkips(n) => println!(
            "Generated {} tests, {} skipped or failed",
            report.results.len(),
            n
        ),
    }
}
