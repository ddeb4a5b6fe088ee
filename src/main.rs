mod cli;

use reelsplice::{
    config,
    pipeline::{ClipDirs, PipelineExecutor},
    project::ProjectLayout,
    reassemble::SegmentReassembler,
    subtitle,
};
use reelsplice_av::{
    ConcatStrategy, FfmpegCutter, FfprobeProber, FormatValidator, MediaProber, ReencodeConcat,
    StreamCopyConcat, ToolRegistry,
};
use reelsplice_common::Label;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelsplice=trace,reelsplice_av=trace,reelsplice_common=debug".to_string()
        } else {
            "reelsplice=debug,reelsplice_av=debug,reelsplice_common=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init {
            movie,
            manifest,
            languages,
            no_move,
        } => init_project(&movie, manifest, languages, !no_move, config_path),
        Commands::Split {
            project,
            label,
            suffix,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(split_project(&project, label, suffix.as_deref(), config_path))
        }
        Commands::Merge {
            project,
            output,
            reencode,
            check_coverage,
            suffix,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(merge_project(
                &project,
                output,
                reencode,
                check_coverage,
                suffix.as_deref(),
                config_path,
            ))
        }
        Commands::Subtitles {
            srt,
            language,
            output,
            leading_filler,
        } => convert_subtitles(&srt, &language, output, leading_filler, config_path),
        Commands::Burn {
            video,
            subtitles,
            output,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(burn(&video, &subtitles, &output, config_path))
        }
        Commands::Probe { file, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(probe_file(&file, json, config_path))
        }
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelsplice {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_project(
    movie: &Path,
    manifest: Option<PathBuf>,
    languages: Vec<String>,
    move_files: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let manifest = manifest.or_else(|| {
        let sibling = movie.with_extension("json");
        sibling.exists().then_some(sibling)
    });
    let languages = if languages.is_empty() {
        config.project.target_languages.clone()
    } else {
        languages
    };

    let layout = ProjectLayout::new(
        movie,
        &config.project.base_language,
        &languages,
        manifest.as_deref(),
    );
    let root = layout
        .create(move_files)
        .with_context(|| format!("Failed to create project for {:?}", movie))?;

    println!("✓ Project ready: {}", root.display());
    println!("  Movie: {}", layout.input_movie().display());
    match layout.input_manifest() {
        Some(m) => println!("  Manifest: {}", m.display()),
        None => println!("  Manifest: none (copy a *.json manifest into Input/ before splitting)"),
    }
    if !languages.is_empty() {
        println!("  Languages: {}", languages.join(", "));
    }
    Ok(())
}

async fn split_project(
    project: &Path,
    label: Option<Label>,
    suffix: Option<&str>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let layout = ProjectLayout::open(project, &config.project.base_language)
        .with_context(|| format!("Failed to open project {:?}", project))?;
    let manifest = layout
        .input_manifest()
        .ok_or_else(|| anyhow::anyhow!("No *.json manifest found in {:?}", layout.input_root()))?;

    let tools = ToolRegistry::discover(&config.tools);
    let prober: Arc<dyn MediaProber> = Arc::new(FfprobeProber::from_registry(&tools)?);
    let cutter = Arc::new(FfmpegCutter::from_registry(&tools)?);

    let mut extraction = config.extraction.clone();
    if let Some(label) = label {
        extraction.label = label;
    }

    let executor = PipelineExecutor::new(prober, cutter, &extraction);
    let outcome = executor
        .split(
            &layout.input_movie(),
            &manifest,
            &ClipDirs::from_layout(&layout),
            suffix,
        )
        .await?;

    let report = &outcome.report;
    println!("Duration: {}", outcome.duration);
    println!(
        "Intervals: {} {} / {} {}",
        outcome.labeled.len(),
        extraction.label,
        outcome.derived.len(),
        extraction.label.complement()
    );
    println!("Clips written: {}", report.clips.len());

    if !report.is_complete() {
        for failure in &report.failures {
            eprintln!("✗ {}: {}", failure.interval, failure.error);
        }
        anyhow::bail!(
            "{} of {} clips failed",
            report.failures.len(),
            report.failures.len() + report.clips.len()
        );
    }

    println!("✓ Split complete");
    Ok(())
}

async fn merge_project(
    project: &Path,
    output: Option<PathBuf>,
    reencode: bool,
    check_coverage: bool,
    suffix: Option<&str>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let layout = ProjectLayout::open(project, &config.project.base_language)
        .with_context(|| format!("Failed to open project {:?}", project))?;

    let tools = ToolRegistry::discover(&config.tools);
    let prober: Arc<dyn MediaProber> = Arc::new(FfprobeProber::from_registry(&tools)?);
    let cutter = Arc::new(FfmpegCutter::from_registry(&tools)?);

    let strategy: Arc<dyn ConcatStrategy> =
        if reencode || config.merge.strategy == config::MergeStrategyKind::Reencode {
            Arc::new(ReencodeConcat::from_registry(
                &tools,
                config.merge.reencode_settings(),
            )?)
        } else {
            Arc::new(StreamCopyConcat::from_registry(&tools)?)
        };
    let reassembler = SegmentReassembler::new(FormatValidator::new(Arc::clone(&prober)), strategy);

    let output = output.unwrap_or_else(|| layout.merged_output(&config.merge.output_name));
    let source = check_coverage.then(|| layout.input_movie());

    let executor = PipelineExecutor::new(prober, cutter, &config.extraction);
    let merged = executor
        .merge(
            &reassembler,
            &ClipDirs::from_layout(&layout),
            suffix,
            &output,
            source.as_deref(),
        )
        .await?;

    println!("✓ Merged into {}", merged.display());
    Ok(())
}

fn convert_subtitles(
    srt: &Path,
    language: &str,
    output: Option<PathBuf>,
    leading_filler: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let output = output.unwrap_or_else(|| srt.with_extension("ass"));

    let synchronizer = subtitle::TimelineSynchronizer::new(&config.subtitles.styles)
        .with_leading_filler(leading_filler || config.subtitles.leading_filler);
    let timeline = subtitle::convert_with(&synchronizer, srt, &output, language)
        .with_context(|| format!("Failed to convert {:?}", srt))?;

    println!("✓ Wrote {}", output.display());
    println!(
        "  Language: {} ({} cues, {} events)",
        timeline.language,
        timeline.cue_count(),
        timeline.events.len()
    );
    Ok(())
}

async fn burn(
    video: &Path,
    subtitles: &Path,
    output: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools);

    let written = reelsplice_av::burn_subtitles(&tools, video, subtitles, output).await?;
    println!("✓ Wrote {}", written.display());
    Ok(())
}

async fn probe_file(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools);
    let prober = FfprobeProber::from_registry(&tools)?;

    let profile = prober.video_profile(file).await?;
    let duration = prober.duration(file).await?;

    if json {
        let value = serde_json::json!({
            "file": file,
            "video": profile,
            "duration_secs": duration.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let hours = mins / 60;
        println!("File: {}", file.display());
        println!("Video: {}", profile);
        println!("Duration: {:02}:{:02}:{:02}", hours, mins % 60, secs % 60);
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to split and merge clips.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_summary(&config);
        }
    }

    Ok(())
}

fn print_summary(config: &config::Config) {
    println!(
        "  Extraction: {} workers, manifest label {}",
        config.extraction.max_workers, config.extraction.label
    );
    println!("  Merge strategy: {:?}", config.merge.strategy);
    println!("  Base language: {}", config.project.base_language);
    println!(
        "  Target languages: {}",
        config.project.target_languages.len()
    );
    println!("  Subtitle styles: {}", config.subtitles.styles.len());
}
