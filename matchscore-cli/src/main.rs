//! matchscore CLI - rank a folder of resumes against a job description
//!
//! # Commands
//!
//! ```bash
//! # Score every resumes/*.pdf against job_desc.txt and write result_<timestamp>.xlsx
//! matchscore
//!
//! # Same, with explicit inputs and a JSON report
//! matchscore --job-desc jd.txt --resumes ./cvs --format json
//!
//! # Show how a document is split into model-sized chunks
//! matchscore chunk resumes/jane.pdf
//!
//! # List the embedding models that can be used
//! matchscore models
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use matchscore_lib::{
    chunk::ChunkMetadata,
    config::{self, MatchConfig},
    embed::{Embedder, ModelCache, SentenceEmbedder},
    extract::{PdfExtractor, PlainTextExtractor, TextExtractor},
    normalize::normalize,
    pipeline::run_job,
    report::ReportFormat,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "matchscore")]
#[command(about = "Rank resumes against a job description by embedding similarity")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Job description text file
    #[arg(long, env = "MATCHSCORE_JOB_DESC", default_value = config::DEFAULT_REFERENCE)]
    job_desc: PathBuf,

    /// Folder containing the candidate resumes
    #[arg(long, env = "MATCHSCORE_RESUMES", default_value = config::DEFAULT_CANDIDATE_DIR)]
    resumes: PathBuf,

    /// Folder the report is written to
    #[arg(long, env = "MATCHSCORE_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Folder holding the cached-<model> directory
    #[arg(long, env = "MATCHSCORE_CACHE_DIR", default_value = ".")]
    cache_dir: PathBuf,

    /// Embedding model name (see `matchscore models`)
    #[arg(short, long, env = "MATCHSCORE_MODEL", default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Chunk size in tokens (defaults to the model input limit)
    #[arg(long, env = "MATCHSCORE_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Tokens shared by consecutive chunks
    #[arg(long, env = "MATCHSCORE_OVERLAP", default_value_t = config::DEFAULT_OVERLAP)]
    overlap: usize,

    /// Report format: "xlsx" or "json"
    #[arg(short, long, env = "MATCHSCORE_FORMAT", default_value = "xlsx")]
    format: ReportFormat,

    /// Abort on the first unreadable resume instead of skipping it
    #[arg(long, env = "MATCHSCORE_FAIL_FAST", default_value_t = false)]
    fail_fast: bool,
}

impl RunArgs {
    fn to_config(&self) -> MatchConfig {
        MatchConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            overlap: self.overlap,
            cache_root: self.cache_dir.clone(),
            reference_path: self.job_desc.clone(),
            candidate_dir: self.resumes.clone(),
            output_dir: self.output_dir.clone(),
            format: self.format,
            fail_fast: self.fail_fast,
            ..MatchConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a document with the model tokenizer and show the result
    Chunk {
        /// PDF or text file to chunk
        input: PathBuf,
    },

    /// List supported embedding models
    Models,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => run(&cli.run),
        Some(Commands::Chunk { input }) => chunk(&cli.run, &input),
        Some(Commands::Models) => {
            for name in SentenceEmbedder::supported_models() {
                let spec = SentenceEmbedder::lookup(name)?;
                println!("{:<40} {:>5} dims  {:>4} tokens", spec.name, spec.dimension, spec.max_tokens);
            }
            Ok(())
        }
    }
}

fn load_embedder(config: &MatchConfig) -> Result<SentenceEmbedder> {
    let spec = SentenceEmbedder::lookup(&config.model)?;
    let cache = ModelCache::new(&config.cache_root, spec.name);
    SentenceEmbedder::load(&spec, &cache)
        .with_context(|| format!("failed to load model '{}' via {}", spec.name, cache.path().display()))
}

fn run(args: &RunArgs) -> Result<()> {
    println!("Starting matchscore...");

    let config = args.to_config();
    config.validate()?;

    let embedder = load_embedder(&config)?;
    let chunker = config.chunker(embedder.spec().max_tokens)?;
    info!(
        model = embedder.model_name(),
        dimension = embedder.dimension(),
        max_tokens = chunker.max_tokens(),
        overlap = chunker.overlap(),
        "model ready"
    );

    let summary = run_job(&config, embedder, PdfExtractor::new(), chunker, |progress| {
        println!("{progress}");
    })
    .context("matching run failed")?;

    if !summary.report.skipped.is_empty() {
        println!(
            "\n{} resume(s) could not be scored and are listed separately in the report",
            summary.report.skipped.len()
        );
    }
    println!(
        "\nFinished successfully. Check results in {}",
        summary.output.display()
    );
    Ok(())
}

fn chunk(args: &RunArgs, input: &Path) -> Result<()> {
    let config = args.to_config();
    config.validate()?;

    let raw = if input.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
        PdfExtractor::new().extract(input)?
    } else {
        PlainTextExtractor.extract(input)?
    };
    let text = normalize(&raw);

    println!("Loading {} model...", config.model);
    let mut embedder = load_embedder(&config)?;
    let chunker = config.chunker(embedder.spec().max_tokens)?;

    let source = input.display().to_string();
    let chunks = chunker.chunk(&mut embedder, &text, ChunkMetadata::for_source(source.as_str()))?;

    println!(
        "Chunked '{}' into {} chunks ({} tokens, overlap {}):\n",
        source,
        chunks.len(),
        chunker.max_tokens(),
        chunker.overlap()
    );
    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "--- Chunk {} (tokens {}..{}) ---",
            i + 1,
            chunk.metadata.position,
            chunk.metadata.position + chunk.metadata.token_count
        );
        // Show preview (first 200 chars)
        let preview: String = chunk.content.chars().take(200).collect();
        println!("{}{}\n", preview, if chunk.content.len() > 200 { "..." } else { "" });
    }

    Ok(())
}
