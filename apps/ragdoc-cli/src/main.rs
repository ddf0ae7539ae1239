use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

use ragdoc_core::chunker::ChunkingConfig;
use ragdoc_core::config::{expand_path, Config};
use ragdoc_core::source::TextFileSource;
use ragdoc_core::types::{meta_keys, IngestReport, QueryResult, RankedPassage};
use ragdoc_pipeline::RagEngine;

mod logging;

/// Characters of each passage shown in terminal output.
const PREVIEW_CHARS: usize = 200;

#[derive(Parser)]
#[command(name = "ragdoc", version, about = "Ask questions about a single text document")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone, Copy)]
struct ChunkArgs {
    /// Target chunk length in characters (100-5000)
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Characters shared by consecutive chunks
    #[arg(long)]
    chunk_overlap: Option<usize>,
}

impl ChunkArgs {
    fn apply(self, defaults: ChunkingConfig) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            chunk_overlap: self.chunk_overlap.unwrap_or(defaults.chunk_overlap),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Load a document and answer one question about it
    Ask {
        file: String,
        query: String,
        /// Number of passages to retrieve (1-10)
        #[arg(short, long)]
        k: Option<usize>,
        #[command(flatten)]
        chunking: ChunkArgs,
        /// Print retrieved passages only, without calling the generation backend
        #[arg(long)]
        no_generate: bool,
    },
    /// Load a document and print its index statistics
    Inspect {
        file: String,
        #[command(flatten)]
        chunking: ChunkArgs,
    },
    /// Load a document and answer questions read from stdin
    Chat {
        file: String,
        #[arg(short, long)]
        k: Option<usize>,
        #[command(flatten)]
        chunking: ChunkArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    logging::init(&settings.logging);

    let engine = RagEngine::from_settings(&settings)?;
    match cli.command {
        Command::Ask { file, query, k, chunking, no_generate } => {
            load(&engine, &file, chunking.apply(settings.chunking))?;
            let k = k.unwrap_or(engine.default_k());
            let result = engine.retrieve(&query, k)?;
            print_passages(&result.ranked_passages);
            if !no_generate {
                print_answer(&engine, &result).await;
            }
        }
        Command::Inspect { file, chunking } => {
            let report = load(&engine, &file, chunking.apply(settings.chunking))?;
            print_report(&report);
            print_status(&engine);
        }
        Command::Chat { file, k, chunking } => {
            load(&engine, &file, chunking.apply(settings.chunking))?;
            chat(&engine, k.unwrap_or(engine.default_k())).await?;
        }
    }
    Ok(())
}

fn load(engine: &RagEngine, file: &str, chunking: ChunkingConfig) -> Result<IngestReport> {
    let path: PathBuf = expand_path(file);
    let report = engine.ingest_source(&TextFileSource::new(&path), chunking)?;
    println!(
        "📄 Loaded {} ({} chunks, {} terms)",
        report.file_name, report.total_chunks, report.vocabulary_size
    );
    Ok(report)
}

async fn chat(engine: &RagEngine, k: usize) -> Result<()> {
    println!("💬 Ask a question (:status, :clear, :quit)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" | ":q" => break,
            ":status" => print_status(engine),
            ":clear" => {
                engine.clear();
                println!("🧹 Document cleared");
            }
            query => match engine.retrieve(query, k) {
                Ok(result) => {
                    print_passages(&result.ranked_passages);
                    print_answer(engine, &result).await;
                }
                Err(e) => eprintln!("❌ [{}] {}", e.kind(), e),
            },
        }
    }
    tracing::debug!("chat session ended");
    Ok(())
}

async fn print_answer(engine: &RagEngine, result: &QueryResult) {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Generating answer...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let answer = engine.answer(result).await;
    spinner.finish_and_clear();
    match answer {
        Ok(text) => println!("\n🤖 {}\n", text.trim()),
        // Passages were already printed; only the answer is missing
        Err(e) => eprintln!("❌ [{}] {}", e.kind(), e),
    }
}

fn print_passages(passages: &[RankedPassage]) {
    for (rank, passage) in passages.iter().enumerate() {
        let location = match (
            passage.metadata.get(meta_keys::LINES_FROM).and_then(|v| v.as_int()),
            passage.metadata.get(meta_keys::LINES_TO).and_then(|v| v.as_int()),
        ) {
            (Some(from), Some(to)) => format!(" lines {from}-{to}"),
            _ => String::new(),
        };
        println!("#{} [{:.4}]{}", rank + 1, passage.similarity, location);
        println!("   {}", passage.preview(PREVIEW_CHARS).replace('\n', " "));
    }
}

fn print_report(report: &IngestReport) {
    println!("   chunk_size:    {}", report.chunk_size);
    println!("   chunk_overlap: {}", report.chunk_overlap);
    println!("   characters:    {}", report.text_length);
    println!("   blake3:        {}", report.content_hash);
}

fn print_status(engine: &RagEngine) {
    let status = engine.status();
    match (status.loaded, status.file_name) {
        (true, Some(name)) => {
            let since = status
                .loaded_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_default();
            println!(
                "📊 {} loaded: {} chunks, {} terms, since {}",
                name, status.total_chunks, status.vocabulary_size, since
            );
        }
        _ => println!("📊 No document loaded"),
    }
}
