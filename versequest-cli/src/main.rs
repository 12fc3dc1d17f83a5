//! Versequest CLI - query and browse scripture editions
//!
//! # Commands
//!
//! ```bash
//! # Look up a citation, or search by meaning
//! versequest search "John 3:16"
//! versequest search "love your neighbor" --edition web -k 10
//!
//! # Browse an edition
//! versequest books --edition asv
//! versequest chapter "1 John" 2 --verse 5
//!
//! # Build embedding caches ahead of time
//! versequest warm kjv web asv
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use versequest_lib::{
    config::Config,
    embed::ModelKind,
    search::{MatchType, SearchResult},
};

#[derive(Parser)]
#[command(name = "versequest")]
#[command(about = "Find verses by citation or by meaning")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding <edition>.json documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for cached embeddings
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Embedding model: all-MiniLM-L6-v2, bge-small-en-v1.5 or bge-large-en-v1.5
    #[arg(long, global = true)]
    model: Option<ModelKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the verse cited in the query, or the verses closest in meaning
    Search {
        /// Free-text query, e.g. "John 3:16" or "love your neighbor"
        query: String,

        /// Edition to search
        #[arg(short, long, default_value = "kjv")]
        edition: String,

        /// Number of semantic results to return
        #[arg(short, long)]
        k: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported editions
    Editions,

    /// List the books of an edition
    Books {
        #[arg(short, long, default_value = "kjv")]
        edition: String,
    },

    /// List the chapters of a book
    Chapters {
        book: String,

        #[arg(short, long, default_value = "kjv")]
        edition: String,
    },

    /// Print a whole chapter, optionally highlighting one verse
    Chapter {
        book: String,
        chapter: u32,

        /// Verse to highlight
        #[arg(short, long)]
        verse: Option<u32>,

        #[arg(short, long, default_value = "kjv")]
        edition: String,
    },

    /// Print a single verse
    Verse {
        book: String,
        chapter: u32,
        verse: u32,

        #[arg(short, long, default_value = "kjv")]
        edition: String,
    },

    /// Load editions and build their embedding caches
    Warm {
        /// Editions to warm
        #[arg(default_value = "kjv")]
        editions: Vec<String>,
    },

    /// Embed text and show vector info
    Embed {
        /// Text to embed
        text: String,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    Ok(config)
}

fn print_result(rank: usize, result: &SearchResult) {
    let how = match result.match_type {
        MatchType::Reference => "reference".to_string(),
        MatchType::Semantic => format!("score: {:.4}", result.score),
    };
    println!(
        "#{rank} {} {}:{} ({how})",
        result.book_name, result.chapter, result.verse
    );
    println!("{}\n", result.text);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Search {
            query,
            edition,
            k,
            json,
        } => {
            if let Some(k) = k {
                config.top_k = k;
            }

            let engine = config.engine();
            info!(%edition, %query, "searching");

            let results = {
                let (query, edition) = (query.clone(), edition.clone());
                tokio::task::spawn_blocking(move || engine.search(&query, &edition)).await??
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            println!("\n=== Results for '{query}' ({edition}) ===\n");
            if results.is_empty() {
                println!("No verses found.");
            }
            for (i, result) in results.iter().enumerate() {
                print_result(i + 1, result);
            }
        }

        Commands::Editions => {
            for edition in config.engine().editions() {
                println!("{edition}");
            }
        }

        Commands::Books { edition } => {
            let books = config.engine().books(&edition)?;
            println!("{} books in {edition}:\n", books.len());
            for book in &books {
                println!("  {book}");
            }
        }

        Commands::Chapters { book, edition } => {
            let chapters = config.engine().chapters(&edition, &book)?;
            let list: Vec<String> = chapters.iter().map(u32::to_string).collect();
            println!("{book} ({edition}): {}", list.join(", "));
        }

        Commands::Chapter {
            book,
            chapter,
            verse,
            edition,
        } => {
            let verses = config.engine().chapter(&edition, &book, chapter)?;

            println!("=== {} {chapter} ({edition}) ===\n", verses[0].book_name);
            for v in &verses {
                let marker = if Some(v.verse) == verse { ">" } else { " " };
                println!("{marker}{:>3} {}", v.verse, v.text);
            }
        }

        Commands::Verse {
            book,
            chapter,
            verse,
            edition,
        } => {
            let found = config.engine().verse(&edition, &book, chapter, verse)?;
            println!("{} {}:{} ({edition})", found.book_name, found.chapter, found.verse);
            println!("{}", found.text);
        }

        Commands::Warm { editions } => {
            let engine = Arc::new(config.engine());
            info!(?editions, model = %config.model, "warming editions");

            // editions warm concurrently; each edition embeds at most once
            let handles: Vec<_> = editions
                .into_iter()
                .map(|edition| {
                    let engine = Arc::clone(&engine);
                    let task = tokio::task::spawn_blocking({
                        let edition = edition.clone();
                        move || engine.warm(&edition)
                    });
                    (edition, task)
                })
                .collect();

            let mut failed = 0;
            for (edition, task) in handles {
                match task.await? {
                    Ok(()) => println!("{edition}: ready"),
                    Err(e) => {
                        failed += 1;
                        error!(%edition, error = %e, "warm failed");
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} edition(s) failed to warm");
            }
        }

        Commands::Embed { text } => {
            info!(model = %config.model, "embedding text");
            let embedding = config.engine().embed_text(&text)?;

            println!("\nEmbedding stats:");
            println!("  Dimensions: {}", embedding.len());
            println!("  First 5 values: {:?}", &embedding[..embedding.len().min(5)]);
            println!("  Min: {:.4}", embedding.iter().cloned().fold(f32::INFINITY, f32::min));
            println!("  Max: {:.4}", embedding.iter().cloned().fold(f32::NEG_INFINITY, f32::max));
        }
    }

    Ok(())
}
