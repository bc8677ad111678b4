use std::{env, path::PathBuf};

use wetzoek_core::config::AppConfig;
use wetzoek_rag::RagPipeline;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cfg = AppConfig::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--strategy" => {
                if i + 1 < args.len() {
                    cfg.chunking.strategy = args[i + 1].clone();
                    i += 1;
                } else {
                    eprintln!("Error: --strategy requires a name");
                    std::process::exit(1);
                }
            }
            "--size" => {
                if i + 1 < args.len() {
                    if let Ok(size) = args[i + 1].parse::<usize>() {
                        if cfg.chunking.strategy == "tokens" {
                            cfg.chunking.token_chunk_size = size;
                        } else {
                            cfg.chunking.chunk_size = size;
                        }
                        i += 1;
                    } else {
                        eprintln!("Error: --size requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --size requires a number");
                    std::process::exit(1);
                }
            }
            "--overlap" => {
                if i + 1 < args.len() {
                    if let Ok(overlap) = args[i + 1].parse::<usize>() {
                        if cfg.chunking.strategy == "tokens" {
                            cfg.chunking.token_overlap = overlap;
                        } else {
                            cfg.chunking.chunk_overlap = overlap;
                        }
                        i += 1;
                    } else {
                        eprintln!("Error: --overlap requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --overlap requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => data_dir = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }

    println!("wetzoek indexer\n===============");
    let data_dir = data_dir.unwrap_or_else(|| cfg.paths.data_dir.clone());
    println!("Data directory: {}", data_dir.display());
    println!("Index directory: {}", cfg.paths.index_dir.display());

    let rt = tokio::runtime::Runtime::new()?;
    let count = rt.block_on(async {
        let rag = RagPipeline::new(cfg).await?;
        println!("Chunking strategy: {}", rag.strategy_name());
        rag.ingest_and_index(Some(&data_dir)).await
    })?;

    println!("\n✅ Indexed {} chunks from {}", count, data_dir.display());
    println!("💡 To ask a question, use: cargo run --bin wetzoek-ask '<question>'");
    Ok(())
}
