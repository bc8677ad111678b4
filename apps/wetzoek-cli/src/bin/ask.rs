use std::env;

use wetzoek_core::config::AppConfig;
use wetzoek_core::types::keys;
use wetzoek_rag::{ChatGenerator, RagPipeline};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cfg = AppConfig::load()?;
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: wetzoek-ask <question> [--topk N]");
        eprintln!("Example: wetzoek-ask 'Wat zegt 7:244 BW over onderhuur?' --topk 6");
        std::process::exit(1);
    }

    let mut question_words: Vec<String> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--topk" => {
                if i + 1 < args.len() {
                    if let Ok(k) = args[i + 1].parse::<usize>() {
                        cfg.retrieval.k = k;
                        i += 1;
                    } else {
                        eprintln!("Error: --topk requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --topk requires a number");
                    std::process::exit(1);
                }
            }
            word => question_words.push(word.to_string()),
        }
        i += 1;
    }
    let question = question_words.join(" ");

    let generator = ChatGenerator::from_config(&cfg.llm)?;
    let rt = tokio::runtime::Runtime::new()?;
    let (answer, hits) = rt.block_on(async {
        let rag = RagPipeline::new(cfg).await?;
        rag.ask(&question, &generator).await
    })?;

    println!("\n=== Answer ===\n");
    println!("{}", answer);
    println!("\n=== Retrieved sources ===");
    for hit in &hits {
        let src = hit
            .metadata
            .get(keys::SOURCE_REL)
            .or_else(|| hit.metadata.get(keys::SOURCE_PATH))
            .map(String::as_str)
            .unwrap_or("unknown");
        match hit.metadata.get(keys::PAGE) {
            Some(page) => println!("- {} p.{} (score {:.3})", src, page, hit.score),
            None => println!("- {} (score {:.3})", src, hit.score),
        }
    }
    Ok(())
}
