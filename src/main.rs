//! shelfmatch command-line entrypoint.
//!
//! Items come from the arguments, or one per line on stdin when none are given.
//! The result is printed to stdout as JSON; logs go to stderr.

use std::io::{self, BufRead, Write};

use mimalloc::MiMalloc;

use shelfmatch::config::Config;
use shelfmatch::embedding::{CachedEmbedder, HttpEmbedder};
use shelfmatch::expansion::LlmContextExpander;
use shelfmatch::llm::ChatModel;
use shelfmatch::relevance::LlmRelevanceJudge;
use shelfmatch::retrieval::{
    GroceryList, RetrievalEngine, group_by_item, group_by_market, not_found,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    ByItem,
    ByMarket,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let (mode, names) = parse_args(std::env::args().skip(1));
    let list = if names.is_empty() {
        read_items(io::stdin().lock())?
    } else {
        GroceryList::from_names(names)
    };

    let config = Config::from_env()?;
    config.validate()?;

    let http = HttpEmbedder::new(config.embedding.clone())?;
    let embedder = CachedEmbedder::new(
        http,
        config.embedding.model.clone(),
        config.embedding_cache_capacity,
    );
    let chat = ChatModel::new(config.chat.clone());

    let engine = RetrievalEngine::from_snapshot(
        &config.catalog_path,
        &config.category_index_path,
        embedder,
        LlmContextExpander::new(chat.clone()),
        LlmRelevanceJudge::new(chat),
        config.retrieval.clone(),
    )?;

    tracing::info!(
        items = list.len(),
        products = engine.catalog().len(),
        model = %config.chat.model,
        "shelfmatch starting"
    );

    let result = engine.retrieve(&list).await?;

    let output = match mode {
        OutputMode::Full => serde_json::to_value(&result)?,
        OutputMode::ByItem => serde_json::json!({
            "items": group_by_item(&result),
            "not_found": not_found(&result),
        }),
        OutputMode::ByMarket => serde_json::json!({
            "markets": group_by_market(&result),
            "not_found": not_found(&result),
        }),
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> (OutputMode, Vec<String>) {
    let mut mode = OutputMode::Full;
    let mut names = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--group-by-market" => mode = OutputMode::ByMarket,
            "--group-by-item" => mode = OutputMode::ByItem,
            _ => {
                let name = arg.trim();
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
    }
    (mode, names)
}

fn read_items(input: impl BufRead) -> io::Result<GroceryList> {
    let mut names = Vec::new();
    for line in input.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(GroceryList::from_names(names))
}
