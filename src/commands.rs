use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use std::io::Write;
use tracing::{error, info, warn};

use crate::bot::FoodieBot;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::embeddings::{OllamaClient, item_document};
use crate::index::{IndexRecord, MenuIndex};
use crate::llm::GroqClient;
use crate::session::Session;

/// Embed the product catalog and rebuild the menu index from scratch
#[inline]
pub async fn build_index() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let catalog_path = config.catalog_path();
    info!("Building menu index from {}", catalog_path.display());

    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    if catalog.is_empty() {
        println!(
            "The catalog at {} contains no usable rows.",
            catalog_path.display()
        );
        println!("Check the CSV file, or point at a different one with 'foodiebot config'.");
        return Ok(());
    }

    println!(
        "📦 Loaded {} menu items from {}",
        catalog.len(),
        catalog_path.display()
    );

    // Verify Ollama connectivity before embedding anything
    let embedder = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    match embedder.health_check() {
        Ok(()) => {
            info!(
                "✅ Ollama connected at {}:{} with model {}",
                config.ollama.host, config.ollama.port, config.ollama.model
            );
        }
        Err(e) => {
            error!("❌ Ollama health check failed: {:#}", e);
            println!(
                "Error: Cannot reach Ollama at {}:{}",
                config.ollama.host, config.ollama.port
            );
            println!(
                "Please ensure Ollama is running and the model '{}' is pulled.",
                config.ollama.model
            );
            println!("Use 'foodiebot config' to update connection settings.");
            return Err(e);
        }
    }

    let bar = if console::user_attended_stderr() {
        ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding {msg}")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };
    bar.set_position(0);
    bar.set_length(catalog.len() as u64);

    // One request per chunk so the bar advances as batches complete
    let batch_size = config.ollama.batch_size as usize;
    let mut records = Vec::with_capacity(catalog.len());
    for chunk in catalog.items().chunks(batch_size) {
        if let Some(first) = chunk.first() {
            bar.set_message(first.name.clone());
        }

        let documents: Vec<String> = chunk.iter().map(item_document).collect();
        let embeddings = embedder
            .generate_embeddings_batch(&documents)
            .context("Failed to generate embeddings for catalog batch")?;

        for (item, result) in chunk.iter().zip(embeddings) {
            records.push(IndexRecord::new(item, result.text, result.embedding));
        }
        bar.set_position(records.len() as u64);
    }
    bar.finish_and_clear();

    let mut index = MenuIndex::new(&config)
        .await
        .context("Failed to open menu index")?;
    let stored = index
        .rebuild(records)
        .await
        .context("Failed to rebuild menu index")?;

    println!("✅ Indexed {} menu items", stored);
    println!("   Index: {}", config.index_dir().display());
    println!("💬 Use 'foodiebot chat' to start a conversation");

    Ok(())
}

/// Run the interactive chat loop against the indexed menu
#[inline]
pub async fn chat() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let embedder = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    if let Err(e) = embedder.health_check() {
        warn!("⚠️  Ollama is not healthy: {:#}", e);
        println!("Warning: Ollama may not be ready. Menu retrieval may find nothing.");
    }

    let index = MenuIndex::new(&config)
        .await
        .context("Failed to open menu index")?;
    match index.count_items().await {
        Ok(0) => {
            println!("⚠️  The menu index is empty. Run 'foodiebot init' to index the catalog.");
        }
        Ok(count) => {
            info!("Menu index ready with {} items", count);
        }
        Err(e) => {
            warn!("Could not count indexed items: {}", e);
        }
    }

    let llm = match GroqClient::new(&config.groq) {
        Ok(llm) => llm,
        Err(e) => {
            error!("❌ Failed to create Groq client: {:#}", e);
            println!(
                "Error: Set the {} environment variable to your Groq API key.",
                config.groq.api_key_env
            );
            println!("Use 'foodiebot config' to review the Groq settings.");
            return Err(e);
        }
    };

    let bot = FoodieBot::from_parts(embedder, index, llm, config.retrieval.n_results);
    let mut session = Session::new();

    println!("🍔 FoodieBot Chat");
    println!("{}", "=".repeat(50));
    if let Some(greeting) = session.history().first() {
        println!("{}", greeting.content);
    }
    println!();
    println!("Commands: /stats for analytics, /reset to start over, /quit to leave");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("You: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            println!();
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" => break,
            "/reset" => {
                session.reset();
                println!("🔄 Session reset");
                if let Some(greeting) = session.history().first() {
                    println!("{}", greeting.content);
                }
                println!();
                continue;
            }
            "/stats" => {
                print_session_stats(&session);
                continue;
            }
            _ => {}
        }

        let reply = bot.handle_message(&mut session, input).await;
        println!("FoodieBot: {}", reply);
        print_turn_analytics(&session);
        println!();
    }

    println!("👋 Thanks for chatting with FoodieBot!");
    Ok(())
}

/// One-line analytics summary for the turn that just completed
fn print_turn_analytics(session: &Session) {
    if let Some(entry) = session.query_log().last() {
        println!(
            "   📊 Top match: {} ({:.2}%) | ⏱️  {:.2} ms | ❤️  Interest: {}/100",
            entry.top_match,
            entry.match_score * 100.0,
            entry.duration_ms,
            session.interest_score()
        );
    }
}

/// Full query log and interest curve for the current session
fn print_session_stats(session: &Session) {
    println!();
    println!("📊 Session Analytics");
    println!("{}", "=".repeat(50));
    println!("❤️  Interest Score: {}/100", session.interest_score());
    println!(
        "📈 Score History: {}",
        session.interest_history().iter().join(", ")
    );
    println!();

    if session.query_log().is_empty() {
        println!("📭 No queries logged yet");
    } else {
        println!(
            "   {:<8}  {:<30}  {:<22}  {:>7}  {:>9}",
            "Time", "Query", "Top Match", "Score", "ms"
        );
        for entry in session.query_log() {
            println!(
                "   {:<8}  {:<30}  {:<22}  {:>6.2}%  {:>9.2}",
                entry.timestamp,
                truncate(&entry.user_query, 30),
                truncate(&entry.top_match, 22),
                entry.match_score * 100.0,
                entry.duration_ms
            );
        }
    }
    println!();
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// List the menu catalog as a table
#[inline]
pub fn menu_list() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let catalog_path = config.catalog_path();
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    if catalog.is_empty() {
        println!("No menu items found in {}", catalog_path.display());
        return Ok(());
    }

    println!("Menu Catalog ({} items):", catalog.len());
    println!();
    println!(
        "{:<8}  {:<36}  {:>8}  {:<16}",
        "ID", "Name", "Price", "Category"
    );
    println!("{}", "-".repeat(74));
    for item in catalog.items() {
        println!(
            "{:<8}  {:<36}  {:>8}  {:<16}",
            item.id,
            truncate(&item.name, 36),
            format!("${:.2}", item.price),
            item.category
        );
    }

    Ok(())
}

/// Edit one field of one menu item and write the catalog back
#[inline]
pub fn menu_set(id: &str, field: &str, value: &str) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let catalog_path = config.catalog_path();
    let mut catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    catalog.set_field(id, field, value)?;
    catalog.save()?;

    println!("✅ Updated {} on item {}", field, id);
    if let Some(item) = catalog.get(id) {
        println!(
            "   {}: {} (${:.2}, {})",
            item.id, item.name, item.price, item.category
        );
    }
    println!("💡 Run 'foodiebot init' to refresh the index with the new catalog");

    Ok(())
}

/// Show connectivity and index status for every part of the stack
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("📊 FoodieBot Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("📦 Catalog Status:");
    let catalog_path = config.catalog_path();
    match Catalog::load(&catalog_path) {
        Ok(catalog) => {
            println!("   ✅ Catalog: {} items loaded", catalog.len());
            println!("   📄 File: {}", catalog_path.display());
        }
        Err(e) => {
            println!("   ❌ Catalog: Failed to load - {}", e);
            println!("   📄 File: {}", catalog_path.display());
        }
    }
    println!();

    println!("🤖 Ollama Status:");
    match OllamaClient::new(&config.ollama) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama: Connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   📋 Model: {}", config.ollama.model);
                println!("   🔢 Batch Size: {}", config.ollama.batch_size);
            }
            Err(e) => {
                println!("   ⚠️  Ollama: Connected but unhealthy - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Ollama: Failed to connect - {}", e);
        }
    }
    println!();

    println!("🧠 Groq Status:");
    if std::env::var(&config.groq.api_key_env).is_ok() {
        println!("   ✅ API Key: {} is set", config.groq.api_key_env);
    } else {
        println!("   ❌ API Key: {} is not set", config.groq.api_key_env);
    }
    println!("   📋 Model: {}", config.groq.model);
    println!("   🌡️  Temperature: {}", config.groq.temperature);
    println!();

    println!("🔍 Menu Index Status:");
    match MenuIndex::new(&config).await {
        Ok(index) => match index.count_items().await {
            Ok(count) => {
                println!("   ✅ LanceDB: Connected");
                println!("   📄 Indexed Items: {}", count);
            }
            Err(e) => {
                println!("   ⚠️  LanceDB: Connected but count failed - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ LanceDB: Failed to connect - {}", e);
        }
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'foodiebot config' to adjust connection settings");
    println!("   • Use 'foodiebot init' to embed the catalog and build the index");
    println!("   • Use 'foodiebot chat' to start a conversation");

    Ok(())
}
