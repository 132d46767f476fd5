pub mod api;
pub mod chat;
pub mod cli;
pub mod clipboard;
pub mod copy;
pub mod error;
pub mod models;
pub mod render;
pub mod repl;
pub mod storage;

use cli::{ Args, Command };
use copy::{ CopyHelper, CopyOutcome, CopyTrigger };
use log::info;
use render::{ render_markdown, SearchUrls };
use std::error::Error;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Base URL: {}", args.base_url);
    info!("CSRF Token: {}", if args.csrf_token.is_some() { "set" } else { "not set" });
    info!("Local Store Type: {}", args.store_type);
    info!("Local Store Path: {}", args.store_path);
    info!("Clipboard Command: {}", args.clipboard_command.as_deref().unwrap_or("stdout"));
    if !args.citation_search_urls.is_empty() {
        info!("Citation Search URLs: {}", args.citation_search_urls);
    }
    info!("-------------------------");

    let search = SearchUrls::with_overrides(&args.citation_search_urls)?;

    match args.command.clone() {
        Command::CopyText { kind, name } => run_copy(&args, kind, &name).await,
        Command::Render { file, tool } => run_render(file, &tool, &search).await,
        Command::Chat { page } => repl::run_chat(&args, &page, search).await,
    }
}

async fn run_copy(
    args: &Args,
    kind: api::CopyKind,
    name: &str
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let helper = CopyHelper::new(api::new_client(args)?, clipboard::create_clipboard(args)?);
    let trigger = CopyTrigger::for_kind(kind);
    match helper.copy(kind, name, &trigger).await {
        CopyOutcome::Copied(content) => info!("Copied {} characters for {}", content.chars().count(), name),
        CopyOutcome::FetchFailed | CopyOutcome::ClipboardFailed => info!("Copy for {} did not complete", name),
    }
    eprintln!("{}", trigger.label());
    Ok(())
}

async fn run_render(
    file: Option<PathBuf>,
    tool: &str,
    search: &SearchUrls
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(&path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    let rendered = render_markdown(&text, tool, search);
    println!("{}", rendered.html);
    Ok(())
}
