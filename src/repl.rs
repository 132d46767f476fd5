use log::{ error, info };
use std::error::Error;
use tokio::io::{ AsyncBufReadExt, BufReader };
use url::Url;

use crate::api;
use crate::chat::{ ChatController, ExternalTool, SubmitOutcome, TerminalView };
use crate::cli::Args;
use crate::clipboard;
use crate::copy::CopyTrigger;
use crate::render::SearchUrls;
use crate::storage;

const HELP: &str = "Commands: /share, /open <chatgpt|aistudio>, /new, /copy-code <n>, /help, /quit. Anything else is sent as a question.";

/// Resolves a page given as a path (`/ai-chat/flask/`) or a full URL.
pub fn resolve_page(base_url: &str, page: &str) -> Result<Url, url::ParseError> {
    match Url::parse(page) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base_url)?.join(page),
        Err(e) => Err(e),
    }
}

pub async fn run_chat(
    args: &Args,
    page: &str,
    search: SearchUrls
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let page_url = resolve_page(&args.base_url, page)?;
    let mut chat = ChatController::new(
        &page_url,
        api::new_client(args)?,
        storage::initialize_local_store(args)?,
        clipboard::create_clipboard(args)?,
        search,
        TerminalView
    )?;

    let loaded = chat.load(&page_url).await;
    info!("Chat page {} loaded: {:?}", page_url, loaded);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/share" => {
                if let Err(e) = chat.share().await {
                    error!("Sharing failed: {}", e);
                }
            }
            "/open" => match rest.trim().parse::<ExternalTool>() {
                Ok(tool) => match chat.external_link(tool) {
                    Ok(url) => println!("{}", url),
                    Err(e) => error!("Could not build {} link: {}", tool, e),
                },
                Err(e) => println!("{}", e),
            },
            "/new" => {
                let path = chat.start_new_chat();
                info!("Started a new chat at {}", path);
            }
            "/copy-code" => match rest.trim().parse::<usize>() {
                Ok(n) => {
                    let button = CopyTrigger::code_button();
                    chat.copy_code(n, &button).await;
                    println!("{}", button.label());
                }
                Err(_) => println!("Usage: /copy-code <n>"),
            },
            _ => {
                chat.set_input(line);
                if chat.submit_input().await == SubmitOutcome::Ignored {
                    println!("Nothing to send.");
                }
            }
        }
    }
    Ok(())
}
