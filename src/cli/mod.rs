use clap::{ Parser, Subcommand };
use std::path::PathBuf;

use crate::api::CopyKind;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Site Args ---
    /// Base URL of the documentation site (e.g., http://127.0.0.1:8000)
    #[arg(long, env = "BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// CSRF token sent as X-CSRFToken on POST requests.
    #[arg(long, env = "CSRF_TOKEN")]
    pub csrf_token: Option<String>,

    // --- Local Store Args ---
    /// Local store type for chat history and local shares (file, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "file")]
    pub store_type: String,

    /// JSON file backing the file store.
    #[arg(long, env = "STORE_PATH", default_value = ".docmedia/local_storage.json")]
    pub store_path: String,

    // --- Clipboard Args ---
    /// Command that receives copied text on stdin (e.g., "xclip -selection clipboard", pbcopy).
    /// Copied text is printed to stdout when unset.
    #[arg(long, env = "CLIPBOARD_COMMAND")]
    pub clipboard_command: Option<String>,

    // --- Rendering Args ---
    /// Extra citation search endpoints as tool=url pairs, comma separated. Use *=url to replace the default.
    #[arg(long, env = "CITATION_SEARCH_URLS", default_value = "")]
    pub citation_search_urls: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy documentation text (doc) or an AI summary (ai) for a tool to the clipboard.
    /// The kind may also be given as the page's link label, e.g. "Copy AI summary docs".
    #[command(name = "copy")]
    CopyText {
        kind: CopyKind,
        name: String,
    },

    /// Render an AI response (file or stdin) to HTML.
    Render {
        file: Option<PathBuf>,

        /// Tool whose documentation search the citations link to.
        #[arg(long, default_value = "django")]
        tool: String,
    },

    /// Chat on a tool's page, e.g. /ai-chat/flask/ or a full URL with ?share=<id>.
    Chat {
        page: String,
    },
}
