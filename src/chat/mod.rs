pub mod controller;
pub mod export;
pub mod session;
pub mod share;
pub mod view;

pub use controller::{ ChatController, LoadOutcome, SubmitOutcome };
pub use export::ExternalTool;
pub use session::{ tool_name_from_path, ChatSession, ChatState };
pub use share::ShareOutcome;
pub use view::{ ChatView, HtmlView, TerminalView };
