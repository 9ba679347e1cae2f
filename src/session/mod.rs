pub mod clipboard;
pub mod finder;
pub mod store;

pub use clipboard::{Clipboard, CommandClipboard};
pub use finder::{DetailView, Notice, NoticeKind, PartyFinder, Phase, Session};
pub use store::{MemorySelectionStore, SelectionStore, SqliteSelectionStore};
