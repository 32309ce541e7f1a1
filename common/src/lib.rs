//! Metron Common Library
//!
//! チャットウィジェット（iframe）、ローダー（ホストページ）、CLIで共有される
//! 型・プロトコル・送信フロー

pub mod api;
pub mod bridge;
pub mod checklist;
pub mod edit;
pub mod error;
pub mod fields;
pub mod files;
pub mod listing;
pub mod markup;
pub mod message;
pub mod pdf_detect;
pub mod poll;
pub mod results;
pub mod tree;
pub mod types;
pub mod workflow;

pub use api::Backend;
pub use bridge::{BridgeMessage, Direction};
pub use checklist::{plan_fill, CheckboxWrite, ChecklistPayload};
pub use edit::{apply_edit, coerce_input, FieldPath};
pub use error::{Error, Result};
pub use listing::{build_listing, ListMode, Listing};
pub use markup::{format_text_response, SafeMarkup};
pub use message::{BotBody, ChatMessage};
pub use poll::{poll_until_terminal, PollSlot, POLL_INTERVAL};
pub use results::{ExtractionOutcome, ResultStore, ResultSummary};
pub use tree::{instrument_cards, InstrumentCard, TreeNode};
pub use types::{FileStatus, StatusReport, TaskHandle, TaskStatus};
pub use workflow::{run_submission, Submission, SubmissionOutcome, Surface};
