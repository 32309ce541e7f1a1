//! UIコンポーネント

pub mod action_bar;
pub mod chat_input;
pub mod chat_messages;
pub mod field_tree;
pub mod file_list;
pub mod header;
pub mod listing_view;
pub mod progress_bar;
pub mod upload_area;
