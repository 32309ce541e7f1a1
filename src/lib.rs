//! Metron チャットのCLIクライアント
//!
//! ウィジェットと同じバックエンド・同じ送信フロー（`metron_common::workflow`）を
//! 端末から使う。

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod records;
pub mod scanner;
pub mod surface;
