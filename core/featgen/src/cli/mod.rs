//! CLI（引数解析とコマンドへの変換）

pub mod args;

pub use args::{parse_args, print_completion, ParseOutcome};
