/// REQ/COUNT filter argument grammar.
pub mod filter_args;
/// Cross-command global flag extraction (`--title`).
pub mod global_flags;
/// Shell-style tokenization of raw command input.
pub mod lexer;
/// Command registry, resolution, and the synchronous parse entry point.
pub mod resolver;
