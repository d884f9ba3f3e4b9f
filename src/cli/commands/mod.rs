//! Command implementations

pub mod catalog;
pub mod cmp;
pub mod completions;
pub mod eval;
pub mod export;
pub mod fm;
pub mod init;
pub mod lifetime;
pub mod link;
pub mod sf;
pub mod summary;
