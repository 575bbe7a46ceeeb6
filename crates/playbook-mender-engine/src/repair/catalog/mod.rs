//! Fixed keyword and syntax catalogs consulted by the line classifier.
//!
//! All knowledge about which words mean what lives here, so the classifier
//! and the block tracker stay free of string lists.

pub mod keywords;
pub mod shell;

pub use keywords::{KeywordScope, attribute_scope, is_module, is_shell_module, is_task_section};
pub use shell::{ShellSyntax, match_fragment};
