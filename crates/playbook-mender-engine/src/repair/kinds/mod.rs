//! Kind-specific rebuilds for documents whose only valid shape is a flat or
//! fixed mapping.

pub mod meta;
pub mod vars;

pub use meta::{MetaDefaults, Platform, rebuild_meta};
pub use vars::rebuild_vars;
