//! Input side: the edit-decision document, its media catalog, and file existence checks.

pub mod catalog;
pub mod document;
pub mod files;
