//! Token rendering from layered trait assets

/// Layer compositing and token export
pub mod compositor;
