//! Chat screen model: pages, tabs, composer, member drawer and app bar.
//! Rendering lives in `ui`; this module holds no terminal state.

pub mod composer;
pub mod drawer;
pub mod format;
pub mod fragment;
pub mod pager;
pub mod suggestions;
pub mod tabs;
pub mod toolbar;

pub use fragment::ChatFragment;
