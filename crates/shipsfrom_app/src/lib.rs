//! Browser content script for the ships-from filter.
//!
//! Built as a `cdylib` for `wasm32-unknown-unknown`; on other targets the
//! library is empty and the `shipsfrom` binary is the entry point.

#[cfg(target_arch = "wasm32")]
mod browser;
