//! Tool handlers, one submodule per server variant.

#[cfg(feature = "canvas")]
pub mod canvas;
#[cfg(feature = "gemini")]
pub mod gemini;
