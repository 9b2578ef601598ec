//! Platform abstraction layer
//!
//! Browser bindings live in [`web`] (wasm32 only). The native build has no
//! platform layer; the binary drives [`Game`](crate::Game) directly.

#[cfg(target_arch = "wasm32")]
pub mod web;
