//! Satellite console (satcon)
//!
//! Mirrors log output from producing processes into an always-visible,
//! filterable terminal console. The producer side serializes arbitrary
//! runtime values safely; the viewer side stores, filters and renders the
//! resulting entries with a windowed list.
//!
//! Pure core (serializer, store, filter, view_state, state) and impure shell
//! (source, view, logging) are kept in separate modules.

pub mod config;
pub mod demo;
pub mod filter;
pub mod logging;
pub mod model;
pub mod parser;
pub mod producer;
pub mod serializer;
pub mod source;
pub mod state;
pub mod store;
pub mod view;
pub mod view_state;
