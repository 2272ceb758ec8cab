//! Command line front-end for the Loto Más toolkit.
//!
//! Parses the `loto` command line, opens the store described by `loto.toml`
//! and renders generation, match and history results as tables or JSON.

pub mod app;
