// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Core of a remotely-driven 3D neuroanatomy atlas client.
//!
//! A server pushes structured messages saying which brain structures should
//! be visible, how they are colored, and where a playhead sits in
//! per-structure activity data. Urchin mirrors that state into a scene: it
//! bootstraps the reference atlas, drives the two-stage mesh loads of each
//! structure, and applies visibility, material and color. Rendering, mesh
//! decoding and the transport layer are collaborators behind
//! [`provider::AtlasProvider`] and [`manager::AtlasEvent`].
//!
//! # Key entry points
//!
//! - [`manager::AtlasManager`] - the orchestrator; one per scheduler thread
//! - [`atlas::StructureNode`] - per-structure load/visibility state
//! - [`colormap::ColormapRegistry`] - named intensity → color mappings
//! - [`explode::ExplodedView`] - exploded-view placement of visible
//!   structures
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Concurrency
//!
//! Everything runs on a single cooperative scheduler (for instance a
//! `futures` `LocalPool`). Shared state lives in `Rc`/`RefCell`, and mesh
//! loads resolve one-shot shared signals that any number of callers can
//! await.

pub mod atlas;
pub mod colormap;
pub mod error;
pub mod explode;
pub mod manager;
pub mod material;
pub mod message;
pub mod options;
pub mod provider;
