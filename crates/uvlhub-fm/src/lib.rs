//! Feature-model engine for UVLHub
//!
//! Parses UVL (Universal Variability Language) documents into an in-memory
//! feature tree plus cross-tree constraints, and renders them in the three
//! interchange formats the hub serves next to every stored model:
//!
//! - **DIMACS/CNF** — SAT-solver input ([`writers::dimacs`])
//! - **SPLOT** — XML feature tree ([`writers::splot`])
//! - **Glencoe** — JSON ([`writers::glencoe`])
//!
//! ```no_run
//! use uvlhub_fm::{parser, writers};
//!
//! let model = parser::read_model("uploads/user_1/dataset_1/chat.uvl")?;
//! let dimacs = writers::dimacs::to_string(&model)?;
//! # Ok::<(), uvlhub_fm::UvlError>(())
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod writers;

pub use error::UvlError;
pub use model::{Expr, Feature, FeatureModel, Group, GroupKind};
