//! Output renderers for parsed feature models
//!
//! Each writer produces one of the interchange formats the hub stores next to
//! an uploaded UVL file. All of them number and order features by the same
//! pre-order walk, so the formats agree on variable identity.

pub mod dimacs;
pub mod glencoe;
pub mod splot;
