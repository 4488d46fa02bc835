//! Core types and traits for the document lifecycle engine.
//!
//! This crate contains all domain model types: the [`Document`] catalog entry,
//! its closed enums, [`Relationship`] edges, [`StateTransition`] audit rows,
//! [`Review`] records, validation rules, content hashing, and filename
//! naming-convention helpers.

pub mod content_hash;
pub mod document;
pub mod enums;
pub mod filter;
pub mod naming;
pub mod relationship;
pub mod review;
pub mod transition;
pub mod validation;
