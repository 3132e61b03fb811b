//! Pedigree Core Types and Definitions
//!
//! This crate provides the foundational types shared by the pedigree layout
//! engine and its tools:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Individuals**: The person record and its relations ([`individual`] module)
//! - **Store**: The insertion-ordered relational store ([`store`] module)

pub mod geometry;
pub mod identifier;
pub mod individual;
pub mod store;
