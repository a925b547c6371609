//! The in-memory metadata graph the reflection layer queries.
//!
//! Assemblies own modules, modules own types, types own their members. The graph is immutable
//! once handed to a query session: collections are append-only and every back-reference is
//! set at most once.
//!
//! # Key Components
//!
//! - [`assembly`] - Assemblies, modules and their versions
//! - [`typesystem`] - Type definitions, references and the type builder
//! - [`members`] - Fields, methods, properties and events with their attribute flags
//! - [`universe`] - The lookup table resolving imported references
//! - [`config`] - Universe configuration
//! - [`naming`] - Ordinal name comparison and full-name composition
//! - [`token`] - Metadata tokens identifying definitions

pub mod assembly;
pub mod config;
pub mod members;
pub mod naming;
pub mod token;
pub mod typesystem;
pub mod universe;
