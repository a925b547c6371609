// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotreflect
//!
//! A reflection-style query layer over statically loaded .NET assembly metadata. Ask for "all
//! public instance fields of a type" and get back stable, comparable handles, without ever
//! loading or executing the program the metadata describes.
//!
//! ## Features
//!
//! - **Two-axis member filtering** - Visibility and binding are matched independently, with
//!   the `System.Reflection.BindingFlags` semantics, including the "no flags" default
//! - **Total reference resolution** - Unresolvable base types, element types, declaring types
//!   and interfaces surface as `None`, never as an error
//! - **Memoized back-references** - A type handle computes its owning assembly and module
//!   handles once, and returns the same instance afterwards
//! - **Explicit unsupported surface** - Execution-oriented operations report
//!   [`Error::NotSupported`] or [`Error::NotImplemented`], never a silent default
//!
//! ## Quick Start
//!
//! ```rust
//! use dotreflect::prelude::*;
//!
//! let universe = MetadataUniverse::new(UniverseConfig::default());
//! let assembly = Assembly::new("Contoso.Core", AssemblyVersion::new(1, 0, 0, 0));
//! let module = Module::new("Contoso.Core.dll");
//! assembly.add_module(&module)?;
//!
//! let widget = TypeBuilder::new("Contoso", "Widget")
//!     .public()
//!     .base(TypeReference::imported("System.Runtime", "System", "Object"))
//!     .build()?;
//! widget.add_field(Field::new(1, "count", FieldAttributes::PUBLIC))?;
//! module.add_type(&widget)?;
//! universe.load(&assembly)?;
//!
//! let handle = TypeHandle::new(widget);
//! assert_eq!(handle.get_fields(BindingFlags::DEFAULT).len(), 1);
//!
//! // System.Runtime was never loaded, the base type is absent rather than an error
//! assert!(handle.base_type().is_none());
//! # Ok::<(), dotreflect::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - The in-memory metadata graph: assemblies, modules, types and members
//! - [`reflection`] - Handles, the member filter engine and reference resolution
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber. Unresolved imported
//! references and assembly loads are reported at `debug`, filter passes and memoization
//! fills at `trace`.

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use dotreflect::prelude::*;
///
/// let spec = FilterSpec::from(BindingFlags::PUBLIC | BindingFlags::STATIC);
/// assert_eq!(spec.visibility, Visibility::Public);
/// assert_eq!(spec.binding, Binding::Static);
/// ```
pub mod prelude;

/// The in-memory metadata graph queried by [`reflection`].
pub mod metadata;

/// Reflection-style handles and the filter engine.
pub mod reflection;

/// `dotreflect` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotreflect` Error type
///
/// Building the metadata graph reports malformed input through this type. Queries only
/// return it from the operations a static metadata model can not answer.
///
/// # Examples
///
/// ```rust
/// use dotreflect::{prelude::*, Error};
///
/// let handle = TypeHandle::new(TypeBuilder::new("Contoso", "Widget").build()?);
/// match handle.guid() {
///     Err(Error::NotSupported(operation)) => println!("{operation} needs a runtime"),
///     Err(e) => println!("Error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// # Ok::<(), dotreflect::Error>(())
/// ```
pub use error::Error;

/// Configuration for loading assemblies into a universe
pub use metadata::config::UniverseConfig;

/// The set of loaded assemblies imported references resolve against
pub use metadata::universe::MetadataUniverse;
