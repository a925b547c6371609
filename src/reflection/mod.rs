//! Reflection-style queries over the in-memory metadata graph.
//!
//! Queries hand out lightweight handles wrapping one definition each. Member queries select
//! through a [`FilterSpec`] (or the bitset [`BindingFlags`], which converts into one),
//! references are resolved through [`convert`], and unresolvable links surface as `None`.
//!
//! # Key Components
//!
//! - [`TypeHandle`] - The per-kind member queries, interface lookups and type attributes
//! - [`AssemblyHandle`] / [`ModuleHandle`] - Entry points issuing pre-seeded type handles
//! - [`filter`] - The member filter engine and name lookups
//! - [`flags`] - [`BindingFlags`] and the decomposed [`FilterSpec`]
//! - [`MemberInfo`] - The tagged variant returned by [`TypeHandle::get_members`]
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::prelude::*;
//!
//! let assembly = Assembly::new("Contoso.Core", AssemblyVersion::new(1, 0, 0, 0));
//! let module = Module::new("Contoso.Core.dll");
//! assembly.add_module(&module)?;
//!
//! let widget = TypeBuilder::new("Contoso", "Widget").public().row(1).build()?;
//! widget.add_method(Method::constructor(1, MethodAccessFlags::PUBLIC.bits()))?;
//! widget.add_method(Method::new(2, "Render", MethodAccessFlags::PUBLIC.bits()))?;
//! module.add_type(&widget)?;
//!
//! let handle = AssemblyHandle::new(assembly.clone())
//!     .get_type("Contoso.Widget")
//!     .expect("type is defined");
//!
//! assert_eq!(handle.get_constructors(BindingFlags::DEFAULT).len(), 1);
//! assert_eq!(handle.get_methods(BindingFlags::DEFAULT)[0].name(), "Render");
//! assert_eq!(handle.get_members(BindingFlags::DEFAULT).len(), 2);
//! # Ok::<(), dotreflect::Error>(())
//! ```

mod assembly;
pub mod convert;
pub mod filter;
pub mod flags;
mod member;
mod members;
mod types;

pub use assembly::{AssemblyHandle, ModuleHandle};
pub use filter::{Filterable, MemberFacts};
pub use flags::{Binding, BindingFlags, FilterSpec, Visibility};
pub use member::{MemberInfo, MemberKind};
pub use members::{ConstructorHandle, EventHandle, FieldHandle, MethodHandle, PropertyHandle};
pub use types::TypeHandle;
