//! The set of assemblies available for resolution during a query session.
//!
//! Imported type references name an assembly scope and a full name. The [`MetadataUniverse`]
//! is the lookup table turning such a reference into a definition, or into nothing when the
//! assembly (or the type inside it) was never loaded. Resolution never fails.
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::prelude::*;
//!
//! let universe = MetadataUniverse::new(UniverseConfig::default());
//!
//! let assembly = Assembly::new("Contoso.Core", AssemblyVersion::new(1, 0, 0, 0));
//! let module = Module::new("Contoso.Core.dll");
//! assembly.add_module(&module)?;
//! module.add_type(&TypeBuilder::new("Contoso", "Widget").public().build()?)?;
//! universe.load(&assembly)?;
//!
//! assert!(universe.resolve(&ImportedType::new("contoso.core", "Contoso", "Widget")).is_some());
//! assert!(universe.resolve(&ImportedType::new("Missing", "Contoso", "Widget")).is_none());
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::debug;

use crate::{
    metadata::{
        assembly::AssemblyRc, config::UniverseConfig, typesystem::CilTypeRc,
        typesystem::ImportedType,
    },
    Error, Result,
};

/// All assemblies loaded for one query session
pub struct MetadataUniverse {
    config: UniverseConfig,
    assemblies: DashMap<String, AssemblyRc>,
}

impl MetadataUniverse {
    /// Create an empty universe
    ///
    /// ## Arguments
    /// * 'config' - Scope matching and load validation settings
    pub fn new(config: UniverseConfig) -> Arc<Self> {
        Arc::new(MetadataUniverse {
            config,
            assemblies: DashMap::new(),
        })
    }

    /// The configuration of this universe
    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    fn scope_key(&self, name: &str) -> String {
        self.config.scope_name_case.key(name)
    }

    /// Load an assembly, making its types available to imported references
    ///
    /// # Errors
    /// Returns [`Error::RecursionLimit`] if a nested type is deeper than
    /// [`UniverseConfig::max_nesting_depth`], [`Error::DuplicateAssembly`] if an assembly of the
    /// same name is already loaded, and [`Error::Malformed`] if the assembly is part of another
    /// universe.
    pub fn load(self: &Arc<Self>, assembly: &AssemblyRc) -> Result<()> {
        let limit = self.config.max_nesting_depth;
        assembly.for_each_type(|_, depth| {
            if depth > limit {
                Err(Error::RecursionLimit(limit))
            } else {
                Ok(())
            }
        })?;

        match self.assemblies.entry(self.scope_key(&assembly.name)) {
            Entry::Occupied(_) => return Err(Error::DuplicateAssembly(assembly.name.clone())),
            Entry::Vacant(slot) => {
                if !assembly.set_universe(self) {
                    return Err(malformed_error!(
                        "Assembly '{}' is already loaded into another universe",
                        assembly.name
                    ));
                }
                slot.insert(assembly.clone());
            }
        }

        debug!(assembly = %assembly.fullname(), modules = assembly.modules.count(), "loaded assembly");
        Ok(())
    }

    /// Look up a loaded assembly by simple name
    pub fn assembly(&self, name: &str) -> Option<AssemblyRc> {
        self.assemblies
            .get(&self.scope_key(name))
            .map(|entry| entry.value().clone())
    }

    /// All loaded assemblies, in no particular order
    pub fn assemblies(&self) -> Vec<AssemblyRc> {
        self.assemblies
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Count of loaded assemblies
    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    /// Returns true if no assembly is loaded
    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }

    /// Resolve an imported type reference to its definition
    ///
    /// Returns `None` when the scope is not loaded, or the scope has no such type.
    pub fn resolve(&self, imported: &ImportedType) -> Option<CilTypeRc> {
        let Some(assembly) = self.assembly(&imported.scope) else {
            debug!(scope = %imported.scope, name = %imported.fullname(), "unresolved reference, scope not loaded");
            return None;
        };

        let resolved = assembly.find_type(&imported.fullname());
        if resolved.is_none() {
            debug!(scope = %imported.scope, name = %imported.fullname(), "unresolved reference, type not found");
        }
        resolved
    }
}
