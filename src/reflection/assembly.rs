//! Query handles for assemblies and modules.
//!
//! Type handles issued here are pre-seeded with the issuing handle, so walking from an
//! assembly to its types and back yields the same [`AssemblyHandle`] instance.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    metadata::assembly::{AssemblyRc, AssemblyVersion, ModuleRc},
    reflection::types::TypeHandle,
};

/// A handle to an assembly
pub struct AssemblyHandle {
    definition: AssemblyRc,
}

impl AssemblyHandle {
    /// Wrap an assembly definition
    pub fn new(definition: AssemblyRc) -> Arc<Self> {
        Arc::new(AssemblyHandle { definition })
    }

    /// The wrapped definition
    pub fn definition(&self) -> &AssemblyRc {
        &self.definition
    }

    /// The simple name of the assembly
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The version of the assembly
    pub fn version(&self) -> AssemblyVersion {
        self.definition.version
    }

    /// `Name, Version=x.y.z.w`
    pub fn full_name(&self) -> String {
        self.definition.fullname()
    }

    /// All modules, manifest module first
    pub fn modules(self: &Arc<Self>) -> Vec<Arc<ModuleHandle>> {
        self.definition
            .modules
            .iter()
            .map(|(_, module)| ModuleHandle::with_assembly(module.clone(), self.clone()))
            .collect()
    }

    /// The top-level types of every module, in declaration order
    pub fn get_types(self: &Arc<Self>) -> Vec<TypeHandle> {
        self.modules()
            .iter()
            .flat_map(|module| module.get_types())
            .collect()
    }

    /// Look up a type by full name, `Outer/Inner` for nested types
    ///
    /// ## Arguments
    /// * 'full_name' - The full name of the type
    pub fn get_type(self: &Arc<Self>, full_name: &str) -> Option<TypeHandle> {
        let definition = self.definition.find_type(full_name)?;
        Some(TypeHandle::with_assembly(definition, self.clone()))
    }
}

impl PartialEq for AssemblyHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for AssemblyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyHandle")
            .field("full_name", &self.definition.fullname())
            .finish()
    }
}

/// A handle to a module
pub struct ModuleHandle {
    definition: ModuleRc,
    assembly: OnceLock<Arc<AssemblyHandle>>,
}

impl ModuleHandle {
    /// Wrap a module definition
    pub fn new(definition: ModuleRc) -> Arc<Self> {
        Arc::new(ModuleHandle {
            definition,
            assembly: OnceLock::new(),
        })
    }

    fn with_assembly(definition: ModuleRc, assembly: Arc<AssemblyHandle>) -> Arc<Self> {
        let handle = ModuleHandle {
            definition,
            assembly: OnceLock::new(),
        };
        handle.assembly.set(assembly).ok();
        Arc::new(handle)
    }

    /// The wrapped definition
    pub fn definition(&self) -> &ModuleRc {
        &self.definition
    }

    /// The name of the module
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The owning assembly; computed on first access, then returned from the slot
    pub fn assembly(&self) -> Option<Arc<AssemblyHandle>> {
        if let Some(assembly) = self.assembly.get() {
            return Some(assembly.clone());
        }

        let definition = self.definition.assembly()?;
        self.assembly.set(AssemblyHandle::new(definition)).ok();
        self.assembly.get().cloned()
    }

    /// The top-level types of this module, in declaration order
    pub fn get_types(self: &Arc<Self>) -> Vec<TypeHandle> {
        self.definition
            .types
            .iter()
            .map(|(_, definition)| TypeHandle::with_module(definition.clone(), self.clone()))
            .collect()
    }
}

impl PartialEq for ModuleHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::create_loaded_widget;

    #[test]
    fn test_types_are_preseeded() {
        let (_assembly, widget) = create_loaded_widget();
        let assembly = AssemblyHandle::new(widget.assembly().unwrap());

        let types = assembly.get_types();
        assert!(!types.is_empty());
        for handle in &types {
            assert!(Arc::ptr_eq(&handle.assembly().unwrap(), &assembly));
        }

        let found = assembly.get_type("Contoso.Widget").unwrap();
        assert!(Arc::ptr_eq(&found.assembly().unwrap(), &assembly));
        assert!(assembly.get_type("Contoso.Missing").is_none());
    }

    #[test]
    fn test_modules_link_back() {
        let (_assembly, widget) = create_loaded_widget();
        let assembly = AssemblyHandle::new(widget.assembly().unwrap());

        let modules = assembly.modules();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name(), "Contoso.Core.dll");
        assert!(Arc::ptr_eq(&modules[0].assembly().unwrap(), &assembly));

        let types = modules[0].get_types();
        assert!(Arc::ptr_eq(&types[0].module().unwrap(), &modules[0]));
        assert!(Arc::ptr_eq(&types[0].assembly().unwrap(), &assembly));
    }

    #[test]
    fn test_module_handle_memoizes_assembly() {
        let (_assembly, widget) = create_loaded_widget();
        let module = ModuleHandle::new(widget.module().unwrap());

        let first = module.assembly().unwrap();
        assert!(Arc::ptr_eq(&first, &module.assembly().unwrap()));
        assert_eq!(first.name(), "Contoso.Core");
        assert_eq!(first.version(), AssemblyVersion::new(1, 2, 0, 0));
        assert_eq!(first.full_name(), "Contoso.Core, Version=1.2.0.0");
    }
}
