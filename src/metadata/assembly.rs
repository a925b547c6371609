//! Assemblies and modules of the in-memory metadata graph.
//!
//! An [`Assembly`] owns its modules, a [`Module`] owns its top-level types. Types resolve their
//! owning module and assembly through weak back-references, so the graph is released when the
//! last strong reference to the assembly goes away.

use std::{
    fmt,
    sync::{Arc, OnceLock, Weak},
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::{
        naming::qualified_name,
        token::{TableKind, Token},
        typesystem::{CilTypeList, CilTypeRc, MAX_DECLARING_CHAIN},
        universe::MetadataUniverse,
    },
    Error, Result,
};

/// A reference to an `Assembly`
pub type AssemblyRc = Arc<Assembly>;
/// A reference to a `Module`
pub type ModuleRc = Arc<Module>;
/// A vector that holds a list of `Module`
pub type ModuleList = Arc<boxcar::Vec<ModuleRc>>;

/// The four-part version of an assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version number
    pub major: u16,
    /// Minor version number
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyVersion {
    /// Create a new version
    #[must_use]
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        AssemblyVersion {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// An assembly, the unit of deployment that owns one or more modules
pub struct Assembly {
    /// Token
    pub token: Token,
    /// The simple name of the assembly
    pub name: String,
    /// The version of the assembly
    pub version: AssemblyVersion,
    /// All modules of this assembly, the manifest module first
    pub modules: ModuleList,
    universe: OnceLock<Weak<MetadataUniverse>>,
}

impl Assembly {
    /// Create a new assembly without modules
    ///
    /// ## Arguments
    /// * 'name'    - The simple name of the assembly
    /// * 'version' - The version of the assembly
    pub fn new(name: &str, version: AssemblyVersion) -> AssemblyRc {
        Arc::new(Assembly {
            token: Token::from_parts(TableKind::ASSEMBLY, 1),
            name: name.to_string(),
            version,
            modules: Arc::new(boxcar::Vec::new()),
            universe: OnceLock::new(),
        })
    }

    /// The display name, `Name, Version=x.y.z.w`
    pub fn fullname(&self) -> String {
        format!("{}, Version={}", self.name, self.version)
    }

    /// Add a module to this assembly
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the module already belongs to an assembly.
    pub fn add_module(self: &Arc<Self>, module: &ModuleRc) -> Result<()> {
        if module.assembly.set(Arc::downgrade(self)).is_err() {
            return Err(malformed_error!(
                "Module '{}' already belongs to an assembly",
                module.name
            ));
        }
        self.modules.push(module.clone());
        Ok(())
    }

    /// The first module added, which holds the manifest
    pub fn manifest_module(&self) -> Option<ModuleRc> {
        self.modules.get(0).cloned()
    }

    /// Look up a type by full name across all modules; nested types use `Outer/Inner`
    pub fn find_type(&self, fullname: &str) -> Option<CilTypeRc> {
        self.modules
            .iter()
            .find_map(|(_, module)| module.find_type(fullname))
    }

    /// The universe this assembly is loaded into
    pub fn universe(&self) -> Option<Arc<MetadataUniverse>> {
        self.universe.get().and_then(Weak::upgrade)
    }

    pub(crate) fn set_universe(&self, universe: &Arc<MetadataUniverse>) -> bool {
        self.universe.set(Arc::downgrade(universe)).is_ok()
    }

    /// Visit every type of every module, nested types included
    pub(crate) fn for_each_type<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&CilTypeRc, usize) -> Result<()>,
    {
        for (_, module) in self.modules.iter() {
            let mut pending: Vec<(CilTypeRc, usize)> = module
                .types
                .iter()
                .map(|(_, entry)| (entry.clone(), 0))
                .collect();

            while let Some((current, depth)) = pending.pop() {
                visit(&current, depth)?;
                if depth >= MAX_DECLARING_CHAIN {
                    return Err(Error::RecursionLimit(MAX_DECLARING_CHAIN));
                }
                for (_, nested) in current.nested_types.iter() {
                    pending.push((nested.clone(), depth + 1));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("modules", &self.modules.count())
            .finish()
    }
}

/// A module, a single file of an assembly that owns its top-level types
pub struct Module {
    /// Token
    pub token: Token,
    /// The name of the module, e.g. `Contoso.Core.dll`
    pub name: String,
    /// All top-level types, in declaration order
    pub types: CilTypeList,
    assembly: OnceLock<Weak<Assembly>>,
    types_by_token: SkipMap<Token, CilTypeRc>,
    types_by_fullname: DashMap<String, Token>,
}

impl Module {
    /// Create a new module without types
    ///
    /// ## Arguments
    /// * 'name' - The name of the module
    pub fn new(name: &str) -> ModuleRc {
        Arc::new(Module {
            token: Token::from_parts(TableKind::MODULE, 1),
            name: name.to_string(),
            types: Arc::new(boxcar::Vec::new()),
            assembly: OnceLock::new(),
            types_by_token: SkipMap::new(),
            types_by_fullname: DashMap::new(),
        })
    }

    /// Add a top-level type to this module
    ///
    /// # Errors
    /// Returns [`Error::TypeInsert`] if the token is already taken in this module, and
    /// [`Error::Malformed`] if the type is nested or belongs to another module.
    pub fn add_type(self: &Arc<Self>, new_type: &CilTypeRc) -> Result<()> {
        if new_type.declaring().is_some() {
            return Err(malformed_error!(
                "Nested type '{}' can not be added to a module directly",
                new_type.name
            ));
        }
        if self.types_by_token.contains_key(&new_type.token) {
            return Err(Error::TypeInsert(new_type.token));
        }
        if !new_type.set_module(self) {
            return Err(malformed_error!(
                "Type '{}' already belongs to a module",
                new_type.name
            ));
        }

        self.types_by_token
            .insert(new_type.token, new_type.clone());
        self.types_by_fullname
            .entry(qualified_name(&new_type.namespace, &new_type.name))
            .or_insert(new_type.token);
        self.types.push(new_type.clone());
        Ok(())
    }

    /// The assembly owning this module
    pub fn assembly(&self) -> Option<AssemblyRc> {
        self.assembly.get().and_then(Weak::upgrade)
    }

    /// Look up a top-level type by token
    pub fn get(&self, token: &Token) -> Option<CilTypeRc> {
        self.types_by_token
            .get(token)
            .map(|entry| entry.value().clone())
    }

    /// Look up a type by full name; nested types use `Outer/Inner`
    pub fn find_type(&self, fullname: &str) -> Option<CilTypeRc> {
        let mut segments = fullname.split('/');
        let outermost = segments.next()?;
        let token = *self.types_by_fullname.get(outermost)?.value();
        let mut current = self.get(&token)?;

        for segment in segments {
            current = current.nested_type_by_name(segment)?;
        }
        Some(current)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("types", &self.types.count())
            .finish()
    }
}
