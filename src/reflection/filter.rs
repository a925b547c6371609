//! The member filter engine.
//!
//! Filtering picks the order-preserving subsequence of a member collection that matches a
//! [`FilterSpec`]. Every pass normalizes the filter first, so the "no flags" sentinel selects
//! public instance members. Members are checked through the facts they expose via
//! [`Filterable`]:
//!
//! - fields and methods report their own access and binding
//! - properties report the facts of their getter, else their setter
//! - events report the facts of their add accessor, else remove, else raise
//! - types report visibility only, the binding axis is never applied to them
//!
//! A property or event without any accessor has no facts and matches nothing.
//!
//! Name lookups ([`find`], [`find_all`]) compare ordinally, folding case only when asked to.
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::prelude::*;
//! use dotreflect::reflection::filter;
//!
//! let widget = TypeBuilder::new("Contoso", "Widget").public().build()?;
//! widget.add_field(Field::new(1, "count", FieldAttributes::PUBLIC))?;
//! widget.add_field(Field::new(2, "cache", FieldAttributes::PRIVATE | FieldAttributes::STATIC))?;
//!
//! let public = filter::filter(widget.fields.iter().map(|(_, f)| f), FilterSpec::DEFAULT);
//! assert_eq!(public.len(), 1);
//! assert_eq!(public[0].name, "count");
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::{borrow::Cow, sync::Arc};

use tracing::trace;

use crate::{
    metadata::{
        members::{Event, Field, Method, MethodRc, Property},
        naming::NameCase,
        typesystem::CilType,
    },
    reflection::{flags::FilterSpec, member::MemberKind},
};

/// The visibility and binding facts a filter is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFacts {
    /// Is the member public
    pub is_public: bool,
    /// Is the member static; `None` for members without a binding concept (types)
    pub is_static: Option<bool>,
}

impl MemberFacts {
    fn of_method(method: &Method) -> Self {
        MemberFacts {
            is_public: method.is_public(),
            is_static: Some(method.is_static()),
        }
    }

    /// Check both axes of a normalized filter
    ///
    /// ## Arguments
    /// * 'spec' - The filter, already normalized
    #[must_use]
    pub fn matches(&self, spec: &FilterSpec) -> bool {
        spec.visibility.matches(self.is_public)
            && self
                .is_static
                .is_none_or(|is_static| spec.binding.matches(is_static))
    }
}

/// A definition the filter engine can select
pub trait Filterable {
    /// The member kind, used for tracing
    const KIND: MemberKind;

    /// The facts to match, `None` if the definition can not match any filter
    fn facts(&self) -> Option<MemberFacts>;
}

impl Filterable for Field {
    const KIND: MemberKind = MemberKind::Field;

    fn facts(&self) -> Option<MemberFacts> {
        Some(MemberFacts {
            is_public: self.is_public(),
            is_static: Some(self.is_static()),
        })
    }
}

impl Filterable for Method {
    const KIND: MemberKind = MemberKind::Method;

    fn facts(&self) -> Option<MemberFacts> {
        Some(MemberFacts::of_method(self))
    }
}

impl Filterable for Property {
    const KIND: MemberKind = MemberKind::Property;

    fn facts(&self) -> Option<MemberFacts> {
        self.primary_accessor()
            .map(|accessor| MemberFacts::of_method(accessor))
    }
}

impl Filterable for Event {
    const KIND: MemberKind = MemberKind::Event;

    fn facts(&self) -> Option<MemberFacts> {
        self.primary_accessor()
            .map(|accessor| MemberFacts::of_method(accessor))
    }
}

impl Filterable for CilType {
    const KIND: MemberKind = MemberKind::NestedType;

    fn facts(&self) -> Option<MemberFacts> {
        Some(MemberFacts {
            is_public: self.is_public(),
            is_static: None,
        })
    }
}

impl<T: Filterable + ?Sized> Filterable for Arc<T> {
    const KIND: MemberKind = T::KIND;

    fn facts(&self) -> Option<MemberFacts> {
        (**self).facts()
    }
}

/// Check a single definition against a filter, normalizing the filter first
///
/// ## Arguments
/// * 'member' - The definition to check
/// * 'spec'   - The requested filter
pub fn is_match<T: Filterable + ?Sized>(member: &T, spec: FilterSpec) -> bool {
    let spec = spec.normalize();
    member.facts().is_some_and(|facts| facts.matches(&spec))
}

/// Select the members matching `spec`, keeping declaration order
///
/// ## Arguments
/// * 'members' - The members of one kind
/// * 'spec'    - The requested filter
pub fn filter<'a, T>(members: impl IntoIterator<Item = &'a T>, spec: FilterSpec) -> Vec<T>
where
    T: Filterable + Clone + 'a,
{
    select(members, spec, T::KIND, |_| true)
}

/// Select the ordinary methods (constructors excluded) matching `spec`
///
/// ## Arguments
/// * 'methods' - The method collection of a type
/// * 'spec'    - The requested filter
pub fn filter_methods<'a>(
    methods: impl IntoIterator<Item = &'a MethodRc>,
    spec: FilterSpec,
) -> Vec<MethodRc> {
    select(methods, spec, MemberKind::Method, |method| {
        !method.is_constructor()
    })
}

/// Select the constructors matching `spec`
///
/// ## Arguments
/// * 'methods' - The method collection of a type
/// * 'spec'    - The requested filter
pub fn filter_constructors<'a>(
    methods: impl IntoIterator<Item = &'a MethodRc>,
    spec: FilterSpec,
) -> Vec<MethodRc> {
    select(methods, spec, MemberKind::Constructor, |method| {
        method.is_constructor()
    })
}

fn select<'a, T, P>(
    members: impl IntoIterator<Item = &'a T>,
    spec: FilterSpec,
    kind: MemberKind,
    mut admit: P,
) -> Vec<T>
where
    T: Filterable + Clone + 'a,
    P: FnMut(&T) -> bool,
{
    let spec = spec.normalize();
    let mut seen = 0usize;
    let selected: Vec<T> = members
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|member| admit(member))
        .filter(|member| member.facts().is_some_and(|facts| facts.matches(&spec)))
        .cloned()
        .collect();

    trace!(%kind, input = seen, output = selected.len(), ?spec, "filter pass");
    selected
}

/// All members whose selected name equals `name`, in declaration order
///
/// ## Arguments
/// * 'members' - The members to search
/// * 'select'  - Picks the name of a member; a member without a name never matches
/// * 'name'    - The name to look for
/// * 'case'    - The ordinal comparison to use
pub fn find_all<'a, T, F>(
    members: impl IntoIterator<Item = &'a T>,
    select: F,
    name: &str,
    case: NameCase,
) -> Vec<T>
where
    T: Clone + 'a,
    F: Fn(&T) -> Option<Cow<'_, str>>,
{
    members
        .into_iter()
        .filter(|member| select(member).is_some_and(|candidate| case.eq(&candidate, name)))
        .cloned()
        .collect()
}

/// The first member, in declaration order, whose selected name equals `name`
///
/// ## Arguments
/// * 'members' - The members to search
/// * 'select'  - Picks the name of a member; a member without a name never matches
/// * 'name'    - The name to look for
/// * 'case'    - The ordinal comparison to use
pub fn find<'a, T, F>(
    members: impl IntoIterator<Item = &'a T>,
    select: F,
    name: &str,
    case: NameCase,
) -> Option<T>
where
    T: Clone + 'a,
    F: Fn(&T) -> Option<Cow<'_, str>>,
{
    members
        .into_iter()
        .find(|member| select(member).is_some_and(|candidate| case.eq(&candidate, name)))
        .cloned()
}
