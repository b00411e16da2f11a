use std::any::{Any, type_name};
use std::fmt;

/// A struct whose fields can be populated from the environment.
///
/// Usually implemented through [`env_struct!`](crate::env_struct), which
/// generates the descriptor list from field tags.
pub trait EnvStruct {
    /// Describe every field, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// Descriptor for one struct field, borrowed mutably for a single load.
pub struct Field<'a> {
    name: &'static str,
    key: Option<&'static str>,
    fallback: Option<&'static str>,
    settable: bool,
    type_name: &'static str,
    slot: &'a mut (dyn Any + 'static),
}

impl<'a> Field<'a> {
    /// Describe a settable field with no binding key.
    pub fn new<T: Any>(name: &'static str, slot: &'a mut T) -> Self {
        Self {
            name,
            key: None,
            fallback: None,
            settable: true,
            type_name: type_name::<T>(),
            slot,
        }
    }

    /// Bind the field to an environment variable name.
    pub fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Attach a fallback literal, parsed only if the lookup fails.
    pub fn fallback(mut self, fallback: &'static str) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Mark whether the loader may write the field.
    pub fn settable(mut self, settable: bool) -> Self {
        self.settable = settable;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn binding_key(&self) -> Option<&'static str> {
        self.key
    }

    pub fn fallback_literal(&self) -> Option<&'static str> {
        self.fallback
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Binding key of a field the loader should populate.
    pub(crate) fn eligible_key(&self) -> Option<&'static str> {
        self.key.filter(|key| self.settable && !key.is_empty())
    }

    /// Non-empty fallback literal.
    pub(crate) fn usable_fallback(&self) -> Option<&'static str> {
        self.fallback.filter(|fallback| !fallback.is_empty())
    }

    pub(crate) fn slot_mut(&mut self) -> &mut (dyn Any + 'static) {
        &mut *self.slot
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .field("settable", &self.settable)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Summary of a struct load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Fields set from their environment variable.
    pub populated: usize,
    /// Fields set from their fallback literal.
    pub from_fallback: usize,
    /// Untagged or non-settable fields left untouched.
    pub skipped: usize,
}
