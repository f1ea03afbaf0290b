use std::{collections::BTreeMap, sync::Arc};

use crate::{option::OptionDef, rt::OptionSet, RegistryError};

/// Named catalog of reusable option definitions.
///
/// Cloning is cheap and clones share the definitions, which is how a subset of
/// common options is handed to several subcommands. Entries are kept in name
/// order.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    entries: BTreeMap<String, Arc<OptionDef>>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn single(def: OptionDef) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(def.name().to_string(), Arc::new(def));
        OptionRegistry { entries }
    }

    pub fn register(&mut self, def: OptionDef) -> Result<&mut Self, RegistryError> {
        if self.entries.contains_key(def.name()) {
            return Err(RegistryError::DuplicateOption(def.name().to_string()));
        }
        self.entries.insert(def.name().to_string(), Arc::new(def));
        Ok(self)
    }

    /// A new registry holding only `names`.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<OptionRegistry, RegistryError> {
        let mut entries = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let def = self.entry(name)?;
            entries.insert(name.to_string(), Arc::clone(def));
        }
        Ok(OptionRegistry { entries })
    }

    /// Instances of `names`, in the order given.
    pub fn get<S: AsRef<str>>(
        &self,
        names: &[S],
        enforce_required: bool,
    ) -> Result<OptionSet, RegistryError> {
        let mut res = OptionSet::new();
        for name in names {
            res.push(self.entry(name.as_ref())?.instantiate(enforce_required));
        }
        Ok(res)
    }

    /// Instances of every entry. With `enforce_required` off no instance ever
    /// fails a parse for being absent.
    pub fn all(&self, enforce_required: bool) -> OptionSet {
        self.entries.values().map(|def| def.instantiate(enforce_required)).collect()
    }

    /// Like [`OptionRegistry::all`], skipping hidden entries.
    pub fn visible(&self, enforce_required: bool) -> OptionSet {
        self.entries
            .values()
            .filter(|def| !def.is_hidden())
            .map(|def| def.instantiate(enforce_required))
            .collect()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    fn entry(&self, name: &str) -> Result<&Arc<OptionDef>, RegistryError> {
        self.entries.get(name).ok_or_else(|| RegistryError::UnknownOption(name.to_string()))
    }
}
