use std::{collections::BTreeMap, fmt};

use tracing::debug;

use crate::{help::HelpSubcommand, rt::OptionSet, subcommand::Subcommand, RegistryError};

pub const HELP_SUBCOMMAND: &str = "help";

pub type SubcommandFactory = Box<dyn Fn() -> Box<dyn Subcommand> + Send + Sync>;

/// Named catalog of subcommand factories.
///
/// Every [`SubcommandRegistry::get`] builds a fresh instance, nothing is
/// cached between lookups.
#[derive(Default)]
pub struct SubcommandRegistry {
    factories: BTreeMap<String, SubcommandFactory>,
    finalized: bool,
}

impl SubcommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, name: impl Into<String>, factory: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn() -> Box<dyn Subcommand> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.finalized {
            return Err(RegistryError::AlreadyFinalized(name));
        }
        if self.factories.contains_key(&name) {
            return Err(RegistryError::DuplicateSubcommand(name));
        }
        self.factories.insert(name, Box::new(factory));
        Ok(self)
    }

    /// Closes registrations and adds a `help` subcommand whose topics are
    /// the subcommands registered so far.
    pub fn finalize(&mut self) -> Result<(), RegistryError> {
        if self.finalized {
            return Err(RegistryError::DoubleFinalize);
        }
        if self.exists(HELP_SUBCOMMAND) {
            return Err(RegistryError::HelpAlreadyRegistered);
        }
        let topics = self.names();
        debug!(?topics, "finalizing subcommand registrations");
        self.add(HELP_SUBCOMMAND, move || Box::new(HelpSubcommand::new(topics.clone())))?;
        self.finalized = true;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn get(&self, name: &str) -> Result<Box<dyn Subcommand>, RegistryError> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(RegistryError::UnknownSubcommand(name.to_string())),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// A fresh instance of every registered subcommand, in name order.
    pub fn all(&self) -> Vec<Box<dyn Subcommand>> {
        self.factories.values().map(|factory| factory()).collect()
    }

    /// Every subcommand's unique options plus their shared options, with
    /// requirements relaxed. A shared option used by several subcommands
    /// appears once.
    pub fn all_unique_options_union(&self) -> OptionSet {
        let mut res = OptionSet::new();
        for subcommand in self.all() {
            res.add(subcommand.unique_options(true, false));
            for option in &subcommand.shared_options(false) {
                if !res.contains(option.name()) {
                    res.push(option.clone());
                }
            }
        }
        res
    }
}

impl fmt::Debug for SubcommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubcommandRegistry")
            .field("subcommands", &self.factories.keys().collect::<Vec<_>>())
            .field("finalized", &self.finalized)
            .finish()
    }
}
