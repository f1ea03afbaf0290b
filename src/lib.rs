//! Command line parser for tools shaped like `tool <subcommand> [options] [positional...]`.
//!
//! Options are defined once in an [`OptionRegistry`] and handed out to the
//! subcommands that use them. A [`Cli`] parses the command line twice: a
//! relaxed pass over every option known to the application finds out which
//! subcommand was invoked, and a strict pass with that subcommand's own option
//! set validates the rest. The strict pass runs only when the caller asks for
//! the subcommand's values.
//!
//! ```
//! use subflags::{Arity, Cli, OptionDef, OptionRegistry, PositionalLayout, Subcommand};
//! use subflags::SubcommandRegistry;
//!
//! struct Create {
//!     unique: OptionRegistry,
//! }
//!
//! impl Subcommand for Create {
//!     fn name(&self) -> &str {
//!         "create"
//!     }
//!     fn description(&self) -> &str {
//!         "create a user"
//!     }
//!     fn unique_registry(&self) -> &OptionRegistry {
//!         &self.unique
//!     }
//!     fn positional(&self) -> PositionalLayout {
//!         PositionalLayout::new().add("uuid", Arity::Count(1))
//!     }
//! }
//!
//! let mut subcommands = SubcommandRegistry::new();
//! subcommands
//!     .add("create", || {
//!         let mut unique = OptionRegistry::new();
//!         unique.register(OptionDef::value::<String>("uuid", "user id").required()).unwrap();
//!         Box::new(Create { unique })
//!     })
//!     .unwrap();
//! subcommands.finalize().unwrap();
//!
//! let cli = Cli::new("admin", "user administration", subcommands);
//! let output = cli.parse(["create", "abc123"]).unwrap();
//! assert_eq!(output.subcommand_used(), Some("create"));
//! let values = output.values().unwrap();
//! assert_eq!(values.get_str("uuid"), Some("abc123"));
//! ```

macro_rules! w {
    ($($tt:tt)*) => {{
        let _ = write!($($tt)*);
    }};
}

mod cli;
mod collection;
mod descriptor;
mod help;
mod option;
mod positional;
mod registry;
mod subcommand;
mod translate;

pub mod printer;
pub mod rt;

use std::fmt;

pub use crate::{
    cli::{Cli, ParseOutput, PendingSubcommand},
    collection::{SubcommandFactory, SubcommandRegistry, HELP_SUBCOMMAND},
    descriptor::OptionDescriptor,
    help::HelpSubcommand,
    option::{OptionDef, OptionSpec, ValueKind},
    positional::{locate, Arity, PositionalInfo, PositionalLayout},
    registry::OptionRegistry,
    rt::{OptionSet, Style, Values},
    subcommand::Subcommand,
};

pub type Result<T, E = ParsingError> = std::result::Result<T, E>;

/// What went wrong while parsing a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownOption,
    UnknownSubcommand,
    MissingRequiredOption,
    TooManyPositionalOptions,
    AmbiguousOption,
    InvalidOptionValue,
    ConsistencyViolation,
    Other,
}

/// A user-facing command line error.
///
/// Carries the name of the subcommand that was being parsed, if any, so the
/// caller can print that subcommand's usage rather than the whole
/// application's.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{msg}")]
pub struct ParsingError {
    kind: ErrorKind,
    msg: String,
    option: Option<String>,
    positional: bool,
    subcommand: Option<String>,
}

impl ParsingError {
    pub(crate) fn new(kind: ErrorKind, msg: String, subcommand: Option<&str>) -> Self {
        ParsingError {
            kind,
            msg,
            option: None,
            positional: false,
            subcommand: subcommand.map(str::to_string),
        }
    }

    pub(crate) fn with_option(mut self, option: String, positional: bool) -> Self {
        self.option = Some(option);
        self.positional = positional;
        self
    }

    /// Error for a combination of values the option model cannot express,
    /// raised from [`Subcommand::check_consistency`].
    pub fn inconsistent(subcommand: &str, msg: impl fmt::Display) -> Self {
        ParsingError::new(ErrorKind::ConsistencyViolation, msg.to_string(), Some(subcommand))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Display name of the offending option, when the error is about one.
    pub fn option(&self) -> Option<&str> {
        self.option.as_deref()
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }
}

/// Misconfiguration of registries by the application itself.
///
/// These never depend on user input, so most applications simply
/// `expect` them during startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("option `{0}` is already registered")]
    DuplicateOption(String),
    #[error("requested option `{0}` is not a member of the option registry")]
    UnknownOption(String),
    #[error("subcommand `{0}` is already registered")]
    DuplicateSubcommand(String),
    #[error("subcommand `{0}` is not registered")]
    UnknownSubcommand(String),
    #[error("attempt to register subcommand `{0}` after registrations were closed")]
    AlreadyFinalized(String),
    #[error("attempt to close registrations twice")]
    DoubleFinalize,
    #[error("attempt to finalize with `help` already registered")]
    HelpAlreadyRegistered,
}
