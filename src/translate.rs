use tracing::error;

use crate::{
    descriptor::OptionDescriptor,
    positional::PositionalLayout,
    rt::{self, OptionSet},
    ErrorKind, ParsingError,
};

const COLLISION_NOTE: &str = "NOTE: there is a current limitation where two subcommands cannot \
     contain the same option name or shorthand unless they are specifically shared duplicate options.";

/// Runs `f` and turns tokenizer failures into [`ParsingError`]s that name the
/// offending option the way `options` displays it.
pub(crate) fn execute_and_translate<T>(
    f: impl FnOnce() -> rt::Result<T>,
    options: &OptionSet,
    positional: &PositionalLayout,
    subcommand: Option<&str>,
) -> crate::Result<T> {
    f().map_err(|err| translate(err, options, positional, subcommand))
}

pub(crate) fn translate(
    err: rt::Error,
    options: &OptionSet,
    positional: &PositionalLayout,
    subcommand: Option<&str>,
) -> ParsingError {
    match err {
        rt::Error::RequiredOption(identity) => {
            let source = match subcommand {
                Some(name) => format!("Subcommand '{name}'"),
                None => "Application".to_string(),
            };
            let (display, is_positional) = match locate_option(&identity, options, positional) {
                Some(desc) => {
                    let is_positional = desc.is_positional();
                    (desc.display_name, is_positional)
                }
                None => {
                    error!(%identity, "missing required option is not part of the option set");
                    debug_assert!(false, "required option `{identity}` could not be located");
                    (identity.trim_start_matches('-').to_string(), false)
                }
            };
            let kind = if is_positional { "positional option" } else { "option" };
            let msg = format!("{source} used without required {kind}: {display}.");
            ParsingError::new(ErrorKind::MissingRequiredOption, msg, subcommand)
                .with_option(display, is_positional)
        }
        rt::Error::UnknownOption(token) => {
            let msg = format!("Unknown option {token} specified");
            ParsingError::new(ErrorKind::UnknownOption, msg, subcommand).with_option(token, false)
        }
        rt::Error::TooManyPositional => {
            let msg = "Too many positional options specified".to_string();
            ParsingError::new(ErrorKind::TooManyPositionalOptions, msg, subcommand)
        }
        rt::Error::Ambiguous { token, candidates } => {
            let err = rt::Error::Ambiguous { token: token.clone(), candidates };
            let msg = format!("{err}\n{COLLISION_NOTE}");
            ParsingError::new(ErrorKind::AmbiguousOption, msg, subcommand).with_option(token, false)
        }
        rt::Error::InvalidValue { option, value, reason } => {
            let is_positional = !option.starts_with('-');
            let err = rt::Error::InvalidValue { option: option.clone(), value, reason };
            let msg = format!(
                "{err}, likely the provided value can't be parsed into the desired type for the argument"
            );
            ParsingError::new(ErrorKind::InvalidOptionValue, msg, subcommand)
                .with_option(option, is_positional)
        }
        rt::Error::Other(msg) => ParsingError::new(ErrorKind::Other, msg, subcommand),
    }
}

/// Finds the option whose required identity is `identity`.
pub(crate) fn locate_option(
    identity: &str,
    options: &OptionSet,
    positional: &PositionalLayout,
) -> Option<OptionDescriptor> {
    options
        .iter()
        .find(|it| it.required_identity() == identity)
        .map(|it| OptionDescriptor::new(it, positional))
}
