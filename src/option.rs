use std::{fmt, str::FromStr};

/// Checks that a raw token converts into the option's value type.
pub(crate) type Validator = fn(&str) -> Result<(), String>;

fn validate<T: FromStr>(value: &str) -> Result<(), String>
where
    T::Err: fmt::Display,
{
    value.parse::<T>().map(drop).map_err(|err| err.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Presence-only switch, `--verbose`.
    Flag,
    /// Exactly one value, `--name ARG`.
    Scalar,
    /// Values accumulated over every occurrence, at most `max` of them.
    List { max: Option<usize> },
}

/// A registered option definition.
///
/// The definition itself never changes; [`OptionDef::instantiate`] produces
/// the [`OptionSpec`] used for one parse, deciding there whether the
/// `required` restriction is enforced.
#[derive(Clone)]
pub struct OptionDef {
    pub(crate) name: String,
    pub(crate) short: Option<char>,
    pub(crate) description: String,
    pub(crate) kind: ValueKind,
    pub(crate) required: bool,
    pub(crate) hidden: bool,
    pub(crate) validator: Option<Validator>,
}

impl OptionDef {
    pub fn flag(name: impl Into<String>, description: impl Into<String>) -> Self {
        OptionDef::new(name.into(), description.into(), ValueKind::Flag, None)
    }

    pub fn value<T: FromStr>(name: impl Into<String>, description: impl Into<String>) -> Self
    where
        T::Err: fmt::Display,
    {
        OptionDef::new(name.into(), description.into(), ValueKind::Scalar, Some(validate::<T>))
    }

    pub fn list<T: FromStr>(name: impl Into<String>, description: impl Into<String>) -> Self
    where
        T::Err: fmt::Display,
    {
        let kind = ValueKind::List { max: None };
        OptionDef::new(name.into(), description.into(), kind, Some(validate::<T>))
    }

    fn new(name: String, description: String, kind: ValueKind, validator: Option<Validator>) -> Self {
        assert!(!name.is_empty() && !name.starts_with('-'), "invalid option name: `{name}`");
        OptionDef { name, short: None, description, kind, required: false, hidden: false, validator }
    }

    pub fn short(mut self, short: char) -> Self {
        assert!(short.is_ascii_alphanumeric(), "invalid short option: `{short}`");
        self.short = Some(short);
        self
    }

    /// Marks the option as required. Ignored for flags, a switch that must
    /// always be given carries no information.
    pub fn required(mut self) -> Self {
        self.required = self.kind != ValueKind::Flag;
        self
    }

    /// Keeps the option out of help output while still accepting it.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Limits a list option to at most `max` values.
    pub fn arity(mut self, max: usize) -> Self {
        assert!(max > 0, "list arity must be positive");
        if let ValueKind::List { .. } = self.kind {
            self.kind = ValueKind::List { max: Some(max) };
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn instantiate(&self, enforce_required: bool) -> OptionSpec {
        OptionSpec {
            name: self.name.clone(),
            short: self.short,
            description: self.description.clone(),
            kind: self.kind,
            required: self.required && enforce_required,
            validator: self.validator,
        }
    }
}

impl fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("hidden", &self.hidden)
            .finish()
    }
}

/// One option as seen by a single parse.
#[derive(Clone)]
pub struct OptionSpec {
    name: String,
    short: Option<char>,
    description: String,
    kind: ValueKind,
    required: bool,
    validator: Option<Validator>,
}

impl OptionSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether a parse with this instance fails when the option is absent.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn takes_value(&self) -> bool {
        self.kind != ValueKind::Flag
    }

    /// The identity reported when this option is required but missing.
    pub fn required_identity(&self) -> String {
        format!("--{}", self.name)
    }

    /// `-v [ --verbose ]` or `--name arg`, as shown in option details.
    pub fn format_name(&self) -> String {
        let mut res = match self.short {
            Some(short) => format!("-{short} [ --{} ]", self.name),
            None => format!("--{}", self.name),
        };
        if self.takes_value() {
            res.push_str(" arg");
        }
        res
    }

    pub(crate) fn validate(&self, value: &str) -> Result<(), String> {
        match self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .finish()
    }
}
