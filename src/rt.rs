//! The underlying command line tokenizer.
//!
//! Parsing happens in three steps, each of which can fail with an [`Error`]:
//! [`Parser::run`] splits tokens into occurrences of known options, [`store`]
//! validates and collects their values and [`notify`] checks that every
//! enforced-required option was given. These errors are low level; the rest
//! of the crate translates them into [`crate::ParsingError`].

use std::{collections::BTreeMap, fmt, str::FromStr};

use tracing::trace;

use crate::{
    option::{OptionSpec, ValueKind},
    positional::PositionalLayout,
    ErrorKind, ParsingError,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error::Other(format!($($tt)*))
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unrecognised option '{0}'")]
    UnknownOption(String),
    /// Carries the option's required identity, `--name`.
    #[error("the option '{0}' is required but missing")]
    RequiredOption(String),
    #[error("too many positional options have been specified on the command line")]
    TooManyPositional,
    #[error("option '{token}' is ambiguous and matches {}", quoted(.candidates))]
    Ambiguous { token: String, candidates: Vec<String> },
    #[error("the argument ('{value}') for option '{option}' is invalid: {reason}")]
    InvalidValue { option: String, value: String, reason: String },
    #[error("{0}")]
    Other(String),
}

fn quoted(candidates: &[String]) -> String {
    candidates.iter().map(|it| format!("'{it}'")).collect::<Vec<_>>().join(", ")
}

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// A unique prefix of a long option selects it, `--disp` for `--display-name`.
    pub allow_guessing: bool,
    /// Short flags may be bundled, `-abc`, and short options may take an
    /// adjacent value, `-n5`.
    pub allow_sticky: bool,
    /// Long options may take their value as `--name=value`.
    pub allow_long_equals: bool,
}

impl Default for Style {
    fn default() -> Self {
        Style { allow_guessing: true, allow_sticky: true, allow_long_equals: true }
    }
}

/// An ordered set of option instances, the input of one parse.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    options: Vec<OptionSpec>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, option: OptionSpec) {
        self.options.push(option)
    }

    pub fn add(&mut self, other: OptionSet) -> &mut Self {
        self.options.extend(other.options);
        self
    }

    pub fn find(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|it| it.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn lookup_long(&self, name: &str, style: Style) -> Result<&OptionSpec> {
        let exact = self.options.iter().filter(|it| it.name() == name).collect::<Vec<_>>();
        let candidates = if exact.is_empty() && style.allow_guessing && !name.is_empty() {
            self.options.iter().filter(|it| it.name().starts_with(name)).collect()
        } else {
            exact
        };
        pick(candidates, format!("--{name}"), |it| format!("--{}", it.name()))
    }

    fn lookup_short(&self, short: char) -> Result<&OptionSpec> {
        let candidates = self.options.iter().filter(|it| it.short() == Some(short)).collect();
        pick(candidates, format!("-{short}"), |it| format!("-{short} [ --{} ]", it.name()))
    }
}

fn pick<'a>(
    mut candidates: Vec<&'a OptionSpec>,
    token: String,
    describe: impl Fn(&OptionSpec) -> String,
) -> Result<&'a OptionSpec> {
    match candidates.len() {
        0 => Err(Error::UnknownOption(token)),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::Ambiguous { token, candidates: candidates.into_iter().map(describe).collect() }),
    }
}

impl FromIterator<OptionSpec> for OptionSet {
    fn from_iter<I: IntoIterator<Item = OptionSpec>>(iter: I) -> Self {
        OptionSet { options: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One option as it appeared on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub key: String,
    pub values: Vec<String>,
    /// Index of the positional slot the token was bound to.
    pub position: Option<usize>,
    /// The tokens this occurrence was read from, verbatim.
    pub original_tokens: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub occurrences: Vec<Occurrence>,
}

pub struct Parser<'a> {
    options: &'a OptionSet,
    positional: &'a PositionalLayout,
    style: Style,
    after_double_dash: bool,
    positional_count: usize,
    rargs: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(
        options: &'a OptionSet,
        positional: &'a PositionalLayout,
        style: Style,
        mut args: Vec<String>,
    ) -> Self {
        args.reverse();
        Parser { options, positional, style, after_double_dash: false, positional_count: 0, rargs: args }
    }

    pub fn run(mut self) -> Result<Parsed> {
        let mut occurrences = Vec::new();
        while let Some(arg) = self.next() {
            trace!(token = %arg, "tokenizing");
            let occurrence = if self.after_double_dash {
                self.positional_arg(arg)?
            } else if arg == "--" {
                self.after_double_dash = true;
                continue;
            } else if arg.starts_with("--") {
                self.long(arg)?
            } else if arg.len() > 1 && arg.starts_with('-') {
                self.short(arg)?
            } else {
                self.positional_arg(arg)?
            };
            occurrences.push(occurrence);
        }
        Ok(Parsed { occurrences })
    }

    fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn next_value(&mut self, flag: &str) -> Result<String> {
        let after_double_dash = self.after_double_dash;
        match self.next() {
            Some(it) if after_double_dash || it.len() < 2 || !it.starts_with('-') => Ok(it),
            Some(it) => {
                self.rargs.push(it);
                bail!("the required argument for option '{flag}' is missing")
            }
            None => bail!("the required argument for option '{flag}' is missing"),
        }
    }

    fn long(&mut self, arg: String) -> Result<Occurrence> {
        let body = &arg[2..];
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) if self.style.allow_long_equals => (name, Some(value.to_string())),
            _ => (body, None),
        };
        let option = self.options.lookup_long(name, self.style)?;
        let flag = format!("--{}", option.name());
        let key = option.name().to_string();

        let mut original_tokens = vec![arg.clone()];
        let values = match (option.kind(), inline) {
            (ValueKind::Flag, Some(_)) => bail!("option '{flag}' does not take a value"),
            (ValueKind::Flag, None) => Vec::new(),
            (_, Some(value)) => vec![value],
            (_, None) => {
                let value = self.next_value(&flag)?;
                original_tokens.push(value.clone());
                vec![value]
            }
        };
        Ok(Occurrence { key, values, position: None, original_tokens })
    }

    fn short(&mut self, arg: String) -> Result<Occurrence> {
        let mut chars = arg[1..].chars();
        let short = match chars.next() {
            Some(it) => it,
            None => return Err(Error::UnknownOption(arg)),
        };
        let rest = chars.as_str().to_string();
        let option = self.options.lookup_short(short)?;
        if !rest.is_empty() && !self.style.allow_sticky {
            return Err(Error::UnknownOption(arg));
        }
        let flag = format!("-{short}");
        let key = option.name().to_string();

        let (values, original_tokens) = match option.kind() {
            ValueKind::Flag if rest.starts_with('-') => return Err(Error::UnknownOption(arg)),
            ValueKind::Flag => {
                if !rest.is_empty() {
                    self.rargs.push(format!("-{rest}"));
                }
                (Vec::new(), vec![flag])
            }
            _ if rest.is_empty() => {
                let value = self.next_value(&flag)?;
                (vec![value.clone()], vec![flag, value])
            }
            _ => (vec![rest], vec![arg]),
        };
        Ok(Occurrence { key, values, position: None, original_tokens })
    }

    fn positional_arg(&mut self, arg: String) -> Result<Occurrence> {
        let position = self.positional_count;
        let name = self.positional.name_for_position(position).ok_or(Error::TooManyPositional)?;
        if !self.options.contains(name) {
            return Err(Error::UnknownOption(name.to_string()));
        }
        self.positional_count += 1;
        Ok(Occurrence {
            key: name.to_string(),
            values: vec![arg.clone()],
            position: Some(position),
            original_tokens: vec![arg],
        })
    }
}

/// Validates the values of every occurrence and collects them by option name.
pub fn store(options: &OptionSet, parsed: &Parsed) -> Result<Values> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for occurrence in &parsed.occurrences {
        let key = &occurrence.key;
        let option = options.find(key).ok_or_else(|| Error::UnknownOption(key.clone()))?;
        let shown = match occurrence.position {
            Some(_) => key.clone(),
            None => format!("--{key}"),
        };
        for value in &occurrence.values {
            option.validate(value).map_err(|reason| Error::InvalidValue {
                option: shown.clone(),
                value: value.clone(),
                reason,
            })?;
        }

        let seen = map.contains_key(key);
        match option.kind() {
            ValueKind::Flag if !occurrence.values.is_empty() => {
                bail!("option '{shown}' does not take a value")
            }
            ValueKind::Flag | ValueKind::Scalar if seen => {
                bail!("option '{shown}' cannot be specified more than once")
            }
            _ => (),
        }
        let slot = map.entry(key.clone()).or_default();
        slot.extend(occurrence.values.iter().cloned());
        if let ValueKind::List { max: Some(max) } = option.kind() {
            if slot.len() > max {
                bail!("option '{shown}' takes at most {max} values")
            }
        }
    }
    Ok(Values { map })
}

/// Fails on the first enforced-required option without a value.
pub fn notify(options: &OptionSet, values: &Values) -> Result<()> {
    match options.iter().find(|it| it.is_required() && !values.contains(it.name())) {
        Some(missing) => Err(Error::RequiredOption(missing.required_identity())),
        None => Ok(()),
    }
}

/// Tokenizes, stores and checks in one go.
pub fn parse(
    options: &OptionSet,
    positional: &PositionalLayout,
    style: Style,
    args: Vec<String>,
) -> Result<(Parsed, Values)> {
    let parsed = Parser::new(options, positional, style, args).run()?;
    let values = store(options, &parsed)?;
    notify(options, &values)?;
    Ok((parsed, values))
}

/// Parsed option values, keyed by option name.
///
/// Flags are present with no values, lists hold every value given.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Values {
    map: BTreeMap<String, Vec<String>>,
}

impl Values {
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.contains(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(|it| it.first()).map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.map.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get<T: FromStr>(&self, name: &str) -> crate::Result<Option<T>>
    where
        T::Err: fmt::Display,
    {
        self.get_str(name).map(|it| value_from_str(name, it)).transpose()
    }

    pub fn get_many<T: FromStr>(&self, name: &str) -> crate::Result<Vec<T>>
    where
        T::Err: fmt::Display,
    {
        self.get_all(name).iter().map(|it| value_from_str(name, it)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn value_from_str<T: FromStr>(name: &str, value: &str) -> crate::Result<T>
where
    T::Err: fmt::Display,
{
    value.parse::<T>().map_err(|err| {
        let msg = format!("Can't parse `{name}` from '{value}', {err}");
        ParsingError::new(ErrorKind::InvalidOptionValue, msg, None)
    })
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}
