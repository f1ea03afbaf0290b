use std::{
    fmt::{self, Write as _},
    io::{self, Write},
};

use tracing::debug;

use crate::{
    collection::SubcommandRegistry,
    option::OptionDef,
    positional::{Arity, PositionalLayout},
    printer::OptionPrinter,
    registry::OptionRegistry,
    rt::{self, OptionSet, Parsed, Style, Values},
    subcommand::Subcommand,
    translate, ErrorKind, ParsingError, Result,
};

const SUBCOMMAND: &str = "subcommand";
const ADDITIONAL_POSITIONAL: &str = "additional-positional";

/// Top level parser of an application made of subcommands.
///
/// Parsing is done in two phases. The first uses every option of every
/// subcommand with requirements relaxed, only to learn which subcommand
/// was invoked. The second, deferred until [`ParseOutput::values`] is
/// called, parses the arguments meant for that subcommand with its own
/// option set and all restrictions enforced.
#[derive(Debug)]
pub struct Cli {
    name: String,
    description: String,
    subcommands: SubcommandRegistry,
    app_options: OptionRegistry,
    style: Style,
}

impl Cli {
    /// Panics if `subcommands` has not been finalized.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        subcommands: SubcommandRegistry,
    ) -> Self {
        assert!(subcommands.is_finalized(), "subcommand registrations must be finalized first");
        Cli {
            name: name.into(),
            description: description.into(),
            subcommands,
            app_options: OptionRegistry::new(),
            style: Style::default(),
        }
    }

    /// Options usable without a subcommand, `--version` and the like.
    pub fn app_options(mut self, options: OptionRegistry) -> Self {
        self.app_options = options;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subcommands(&self) -> &SubcommandRegistry {
        &self.subcommands
    }

    pub fn parse_env(&self) -> Result<ParseOutput> {
        let mut args = Vec::new();
        for arg in std::env::args_os().skip(1) {
            match arg.into_string() {
                Ok(it) => args.push(it),
                Err(it) => {
                    let msg = format!("Can't parse {it:?}, invalid utf8");
                    return Err(ParsingError::new(ErrorKind::Other, msg, None));
                }
            }
        }
        self.parse(args)
    }

    pub fn parse<I, S>(&self, args: I) -> Result<ParseOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();

        let mut options = self.subcommands.all_unique_options_union();
        options.add(self.global_options(false));
        options.push(
            OptionDef::list::<String>(ADDITIONAL_POSITIONAL, "hidden option for dev only")
                .hidden()
                .instantiate(false),
        );
        let layout = PositionalLayout::new()
            .add(SUBCOMMAND, Arity::Count(1))
            .add(ADDITIONAL_POSITIONAL, Arity::Unlimited);

        debug!(?args, "phase 1 parse");
        let (parsed, values) = translate::execute_and_translate(
            || rt::parse(&options, &layout, self.style, args),
            &options,
            &layout,
            None,
        )?;

        let name = match values.get_str(SUBCOMMAND) {
            Some(it) => it.to_string(),
            None => {
                let app = self.app_options.all(true);
                translate::execute_and_translate(
                    || rt::notify(&app, &values),
                    &app,
                    &self.visible_layout(),
                    None,
                )?;
                return Ok(ParseOutput::NoSubcommand(values));
            }
        };
        let subcommand = self.subcommands.get(&name).map_err(|_| {
            let msg = format!("Subcommand used: {name}, is not valid for this application");
            ParsingError::new(ErrorKind::UnknownSubcommand, msg, None)
        })?;

        let args = prepare_command_line(&parsed, values.get_all(ADDITIONAL_POSITIONAL));
        debug!(subcommand = %name, ?args, "deferring subcommand parse");
        Ok(ParseOutput::Subcommand(PendingSubcommand { subcommand, args, style: self.style }))
    }

    /// Full help for each topic, or the application usage when there are none.
    pub fn help_text<S: AsRef<str>>(&self, topics: &[S]) -> String {
        if topics.is_empty() {
            return format!("{}\n", self.application_usage());
        }
        let mut buf = String::new();
        for topic in topics {
            let topic = topic.as_ref();
            match self.subcommands.get(topic) {
                Ok(subcommand) => w!(buf, "{}\n", subcommand.usage_description()),
                Err(_) => w!(
                    buf,
                    "Topic requested: {topic}, does not exist and no help can be displayed\n\n"
                ),
            }
        }
        buf
    }

    pub fn display_help<S: AsRef<str>>(&self, topics: &[S], out: &mut dyn Write) -> io::Result<()> {
        out.write_all(self.help_text(topics).as_bytes())
    }

    /// Prints the usage of whatever failed to parse to `out` and the error
    /// itself to `err_out`.
    pub fn display_parsing_error(
        &self,
        err: &ParsingError,
        out: &mut dyn Write,
        err_out: &mut dyn Write,
    ) -> io::Result<()> {
        let subcommand = err.subcommand().and_then(|name| self.subcommands.get(name).ok());
        match subcommand {
            Some(subcommand) => write!(out, "{}", subcommand.usage_description())?,
            None => writeln!(out, "{}", self.application_usage())?,
        }
        writeln!(err_out)?;
        writeln!(err_out, "ERROR: Parsing command line options failed")?;
        writeln!(err_out, "{err}")?;
        writeln!(err_out)
    }

    pub fn exit(&self, err: &ParsingError) -> ! {
        let stdout = io::stdout();
        let stderr = io::stderr();
        drop(self.display_parsing_error(err, &mut stdout.lock(), &mut stderr.lock()));
        std::process::exit(1)
    }

    /// Top level help: usage line, application options and the list of
    /// subcommands.
    pub fn application_usage(&self) -> String {
        let printer = OptionPrinter::new(&self.global_options(true), &self.visible_layout());
        let mut buf = String::new();
        w!(buf, "{}\n", self.description);
        w!(buf, "USAGE: {} {}\n\n", self.name, printer.usage());

        let details = printer.option_details();
        if !details.is_empty() {
            w!(buf, "{details}\n");
        }
        w!(buf, "{}\n", printer.positional_details());
        for (name, subcommand) in self.subcommands.names().iter().zip(self.subcommands.all()) {
            let line = format!("    {name:<22}{}", subcommand.description());
            w!(buf, "{}\n", line.trim_end());
        }
        buf
    }

    fn global_options(&self, enforce_required: bool) -> OptionSet {
        let mut res = self.app_options.all(enforce_required);
        res.push(
            OptionDef::value::<String>(SUBCOMMAND, "The subcommand to execute, see below:")
                .required()
                .instantiate(enforce_required),
        );
        res
    }

    fn visible_layout(&self) -> PositionalLayout {
        PositionalLayout::new().add(SUBCOMMAND, Arity::Count(1))
    }
}

/// Arguments for the strict parse: the captured positionals, then every
/// option that was not bound to a positional slot, tokens verbatim. The
/// driver's own options are consumed here even when spelled `--subcommand`.
fn prepare_command_line(parsed: &Parsed, positionals: &[String]) -> Vec<String> {
    let mut res = positionals.to_vec();
    for occurrence in &parsed.occurrences {
        let own = occurrence.key == SUBCOMMAND || occurrence.key == ADDITIONAL_POSITIONAL;
        if occurrence.position.is_none() && !own {
            res.extend(occurrence.original_tokens.iter().cloned());
        }
    }
    res
}

/// Outcome of the first parsing phase.
#[derive(Debug)]
pub enum ParseOutput {
    /// No subcommand given, values of the application level options.
    NoSubcommand(Values),
    Subcommand(PendingSubcommand),
}

impl ParseOutput {
    /// The subcommand selected on the command line, guaranteed to exist.
    pub fn subcommand_used(&self) -> Option<&str> {
        match self {
            ParseOutput::NoSubcommand(_) => None,
            ParseOutput::Subcommand(it) => Some(it.name()),
        }
    }

    /// Parsed values; runs the subcommand's strict parse if there is one.
    pub fn values(&self) -> Result<Values> {
        match self {
            ParseOutput::NoSubcommand(values) => Ok(values.clone()),
            ParseOutput::Subcommand(it) => it.resolve(),
        }
    }
}

/// A subcommand together with the arguments meant for it, not parsed yet.
pub struct PendingSubcommand {
    subcommand: Box<dyn Subcommand>,
    args: Vec<String>,
    style: Style,
}

impl PendingSubcommand {
    pub fn name(&self) -> &str {
        self.subcommand.name()
    }

    pub fn subcommand(&self) -> &dyn Subcommand {
        self.subcommand.as_ref()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn resolve(&self) -> Result<Values> {
        debug!(subcommand = self.name(), "phase 2 parse");
        self.subcommand.parse_with(&self.args, self.style)
    }
}

impl fmt::Debug for PendingSubcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubcommand")
            .field("subcommand", &self.name())
            .field("args", &self.args)
            .finish()
    }
}
