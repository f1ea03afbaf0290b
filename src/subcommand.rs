use std::fmt::Write;

use tracing::debug;

use crate::{
    positional::PositionalLayout,
    printer::OptionPrinter,
    registry::OptionRegistry,
    rt::{self, OptionSet, Style, Values},
    translate, ParsingError,
};

/// A distinct command of the application with its own options.
///
/// Options are split in two: *unique* ones belong to this subcommand alone,
/// *shared* ones come from a registry common to several subcommands, so that
/// one definition serves all of them.
pub trait Subcommand {
    /// Text selecting the subcommand on the command line.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn unique_registry(&self) -> &OptionRegistry;

    fn shared_registry(&self) -> Option<&OptionRegistry> {
        None
    }

    fn positional(&self) -> PositionalLayout {
        PositionalLayout::new()
    }

    /// Rejects value combinations the option model cannot express, such as
    /// two options that must not be given together. Runs after a
    /// structurally successful parse.
    fn check_consistency(&self, _values: &Values) -> Result<(), ParsingError> {
        Ok(())
    }

    /// Full help text for this subcommand.
    fn usage_description(&self) -> String {
        standard_usage_description(self)
    }

    fn unique_options(&self, include_hidden: bool, enforce_required: bool) -> OptionSet {
        if include_hidden {
            self.unique_registry().all(enforce_required)
        } else {
            self.unique_registry().visible(enforce_required)
        }
    }

    fn shared_options(&self, enforce_required: bool) -> OptionSet {
        self.shared_registry().map(|it| it.all(enforce_required)).unwrap_or_default()
    }

    /// Options shown to users.
    fn visible_options(&self) -> OptionSet {
        let mut res = self.unique_options(false, true);
        res.add(self.shared_options(true));
        res
    }

    /// Options accepted when parsing.
    fn all_options(&self) -> OptionSet {
        let mut res = self.unique_options(true, true);
        res.add(self.shared_options(true));
        res
    }

    fn parse(&self, args: &[String]) -> Result<Values, ParsingError> {
        self.parse_with(args, Style::default())
    }

    fn parse_with(&self, args: &[String], style: Style) -> Result<Values, ParsingError> {
        let options = self.all_options();
        let positional = self.positional();
        debug!(subcommand = self.name(), ?args, "parsing subcommand");

        let values = translate::execute_and_translate(
            || rt::parse(&options, &positional, style, args.to_vec()).map(|(_, values)| values),
            &options,
            &positional,
            Some(self.name()),
        )?;
        self.check_consistency(&values)?;
        Ok(values)
    }
}

pub(crate) fn standard_usage_description<S: Subcommand + ?Sized>(cmd: &S) -> String {
    let positional = cmd.positional();
    let all = OptionPrinter::new(&cmd.visible_options(), &positional);
    let unique = OptionPrinter::new(&cmd.unique_options(false, true), &positional);
    let shared = OptionPrinter::new(&cmd.shared_options(true), &positional);

    let mut buf = String::new();
    w!(buf, "Subcommand: {}\n\n", cmd.name());
    w!(buf, "{}\n", cmd.description());
    w!(buf, "USAGE: {} {}\n", cmd.name(), all.usage());

    let positional_details = all.positional_details();
    if !positional_details.is_empty() {
        w!(buf, "\nPositional arguments:\n{positional_details}\n");
    }
    let unique_details = unique.option_details();
    if !unique_details.is_empty() {
        w!(buf, "\nOptions:\n{unique_details}");
    }
    let shared_details = shared.option_details();
    if !shared_details.is_empty() {
        w!(buf, "\nShared options:\n{shared_details}");
    }
    buf
}
