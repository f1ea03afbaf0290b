//! Usage lines and option detail blocks.

use std::fmt::Write;

use crate::{descriptor::OptionDescriptor, positional::PositionalLayout, rt::OptionSet};

/// Renders one option set laid out with one positional layout.
#[derive(Debug, Clone, Default)]
pub struct OptionPrinter {
    options: Vec<OptionDescriptor>,
    positional: Vec<OptionDescriptor>,
}

impl OptionPrinter {
    pub fn new(options: &OptionSet, layout: &PositionalLayout) -> Self {
        let mut res = OptionPrinter::default();
        for option in options {
            let desc = OptionDescriptor::new(option, layout);
            if desc.is_positional() {
                res.positional.push(desc);
            } else {
                res.options.push(desc);
            }
        }
        res.positional.sort_by_key(|it| it.positional.map(|it| it.position));
        res
    }

    /// The single line synopsis, `[-ab] [--long] [-n ARG] --req ARG pos [rest...]`.
    pub fn usage(&self) -> String {
        let mut tokens = Vec::new();

        let shorts = self
            .options
            .iter()
            .filter(|it| it.has_short && !it.has_argument && !it.required)
            .map(|it| &it.display_name[1..])
            .collect::<String>();
        if !shorts.is_empty() {
            tokens.push(format!("[-{shorts}]"));
        }

        for it in &self.options {
            if !it.has_short && !it.has_argument && !it.required {
                tokens.push(format!("[{}]", it.display_name));
            }
        }
        for it in &self.options {
            if it.has_argument && !it.required {
                tokens.push(format!("[{} ARG]", it.display_name));
            }
        }
        for it in &self.options {
            if it.has_argument && it.required {
                tokens.push(format!("{} ARG", it.display_name));
            }
        }

        for it in &self.positional {
            let dots = if it.positional.map_or(false, |it| it.unlimited_instances()) { "..." } else { "" };
            if it.required {
                tokens.push(format!("{}{dots}", it.display_name));
            } else {
                tokens.push(format!("[{}{dots}]", it.display_name));
            }
        }

        tokens.join(" ")
    }

    /// One line per positional option, in slot order.
    pub fn positional_details(&self) -> String {
        self.positional.iter().map(OptionDescriptor::detail_line).collect::<Vec<_>>().join("\n")
    }

    /// One line per named option, each terminated by a newline.
    pub fn option_details(&self) -> String {
        let mut buf = String::new();
        for it in &self.options {
            w!(buf, "{}\n", it.detail_line());
        }
        buf
    }
}

pub fn single_line_usage(app: &str, options: &OptionSet, layout: &PositionalLayout) -> String {
    let printer = OptionPrinter::new(options, layout);
    format!("USAGE: {app} {}", printer.usage())
}

pub fn standard_description(app: &str, options: &OptionSet, layout: &PositionalLayout) -> String {
    let printer = OptionPrinter::new(options, layout);
    let mut buf = String::new();
    w!(buf, "USAGE: {app} {}\n\n", printer.usage());
    w!(buf, "-- Option Descriptions --\n\n");
    w!(buf, "Positional arguments:\n{}\n", printer.positional_details());
    w!(buf, "Option Arguments:\n{}", printer.option_details());
    buf
}
