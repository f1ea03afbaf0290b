use crate::{
    option::OptionSpec,
    positional::{locate, PositionalInfo, PositionalLayout},
};

/// Display facts about one option instance within a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    /// Long name, the key values are stored under.
    pub name: String,
    /// `-x` if the option has a short form, `--name` otherwise. Positional
    /// options show the bare name.
    pub display_name: String,
    pub format_name: String,
    pub description: String,
    /// Identity reported by the tokenizer when the option is missing.
    pub required_identity: String,
    pub required: bool,
    pub has_short: bool,
    pub has_argument: bool,
    pub positional: Option<PositionalInfo>,
}

impl OptionDescriptor {
    pub fn new(option: &OptionSpec, layout: &PositionalLayout) -> Self {
        let display_name = match option.short() {
            Some(short) => format!("-{short}"),
            None => format!("--{}", option.name()),
        };
        let mut res = OptionDescriptor {
            name: option.name().to_string(),
            display_name,
            format_name: option.format_name(),
            description: option.description().to_string(),
            required_identity: option.required_identity(),
            required: option.is_required(),
            has_short: option.short().is_some(),
            has_argument: option.takes_value(),
            positional: None,
        };
        res.determine_positional(layout);
        res
    }

    pub fn is_positional(&self) -> bool {
        self.positional.is_some()
    }

    pub(crate) fn determine_positional(&mut self, layout: &PositionalLayout) {
        self.positional = locate(layout, &self.name);
        if self.positional.is_some() {
            self.display_name = self.name.clone();
        }
    }

    /// Single detail line: the name padded to a column, then the description.
    pub fn detail_line(&self) -> String {
        let name = if self.is_positional() { &self.display_name } else { &self.format_name };
        format!("  {name:<23} {}", self.description).trim_end().to_string()
    }
}
