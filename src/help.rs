use std::fmt::Write;

use crate::{
    option::OptionDef,
    positional::{Arity, PositionalLayout},
    registry::OptionRegistry,
    subcommand::{standard_usage_description, Subcommand},
};

const TOPIC: &str = "topic";

/// The `help` subcommand added when subcommand registrations are finalized.
///
/// Takes any number of topics; the application decides what to print for
/// them, usually through [`crate::Cli::display_help`].
#[derive(Debug, Clone)]
pub struct HelpSubcommand {
    unique: OptionRegistry,
    topics: Vec<String>,
}

impl HelpSubcommand {
    pub fn new(topics: Vec<String>) -> Self {
        let topic = OptionDef::list::<String>(
            TOPIC,
            "Topic to display help for, can be specified multiple times",
        );
        HelpSubcommand { unique: OptionRegistry::single(topic), topics }
    }

    /// Names of the subcommands help is available for.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

impl Subcommand for HelpSubcommand {
    fn name(&self) -> &str {
        crate::HELP_SUBCOMMAND
    }

    fn description(&self) -> &str {
        "display help for other subcommand(s)"
    }

    fn unique_registry(&self) -> &OptionRegistry {
        &self.unique
    }

    fn positional(&self) -> PositionalLayout {
        PositionalLayout::new().add(TOPIC, Arity::Unlimited)
    }

    fn usage_description(&self) -> String {
        let mut buf = standard_usage_description(self);
        buf.push_str("\nAvailable Topics:\n");
        for topic in &self.topics {
            w!(buf, "  {topic}\n");
        }
        buf
    }
}
