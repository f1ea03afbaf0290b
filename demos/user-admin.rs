//! A small user administration tool: `user-admin create <uuid>`,
//! `user-admin delete <uuid> -p <pid>`, `user-admin info <uuid>` and
//! `user-admin help [topic...]`.
//!
//! Set `RUST_LOG=subflags=debug` to see both parsing phases.

use std::io;

use subflags::{
    Arity, Cli, OptionDef, OptionRegistry, ParsingError, PositionalLayout, Subcommand,
    SubcommandRegistry, Values, HELP_SUBCOMMAND,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const UUID: &str = "uuid-string";

struct Create {
    unique: OptionRegistry,
    shared: OptionRegistry,
}

struct Delete {
    unique: OptionRegistry,
    shared: OptionRegistry,
}

struct Info {
    unique: OptionRegistry,
    shared: OptionRegistry,
}

impl Subcommand for Create {
    fn name(&self) -> &str {
        "create"
    }
    fn description(&self) -> &str {
        "create a user from the provided string"
    }
    fn unique_registry(&self) -> &OptionRegistry {
        &self.unique
    }
    fn shared_registry(&self) -> Option<&OptionRegistry> {
        Some(&self.shared)
    }
    fn positional(&self) -> PositionalLayout {
        PositionalLayout::new().add(UUID, Arity::Count(1))
    }
}

impl Subcommand for Delete {
    fn name(&self) -> &str {
        "delete"
    }
    fn description(&self) -> &str {
        "delete user with uuid from the provided string"
    }
    fn unique_registry(&self) -> &OptionRegistry {
        &self.unique
    }
    fn shared_registry(&self) -> Option<&OptionRegistry> {
        Some(&self.shared)
    }
    fn positional(&self) -> PositionalLayout {
        PositionalLayout::new().add(UUID, Arity::Count(1))
    }
}

impl Subcommand for Info {
    fn name(&self) -> &str {
        "info"
    }
    fn description(&self) -> &str {
        "list user with uuid from the provided string"
    }
    fn unique_registry(&self) -> &OptionRegistry {
        &self.unique
    }
    fn shared_registry(&self) -> Option<&OptionRegistry> {
        Some(&self.shared)
    }
    fn positional(&self) -> PositionalLayout {
        PositionalLayout::new().add(UUID, Arity::Count(1))
    }
    fn check_consistency(&self, values: &Values) -> Result<(), ParsingError> {
        if values.flag("all") && values.contains("gid") {
            return Err(ParsingError::inconsistent(
                self.name(),
                "Options --all and --gid cannot be used together",
            ));
        }
        Ok(())
    }
}

fn cli() -> anyhow::Result<Cli> {
    let mut shared = OptionRegistry::new();
    shared.register(
        OptionDef::value::<String>(UUID, "String for the uuid of the user").required(),
    )?;

    let mut create = OptionRegistry::new();
    create
        .register(OptionDef::value::<String>("display-name", "Display name of the user").short('d'))?
        .register(OptionDef::value::<String>("email", "Email of the user").short('e'))?;
    let mut delete = OptionRegistry::new();
    delete.register(
        OptionDef::value::<u32>("pid", "This is the pid of the user to be deleted").short('p'),
    )?;
    let mut info = OptionRegistry::new();
    info.register(OptionDef::value::<u32>("gid", "This is gid of user to be displayed").short('g'))?
        .register(OptionDef::flag("all", "Display every known detail"))?;

    let mut subcommands = SubcommandRegistry::new();
    let it = shared.clone();
    subcommands.add("create", move || {
        Box::new(Create { unique: create.clone(), shared: it.clone() })
    })?;
    let it = shared.clone();
    subcommands.add("delete", move || {
        Box::new(Delete { unique: delete.clone(), shared: it.clone() })
    })?;
    subcommands.add("info", move || Box::new(Info { unique: info.clone(), shared: shared.clone() }))?;
    subcommands.finalize()?;

    let mut app = OptionRegistry::new();
    app.register(OptionDef::flag("version", "Display the version information for the application"))?;

    Ok(Cli::new("user-admin", "Application that is alternative to radosgw-admin", subcommands)
        .app_options(app))
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()?;

    let cli = cli()?;
    let output = match cli.parse_env() {
        Ok(it) => it,
        Err(err) => cli.exit(&err),
    };
    let values = match output.values() {
        Ok(it) => it,
        Err(err) => cli.exit(&err),
    };

    match output.subcommand_used() {
        Some("create") => {
            let uuid = values.get_str(UUID).unwrap_or_default();
            match values.get_str("display-name") {
                Some(name) => println!("User with uuid {uuid} created, display name {name}"),
                None => println!("User with uuid {uuid} created"),
            }
        }
        Some("delete") => {
            let uuid = values.get_str(UUID).unwrap_or_default();
            println!("User with uuid {uuid} deleted");
        }
        Some("info") => {
            let uuid = values.get_str(UUID).unwrap_or_default();
            match values.get::<u32>("gid") {
                Ok(Some(gid)) => println!("User {uuid}, gid {gid}"),
                Ok(None) => println!("User {uuid}"),
                Err(err) => cli.exit(&err),
            }
        }
        Some(HELP_SUBCOMMAND) => {
            cli.display_help(values.get_all("topic"), &mut io::stdout())?;
        }
        Some(other) => anyhow::bail!("subcommand {other} got through parsing unhandled"),
        None if values.flag("version") => {
            println!("Application Version: {} - demo", env!("CARGO_PKG_VERSION"));
        }
        None => cli.display_help::<&str>(&[], &mut io::stdout())?,
    }
    Ok(())
}
