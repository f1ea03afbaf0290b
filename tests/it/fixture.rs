use subflags::{
    Arity, Cli, OptionDef, OptionRegistry, ParsingError, PositionalLayout, Subcommand,
    SubcommandRegistry, Values,
};

pub(crate) const UUID: &str = "uuid-string";

#[derive(Clone)]
pub(crate) struct Simple {
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) unique: OptionRegistry,
    pub(crate) shared: Option<OptionRegistry>,
    pub(crate) positional: Vec<(&'static str, Arity)>,
    /// Pairs of options that must not be given together.
    pub(crate) conflicts: Vec<(&'static str, &'static str)>,
}

impl Simple {
    pub(crate) fn new(name: &'static str, description: &'static str) -> Simple {
        Simple {
            name,
            description,
            unique: OptionRegistry::new(),
            shared: None,
            positional: Vec::new(),
            conflicts: Vec::new(),
        }
    }
}

impl Subcommand for Simple {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        self.description
    }
    fn unique_registry(&self) -> &OptionRegistry {
        &self.unique
    }
    fn shared_registry(&self) -> Option<&OptionRegistry> {
        self.shared.as_ref()
    }
    fn positional(&self) -> PositionalLayout {
        let mut res = PositionalLayout::new();
        for &(name, arity) in &self.positional {
            res = res.add(name, arity);
        }
        res
    }
    fn check_consistency(&self, values: &Values) -> Result<(), ParsingError> {
        for &(a, b) in &self.conflicts {
            if values.contains(a) && values.contains(b) {
                let msg = format!("Options --{a} and --{b} cannot be used together");
                return Err(ParsingError::inconsistent(self.name, msg));
            }
        }
        Ok(())
    }
}

pub(crate) fn cli(subcommands: Vec<Simple>, app: OptionRegistry) -> Cli {
    let mut registry = SubcommandRegistry::new();
    for subcommand in subcommands {
        registry.add(subcommand.name, move || Box::new(subcommand.clone())).unwrap();
    }
    registry.finalize().unwrap();
    Cli::new("user-admin", "Application that is alternative to radosgw-admin", registry)
        .app_options(app)
}

/// `create`, `delete` and `info`, sharing a positional uuid.
pub(crate) fn users() -> Cli {
    let mut shared = OptionRegistry::new();
    shared
        .register(OptionDef::value::<String>(UUID, "String for the uuid of the user").required())
        .unwrap();

    let mut create = Simple::new("create", "create a user from the provided string");
    create
        .unique
        .register(OptionDef::value::<String>("display-name", "Display name of the user").short('d'))
        .unwrap()
        .register(OptionDef::value::<String>("email", "Email of the user").short('e'))
        .unwrap();

    let mut delete = Simple::new("delete", "delete user with uuid from the provided string");
    delete
        .unique
        .register(OptionDef::value::<u32>("pid", "This is the pid of the user").short('p'))
        .unwrap();

    let mut info = Simple::new("info", "list user with uuid from the provided string");
    info.unique
        .register(OptionDef::value::<u32>("gid", "This is gid of user to be displayed").short('g'))
        .unwrap()
        .register(OptionDef::flag("all", "Display every known detail"))
        .unwrap();
    info.conflicts.push(("all", "gid"));

    let mut subcommands = vec![create, delete, info];
    for it in &mut subcommands {
        it.shared = Some(shared.clone());
        it.positional.push((UUID, Arity::Count(1)));
    }

    let mut app = OptionRegistry::new();
    app.register(OptionDef::flag("version", "Display the version information for the application"))
        .unwrap();
    cli(subcommands, app)
}
