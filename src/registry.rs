use std::collections::BTreeMap;
use std::fmt::Write;

use tracing::{debug, trace};

use crate::{
    bind::{nest, Bound},
    command::Command,
    error::{BindError, RegistryError},
    grammar::parse_command,
    tree::{Node, Tree},
    Error, Result,
};

/// Root commands, keyed by name.
///
/// Built once at startup and read-only afterwards.
pub struct Registry<C = ()> {
    commands: BTreeMap<String, Command<C>>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Registry { commands: BTreeMap::new() }
    }
}

impl<C> Registry<C> {
    pub fn new() -> Registry<C> {
        Registry::default()
    }

    pub fn register(&mut self, cmd: Command<C>) -> Result<(), RegistryError> {
        if self.commands.contains_key(cmd.name()) {
            return Err(RegistryError::DuplicateCommand { name: cmd.name().to_string() });
        }
        debug!(command = %cmd.name(), "registered");
        self.commands.insert(cmd.name().to_string(), cmd);
        Ok(())
    }

    /// Builder-style [`Registry::register`].
    pub fn with(mut self, cmd: Command<C>) -> Result<Registry<C>, RegistryError> {
        self.register(cmd)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Command<C>> {
        self.commands.get(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command<C>> + '_ {
        self.commands.values()
    }

    pub fn parse(&self, line: &str) -> Result<Tree> {
        let tree = parse_command(line)?;
        trace!(%tree, "parsed");
        Ok(tree)
    }

    /// Parses `line` and binds it against the root command it names.
    ///
    /// `help` and `help <command> [<subcommand>...]` answer with help text
    /// unless a root command named `help` is registered.
    pub fn resolve(&self, line: &str) -> Result<Bound<'_, C>> {
        let (cmd, tree) = self.lookup(line)?;
        cmd.resolve(&tree).map_err(|err| {
            debug!(command = %cmd.name(), %err, "bind failed");
            nest(err, cmd.name())
        })
    }

    /// Resolves `line` and runs the handler of the resolved command.
    pub fn dispatch(&self, line: &str, ctx: &mut C) -> Result<String> {
        let (cmd, tree) = self.lookup(line)?;
        cmd.invoke(&tree, ctx)
    }

    fn lookup(&self, line: &str) -> Result<(&Command<C>, Tree)> {
        let tree = self.parse(line)?;
        let name = tree.root().unwrap_or_default();
        match self.get(name) {
            Some(cmd) => Ok((cmd, tree)),
            None if name == "help" => Err(Error::Help(self.help_for(tree.nodes())?)),
            None => {
                debug!(command = %name, "unknown command");
                Err(BindError::UnknownCommand { name: name.to_string() }.into())
            }
        }
    }

    /// Lists the registered commands with the first line of their docs.
    pub fn help(&self) -> String {
        let mut buf = String::new();
        w!(buf, "COMMANDS:\n");
        let width = self.commands.keys().map(|it| it.len()).max().unwrap_or_default();
        for cmd in self.commands.values() {
            let doc = cmd.doc().lines().next().unwrap_or_default();
            w!(buf, "    {:width$}  {doc}\n", cmd.name());
        }
        w!(buf, "\nUse `help <command>` for more information.\n");
        buf
    }

    fn help_for(&self, path: &[Node]) -> Result<String> {
        let mut names = path.iter().map(|it| match it {
            Node::Value(name) => Ok(name.as_str()),
            it => Err(BindError::UnexpectedNode { found: it.spelling(), command: "help".into() }),
        });
        let Some(first) = names.next().transpose()? else {
            return Ok(self.help());
        };
        let mut cmd = self
            .get(first)
            .ok_or_else(|| BindError::UnknownCommand { name: first.to_string() })?;
        for name in names {
            let name = name?;
            cmd = cmd.subcommand(name).ok_or_else(|| {
                BindError::UnknownCommand { name: format!("{} {name}", cmd.name()) }
            })?;
        }
        Ok(cmd.help().to_string())
    }
}
