use std::fmt;

use crate::{
    bind::Arguments,
    error::RegistryError,
    help, scan,
    value::{Ty, Value},
};

/// Execution entry point of a command.
pub type Handler<C> = Box<dyn Fn(&Arguments, &mut C) -> anyhow::Result<String> + Send + Sync>;

/// A positional argument. Arguments without a default are required.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub ty: Ty,
    pub doc: String,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: char,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    Optional,
    Required,
    Default(Value),
}

/// A `--key value` option.
#[derive(Debug, Clone, PartialEq)]
pub struct KwargSpec {
    pub key: String,
    pub ty: Ty,
    pub doc: String,
    pub arity: Arity,
    /// Whether `--key` may appear without a value.
    pub bare: bool,
}

impl KwargSpec {
    pub fn new(key: impl Into<String>, ty: Ty, doc: impl Into<String>) -> KwargSpec {
        KwargSpec { key: key.into(), ty, doc: doc.into(), arity: Arity::Optional, bare: false }
    }

    pub fn required(mut self) -> KwargSpec {
        self.arity = Arity::Required;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> KwargSpec {
        self.arity = Arity::Default(value.into());
        self
    }

    pub fn bare(mut self) -> KwargSpec {
        self.bare = true;
        self
    }
}

/// Declaration of one command: what it accepts and what it runs.
///
/// Commands are immutable once built; build them with [`Command::build`].
pub struct Command<C = ()> {
    pub(crate) name: String,
    pub(crate) doc: String,
    pub(crate) args: Vec<ArgSpec>,
    pub(crate) flags: Vec<FlagSpec>,
    pub(crate) kwargs: Vec<KwargSpec>,
    pub(crate) subcommands: Vec<Command<C>>,
    pub(crate) handler: Option<Handler<C>>,
    pub(crate) help: String,
}

impl<C> Command<C> {
    pub fn build(name: impl Into<String>, doc: impl Into<String>) -> CommandBuilder<C> {
        CommandBuilder {
            name: name.into(),
            doc: doc.into(),
            args: Vec::new(),
            flags: Vec::new(),
            kwargs: Vec::new(),
            subcommands: Vec::new(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn kwargs(&self) -> &[KwargSpec] {
        &self.kwargs
    }

    pub fn subcommands(&self) -> &[Command<C>] {
        &self.subcommands
    }

    pub fn subcommand(&self, name: &str) -> Option<&Command<C>> {
        self.subcommands.iter().find(|it| it.name == name)
    }

    pub fn flag(&self, name: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|it| it.name == name)
    }

    pub fn kwarg(&self, key: &str) -> Option<&KwargSpec> {
        self.kwargs.iter().find(|it| it.key == key)
    }

    /// Number of positionals without a default.
    pub fn required_args(&self) -> usize {
        self.args.iter().take_while(|it| it.default.is_none()).count()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Usage text, computed once when the command was built.
    pub fn help(&self) -> &str {
        &self.help
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("kwargs", &self.kwargs)
            .field("subcommands", &self.subcommands)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

pub struct CommandBuilder<C = ()> {
    name: String,
    doc: String,
    args: Vec<ArgSpec>,
    flags: Vec<FlagSpec>,
    kwargs: Vec<KwargSpec>,
    subcommands: Vec<Command<C>>,
    handler: Option<Handler<C>>,
}

impl<C> CommandBuilder<C> {
    pub fn arg(mut self, name: impl Into<String>, ty: Ty, doc: impl Into<String>) -> Self {
        self.args.push(ArgSpec { name: name.into(), ty, doc: doc.into(), default: None });
        self
    }

    pub fn optional_arg(
        mut self,
        name: impl Into<String>,
        ty: Ty,
        doc: impl Into<String>,
        default: impl Into<Value>,
    ) -> Self {
        let default = Some(default.into());
        self.args.push(ArgSpec { name: name.into(), ty, doc: doc.into(), default });
        self
    }

    pub fn flag(mut self, name: char, doc: impl Into<String>) -> Self {
        self.flags.push(FlagSpec { name, doc: doc.into() });
        self
    }

    pub fn kwarg(mut self, spec: KwargSpec) -> Self {
        self.kwargs.push(spec);
        self
    }

    pub fn subcommand(mut self, cmd: Command<C>) -> Self {
        self.subcommands.push(cmd);
        self
    }

    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Arguments, &mut C) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(f));
        self
    }

    /// Checks the declaration and renders its help text.
    pub fn finish(self) -> Result<Command<C>, RegistryError> {
        validate(&self)?;
        let mut res = Command {
            name: self.name,
            doc: self.doc,
            args: self.args,
            flags: self.flags,
            kwargs: self.kwargs,
            subcommands: self.subcommands,
            handler: self.handler,
            help: String::new(),
        };
        res.help = help::render(&res);
        Ok(res)
    }
}

fn validate<C>(cmd: &CommandBuilder<C>) -> Result<(), RegistryError> {
    let command = || cmd.name.clone();
    if !scan::is_name(&cmd.name) {
        return Err(RegistryError::InvalidName { name: cmd.name.clone() });
    }

    let mut seen_optional = false;
    for arg in &cmd.args {
        match &arg.default {
            Some(value) => {
                seen_optional = true;
                check_default(&cmd.name, &arg.name, arg.ty, value)?;
            }
            None if seen_optional => {
                return Err(RegistryError::RequiredAfterOptional {
                    command: command(),
                    arg: arg.name.clone(),
                })
            }
            None => (),
        }
    }

    for (idx, flag) in cmd.flags.iter().enumerate() {
        if !flag.name.is_alphanumeric() {
            return Err(RegistryError::InvalidFlag { command: command(), flag: flag.name });
        }
        if cmd.flags[..idx].iter().any(|it| it.name == flag.name) {
            return Err(RegistryError::DuplicateFlag { command: command(), flag: flag.name });
        }
    }

    for (idx, kwarg) in cmd.kwargs.iter().enumerate() {
        if kwarg.key == "help" {
            return Err(RegistryError::ReservedKwarg { command: command() });
        }
        if !scan::is_symbol(&kwarg.key) {
            return Err(RegistryError::InvalidKey { command: command(), key: kwarg.key.clone() });
        }
        if cmd.kwargs[..idx].iter().any(|it| it.key == kwarg.key) {
            return Err(RegistryError::DuplicateKwarg {
                command: command(),
                key: kwarg.key.clone(),
            });
        }
        if let Arity::Default(value) = &kwarg.arity {
            check_default(&cmd.name, &kwarg.key, kwarg.ty, value)?;
        }
    }

    for (idx, sub) in cmd.subcommands.iter().enumerate() {
        if cmd.subcommands[..idx].iter().any(|it| it.name == sub.name) {
            return Err(RegistryError::DuplicateCommand { name: sub.name.clone() });
        }
    }
    Ok(())
}

fn check_default(command: &str, name: &str, ty: Ty, value: &Value) -> Result<(), RegistryError> {
    if ty.admits(value) {
        return Ok(());
    }
    Err(RegistryError::DefaultTypeMismatch {
        command: command.to_string(),
        name: name.to_string(),
        ty,
        value: value.clone(),
    })
}
