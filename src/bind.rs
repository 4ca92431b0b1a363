use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::{
    command::{Arity, Command},
    error::BindError,
    tree::{Node, Tree},
    value::Value,
    Error, Result,
};

/// Typed arguments of one successful binding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    values: Vec<Value>,
    flags: BTreeSet<char>,
    kwargs: BTreeMap<String, Option<Value>>,
}

impl Arguments {
    /// Positional values in declaration order, defaults included.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn str(&self, idx: usize) -> Option<&str> {
        self.value(idx)?.as_str()
    }

    pub fn int(&self, idx: usize) -> Option<i64> {
        self.value(idx)?.as_int()
    }

    pub fn float(&self, idx: usize) -> Option<f64> {
        self.value(idx)?.as_float()
    }

    pub fn flag(&self, name: char) -> bool {
        self.flags.contains(&name)
    }

    pub fn flags(&self) -> impl Iterator<Item = char> + '_ {
        self.flags.iter().copied()
    }

    /// `true` when `--key` was given, with or without a value, or has a default.
    pub fn has_kwarg(&self, key: &str) -> bool {
        self.kwargs.contains_key(key)
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)?.as_ref()
    }

    pub fn kwargs(&self) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.kwargs.iter().map(|(key, value)| (key.as_str(), value.as_ref()))
    }
}

/// A command together with the arguments bound for it.
#[derive(Debug)]
pub struct Bound<'a, C = ()> {
    pub command: &'a Command<C>,
    pub arguments: Arguments,
}

impl<C> Command<C> {
    /// Binds the children of `tree` against this command.
    ///
    /// A value naming a subcommand in head position hands the rest of the
    /// children over to that subcommand; its failures come back wrapped as
    /// `Command: <sub> { ... }`. Either everything binds or nothing does.
    pub fn resolve(&self, tree: &Tree) -> Result<Bound<'_, C>> {
        self.bind(tree.nodes())
    }

    /// Resolves `tree` and runs the handler of the resolved command.
    ///
    /// Failures are wrapped in a `Command: <self> { ... }` frame, so the
    /// message shows the whole dispatch chain.
    pub fn invoke(&self, tree: &Tree, ctx: &mut C) -> Result<String> {
        let bound = self.resolve(tree).map_err(|err| nest(err, &self.name))?;
        bound.run(ctx).map_err(|err| nest(err, &self.name))
    }

    // `nodes` stands for a tree rooted at `self.name`, so subcommands can
    // take a sub-slice instead of a rebuilt tree.
    fn bind(&self, nodes: &[Node]) -> Result<Bound<'_, C>> {
        if let Some(Node::Value(head)) = nodes.first() {
            if let Some(sub) = self.subcommand(head) {
                debug!(command = %self.name, subcommand = %sub.name, "dispatching");
                return sub.bind(&nodes[1..]).map_err(|err| nest(err, &sub.name));
            }
            // A command with positionals takes `help` as an ordinary value.
            if head == "help" && self.args.is_empty() {
                return Err(Error::Help(self.help.clone()));
            }
        }
        if nodes.iter().any(|it| matches!(it, Node::Kwarg { key, .. } if key == "help")) {
            return Err(Error::Help(self.help.clone()));
        }

        let mut res = Arguments::default();
        let mut got = 0;
        for node in nodes {
            trace!(command = %self.name, %node, "binding");
            match node {
                Node::Value(literal) => {
                    if let Some(spec) = self.args.get(got) {
                        res.values.push(spec.ty.coerce(literal)?);
                    }
                    got += 1;
                }
                Node::Flag(flag) => {
                    if self.flag(*flag).is_none() {
                        return Err(BindError::InvalidFlag {
                            flag: *flag,
                            command: self.name.clone(),
                        }
                        .into());
                    }
                    res.flags.insert(*flag);
                }
                Node::Kwarg { key, value } => {
                    let Some(spec) = self.kwarg(key) else {
                        return Err(BindError::InvalidKwarg {
                            key: key.clone(),
                            command: self.name.clone(),
                        }
                        .into());
                    };
                    if res.kwargs.contains_key(key) {
                        return Err(BindError::DuplicateKwarg { key: key.clone() }.into());
                    }
                    let value = match value {
                        Some(literal) => Some(spec.ty.coerce(literal)?),
                        None if spec.bare => None,
                        None => {
                            return Err(BindError::MissingKwargValue {
                                key: key.clone(),
                                ty: spec.ty,
                            }
                            .into())
                        }
                    };
                    res.kwargs.insert(key.clone(), value);
                }
                Node::Tree(_) => {
                    return Err(BindError::UnexpectedNode {
                        found: node.spelling(),
                        command: self.name.clone(),
                    }
                    .into())
                }
            }
        }

        if got > self.args.len() {
            return Err(BindError::TooManyArguments { expected: self.args.len(), got }.into());
        }
        let required = self.required_args();
        if got < required {
            return Err(BindError::TooFewArguments { expected: required, got }.into());
        }
        res.values.extend(self.args[got..].iter().filter_map(|it| it.default.clone()));

        for spec in &self.kwargs {
            if res.kwargs.contains_key(&spec.key) {
                continue;
            }
            match &spec.arity {
                Arity::Optional => (),
                Arity::Required => {
                    return Err(BindError::MissingKwarg { key: spec.key.clone() }.into())
                }
                Arity::Default(value) => {
                    res.kwargs.insert(spec.key.clone(), Some(value.clone()));
                }
            }
        }

        Ok(Bound { command: self, arguments: res })
    }
}

impl<C> Bound<'_, C> {
    /// Hands the arguments and the context to the command's handler.
    pub fn run(&self, ctx: &mut C) -> Result<String> {
        match &self.command.handler {
            Some(handler) => handler(&self.arguments, ctx).map_err(Error::Run),
            None if !self.command.subcommands.is_empty() => {
                Err(BindError::SubcommandRequired { command: self.command.name.clone() }.into())
            }
            None => Err(BindError::NoHandler { command: self.command.name.clone() }.into()),
        }
    }
}

/// Wraps bind failures into a dispatch frame; help and handler errors pass through.
pub(crate) fn nest(err: Error, command: &str) -> Error {
    match err {
        Error::Bind(err) => Error::Bind(err.nest(command)),
        err => err,
    }
}
