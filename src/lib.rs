//! A small command language for chat bots.
//!
//! A line like `quote add --audience 'the gang' alice hello` is parsed into a
//! [`Tree`], which is then bound against a registered [`Command`]: values
//! fill positional slots and are coerced to their declared [`Ty`], flags and
//! kwargs are checked against the declaration, and a leading word naming a
//! subcommand hands the rest of the line over to it.
//!
//! ```
//! use chatflags::{Command, Registry, Ty};
//!
//! let greet = Command::build("greet", "Greets someone.")
//!     .arg("name", Ty::String, "Who to greet.")
//!     .flag('l', "Shout.")
//!     .handler(|args, _: &mut ()| {
//!         let name = args.str(0).unwrap_or_default();
//!         Ok(if args.flag('l') { format!("HELLO, {name}!") } else { format!("hello, {name}") })
//!     })
//!     .finish()?;
//! let registry = Registry::new().with(greet)?;
//!
//! assert_eq!(registry.dispatch("greet -l alice", &mut ())?, "HELLO, alice!");
//! assert!(registry.dispatch("greet", &mut ()).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

mod bind;
mod command;
mod error;
mod help;
mod registry;
mod tree;
mod value;

pub mod grammar;
pub mod scan;
pub mod store;

use thiserror::Error;

pub use crate::{
    bind::{Arguments, Bound},
    command::{ArgSpec, Arity, Command, CommandBuilder, FlagSpec, Handler, KwargSpec},
    error::{BindError, ParseError, RegistryError},
    grammar::parse_command,
    registry::Registry,
    tree::{Node, Tree},
    value::{Ty, Value},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Bind(#[from] BindError),
    /// Help text was requested; not a failure.
    #[error("{0}")]
    Help(String),
    #[error(transparent)]
    Run(#[from] anyhow::Error),
}

impl Error {
    /// Whether the error is a request for help, to be shown as regular
    /// output.
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Help(_))
    }
}
