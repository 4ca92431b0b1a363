//! A quote keeper for a chat channel, reading the channel from stdin.
//!
//! Lines starting with the prefix (`!` by default) are commands:
//!
//! ```text
//! !quote add Kari 'det går bra' --audience 'Ola og Per'
//! !quote list -v
//! !quote remove 1
//! !quote random
//! !help quote add
//! ```
//!
//! Everything else is prose. Prose is collected until an empty line and then
//! read as quote blocks separated by blank lines, each a header
//! `Speaker til A og B` followed by the quote itself.
//!
//! Quotes live in memory unless `--db quotes.json` names a file to keep them
//! in across runs.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use anyhow::bail;
use chatflags::{
    scan,
    store::{FileStore, MemoryStore, Store},
    Command, KwargSpec, Registry, RegistryError, Ty, Value,
};
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const QUOTATION_MARKS: &[char] = &['\'', '"', '«', '»', '„', '“', '”', '‘', '’', '‚'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Quote {
    speaker: String,
    audience: Vec<String>,
    text: String,
}

impl Quote {
    fn validate(&self) -> anyhow::Result<()> {
        if self.speaker.is_empty() {
            bail!("speaker not found");
        }
        if self.text.is_empty() {
            bail!("quote not found");
        }
        if self.audience.iter().any(|it| it.is_empty()) {
            bail!("audience member can not be an empty string");
        }
        Ok(())
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.text.replace('\n', " / "), self.speaker)?;
        if let Some((last, init)) = self.audience.split_last() {
            f.write_str(" til ")?;
            if !init.is_empty() {
                write!(f, "{} og ", init.join(", "))?;
            }
            f.write_str(last)?;
        }
        Ok(())
    }
}

/// `A, B og C` into `[A, B, C]`.
fn split_names(names: &str) -> Vec<String> {
    names
        .replace(", og ", " og ")
        .replace(",og ", " og ")
        .split(" og ")
        .flat_map(|it| it.split(','))
        .map(|it| it.trim().to_string())
        .collect()
}

fn parse_block(raw: &str) -> anyhow::Result<Quote> {
    let mut lines = raw.trim().lines();
    let header = lines.next().unwrap_or_default().trim_matches(QUOTATION_MARKS).trim();
    let (speaker, audience) = match header.split_once(" til ") {
        Some((speaker, audience)) => (speaker, split_names(audience)),
        None => (header, Vec::new()),
    };
    let text = lines.map(str::trim).collect::<Vec<_>>().join("\n");
    let quote = Quote { speaker: speaker.trim().to_string(), audience, text };
    if let Err(err) = quote.validate() {
        bail!("{}\nis not a valid quote: {err}", raw.trim());
    }
    Ok(quote)
}

fn split_blocks(prose: &str) -> Vec<String> {
    let mut res = Vec::new();
    let mut acc = Vec::new();
    for line in prose.lines() {
        if line.trim().is_empty() {
            if !acc.is_empty() {
                res.push(acc.join("\n"));
                acc.clear();
            }
        } else {
            acc.push(line);
        }
    }
    if !acc.is_empty() {
        res.push(acc.join("\n"));
    }
    res
}

struct Bot {
    quotes: Box<dyn Store<Quote>>,
}

impl Bot {
    fn add(&mut self, quote: Quote) -> anyhow::Result<String> {
        if self.quotes.iter().any(|(_, it)| *it == quote) {
            bail!("{quote} is already stored");
        }
        let shown = quote.to_string();
        let id = self.quotes.insert(quote)?;
        info!(id, "quote stored");
        Ok(format!("added #{id}: {shown}"))
    }

    /// Stores every block of `prose`, or none if one of them is invalid.
    fn add_prose(&mut self, prose: &str) -> anyhow::Result<String> {
        let quotes = split_blocks(prose)
            .iter()
            .map(|it| parse_block(it))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let mut receipts = Vec::new();
        for quote in quotes {
            match self.add(quote) {
                Ok(it) => receipts.push(it),
                Err(err) => receipts.push(format!("skipped: {err}")),
            }
        }
        Ok(receipts.join("\n"))
    }
}

fn commands() -> Result<Registry<Bot>, RegistryError> {
    let add = Command::build("add", "Store one quote.")
        .arg("speaker", Ty::String, "Who said it.")
        .arg("text", Ty::String, "What was said, quoted.")
        .kwarg(KwargSpec::new("audience", Ty::String, "Who it was said to, `A og B` for several."))
        .handler(|args, bot: &mut Bot| {
            let audience = args.kwarg("audience").and_then(Value::as_str);
            let quote = Quote {
                speaker: args.str(0).unwrap_or_default().to_string(),
                audience: audience.map(split_names).unwrap_or_default(),
                text: args.str(1).unwrap_or_default().to_string(),
            };
            quote.validate()?;
            bot.add(quote)
        })
        .finish()?;

    let remove = Command::build("remove", "Delete a quote by id.")
        .arg("id", Ty::Integer, "Id as shown by `quote list -v`.")
        .handler(|args, bot: &mut Bot| {
            let id = args.int(0).unwrap_or_default();
            let deleted = match u64::try_from(id) {
                Ok(key) => bot.quotes.delete(key)?,
                Err(_) => None,
            };
            match deleted {
                Some(quote) => Ok(format!("deleted #{id}: {quote}")),
                None => bail!("no quote with id {id}"),
            }
        })
        .finish()?;

    let list = Command::build("list", "Show all quotes.")
        .flag('v', "Show ids.")
        .handler(|args, bot: &mut Bot| {
            if bot.quotes.is_empty() {
                return Ok("no quotes yet".to_string());
            }
            let lines = bot.quotes.iter().map(|(id, quote)| {
                if args.flag('v') {
                    format!("#{id} {quote}")
                } else {
                    quote.to_string()
                }
            });
            Ok(lines.collect::<Vec<_>>().join("\n"))
        })
        .finish()?;

    let random = Command::build("random", "Show one quote.")
        .handler(|_, bot: &mut Bot| {
            let pick = bot.quotes.iter().choose(&mut rand::thread_rng());
            Ok(pick.map_or_else(|| "no quotes yet".to_string(), |(_, it)| it.to_string()))
        })
        .finish()?;

    let quote = Command::build("quote", "Keep the quotes of the channel.")
        .subcommand(add)
        .subcommand(remove)
        .subcommand(list)
        .subcommand(random)
        .finish()?;
    Registry::new().with(quote)
}

struct Config {
    prefix: String,
    db: Option<String>,
    verbose: bool,
}

/// Reads the command line of the demo itself with the same grammar.
fn config() -> anyhow::Result<Option<Config>> {
    let cli: Command = Command::build("quotes", "Keeps chat quotes, reading the chat from stdin.")
        .flag('v', "Log at debug level.")
        .kwarg(KwargSpec::new("prefix", Ty::String, "Marks a command line.").default("!"))
        .kwarg(KwargSpec::new("db", Ty::String, "JSON file to keep quotes in across runs."))
        .finish()?;

    let line = std::env::args().skip(1).fold("quotes".to_string(), |mut acc, arg| {
        acc.push(' ');
        acc.push_str(&quote_arg(&arg));
        acc
    });
    let tree = chatflags::parse_command(&line)?;
    let args = match cli.resolve(&tree) {
        Ok(it) => it.arguments,
        Err(err) if err.is_help() => {
            print!("{err}");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    let prefix = args.kwarg("prefix").and_then(Value::as_str).unwrap_or("!").to_string();
    let db = args.kwarg("db").and_then(Value::as_str).map(str::to_string);
    Ok(Some(Config { prefix, db, verbose: args.flag('v') }))
}

fn quote_arg(arg: &str) -> String {
    if scan::is_flag(arg) || scan::is_symbol(arg) {
        arg.to_string()
    } else if arg.contains('\'') {
        format!("\"{arg}\"")
    } else {
        format!("'{arg}'")
    }
}

fn main() -> anyhow::Result<()> {
    let Some(config) = config()? else {
        return Ok(());
    };
    let filter =
        if config.verbose { EnvFilter::new("debug") } else { EnvFilter::from_default_env() };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let registry = commands()?;
    let quotes: Box<dyn Store<Quote>> = match &config.db {
        Some(path) => Box::new(FileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };
    info!(quotes = quotes.len(), "store ready");
    let mut bot = Bot { quotes };
    let mut prose = String::new();
    let mut stdout = io::stdout().lock();

    for line in io::stdin().lock().lines() {
        let line = line?;
        let reply = if let Some(command) = line.trim().strip_prefix(config.prefix.as_str()) {
            debug!(%command, "command");
            match registry.dispatch(command, &mut bot) {
                Ok(it) => it,
                Err(err) if err.is_help() => err.to_string(),
                Err(err) => {
                    warn!(%err, "command failed");
                    format!("error: {err}")
                }
            }
        } else if line.trim().is_empty() && !prose.trim().is_empty() {
            match bot.add_prose(&std::mem::take(&mut prose)) {
                Ok(it) => it,
                Err(err) => format!("error: {err}"),
            }
        } else {
            prose.push_str(&line);
            prose.push('\n');
            continue;
        };
        writeln!(stdout, "{}", reply.trim_end())?;
    }
    if !prose.trim().is_empty() {
        let reply = bot.add_prose(&prose).unwrap_or_else(|err| format!("error: {err}"));
        writeln!(stdout, "{reply}")?;
    }
    Ok(())
}
