use chatflags::{Command, KwargSpec, Registry, Ty};

/// `greet <name> <times> -r -f`, with a handler that echoes its input.
pub fn greet() -> Registry<Vec<String>> {
    let greet = Command::build("greet", "Greets someone, a number of times.")
        .arg("name", Ty::String, "Who to greet.")
        .arg("times", Ty::Integer, "How many times.")
        .flag('r', "Reverse the name.")
        .flag('f', "Formal greeting.")
        .handler(|args, log: &mut Vec<String>| {
            let name = args.str(0).unwrap_or_default();
            let name: String =
                if args.flag('r') { name.chars().rev().collect() } else { name.to_string() };
            let greeting = if args.flag('f') { "good day" } else { "hi" };
            let times = args.int(1).unwrap_or_default();
            let res = vec![format!("{greeting}, {name}"); times.max(0) as usize].join("\n");
            log.push(res.clone());
            Ok(res)
        })
        .finish()
        .unwrap();
    Registry::new().with(greet).unwrap()
}

/// `quote add|list|remove`, nothing runs.
pub fn quotes() -> Registry {
    let add = Command::build("add", "Store one quote.")
        .arg("speaker", Ty::String, "Who said it.")
        .arg("text", Ty::String, "What was said.")
        .kwarg(KwargSpec::new("audience", Ty::String, "Who it was said to."))
        .kwarg(KwargSpec::new("weight", Ty::Float, "How good it is.").default(1.0))
        .kwarg(KwargSpec::new("pin", Ty::String, "Keep it on top.").bare())
        .finish()
        .unwrap();
    let list = Command::build("list", "Show all quotes.")
        .optional_arg("limit", Ty::Integer, "At most this many.", 10_i64)
        .flag('v', "Show ids.")
        .finish()
        .unwrap();
    let remove = Command::build("remove", "Delete a quote.")
        .kwarg(KwargSpec::new("id", Ty::Integer, "Id of the quote.").required())
        .finish()
        .unwrap();
    let quote = Command::build("quote", "Keep the quotes of the channel.")
        .subcommand(add)
        .subcommand(list)
        .subcommand(remove)
        .finish()
        .unwrap();
    Registry::new().with(quote).unwrap()
}
