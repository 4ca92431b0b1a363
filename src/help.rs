use std::fmt::Write;

use crate::command::{Arity, Command};

pub(crate) fn render<C>(cmd: &Command<C>) -> String {
    let mut buf = String::new();
    w!(buf, "{} {{args}} -{{flags}} --{{key}} value\n", cmd.name);
    if !cmd.doc.is_empty() {
        write_lines_indented(&mut buf, &cmd.doc, 2);
    }

    if !cmd.subcommands.is_empty() {
        blank_line(&mut buf);
        w!(buf, "SUBCOMMANDS:\n");
        let width = cmd.subcommands.iter().map(|it| it.name.len()).max().unwrap_or_default();
        for sub in &cmd.subcommands {
            let doc = sub.doc.lines().next().unwrap_or_default();
            w!(buf, "    {:width$}  {doc}\n", sub.name);
        }
    }

    if !cmd.args.is_empty() {
        blank_line(&mut buf);
        w!(buf, "ARGS:\n");
        let mut blank = "";
        for arg in &cmd.args {
            w!(buf, "{blank}");
            blank = "\n";
            match &arg.default {
                None => w!(buf, "    <{}>: {}\n", arg.name, arg.ty),
                Some(default) => w!(buf, "    [{}]: {} = {default}\n", arg.name, arg.ty),
            }
            write_lines_indented(&mut buf, &arg.doc, 6);
        }
    }

    if !cmd.flags.is_empty() {
        blank_line(&mut buf);
        w!(buf, "FLAGS:\n");
        let mut blank = "";
        for flag in &cmd.flags {
            w!(buf, "{blank}");
            blank = "\n";
            w!(buf, "    -{}\n", flag.name);
            write_lines_indented(&mut buf, &flag.doc, 6);
        }
    }

    blank_line(&mut buf);
    w!(buf, "KWARGS:\n");
    for kwarg in &cmd.kwargs {
        let value = if kwarg.bare {
            format!(" [{}]", kwarg.ty)
        } else {
            format!(" <{}>", kwarg.ty)
        };
        let arity = match &kwarg.arity {
            Arity::Optional => String::new(),
            Arity::Required => " (required)".to_string(),
            Arity::Default(it) => format!(" = {it}"),
        };
        w!(buf, "    --{}{value}{arity}\n", kwarg.key);
        write_lines_indented(&mut buf, &kwarg.doc, 6);
        w!(buf, "\n");
    }
    w!(buf, "    --help\n");
    write_lines_indented(&mut buf, "Prints help information.", 6);
    buf
}

fn write_lines_indented(buf: &mut String, multiline_str: &str, indent: usize) {
    for line in multiline_str.split('\n').map(str::trim_end) {
        if line.is_empty() {
            continue;
        }
        w!(buf, "{blank:indent$}{line}\n", blank = "");
    }
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::{Command, KwargSpec, Ty};

    #[test]
    fn help_lists_sections_in_declaration_order() {
        let add = Command::<()>::build("add", "Add a quote.\nSpeaker comes first.")
            .finish()
            .unwrap();
        let cmd = Command::build("quote", "Manage quotes.")
            .subcommand(add)
            .arg("speaker", Ty::String, "Who said it.")
            .optional_arg("count", Ty::Integer, "How many.", 1_i64)
            .flag('v', "Show ids.")
            .kwarg(KwargSpec::new("audience", Ty::String, "Who heard it."))
            .kwarg(KwargSpec::new("limit", Ty::Integer, "").default(10_i64))
            .kwarg(KwargSpec::new("all", Ty::String, "Everything.").bare().required())
            .finish()
            .unwrap();

        expect![[r#"
            quote {args} -{flags} --{key} value
              Manage quotes.

            SUBCOMMANDS:
                add  Add a quote.

            ARGS:
                <speaker>: string
                  Who said it.

                [count]: integer = 1
                  How many.

            FLAGS:
                -v
                  Show ids.

            KWARGS:
                --audience <string>
                  Who heard it.

                --limit <integer> = 10

                --all [string] (required)
                  Everything.

                --help
                  Prints help information.
        "#]]
        .assert_eq(cmd.help());
    }
}
