mod fixtures;
mod props;

use chatflags::{parse_command, Command, Registry};
use expect_test::{expect, Expect};

fn check<C>(registry: &Registry<C>, line: &str, expect: Expect) {
    match registry.resolve(line) {
        Ok(bound) => expect.assert_debug_eq(&(bound.command.name(), &bound.arguments)),
        Err(err) => expect.assert_eq(&format!("{}\n", err.to_string().trim_end())),
    }
}

fn check_tree(line: &str, expect: Expect) {
    match parse_command(line) {
        Ok(tree) => expect.assert_eq(&format!("{tree}\n")),
        Err(err) => expect.assert_eq(&format!("{err}\n")),
    }
}

#[test]
fn trees() {
    check_tree(
        "quote add --audience 'the gang' alice hello",
        expect![[r#"
            Tree: quote {
                Value: add
                Value: alice
                Value: hello
                Kwarg: audience {
                    Value: the gang
                }
            }
        "#]],
    );
    check_tree(
        "  ls -la  ",
        expect![[r#"
            Tree: ls {
                Flag: l
                Flag: a
            }
        "#]],
    );
    check_tree(
        "quote add --pin --audience",
        expect![[r#"
            Tree: quote {
                Value: add
                Kwarg: pin
                Kwarg: audience
            }
        "#]],
    );
    check_tree(
        "quote add 'unterminated",
        expect![[r#"
            unterminated quote: `'` in `'unterminated` is never closed
        "#]],
    );
    check_tree(
        "quote add a.b",
        expect![[r#"
            unexpected input: `a.b`
        "#]],
    );
    check_tree(
        "!quote",
        expect![[r#"
            expected a command name, got `!quote`
        "#]],
    );
}

#[test]
fn positionals_and_flags() {
    let greet = fixtures::greet();
    check(
        &greet,
        "greet -rf alice 5",
        expect![[r#"
            (
                "greet",
                Arguments {
                    values: [
                        Str(
                            "alice",
                        ),
                        Int(
                            5,
                        ),
                    ],
                    flags: {
                        'f',
                        'r',
                    },
                    kwargs: {},
                },
            )
        "#]],
    );
    check(
        &greet,
        "greet alice five",
        expect![[r#"
            Command: greet {
                `five` can not be converted to type integer
            }
        "#]],
    );
    check(
        &greet,
        "greet alice",
        expect![[r#"
            Command: greet {
                too few arguments: expected 2, got 1
            }
        "#]],
    );
    check(
        &greet,
        "greet alice 5 extra",
        expect![[r#"
            Command: greet {
                too many arguments: expected 2, got 3
            }
        "#]],
    );
    check(
        &greet,
        "greet -x alice 5",
        expect![[r#"
            Command: greet {
                `x` is not a valid flag of command `greet`
            }
        "#]],
    );
    check(
        &greet,
        "gret alice 5",
        expect![[r#"
            unknown command: `gret`. Use `help` for more information
        "#]],
    );
}

#[test]
fn subcommands_and_kwargs() {
    let quotes = fixtures::quotes();
    check(
        &quotes,
        "quote add alice 'you did what' --audience friend",
        expect![[r#"
            (
                "add",
                Arguments {
                    values: [
                        Str(
                            "alice",
                        ),
                        Str(
                            "you did what",
                        ),
                    ],
                    flags: {},
                    kwargs: {
                        "audience": Some(
                            Str(
                                "friend",
                            ),
                        ),
                        "weight": Some(
                            Float(
                                1.0,
                            ),
                        ),
                    },
                },
            )
        "#]],
    );
    check(
        &quotes,
        "quote add help hi",
        expect![[r#"
            (
                "add",
                Arguments {
                    values: [
                        Str(
                            "help",
                        ),
                        Str(
                            "hi",
                        ),
                    ],
                    flags: {},
                    kwargs: {
                        "weight": Some(
                            Float(
                                1.0,
                            ),
                        ),
                    },
                },
            )
        "#]],
    );
    check(
        &quotes,
        "quote add --audience 'the gang' alice hello --pin",
        expect![[r#"
            (
                "add",
                Arguments {
                    values: [
                        Str(
                            "alice",
                        ),
                        Str(
                            "hello",
                        ),
                    ],
                    flags: {},
                    kwargs: {
                        "audience": Some(
                            Str(
                                "the gang",
                            ),
                        ),
                        "pin": None,
                        "weight": Some(
                            Float(
                                1.0,
                            ),
                        ),
                    },
                },
            )
        "#]],
    );
    check(
        &quotes,
        "quote list",
        expect![[r#"
            (
                "list",
                Arguments {
                    values: [
                        Int(
                            10,
                        ),
                    ],
                    flags: {},
                    kwargs: {},
                },
            )
        "#]],
    );
    check(
        &quotes,
        "quote add alice",
        expect![[r#"
            Command: quote {
                Command: add {
                    too few arguments: expected 2, got 1
                }
            }
        "#]],
    );
    check(
        &quotes,
        "quote add alice hi --audience",
        expect![[r#"
            Command: quote {
                Command: add {
                    kwarg `--audience` expects a value of type string
                }
            }
        "#]],
    );
    check(
        &quotes,
        "quote add alice hi --weight heavy",
        expect![[r#"
            Command: quote {
                Command: add {
                    `heavy` can not be converted to type float
                }
            }
        "#]],
    );
    check(
        &quotes,
        "quote add alice hi --mood good",
        expect![[r#"
            Command: quote {
                Command: add {
                    `mood` is not a valid kwarg of command `add`
                }
            }
        "#]],
    );
    check(
        &quotes,
        "quote remove",
        expect![[r#"
            Command: quote {
                Command: remove {
                    missing required kwarg: `--id`
                }
            }
        "#]],
    );
    check(
        &quotes,
        "quote remove --id 1 --id 2",
        expect![[r#"
            Command: quote {
                Command: remove {
                    duplicate kwarg: `--id`
                }
            }
        "#]],
    );
    check(
        &quotes,
        "quote edit",
        expect![[r#"
            Command: quote {
                too many arguments: expected 0, got 1
            }
        "#]],
    );
}

#[test]
fn help() {
    let quotes = fixtures::quotes();
    check(
        &quotes,
        "help",
        expect![[r#"
            COMMANDS:
                quote  Keep the quotes of the channel.

            Use `help <command>` for more information.
        "#]],
    );
    check(
        &quotes,
        "quote help",
        expect![[r#"
            quote {args} -{flags} --{key} value
              Keep the quotes of the channel.

            SUBCOMMANDS:
                add     Store one quote.
                list    Show all quotes.
                remove  Delete a quote.

            KWARGS:
                --help
                  Prints help information.
        "#]],
    );
    check(
        &quotes,
        "quote add alice --help",
        expect![[r#"
            add {args} -{flags} --{key} value
              Store one quote.

            ARGS:
                <speaker>: string
                  Who said it.

                <text>: string
                  What was said.

            KWARGS:
                --audience <string>
                  Who it was said to.

                --weight <float> = 1
                  How good it is.

                --pin [string]
                  Keep it on top.

                --help
                  Prints help information.
        "#]],
    );
    check(
        &quotes,
        "help quote list",
        expect![[r#"
            list {args} -{flags} --{key} value
              Show all quotes.

            ARGS:
                [limit]: integer = 10
                  At most this many.

            FLAGS:
                -v
                  Show ids.

            KWARGS:
                --help
                  Prints help information.
        "#]],
    );
    assert!(quotes.resolve("quote add --help").err().unwrap().is_help());
}

#[test]
fn dispatch() {
    let greet = fixtures::greet();
    let mut log = Vec::new();
    let res = greet.dispatch("greet -rf alice 2", &mut log).unwrap();
    assert_eq!(res, "good day, ecila\ngood day, ecila");
    assert!(greet.dispatch("greet alice 2 extra", &mut log).is_err());
    assert_eq!(log.len(), 1);

    let err = fixtures::quotes().dispatch("quote", &mut ()).unwrap_err();
    expect![[r#"
        Command: quote {
            a subcommand of `quote` is required. Use `help` for more information
        }"#]]
    .assert_eq(&err.to_string());
}

#[test]
fn handler_errors_pass_through() {
    let fail = Command::build("fail", "Always fails.")
        .handler(|_, _: &mut ()| anyhow::bail!("the store is gone"))
        .finish()
        .unwrap();
    let registry = Registry::new().with(fail).unwrap();
    let err = registry.dispatch("fail", &mut ()).unwrap_err();
    assert!(matches!(err, chatflags::Error::Run(_)));
    assert_eq!(err.to_string(), "the store is gone");
}

#[test]
fn binding_is_repeatable() {
    let quotes = fixtures::quotes();
    let line = "quote add --audience 'the gang' alice hello";
    assert_eq!(parse_command(line), parse_command(line));
    let first = quotes.resolve(line).unwrap().arguments;
    let second = quotes.resolve(line).unwrap().arguments;
    assert_eq!(first, second);
}
