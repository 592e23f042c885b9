use clap::{value_parser, Arg, ArgAction, Command};

fn id_arg() -> Arg {
    Arg::new("id")
        .help("Id of the book")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn entry_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("title").long("title").help("Title of the book"))
        .arg(Arg::new("genre").long("genre").help("Genre of the book"))
        .arg(Arg::new("pages").long("pages").help("Number of pages"))
        .arg(
            Arg::new("cover")
                .long("cover")
                .help("URL of the cover image, empty for none"),
        )
}

pub fn arg_parser() -> Command {
    Command::new("estante")
        .about("Manage a remote book catalog")
        .multicall(true)
        .subcommand_required(true)
        .subcommand(Command::new("list").about("Show every book in the catalog"))
        .subcommand(entry_args(Command::new("add").about("Add a book")))
        .subcommand(entry_args(
            Command::new("edit").about("Edit a book").arg(id_arg()),
        ))
        .subcommand(
            Command::new("remove")
                .about("Remove a book")
                .arg(id_arg())
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Don't ask for confirmation")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write the catalog to stdout")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                ),
        )
        .subcommand(Command::new("config").about("Print the default configuration"))
}

pub fn arg_parser_cli() -> Command {
    arg_parser().subcommand(Command::new("repl").about("Launch a read eval print loop"))
}

pub fn arg_parser_repl() -> Command {
    arg_parser().subcommand(Command::new("exit").about("Leave the repl"))
}

pub fn generate_completions() -> Vec<String> {
    let cmd = arg_parser_repl();
    fn add_command(parent_fn_name: &str, cmd: &Command, subcmds: &mut Vec<String>) {
        let fn_name = format!("{parent_fn_name} {}", cmd.get_name())
            .trim()
            .to_string();
        subcmds.push(fn_name.clone());
        for subcmd in cmd.get_subcommands() {
            add_command(&fn_name, subcmd, subcmds);
        }
    }
    let mut subcmds = vec![];
    for subcmd in cmd.get_subcommands() {
        add_command("", subcmd, &mut subcmds);
    }
    subcmds.sort();
    subcmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_is_consistent() {
        arg_parser_cli().debug_assert();
        arg_parser_repl().debug_assert();
    }

    #[test]
    fn completions_cover_every_command() {
        let completions = generate_completions();
        for name in ["add", "config", "edit", "exit", "export", "list", "remove"] {
            assert!(completions.contains(&name.to_string()), "{name} missing");
        }
    }

    #[test]
    fn edit_takes_id_and_fields() {
        let matches = arg_parser_cli()
            .try_get_matches_from(["edit", "3", "--pages", "120"])
            .unwrap();
        let Some(("edit", matches)) = matches.subcommand() else {
            panic!("expected edit");
        };
        assert_eq!(matches.get_one::<i64>("id"), Some(&3));
        assert_eq!(
            matches.get_one::<String>("pages").map(String::as_str),
            Some("120")
        );
        assert_eq!(matches.get_one::<String>("title"), None);
    }
}
