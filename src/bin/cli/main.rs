use std::{env, io};

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use dotenvy::dotenv;
use reedline::Signal;
use tracing::debug;

mod command_parser;
mod dialogs;
mod prompt;
mod repl;

use dialogs::{print_notifications, View};
use estante::{
    client::CatalogClient,
    config::Config,
    export::{Export, ExportFormat},
    render,
    view::CatalogView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

fn print_screen(view: &View, config: &Config) {
    println!("{}", render::render_screen(&view.screen(), config));
}

async fn handle_command(matches: &ArgMatches, view: &mut View, config: &Config) -> Result<Flow> {
    match matches.subcommand() {
        Some(("list", _)) => {
            view.refresh().await;
            print_notifications(view, config);
            print_screen(view, config);
        }
        Some(("add", args)) => {
            view.mount().await;
            view.open_create();
            dialogs::fill_form(view, args, config).await?;
        }
        Some(("edit", args)) => {
            view.mount().await;
            let id = *args.get_one::<i64>("id").context("Missing book id")?;
            view.open_edit(id)?;
            dialogs::fill_form(view, args, config).await?;
        }
        Some(("remove", args)) => {
            view.mount().await;
            let id = *args.get_one::<i64>("id").context("Missing book id")?;
            view.request_delete(id);
            dialogs::confirm_delete(view, args.get_flag("yes"), config).await?;
        }
        Some(("export", args)) => {
            view.mount().await;
            print_notifications(view, config);
            let format = args
                .get_one::<String>("format")
                .map(|s| s.parse::<ExportFormat>())
                .transpose()?
                .unwrap_or(ExportFormat::Csv);
            Export::export(&Export::new(view.entries()), format, io::stdout().lock())?;
        }
        Some(("config", _)) => {
            print!("{}", Config::default_as_string()?);
        }
        Some(("exit", _)) => return Ok(Flow::Exit),
        Some((name, _)) => bail!("Unknown command {name}"),
        None => unreachable!("subcommand required"),
    }
    Ok(Flow::Continue)
}

async fn handle_line(line: &str, view: &mut View, config: &Config) -> Result<Flow> {
    let command = shlex::split(line).context("Invalid command")?;
    if command.is_empty() {
        return Ok(Flow::Continue);
    }
    let matches = command_parser::arg_parser_repl().try_get_matches_from(command)?;
    handle_command(&matches, view, config).await
}

async fn run_repl(view: &mut View, config: &Config) -> Result<()> {
    view.mount().await;
    print_notifications(view, config);
    print_screen(view, config);

    let mut repl =
        repl::Repl::new(command_parser::generate_completions(), &config.history_path())?;
    loop {
        repl.set_book_count(view.entries().len());
        match repl.read_line() {
            Ok(Signal::Success(buffer)) => match handle_line(&buffer, view, config).await {
                Ok(Flow::Continue) => (),
                Ok(Flow::Exit) => break,
                Err(e) => println!("{}", config.output_error.format_str(&e)),
            },
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("\nAborted!");
                break;
            }
            x => {
                debug!("Event: {:?}", x);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::read_config()?;
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level()?)
        .init();

    let args_parsed = command_parser::arg_parser_cli().get_matches_from(env::args_os().skip(1));

    let mut view = CatalogView::new(CatalogClient::new(&config.base_url));
    debug!("Using catalog at {}", view.client().base_url());

    if let Some(("repl", _)) = args_parsed.subcommand() {
        run_repl(&mut view, &config).await
    } else {
        handle_command(&args_parsed, &mut view, &config).await?;
        Ok(())
    }
}
