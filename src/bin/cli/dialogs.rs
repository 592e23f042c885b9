use anyhow::Result;
use clap::ArgMatches;
use inquire::{
    validator::{StringValidator, Validation},
    Confirm, CustomUserError, Text,
};

use estante::{
    client::CatalogClient,
    config::Config,
    error::{FormError, ViewError},
    form::{check_field, Field},
    render,
    view::{CatalogView, Completion},
};

pub type View = CatalogView<CatalogClient>;

#[derive(Clone)]
struct FieldValidator(Field);

impl StringValidator for FieldValidator {
    fn validate(&self, input: &str) -> Result<Validation, CustomUserError> {
        let violations = check_field(self.0, input);
        if violations.is_empty() {
            return Ok(Validation::Valid);
        }
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Ok(Validation::Invalid(message.into()))
    }
}

fn arg_name(field: Field) -> &'static str {
    match field {
        Field::Title => "title",
        Field::Genre => "genre",
        Field::PageCount => "pages",
        Field::CoverUrl => "cover",
    }
}

pub fn print_notifications(view: &mut View, config: &Config) {
    for notification in view.drain_notifications() {
        println!("{}", render::render_notification(&notification, config));
    }
}

/// Asks for every field, starting from what the form already holds. `false` if the user escaped.
fn prompt_fields(view: &mut View) -> Result<bool> {
    let form = view.form_mut().ok_or(ViewError::NoActiveForm)?;
    for field in Field::ALL {
        let label = format!("{}:", field.label());
        let current = form.value(field).to_string();
        let mut prompt = Text::new(&label)
            .with_initial_value(&current)
            .with_validator(FieldValidator(field));
        if !field.is_required() {
            prompt = prompt.with_help_message("Optional, leave empty for no cover");
        }
        match prompt.prompt_skippable()? {
            Some(value) => form.set(field, value)?,
            None => return Ok(false),
        }
    }
    Ok(true)
}

// Prompts are skipped on the first attempt when the flags cover every required field of a new
// book, or any field of an existing one.
pub async fn fill_form(view: &mut View, matches: &ArgMatches, config: &Config) -> Result<()> {
    let form = view.form_mut().ok_or(ViewError::NoActiveForm)?;
    let mut given = 0;
    let mut missing_required = false;
    for field in Field::ALL {
        match matches.get_one::<String>(arg_name(field)) {
            Some(value) => {
                form.set(field, value.clone())?;
                given += 1;
            }
            None => missing_required |= field.is_required(),
        }
    }
    let mut interactive = if form.is_editing_existing() {
        given == 0
    } else {
        missing_required
    };

    loop {
        if interactive && !prompt_fields(view)? {
            view.close_form();
            println!("Cancelled.");
            return Ok(());
        }
        match view.submit_form().await {
            Ok(Completion::Succeeded) => {
                print_notifications(view, config);
                return Ok(());
            }
            Ok(Completion::Failed) => {
                print_notifications(view, config);
                if !Confirm::new("Try again?").with_default(true).prompt()? {
                    view.close_form();
                    return Ok(());
                }
            }
            Err(ViewError::Form(FormError::Invalid(errors))) => {
                println!("{}", render::render_field_errors(&errors, config));
            }
            Err(e) => return Err(e.into()),
        }
        interactive = true;
    }
}

pub async fn confirm_delete(
    view: &mut View,
    skip_confirmation: bool,
    config: &Config,
) -> Result<()> {
    let Some(id) = view.pending_delete() else {
        return Ok(());
    };
    let question = match view.entries().iter().find(|entry| entry.id == Some(id)) {
        Some(entry) => format!("Delete \"{}\"? This cannot be undone.", entry.title),
        None => format!("Delete book {id}? This cannot be undone."),
    };
    let mut confirmed = skip_confirmation;
    loop {
        if !confirmed && !Confirm::new(&question).with_default(false).prompt()? {
            view.cancel_delete();
            println!("Cancelled.");
            return Ok(());
        }
        let completion = view.confirm_delete().await?;
        print_notifications(view, config);
        match completion {
            Completion::Succeeded => return Ok(()),
            Completion::Failed => {
                if !Confirm::new("Try again?").with_default(true).prompt()? {
                    view.cancel_delete();
                    return Ok(());
                }
                confirmed = true;
            }
        }
    }
}
