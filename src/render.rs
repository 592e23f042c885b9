use crate::{
    config::{Config, Styleable},
    form::FieldErrors,
    types::notification::{Level, Notification},
    view::{Card, Screen},
};

pub const LOADING_MESSAGE: &str = "Loading books...";
pub const EMPTY_MESSAGE: &str = "No books in the catalog yet.";
pub const EMPTY_HINT: &str = "Start by adding your first book with `add`.";
pub const NO_COVER: &str = "No cover";

pub fn render_screen(screen: &Screen<'_>, config: &Config) -> String {
    match screen {
        Screen::Loading => config.output_loading.format_str(LOADING_MESSAGE),
        Screen::Empty => format!(
            "{}\n{}",
            config.output_empty.format_str(EMPTY_MESSAGE),
            config.output_empty.format_str(EMPTY_HINT)
        ),
        Screen::Grid(cards) => cards
            .iter()
            .map(|card| render_card(card, config))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

pub fn render_card(card: &Card<'_>, config: &Config) -> String {
    let mut s = config.output_title.format_str(card.title);
    if let Some(id) = card.id {
        s.push(' ');
        s.push_str(&config.output_id.format_str(id));
    }
    s.push('\n');
    s.push_str(&config.output_genre.format_str(card.genre));
    s.push('\n');
    s.push_str(&config.output_page_count.format_str(card.page_count));
    s.push('\n');
    match card.cover {
        Some(cover) => s.push_str(&config.output_cover.format_str(cover)),
        None => s.push_str(&config.output_no_cover.format_str(NO_COVER)),
    }
    s
}

pub fn render_notification(notification: &Notification, config: &Config) -> String {
    let output = match notification.level {
        Level::Success => &config.output_success,
        Level::Error => &config.output_error,
    };
    format!(
        "{} {}",
        output.format_str(&notification.message),
        notification
            .at
            .format("%H:%M:%S")
            .style(&config.output_id.style_content)
    )
}

pub fn render_field_errors(errors: &FieldErrors, config: &Config) -> String {
    errors
        .iter()
        .map(|(field, violations)| {
            format!(
                "{}: {}",
                field.label(),
                config.output_field_error.format_vec(violations)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
