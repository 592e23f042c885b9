use std::path::PathBuf;

use anyhow::{anyhow, Result};
use crossterm::style::Stylize;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{client::DEFAULT_BASE_URL, default_colors::*};

const USER_CONFIG: &str = "~/.config/estante/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    bold:   bool,
    italic: bool,
    color:  crossterm::style::Color,
}

impl StyleConfig {
    fn style(&self, s: impl ToString) -> String {
        let mut s = s.to_string().with(self.color);
        if self.bold {
            s = s.bold();
        }
        if self.italic {
            s = s.italic();
        }
        s.to_string()
    }
}

pub trait Styleable {
    fn style(&self, c: &StyleConfig) -> String;
}

impl<T> Styleable for T
where
    T: ToString + std::fmt::Display,
{
    fn style(&self, c: &StyleConfig) -> String {
        c.style(self)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color:  COLOR_WHITE,
            bold:   false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub prefix:            String,
    pub suffix:            String,
    pub description:       String,
    pub separator:         String,
    pub style_prefix:      StyleConfig,
    pub style_suffix:      StyleConfig,
    pub style_description: StyleConfig,
    pub style_separator:   StyleConfig,
    pub style_content:     StyleConfig,
}

impl OutputConfig {
    pub fn format_str(&self, content: impl ToString) -> String {
        let prefix = self.prefix.style(&self.style_prefix);
        let suffix = self.suffix.style(&self.style_suffix);
        let content = content.to_string().style(&self.style_content);
        if self.description.is_empty() {
            format!("{prefix}{content}{suffix}")
        } else {
            let description = self.description.style(&self.style_description);
            format!("{prefix}{description} {content}{suffix}")
        }
    }

    pub fn format_vec(&self, content: &[impl ToString]) -> String {
        let separator = self.separator.style(&self.style_separator);
        let joined = content
            .iter()
            .map(|x| x.to_string().style(&self.style_content))
            .collect::<Vec<_>>()
            .join(&separator);
        let prefix = self.prefix.style(&self.style_prefix);
        let suffix = self.suffix.style(&self.style_suffix);
        if self.description.is_empty() {
            format!("{prefix}{joined}{suffix}")
        } else {
            let description = self.description.style(&self.style_description);
            format!("{prefix}{description} {joined}{suffix}")
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix:            "".into(),
            suffix:            "".into(),
            description:       "".into(),
            separator:         ", ".into(),
            style_prefix:      StyleConfig::default(),
            style_suffix:      StyleConfig::default(),
            style_description: StyleConfig {
                italic: true,
                ..StyleConfig::default()
            },
            style_separator:   StyleConfig::default(),
            style_content:     StyleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url:           String,
    pub history_file:       PathBuf,
    pub log_level:          String,
    pub output_id:          OutputConfig,
    pub output_title:       OutputConfig,
    pub output_genre:       OutputConfig,
    pub output_page_count:  OutputConfig,
    pub output_cover:       OutputConfig,
    pub output_no_cover:    OutputConfig,
    pub output_empty:       OutputConfig,
    pub output_loading:     OutputConfig,
    pub output_success:     OutputConfig,
    pub output_error:       OutputConfig,
    pub output_field_error: OutputConfig,
}

impl Config {
    pub fn default_as_string() -> Result<String> {
        Ok(toml::to_string(&Self::default())?)
    }

    /// Defaults, then the user config, then `./config.toml`, then `ESTANTE_*` variables.
    pub fn read_config() -> Result<Self> {
        let user_config = shellexpand::tilde(USER_CONFIG).into_owned();
        Ok(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_config))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ESTANTE_"))
            .extract()?)
    }

    pub fn history_path(&self) -> PathBuf {
        let path = self.history_file.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&path).into_owned())
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("Unknown log level {:?}", self.log_level))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url:           DEFAULT_BASE_URL.into(),
            history_file:       PathBuf::from("~/.local/share/estante/history.txt"),
            log_level:          "warn".into(),
            output_id:          OutputConfig {
                prefix: "(#".into(),
                suffix: ")".into(),
                style_content: StyleConfig {
                    color: COLOR_DIMMED,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_title:       OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_TITLE,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_genre:       OutputConfig {
                prefix: "  ".into(),
                description: "Genre:".into(),
                style_content: StyleConfig {
                    color: COLOR_GENRE,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_page_count:  OutputConfig {
                prefix: "  ".into(),
                description: "Pages:".into(),
                style_content: StyleConfig {
                    color: COLOR_PAGE_COUNT,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_cover:       OutputConfig {
                prefix: "  ".into(),
                description: "Cover:".into(),
                style_content: StyleConfig {
                    color: COLOR_COVER,
                    italic: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_no_cover:    OutputConfig {
                prefix: "  ".into(),
                style_content: StyleConfig {
                    color: COLOR_DIMMED,
                    italic: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_empty:       OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_DIMMED,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_loading:     OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_LOADING,
                    italic: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_success:     OutputConfig {
                prefix: "✓ ".into(),
                style_prefix: StyleConfig {
                    color: COLOR_SUCCESS,
                    bold: true,
                    ..StyleConfig::default()
                },
                style_content: StyleConfig {
                    color: COLOR_SUCCESS,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_error:       OutputConfig {
                prefix: "✗ ".into(),
                style_prefix: StyleConfig {
                    color: COLOR_ERROR,
                    bold: true,
                    ..StyleConfig::default()
                },
                style_content: StyleConfig {
                    color: COLOR_ERROR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_field_error: OutputConfig {
                prefix: "  ".into(),
                separator: "; ".into(),
                style_content: StyleConfig {
                    color: COLOR_ERROR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
        }
    }
}
