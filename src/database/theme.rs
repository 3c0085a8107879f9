use super::storage::{StorageResult, get_item, set_item};
use rusqlite::Connection;
use tracing::warn;

pub const THEME_KEY: &str = "flashcardAppTheme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub fn load_theme(conn: &Connection) -> Theme {
    match get_item(THEME_KEY, conn) {
        Ok(Some(value)) if value == "light" => Theme::Light,
        Ok(_) => Theme::Dark,
        Err(e) => {
            warn!("Could not read theme preference: {e}");
            Theme::Dark
        }
    }
}

pub fn save_theme(theme: Theme, conn: &Connection) -> StorageResult<()> {
    set_item(THEME_KEY, theme.as_str(), conn)
}
