use std::collections::VecDeque;

use bkmart_web_app::{Settings, TokenRepository, log};
use gloo_storage::Storage as GlooStorage;

const KEY_TOKEN: &str = "token";
const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

#[derive(Clone, Copy, Default)]
pub struct Token;

impl TokenRepository for Token {
    fn read_token(&self) -> Option<String> {
        gloo_storage::LocalStorage::get::<String>(KEY_TOKEN)
            .ok()
            .filter(|token| !token.is_empty())
    }

    fn write_token(&self, token: &str) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_TOKEN, token).map_err(|err| err.to_string())
    }

    fn delete_token(&self) {
        gloo_storage::LocalStorage::delete(KEY_TOKEN);
    }
}

#[derive(Clone, Copy, Default)]
pub struct UI;

impl bkmart_web_app::SettingsRepository for UI {
    async fn read_settings(&self) -> Result<Settings, String> {
        match gloo_storage::LocalStorage::get(KEY_SETTINGS) {
            Ok(settings) => Ok(settings),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(Settings::default()),
                err => Err(err),
            },
        }
        .map_err(|err| err.to_string())
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())
    }
}

#[derive(Clone, Copy, Default)]
pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::append(&mut entries, entry);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
