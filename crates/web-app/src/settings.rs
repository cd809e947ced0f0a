use bkmart_domain::ProductOrder;
use log::error;

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Sort order of product lists, as used in URLs (e.g. `price-low`).
    pub product_order: String,
}

impl Settings {
    #[must_use]
    pub fn product_order(&self) -> ProductOrder {
        ProductOrder::from(self.product_order.as_str())
    }

    #[must_use]
    pub fn current_theme(&self) -> Theme {
        match self.theme {
            Theme::System => {
                let Some(window) = web_sys::window() else {
                    error!("failed to access window to determine preferred color scheme");
                    return Theme::Light;
                };
                match window.match_media("(prefers-color-scheme: dark)") {
                    Ok(Some(media_query_list)) => {
                        if media_query_list.matches() {
                            Theme::Dark
                        } else {
                            Theme::Light
                        }
                    }
                    Ok(None) => {
                        error!("failed to determine preferred color scheme");
                        Theme::Light
                    }
                    Err(_) => {
                        error!("failed to match media to determine preferred color scheme");
                        Theme::Light
                    }
                }
            }
            Theme::Light | Theme::Dark => self.theme,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            product_order: ProductOrder::Default.to_string(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    System,
    Light,
    Dark,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_settings_product_order() {
        assert_eq!(Settings::default().product_order(), ProductOrder::Default);
        assert_eq!(
            Settings {
                product_order: "price-high".to_string(),
                ..Settings::default()
            }
            .product_order(),
            ProductOrder::PriceDescending
        );
    }

    #[test]
    fn test_settings_deserialization_with_missing_fields() {
        assert_eq!(
            serde_json::from_str::<Settings>(r#"{"theme":"Dark"}"#).unwrap(),
            Settings {
                theme: Theme::Dark,
                product_order: "default".to_string(),
            }
        );
    }

    #[test]
    fn test_current_theme() {
        assert_eq!(
            Settings {
                theme: Theme::Dark,
                ..Settings::default()
            }
            .current_theme(),
            Theme::Dark
        );
    }
}
