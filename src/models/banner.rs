use serde::{Deserialize, Serialize};

use crate::constants::banners::DEFAULT_AUTOPLAY_INTERVAL_MS;

/// One carousel slide. Slides are presented ordered by `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default)]
    pub order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Singleton-style carousel configuration row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerSettings {
    pub random_order: bool,

    pub auto_play_interval: i64,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            random_order: false,
            auto_play_interval: DEFAULT_AUTOPLAY_INTERVAL_MS,
        }
    }
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let settings: BannerSettings = serde_json::from_str(r#"{"randomOrder":true}"#).unwrap();
        assert!(settings.random_order);
        assert_eq!(settings.auto_play_interval, 5000);
    }

    #[test]
    fn banner_round_trips_camel_case() {
        let raw = r#"{"_id":"b1","imageUrl":"https://cdn.example.org/a.png","order":2,"isActive":true}"#;
        let banner: Banner = serde_json::from_str(raw).unwrap();
        assert_eq!(banner.order, 2);

        let back = serde_json::to_value(&banner).unwrap();
        assert_eq!(back["imageUrl"], "https://cdn.example.org/a.png");
        assert_eq!(back["isActive"], true);
    }
}
