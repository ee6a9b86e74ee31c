use serde::{Deserialize, Serialize};

use crate::{
    access::Role,
    notification::{NotificationCategory, NotificationSeed},
};

/// Settings of the generative AI service used for plant health analysis.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the Gemini REST API.
    pub endpoint: String,
    /// Model used for `generateContent` calls.
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is never written to the configuration file.
    pub api_key_env: String,
    /// Overall request timeout, in seconds.
    pub timeout_seconds: u64,
    /// Largest image accepted for analysis, in bytes.
    pub max_image_bytes: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_owned(),
            model: "gemini-2.5-flash".to_owned(),
            api_key_env: "API_KEY".to_owned(),
            timeout_seconds: 60,
            max_image_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Role the session starts with.
    pub default_role: Role,
    /// Configuration of the plant health inference service.
    pub inference: InferenceConfig,
    /// Alerts the notification log starts with.
    pub seed_notifications: Vec<NotificationSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_role: Role::Admin,
            inference: InferenceConfig::default(),
            seed_notifications: default_seed_notifications(),
        }
    }
}

fn default_seed_notifications() -> Vec<NotificationSeed> {
    vec![
        NotificationSeed {
            id: "1".into(),
            message: "Heavy rain expected tomorrow. Secure equipment.".to_owned(),
            category: NotificationCategory::Alert,
            read: false,
        },
        NotificationSeed {
            id: "2".into(),
            message: "Pesticide application for potatoes due in 2 days.".to_owned(),
            category: NotificationCategory::Info,
            read: false,
        },
        NotificationSeed {
            id: "3".into(),
            message: "Worker #3 (Ramesh) checked in late.".to_owned(),
            category: NotificationCategory::Alert,
            read: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            default_role = "Worker"

            [inference]
            model = "gemini-2.5-pro"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.default_role, Role::Worker);
        assert_eq!(config.inference.model, "gemini-2.5-pro");
        assert_eq!(config.inference.api_key_env, "API_KEY");
        assert_eq!(config.seed_notifications.len(), 3);
    }

    #[test]
    fn seed_entries_are_read_from_file() {
        let config: Config = toml::from_str(
            r#"
            [[seed_notifications]]
            id = "frost"
            message = "Frost warning tonight."
            category = "Alert"
            "#,
        )
        .expect("valid config");

        assert_eq!(
            config.seed_notifications,
            vec![NotificationSeed {
                id: "frost".into(),
                message: "Frost warning tonight.".to_owned(),
                category: NotificationCategory::Alert,
                read: false,
            }]
        );
    }
}
