use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal profile row (`profiles` table), created at sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub avatar_path: Option<String>,
}

/// User-editable settings row (`settings` table), keyed by the user id.
/// Everything is optional; the profile view falls back across rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettings {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
    pub cover_path: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl UserSettings {
    /// Display name resolution: explicit display name, then "first last",
    /// then whatever the fallback profile offers, then a generic placeholder.
    pub fn resolve_display_name(&self, fallback: Option<&Profile>) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }

        let first = self
            .first_name
            .as_deref()
            .or_else(|| fallback.and_then(|p| p.first_name.as_deref()))
            .unwrap_or("");
        let last = self
            .last_name
            .as_deref()
            .or_else(|| fallback.and_then(|p| p.last_name.as_deref()))
            .unwrap_or("");
        let joined = format!("{} {}", first, last).trim().to_string();
        if !joined.is_empty() {
            return joined;
        }

        fallback
            .and_then(|p| p.display_name.clone().or_else(|| p.username.clone()))
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "User".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            display_name: None,
            username: Some(username.to_string()),
            avatar_path: None,
        }
    }

    #[test]
    fn display_name_prefers_settings() {
        let settings = UserSettings {
            display_name: Some("Ada".into()),
            ..Default::default()
        };
        assert_eq!(settings.resolve_display_name(Some(&profile("ada42"))), "Ada");
    }

    #[test]
    fn display_name_joins_first_last() {
        let settings = UserSettings {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        };
        assert_eq!(settings.resolve_display_name(None), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_username_then_placeholder() {
        let settings = UserSettings::default();
        assert_eq!(settings.resolve_display_name(Some(&profile("ada42"))), "ada42");
        assert_eq!(settings.resolve_display_name(None), "User");
    }
}
