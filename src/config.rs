use serde::Serialize;
use std::env;

pub const DEMO_KEY: &str = "DEMO_KEY";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_PORT: u16 = 8080;

/// Letterhead identity stamped into every document. Overridable per
/// deployment through SCHOOL_NAME / SCHOOL_CITY / SCHOOL_HEADMASTER.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolProfile {
    pub name: String,
    pub city: String,
    pub headmaster: String,
}

impl SchoolProfile {
    pub fn from_env() -> Self {
        SchoolProfile {
            name: env::var("SCHOOL_NAME").unwrap_or_else(|_| "MIS Al Muslimun".to_string()),
            city: env::var("SCHOOL_CITY").unwrap_or_else(|_| "Kotabaru".to_string()),
            headmaster: env::var("SCHOOL_HEADMASTER")
                .unwrap_or_else(|_| "AHMAD HUSSAINI, S.Pd.I".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub school: SchoolProfile,
}

impl Config {
    pub fn from_env() -> Self {
        let gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_else(|_| DEMO_KEY.to_string());
        let gemini_api_base =
            env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Config {
            gemini_api_key,
            gemini_api_base,
            port,
            school: SchoolProfile::from_env(),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.gemini_api_key == DEMO_KEY
    }

    /// Key rendered safe for logs: first four chars, then a masked tail.
    pub fn masked_key(&self) -> String {
        if self.is_demo() {
            return DEMO_KEY.to_string();
        }
        let visible: String = self.gemini_api_key.chars().take(4).collect();
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_key_hides_the_tail() {
        let config = Config {
            gemini_api_key: "AIzaSyExampleExample".to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            port: DEFAULT_PORT,
            school: SchoolProfile {
                name: "MIS Al Muslimun".to_string(),
                city: "Kotabaru".to_string(),
                headmaster: "AHMAD HUSSAINI, S.Pd.I".to_string(),
            },
        };
        assert_eq!(config.masked_key(), "AIza****");
        assert!(!config.is_demo());
    }

    #[test]
    fn demo_key_is_reported_as_demo() {
        let config = Config {
            gemini_api_key: DEMO_KEY.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            port: DEFAULT_PORT,
            school: SchoolProfile {
                name: "MIS Al Muslimun".to_string(),
                city: "Kotabaru".to_string(),
                headmaster: "AHMAD HUSSAINI, S.Pd.I".to_string(),
            },
        };
        assert!(config.is_demo());
        assert_eq!(config.masked_key(), DEMO_KEY);
    }
}
