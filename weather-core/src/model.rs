use std::fmt;

use crate::error::ApiError;

/// A validated city name, ready to be placed in an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    /// Trim and validate `city`.
    ///
    /// Only letters (any script), ASCII digits, spaces, hyphens and periods are
    /// accepted, which keeps markup and shell metacharacters out of requests.
    pub fn parse(city: &str) -> Result<Self, ApiError> {
        let trimmed = city.trim();
        if trimmed.is_empty() {
            return Err(ApiError::invalid_input("City name cannot be empty"));
        }

        if !trimmed.chars().all(is_allowed_city_char) {
            return Err(ApiError::invalid_input("Invalid city name format"));
        }

        Ok(Self {
            city: trimmed.to_string(),
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

fn is_allowed_city_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || matches!(c, ' ' | '-' | '.')
}

/// Current conditions for one city, as reported by the upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    pub city: String,
    pub temperature_c: f64,
    pub description: String,
}

impl fmt::Display for WeatherResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather for {}:", self.city)?;
        writeln!(f, "Temperature: {:.1}°C", self.temperature_c)?;
        write!(f, "Conditions: {}", self.description)
    }
}

/// API key and endpoint, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_trims_city() {
        let q = WeatherQuery::parse("  New York  ").expect("valid city");
        assert_eq!(q.city(), "New York");
    }

    #[test]
    fn query_accepts_non_ascii_letters_and_punctuation() {
        let cities = [
            "São Paulo",
            "Zürich",
            "München",
            "St. Louis",
            "Winston-Salem",
            "東京",
            "District 9",
        ];

        for city in cities {
            assert!(WeatherQuery::parse(city).is_ok(), "{city} should be accepted");
        }
    }

    #[test]
    fn query_rejects_blank() {
        for city in ["", "   ", "\t\n"] {
            let err = WeatherQuery::parse(city).unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)));
            assert!(err.to_string().contains("cannot be empty"));
        }
    }

    #[test]
    fn query_rejects_markup_and_shell_characters() {
        let cities = [
            "London<script>",
            "London<script>alert('xss')</script>",
            "Paris; rm -rf /",
            "Rome&appid=x",
            "Oslo/../",
        ];

        for city in cities {
            let err = WeatherQuery::parse(city).unwrap_err();
            assert!(err.to_string().contains("Invalid city name format"), "{city}");
        }
    }

    #[test]
    fn result_display_formats_one_decimal() {
        let result = WeatherResult {
            city: "London".into(),
            temperature_c: -2.04,
            description: "scattered clouds".into(),
        };

        assert_eq!(
            result.to_string(),
            "Weather for London:\nTemperature: -2.0°C\nConditions: scattered clouds"
        );
    }

    #[test]
    fn credentials_debug_hides_key() {
        let creds = Credentials::new("super-secret", "https://example.test/weather");
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("https://example.test/weather"));
    }
}
