//! Human-readable output with an optional ASCII-art icon.

use weather_core::WeatherResult;

const SUNNY: &str = r#"    \   /
     .-.
  - (   ) -
     `-'
    /   \"#;

const CLOUDY: &str = r#"
     .--.
  .-(    ).
 (___.__)__)
"#;

const RAINY: &str = r#"     .-.
    (   ).
   (___(__)
    ' ' ' '
   ' ' ' '"#;

const STORMY: &str = r#"     .-.
    (   ).
   (___(__)
    /_  /_
     /   /"#;

const SNOWY: &str = r#"     .-.
    (   ).
   (___(__)
    *  *  *
   *  *  *"#;

const FOGGY: &str = r#"
 _ - _ - _ -
  _ - _ - _
 _ - _ - _ -
"#;

const UNKNOWN: &str = r#"    .-.
     __)
    (
     `-'
      *"#;

/// Pick an icon from keywords in the upstream description.
pub fn icon_for(description: &str) -> &'static str {
    let d = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| d.contains(w));

    if has(&["thunder", "storm"]) {
        STORMY
    } else if has(&["snow", "sleet"]) {
        SNOWY
    } else if has(&["rain", "drizzle", "shower"]) {
        RAINY
    } else if has(&["mist", "fog", "haze", "smoke", "dust", "sand"]) {
        FOGGY
    } else if has(&["cloud", "overcast"]) {
        CLOUDY
    } else if has(&["clear", "sun"]) {
        SUNNY
    } else {
        UNKNOWN
    }
}

pub fn render(weather: &WeatherResult, with_art: bool) -> String {
    if with_art {
        format!("{}\n\n{weather}", icon_for(&weather.description).trim_matches('\n'))
    } else {
        weather.to_string()
    }
}
