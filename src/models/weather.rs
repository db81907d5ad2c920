use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    #[serde(rename = "temperatureC")]
    pub temperature_c: f64,
    #[serde(rename = "feelsLikeC")]
    pub feels_like_c: Option<f64>,
    pub humidity: Option<f64>,
    #[serde(rename = "windKph")]
    pub wind_kph: Option<f64>,
    pub condition: Option<String>,
    #[serde(rename = "observedAt")]
    pub observed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(rename = "highC")]
    pub high_c: f64,
    #[serde(rename = "lowC")]
    pub low_c: f64,
    pub condition: Option<String>,
    // Probability in percent, 0-100
    #[serde(rename = "precipitationChance", default)]
    pub precipitation_chance: Option<f64>,
}

impl CurrentWeather {
    pub fn summary_line(&self) -> String {
        let condition = self.condition.as_deref().unwrap_or("unknown");
        format!("{}: {:.1}°C, {}", self.city, self.temperature_c, condition)
    }
}
