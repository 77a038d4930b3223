/// OpenWeatherMap current-conditions client (imperial units).
///
///   https://api.openweathermap.org/data/2.5/weather?lat=..&lon=..&units=imperial
///
/// Response fields used:
///   main.temp, main.humidity   — °F, %
///   weather[0].main            — short condition label ("Rain", "Clear")
///   wind.speed                 — mph
///   rain["1h"]                 — inches over the last hour; absent when dry

use serde::Deserialize;
use std::collections::HashMap;

use super::{SourceError, WeatherSource, read_body};
use crate::model::{Coordinates, WeatherConditions};

#[derive(Deserialize)]
struct WeatherResponse {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    wind: Option<WindBlock>,
    #[serde(default)]
    rain: Option<HashMap<String, f64>>,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct ConditionBlock {
    main: String,
}

#[derive(Deserialize)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
}

pub fn build_weather_url(base_url: &str, coordinates: Coordinates, api_key: &str) -> String {
    format!(
        "{}?lat={}&lon={}&appid={}&units=imperial",
        base_url,
        coordinates.lat,
        coordinates.lng,
        urlencoding::encode(api_key)
    )
}

/// # Errors
/// `SourceError::Parse` when `main.temp` / `main.humidity` are missing or
/// the body is not JSON.
pub fn parse_weather_response(json: &str) -> Result<WeatherConditions, SourceError> {
    let response: WeatherResponse =
        serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;

    let conditions = response
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .unwrap_or_else(|| "Unknown".to_string());

    let precipitation = response
        .rain
        .and_then(|rain| rain.get("1h").copied())
        .unwrap_or(0.0);

    Ok(WeatherConditions {
        temperature: response.main.temp,
        humidity: response.main.humidity,
        wind_speed: response.wind.map_or(0.0, |w| w.speed),
        conditions,
        precipitation,
    })
}

pub struct OpenWeatherSource {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherSource {
    pub fn new(client: reqwest::blocking::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        OpenWeatherSource {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl WeatherSource for OpenWeatherSource {
    fn current(&self, coordinates: Coordinates) -> Result<WeatherConditions, SourceError> {
        let url = build_weather_url(&self.base_url, coordinates, &self.api_key);
        let response = self.client.get(&url).send()?;
        parse_weather_response(&read_body(response)?)
    }
}
