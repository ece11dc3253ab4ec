//! Typed views over the weatherstack current-conditions response.
//!
//! Built from the raw JSON with explicit presence checks, so a missing or
//! unusable field surfaces as one `MissingKey` carrying the offending
//! dotted path instead of a bare deserialization failure.

use crate::error::SinkError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResponse {
    pub request: RequestInfo,
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestInfo {
    pub kind: String,
    pub query: String,
    pub language: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone_id: String,
    pub localtime: String,
    pub localtime_epoch: i64,
    pub utc_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Current {
    pub observation_time: String,
    pub temperature: f64,
    pub weather_code: i64,
    /// First element of `weather_icons`; None when the list is empty.
    pub weather_icon: Option<String>,
    /// First element of `weather_descriptions`; None when the list is empty.
    pub weather_description: Option<String>,
    pub wind_speed: f64,
    pub wind_degree: i64,
    pub wind_dir: String,
    pub pressure: f64,
    pub precip: f64,
    pub humidity: f64,
    pub cloudcover: f64,
    pub feelslike: f64,
    pub uv_index: f64,
    pub visibility: f64,
    pub is_day: String,
    pub astro: Astro,
    pub air_quality: AirQuality,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQuality {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    /// The API reports the EPA/DEFRA indexes as strings; they pass through
    /// uncoerced.
    pub us_epa_index: String,
    pub gb_defra_index: String,
}

impl WeatherResponse {
    /// Parse the nested payload into the typed shape. All-or-nothing: any
    /// absent field fails with the full dotted path.
    pub fn from_payload(payload: &Value) -> Result<Self, SinkError> {
        Ok(Self {
            request: RequestInfo::from_payload(child(payload, "", "request")?)?,
            location: Location::from_payload(child(payload, "", "location")?)?,
            current: Current::from_payload(child(payload, "", "current")?)?,
        })
    }
}

impl RequestInfo {
    fn from_payload(value: &Value) -> Result<Self, SinkError> {
        const P: &str = "request";
        Ok(Self {
            kind: str_field(value, P, "type")?,
            query: str_field(value, P, "query")?,
            language: str_field(value, P, "language")?,
            unit: str_field(value, P, "unit")?,
        })
    }
}

impl Location {
    fn from_payload(value: &Value) -> Result<Self, SinkError> {
        const P: &str = "location";
        Ok(Self {
            name: str_field(value, P, "name")?,
            country: str_field(value, P, "country")?,
            region: str_field(value, P, "region")?,
            lat: f64_field(value, P, "lat")?,
            lon: f64_field(value, P, "lon")?,
            timezone_id: str_field(value, P, "timezone_id")?,
            localtime: str_field(value, P, "localtime")?,
            localtime_epoch: i64_field(value, P, "localtime_epoch")?,
            utc_offset: f64_field(value, P, "utc_offset")?,
        })
    }
}

impl Current {
    fn from_payload(value: &Value) -> Result<Self, SinkError> {
        const P: &str = "current";
        Ok(Self {
            observation_time: str_field(value, P, "observation_time")?,
            temperature: f64_field(value, P, "temperature")?,
            weather_code: i64_field(value, P, "weather_code")?,
            weather_icon: first_in_list(value, P, "weather_icons")?,
            weather_description: first_in_list(value, P, "weather_descriptions")?,
            wind_speed: f64_field(value, P, "wind_speed")?,
            wind_degree: i64_field(value, P, "wind_degree")?,
            wind_dir: str_field(value, P, "wind_dir")?,
            pressure: f64_field(value, P, "pressure")?,
            precip: f64_field(value, P, "precip")?,
            humidity: f64_field(value, P, "humidity")?,
            cloudcover: f64_field(value, P, "cloudcover")?,
            feelslike: f64_field(value, P, "feelslike")?,
            uv_index: f64_field(value, P, "uv_index")?,
            visibility: f64_field(value, P, "visibility")?,
            is_day: str_field(value, P, "is_day")?,
            astro: Astro::from_payload(child(value, P, "astro")?)?,
            air_quality: AirQuality::from_payload(child(value, P, "air_quality")?)?,
        })
    }
}

impl Astro {
    fn from_payload(value: &Value) -> Result<Self, SinkError> {
        const P: &str = "current.astro";
        Ok(Self {
            sunrise: str_field(value, P, "sunrise")?,
            sunset: str_field(value, P, "sunset")?,
            moonrise: str_field(value, P, "moonrise")?,
            moonset: str_field(value, P, "moonset")?,
            moon_phase: str_field(value, P, "moon_phase")?,
            moon_illumination: i64_field(value, P, "moon_illumination")?,
        })
    }
}

impl AirQuality {
    fn from_payload(value: &Value) -> Result<Self, SinkError> {
        const P: &str = "current.air_quality";
        Ok(Self {
            co: f64_field(value, P, "co")?,
            no2: f64_field(value, P, "no2")?,
            o3: f64_field(value, P, "o3")?,
            so2: f64_field(value, P, "so2")?,
            pm2_5: f64_field(value, P, "pm2_5")?,
            pm10: f64_field(value, P, "pm10")?,
            us_epa_index: str_field(value, P, "us-epa-index")?,
            gb_defra_index: str_field(value, P, "gb-defra-index")?,
        })
    }
}

fn dotted(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Present, non-null child or `MissingKey` with the full path.
fn child<'a>(value: &'a Value, parent: &str, key: &str) -> Result<&'a Value, SinkError> {
    match value.get(key) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(SinkError::missing(dotted(parent, key))),
    }
}

fn str_field(value: &Value, parent: &str, key: &str) -> Result<String, SinkError> {
    match child(value, parent, key)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(SinkError::missing(dotted(parent, key))),
    }
}

/// Numbers, or numeric-looking strings coerced to floating point.
fn f64_field(value: &Value, parent: &str, key: &str) -> Result<f64, SinkError> {
    let missing = || SinkError::missing(dotted(parent, key));
    match child(value, parent, key)? {
        Value::Number(n) => n.as_f64().ok_or_else(missing),
        Value::String(s) => s.trim().parse().map_err(|_| missing()),
        _ => Err(missing()),
    }
}

fn i64_field(value: &Value, parent: &str, key: &str) -> Result<i64, SinkError> {
    let missing = || SinkError::missing(dotted(parent, key));
    match child(value, parent, key)? {
        Value::Number(n) => n.as_i64().ok_or_else(missing),
        Value::String(s) => s.trim().parse().map_err(|_| missing()),
        _ => Err(missing()),
    }
}

/// First element of a list field; an empty list yields None, an absent or
/// non-list field is an error.
fn first_in_list(value: &Value, parent: &str, key: &str) -> Result<Option<String>, SinkError> {
    match value.get(key) {
        Some(Value::Array(items)) => Ok(items.first().map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
        _ => Err(SinkError::missing(dotted(parent, key))),
    }
}
