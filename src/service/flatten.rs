//! Flattening stage: nested API payload -> the flat field set the record
//! writer stores.

use crate::error::SinkError;
use crate::types::record::FlatRecord;
use crate::types::weather::WeatherResponse;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Flatten one response into the fixed `<group>_<field>` column set,
/// stamping capture time and the data-source tag. All-or-nothing: any
/// missing nested field fails the whole stage, no partial record.
pub fn flatten(
    payload: &Value,
    captured_at: DateTime<Utc>,
    data_source: &str,
) -> Result<FlatRecord, SinkError> {
    let resp = WeatherResponse::from_payload(payload)?;
    let mut record = FlatRecord::new();

    record.insert("request_type", resp.request.kind);
    record.insert("request_query", resp.request.query);
    record.insert("request_language", resp.request.language);
    record.insert("request_unit", resp.request.unit);

    record.insert("location_name", resp.location.name);
    record.insert("location_country", resp.location.country);
    record.insert("location_region", resp.location.region);
    record.insert("location_lat", resp.location.lat);
    record.insert("location_lon", resp.location.lon);
    record.insert("location_timezone_id", resp.location.timezone_id);
    record.insert("location_localtime", resp.location.localtime);
    record.insert("location_localtime_epoch", resp.location.localtime_epoch);
    record.insert("location_utc_offset", resp.location.utc_offset);

    record.insert("current_observation_time", resp.current.observation_time);
    record.insert("current_temperature", resp.current.temperature);
    record.insert("current_weather_code", resp.current.weather_code);
    record.insert("current_weather_icons", resp.current.weather_icon);
    record.insert(
        "current_weather_descriptions",
        resp.current.weather_description,
    );
    record.insert("current_wind_speed", resp.current.wind_speed);
    record.insert("current_wind_degree", resp.current.wind_degree);
    record.insert("current_wind_dir", resp.current.wind_dir);
    record.insert("current_pressure", resp.current.pressure);
    record.insert("current_precip", resp.current.precip);
    record.insert("current_humidity", resp.current.humidity);
    record.insert("current_cloudcover", resp.current.cloudcover);
    record.insert("current_feelslike", resp.current.feelslike);
    record.insert("current_uv_index", resp.current.uv_index);
    record.insert("current_visibility", resp.current.visibility);
    record.insert("current_is_day", resp.current.is_day);

    record.insert("astro_sunrise", resp.current.astro.sunrise);
    record.insert("astro_sunset", resp.current.astro.sunset);
    record.insert("astro_moonrise", resp.current.astro.moonrise);
    record.insert("astro_moonset", resp.current.astro.moonset);
    record.insert("astro_moon_phase", resp.current.astro.moon_phase);
    record.insert(
        "astro_moon_illumination",
        resp.current.astro.moon_illumination,
    );

    record.insert("air_quality_co", resp.current.air_quality.co);
    record.insert("air_quality_no2", resp.current.air_quality.no2);
    record.insert("air_quality_o3", resp.current.air_quality.o3);
    record.insert("air_quality_so2", resp.current.air_quality.so2);
    record.insert("air_quality_pm2_5", resp.current.air_quality.pm2_5);
    record.insert("air_quality_pm10", resp.current.air_quality.pm10);
    record.insert(
        "air_quality_us_epa_index",
        resp.current.air_quality.us_epa_index,
    );
    record.insert(
        "air_quality_gb_defra_index",
        resp.current.air_quality.gb_defra_index,
    );

    record.insert("inserted_at", captured_at);
    record.insert("data_source", data_source);

    Ok(record)
}
