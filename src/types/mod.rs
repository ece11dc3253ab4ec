pub mod record;
pub mod weather;

pub use record::{FieldValue, FlatRecord};
pub use weather::WeatherResponse;
