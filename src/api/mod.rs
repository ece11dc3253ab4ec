pub mod weatherstack;

pub use weatherstack::WeatherApi;
