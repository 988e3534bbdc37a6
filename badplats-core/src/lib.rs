//! Core library for the bathing place detail screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The place context extracted from navigation parameters
//! - Weather acquisition from a Dark Sky compatible provider
//! - The favorites store
//! - The screen view model and the UI capabilities it is given
//!
//! It is used by `badplats`, but can also back other front ends.

pub mod config;
pub mod favorites;
pub mod model;
pub mod place;
pub mod provider;
pub mod screen;
pub mod ui;
pub mod weather;

pub use config::{Config, ProviderConfig};
pub use favorites::{FavoritesStore, JsonFileStore};
pub use model::{CurrentConditions, HourlyEntry, NavParams, WeatherReport};
pub use place::PlaceContext;
pub use provider::{RawForecast, WeatherProvider, provider_from_config, provider_or_unavailable};
pub use screen::{PlaceScreen, ScreenServices};
pub use weather::{WeatherAcquirer, WeatherFetchError};
