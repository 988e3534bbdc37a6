//! Static description of a bathing place, extracted once from the
//! navigation parameters.

use crate::model::NavParams;

pub const KEY_EU_BATH: &str = "C3";
pub const KEY_YEAR: &str = "C4";
pub const KEY_CLASSIFICATION: &str = "C5";
pub const KEY_NAME: &str = "C6";
pub const KEY_COMMUNE: &str = "C7";
pub const KEY_LATITUDE: &str = "C8";
pub const KEY_COUNTY: &str = "C9";
pub const KEY_LONGITUDE: &str = "C10";

pub const COUNTY_SUFFIX: &str = " län";

/// Weather data attribution page.
pub const ATTRIBUTION_URL: &str = "https://darksky.net/poweredby/";

const MAP_URL_BASE: &str = "https://www.google.se/maps/place/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceContext {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub county: String,
    pub commune: String,
    pub classification: String,
    pub eu_bath: &'static str,
    pub year: String,
}

impl PlaceContext {
    /// Missing parameters become empty strings; nothing is validated.
    pub fn from_params(params: &NavParams) -> Self {
        let field = |key: &str| params.get(key).unwrap_or_default().to_string();

        Self {
            name: field(KEY_NAME),
            latitude: field(KEY_LATITUDE),
            longitude: field(KEY_LONGITUDE),
            county: format!("{}{COUNTY_SUFFIX}", params.get(KEY_COUNTY).unwrap_or_default()),
            commune: field(KEY_COMMUNE),
            classification: field(KEY_CLASSIFICATION),
            eu_bath: eu_bath_status(params.get(KEY_EU_BATH)),
            year: field(KEY_YEAR),
        }
    }

    /// Map search for the place's coordinates.
    pub fn map_url(&self) -> String {
        format!("{MAP_URL_BASE}{}+{}", self.latitude, self.longitude)
    }
}

/// "J" in the register means the place is an EU bathing site.
pub fn eu_bath_status(flag: Option<&str>) -> &'static str {
    match flag {
        Some("J") => "Ja",
        _ => "Nej",
    }
}
