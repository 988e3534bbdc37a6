//! View model for the place detail screen.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    favorites::FavoritesStore,
    model::{CurrentConditions, HourlyEntry, NavParams},
    place::{ATTRIBUTION_URL, PlaceContext},
    ui::{LinkOpener, LoadingIndicator, Notifier, Toast},
    weather::WeatherAcquirer,
};

pub const LOADING_TEXT: &str = "Hämtar väder...";
pub const FAVORITE_SAVED_MESSAGE: &str = "Badplats har lagts till mina favoriter!";
pub const FAVORITE_FAILED_MESSAGE: &str =
    "Ett fel uppstod när badplats skulle sparas. Var god försök igen.";

/// Collaborators injected into the screen.
#[derive(Debug, Clone)]
pub struct ScreenServices {
    pub weather: Arc<WeatherAcquirer>,
    pub favorites: Arc<dyn FavoritesStore>,
    pub notifier: Arc<dyn Notifier>,
    pub loading: Arc<dyn LoadingIndicator>,
    pub links: Arc<dyn LinkOpener>,
}

#[derive(Debug)]
pub struct PlaceScreen {
    params: NavParams,
    context: PlaceContext,
    favorite_saved: bool,
    current: Option<CurrentConditions>,
    hourly: Vec<HourlyEntry>,
    services: ScreenServices,
}

impl PlaceScreen {
    /// Builds the place context and looks up whether the place is already a
    /// favorite.
    pub async fn open(params: NavParams, services: ScreenServices) -> Self {
        let context = PlaceContext::from_params(&params);

        let favorite_saved = match services.favorites.get(&context.name).await {
            Ok(value) => value.is_some(),
            Err(err) => {
                warn!(place = %context.name, "favorite lookup failed: {err:#}");
                false
            }
        };
        debug!(place = %context.name, favorite_saved, "place screen opened");

        Self {
            params,
            context,
            favorite_saved,
            current: None,
            hourly: Vec::new(),
            services,
        }
    }

    /// Fetches weather behind the loading overlay. On failure the previous
    /// weather state is left as it was and an error toast is shown.
    pub async fn init(&mut self) {
        let loader = self.services.loading.show(LOADING_TEXT);
        let result = self
            .services
            .weather
            .fetch(&self.context.latitude, &self.context.longitude)
            .await;
        loader.dismiss();

        match result {
            Ok(report) => {
                self.current = Some(report.current);
                self.hourly = report.hourly;
            }
            Err(err) => self.services.notifier.notify(Toast::error(err.to_string())),
        }
    }

    pub async fn save_favorite(&mut self) {
        match self.store_favorite().await {
            Ok(()) => {
                self.favorite_saved = true;
                info!(place = %self.context.name, "favorite saved");
                self.services.notifier.notify(Toast::success(FAVORITE_SAVED_MESSAGE));
            }
            Err(err) => {
                warn!(place = %self.context.name, "saving favorite failed: {err:#}");
                self.services.notifier.notify(Toast::error(FAVORITE_FAILED_MESSAGE));
            }
        }
    }

    async fn store_favorite(&self) -> Result<()> {
        let snapshot =
            serde_json::to_string(&self.params).context("Failed to serialize place parameters")?;
        self.services.favorites.set(&self.context.name, snapshot).await
    }

    pub fn find_place(&self) {
        self.open_link(&self.context.map_url());
    }

    pub fn visit_attribution(&self) {
        self.open_link(ATTRIBUTION_URL);
    }

    fn open_link(&self, url: &str) {
        if let Err(err) = self.services.links.open(url) {
            warn!(url, "opening link failed: {err:#}");
        }
    }

    pub fn context(&self) -> &PlaceContext {
        &self.context
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite_saved
    }

    pub fn current(&self) -> Option<&CurrentConditions> {
        self.current.as_ref()
    }

    pub fn hourly(&self) -> &[HourlyEntry] {
        &self.hourly
    }
}
