use anyhow::{Context, Result, anyhow};
use badplats_core::{
    Config, FavoritesStore, JsonFileStore, NavParams, PlaceScreen, ScreenServices,
    WeatherAcquirer, provider_or_unavailable,
};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};

use crate::console::{ConsoleLoader, ConsoleNotifier, SystemBrowser};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "badplats", version, about = "Bathing place details with weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather provider API key.
    Configure {
        /// Skip the prompt and use this key.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show a bathing place with current and hourly weather.
    Show {
        /// Place parameter as KEY=VALUE, e.g. C6=Ängsbadet. Repeatable.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// JSON object with place parameters; `--param` entries override it.
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Save the place as a favorite.
        #[arg(long)]
        save: bool,

        /// Open the place on a map.
        #[arg(long)]
        open_map: bool,

        /// Open the weather data attribution page.
        #[arg(long)]
        open_attribution: bool,
    },

    /// List saved favorites.
    Favorites,
}

fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{s}'"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn load_params(file: Option<&PathBuf>, overrides: Vec<(String, String)>) -> Result<NavParams> {
    let mut params = match file {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse params file: {}", path.display()))?
        }
        None => NavParams::new(),
    };

    for (key, value) in overrides {
        params.insert(key, value);
    }

    Ok(params)
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { params, params_file, save, open_map, open_attribution } => {
                let params = load_params(params_file.as_ref(), params)?;
                if params.is_empty() {
                    return Err(anyhow!(
                        "No place parameters given.\n\
                         Hint: pass --param C6=<name> --param C8=<lat> --param C10=<lon> or --params-file."
                    ));
                }
                show(params, save, open_map, open_attribution).await
            }
            Command::Favorites => {
                let config = Config::load()?;
                let store = JsonFileStore::from_config(&config)?;
                for name in store.keys().await? {
                    println!("{name}");
                }
                Ok(())
            }
        }
    }
}

fn configure(api_key: Option<String>) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("Weather provider API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let mut config = Config::load()?;
    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(params: NavParams, save: bool, open_map: bool, open_attribution: bool) -> Result<()> {
    let config = Config::load()?;
    let services = ScreenServices {
        weather: Arc::new(WeatherAcquirer::new(provider_or_unavailable(&config))),
        favorites: Arc::new(JsonFileStore::from_config(&config)?),
        notifier: Arc::new(ConsoleNotifier),
        loading: Arc::new(ConsoleLoader),
        links: Arc::new(SystemBrowser),
    };

    let mut screen = PlaceScreen::open(params, services).await;
    screen.init().await;

    print_screen(&screen);

    if save && !screen.is_favorite() {
        screen.save_favorite().await;
    }
    if open_map {
        screen.find_place();
    }
    if open_attribution {
        screen.visit_attribution();
    }

    Ok(())
}

fn print_screen(screen: &PlaceScreen) {
    let ctx = screen.context();
    let star = if screen.is_favorite() { " ★" } else { "" };

    println!("{}{star}", ctx.name);
    println!("  Kommun:          {}", ctx.commune);
    println!("  Län:             {}", ctx.county);
    println!("  Position:        {}, {}", ctx.latitude, ctx.longitude);
    println!("  Klassificering:  {}", ctx.classification);
    println!("  EU-bad:          {}", ctx.eu_bath);
    println!("  År:              {}", ctx.year);

    if let Some(current) = screen.current() {
        println!();
        println!("  {}  {} ({})", current.temperature, current.summary, current.icon);
    }

    if !screen.hourly().is_empty() {
        println!();
        for entry in screen.hourly() {
            println!("  {:02}  {:>4}°  {}", entry.hour, entry.temperature, entry.icon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("C6=Sjö=bad").expect("parse"),
            ("C6".to_string(), "Sjö=bad".to_string())
        );
        assert!(parse_key_val("C6").is_err());
    }

    #[test]
    fn param_overrides_win_over_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("place.json");
        std::fs::write(&path, r#"{"C6":"Ängsbadet","C3":"N"}"#).expect("write");

        let params = load_params(Some(&path), vec![("C3".into(), "J".into())]).expect("load");

        assert_eq!(params.get("C6"), Some("Ängsbadet"));
        assert_eq!(params.get("C3"), Some("J"));
    }

    #[test]
    fn cli_parses_show_flags() {
        let cli = Cli::try_parse_from([
            "badplats", "show", "--param", "C6=Ängsbadet", "--param", "C8=55.7", "--save",
        ])
        .expect("parse");

        match cli.command {
            Command::Show { params, save, open_map, .. } => {
                assert_eq!(params.len(), 2);
                assert!(save);
                assert!(!open_map);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
