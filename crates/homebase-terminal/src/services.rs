//! Collaborators the built-in commands call into.
//!
//! The terminal never navigates, notifies, renders or fetches weather by
//! itself. Front ends supply implementations of these traits; the
//! `offline()` bundle is enough for tests and headless sessions.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use homebase_store::{KvStore, WEATHER_KEY};
use homebase_types::error::{HomebaseError, Result};
use serde_json::Value;

/// Opens URLs.
pub trait Navigator {
    fn navigate(&self, url: &str) -> Result<()>;
}

/// Shows transient notifications.
pub trait Notifier {
    fn notify(&self, message: &str, duration: Duration, error: bool) -> Result<()>;
}

/// Turns a named template plus data into display text.
pub trait Renderer {
    fn render(&self, template: &str, data: &Value) -> Result<String>;
}

/// Source of weather data.
///
/// `current`/`forecast` return cached snapshots and never block.
/// `refresh` performs the network fetch and is only ever called from a
/// background thread.
pub trait WeatherService: Send + Sync {
    fn current(&self) -> Option<Value>;
    fn forecast(&self) -> Option<Value>;
    fn refresh(&self) -> Result<()>;
}

/// The collaborators available to commands.
pub struct Services {
    pub navigator: Box<dyn Navigator>,
    pub notifier: Box<dyn Notifier>,
    pub renderer: Box<dyn Renderer>,
    pub weather: Arc<dyn WeatherService>,
}

impl Services {
    /// Log-only navigation and notifications, plain rendering, and an empty
    /// weather cache.
    pub fn offline() -> Self {
        Self {
            navigator: Box::new(LogNavigator),
            notifier: Box::new(LogNotifier),
            renderer: Box::new(PlainRenderer),
            weather: Arc::new(CachedWeather::default()),
        }
    }
}

/// Navigator that only logs the target.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        log::info!("navigate: {url}");
        Ok(())
    }
}

/// Notifier that only logs the message.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, duration: Duration, error: bool) -> Result<()> {
        if error {
            log::warn!("notification ({}ms): {message}", duration.as_millis());
        } else {
            log::info!("notification ({}ms): {message}", duration.as_millis());
        }
        Ok(())
    }
}

/// Renders objects as indented `key: value` lines under the template name.
#[derive(Debug, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String> {
        let mut out = format!("[{template}]");
        render_value(&mut out, data, 1);
        Ok(out)
    }
}

fn render_value(out: &mut String, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match v {
                    Value::Object(_) | Value::Array(_) => {
                        let _ = write!(out, "\n{indent}{key}:");
                        render_value(out, v, depth + 1);
                    },
                    _ => {
                        let _ = write!(out, "\n{indent}{key}: {}", scalar(v));
                    },
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        let _ = write!(out, "\n{indent}-");
                        render_value(out, item, depth + 1);
                    },
                    _ => {
                        let _ = write!(out, "\n{indent}- {}", scalar(item));
                    },
                }
            }
        },
        _ => {
            let _ = write!(out, "\n{indent}{}", scalar(value));
        },
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Weather data held in memory, seeded from the store's `weather` key.
///
/// There is no network provider behind it, so `refresh` always fails.
#[derive(Debug, Default)]
pub struct CachedWeather {
    current: Mutex<Option<Value>>,
    forecast: Mutex<Option<Value>>,
}

impl CachedWeather {
    pub fn new(current: Option<Value>, forecast: Option<Value>) -> Self {
        Self {
            current: Mutex::new(current),
            forecast: Mutex::new(forecast),
        }
    }

    /// Seed from `{"current": ..., "forecast": ...}` under the weather key.
    pub fn from_store(store: &dyn KvStore) -> Self {
        match store.get(WEATHER_KEY) {
            Ok(Some(Value::Object(map))) => {
                Self::new(map.get("current").cloned(), map.get("forecast").cloned())
            },
            Ok(_) => Self::default(),
            Err(e) => {
                log::warn!("weather cache unavailable: {e}");
                Self::default()
            },
        }
    }
}

impl WeatherService for CachedWeather {
    fn current(&self) -> Option<Value> {
        self.current.lock().ok()?.clone()
    }

    fn forecast(&self) -> Option<Value> {
        self.forecast.lock().ok()?.clone()
    }

    fn refresh(&self) -> Result<()> {
        Err(HomebaseError::Command(
            "no weather provider configured".to_string(),
        ))
    }
}
