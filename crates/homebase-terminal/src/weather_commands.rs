//! `weather`: render cached weather, or refresh it in the background.

use std::sync::Arc;

use homebase_types::error::Result;
use serde_json::Value;

use crate::deferred::DeferredOutput;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Options};
use crate::services::WeatherService;

const CURRENT_TEMPLATE: &str = "weather-current";
const FORECAST_TEMPLATE: &str = "weather-forecast";

/// Register the weather command.
pub fn register_weather_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(WeatherCmd));
}

fn snapshot(weather: &dyn WeatherService, forecast: bool) -> (&'static str, Option<Value>) {
    if forecast {
        (FORECAST_TEMPLATE, weather.forecast())
    } else {
        (CURRENT_TEMPLATE, weather.current())
    }
}

struct WeatherCmd;
impl Command for WeatherCmd {
    fn name(&self) -> &str {
        "weather"
    }
    fn help(&self) -> &str {
        "show the weather\nusage: weather [-f] [-r]\n  -f: forecast\n  -r: refresh first"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, _: &str, options: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let forecast = options.contains('f');

        if options.contains('r') {
            let weather = Arc::clone(&env.services.weather);
            env.deferred.spawn(move || {
                if let Err(e) = weather.refresh() {
                    log::warn!("weather refresh failed: {e}");
                    return DeferredOutput::Text(format!("Weather refresh failed: {e}"));
                }
                match snapshot(weather.as_ref(), forecast) {
                    (template, Some(data)) => DeferredOutput::Render {
                        template: template.to_string(),
                        data,
                    },
                    (_, None) => DeferredOutput::Text("No weather data available.".to_string()),
                }
            });
            return Ok(CommandOutput::None);
        }

        match snapshot(env.services.weather.as_ref(), forecast) {
            (template, Some(data)) => Ok(CommandOutput::Text(
                env.services.renderer.render(template, &data)?,
            )),
            (_, None) => Ok(CommandOutput::Text(
                "No weather data cached. Use 'weather -r' to fetch it.".to_string(),
            )),
        }
    }
}
