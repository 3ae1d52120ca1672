use crate::config::AppConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    config: Option<String>,
    headless: Option<f32>,
    speed: Option<f32>,
    loop_track: Option<bool>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Use --config/--headless/--speed/--loop with values.");
            }
            let key = &flag[2..];
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config = Some(value),
                "headless" => {
                    let seconds = value
                        .parse::<f32>()
                        .with_context(|| format!("Invalid headless duration '{value}'"))?;
                    if seconds <= 0.0 {
                        bail!("Headless duration must be positive, got '{value}'");
                    }
                    overrides.headless = Some(seconds);
                }
                "speed" => {
                    overrides.speed =
                        Some(value.parse::<f32>().with_context(|| format!("Invalid speed '{value}'"))?);
                }
                "loop" => {
                    overrides.loop_track = Some(parse_bool_flag("loop", &value)?);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --config, --headless, --speed, --loop."),
            }
        }
        Ok(overrides)
    }

    pub fn config_path(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn headless_seconds(&self) -> Option<f32> {
        self.headless
    }

    pub fn into_config_overrides(self) -> AppConfigOverrides {
        AppConfigOverrides { run_speed: self.speed, loop_track: self.loop_track }
    }
}

fn parse_bool_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => bail!("Invalid value '{value}' for --{name}. Use true/false."),
    }
}
