use memora_utils::create_random_secret;
use tracing::{info, warn};

/// Ticks shorter than this cannot keep up with alert dispatch and are
/// clamped.
pub const MIN_TICK_INTERVAL_MS: i64 = 3000;

const DEFAULT_TICK_INTERVAL_MS: i64 = 3000;
const DEFAULT_STALE_THRESHOLD_MS: i64 = 1000 * 60 * 60;

/// Signing key pair for webhook callbacks. Two keys, so the delayed queue
/// can rotate to the next key without dropping in-flight callbacks.
#[derive(Debug, Clone)]
pub struct SigningKeys {
    pub current: String,
    pub next: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the polling loop evaluates active reminders, in millis
    pub tick_interval_ms: i64,
    /// How far past its event time an unacknowledged one-time reminder may
    /// fall before the engine considers it unserviceable, in millis
    pub stale_threshold_ms: i64,
    /// Self-driven polling loop vs externally-triggered event mode
    pub use_polling: bool,
    /// Base url the delayed queue posts its webhook callbacks back to
    pub webhook_base_url: Option<String>,
    pub signing_keys: SigningKeys,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub queue_url: Option<String>,
    pub queue_api_key: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let tick_interval_ms = floor_tick_interval(parse_millis_env(
            "TICK_INTERVAL_MS",
            DEFAULT_TICK_INTERVAL_MS,
        ));
        let stale_threshold_ms =
            parse_millis_env("STALE_THRESHOLD_MS", DEFAULT_STALE_THRESHOLD_MS);

        let use_polling = match std::env::var("USE_POLLING") {
            Ok(val) => parse_bool(&val),
            Err(_) => true,
        };

        let signing_keys = SigningKeys {
            current: secret_from_env("WEBHOOK_SIGNING_KEY"),
            next: secret_from_env("WEBHOOK_SIGNING_KEY_NEXT"),
        };

        Self {
            port,
            tick_interval_ms,
            stale_threshold_ms,
            use_polling,
            webhook_base_url: std::env::var("WEBHOOK_BASE_URL").ok(),
            signing_keys,
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_api_key: std::env::var("MAIL_API_KEY").ok(),
            queue_url: std::env::var("QUEUE_URL").ok(),
            queue_api_key: std::env::var("QUEUE_API_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn floor_tick_interval(tick_interval_ms: i64) -> i64 {
    if tick_interval_ms < MIN_TICK_INTERVAL_MS {
        warn!(
            "TICK_INTERVAL_MS: {} is below the {} ms floor, clamping.",
            tick_interval_ms, MIN_TICK_INTERVAL_MS
        );
        MIN_TICK_INTERVAL_MS
    } else {
        tick_interval_ms
    }
}

fn parse_millis_env(var: &str, default: i64) -> i64 {
    match std::env::var(var) {
        Ok(val) => match val.parse::<i64>() {
            Ok(ms) if ms > 0 => ms,
            _ => {
                warn!(
                    "The given {}: {} is not a valid duration in millis, falling back to the default: {} ms.",
                    var, val, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn secret_from_env(var: &str) -> String {
    match std::env::var(var) {
        Ok(key) => key,
        Err(_) => {
            info!(
                "Did not find {} environment variable. Going to create one.",
                var
            );
            create_random_secret(16)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tick_interval_has_a_floor() {
        assert_eq!(floor_tick_interval(1), MIN_TICK_INTERVAL_MS);
        assert_eq!(floor_tick_interval(2999), MIN_TICK_INTERVAL_MS);
        assert_eq!(floor_tick_interval(3000), 3000);
        assert_eq!(floor_tick_interval(10_000), 10_000);
    }

    #[test]
    fn parses_boolean_flags() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool(" yes "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }
}
