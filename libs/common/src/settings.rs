//! HTTP server and club settings
//!
//! Each service layers its own defaults under environment overrides using
//! a per-service prefix, e.g. `AUTH_PORT=4000` or `API_CORS_ORIGIN=https://fitnessplus.ru`.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

/// Settings for a service's HTTP listener
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,
}

impl ServerSettings {
    /// Load settings from defaults overlaid with `<PREFIX>_*` environment variables
    pub fn load(prefix: &str, default_port: u16) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .set_default("cors_origin", "*")?
            .add_source(config::Environment::with_prefix(prefix))
            .build()
            .context("unable to build server settings")?
            .try_deserialize::<ServerSettings>()
            .context("invalid server settings")?;

        debug!(prefix, ?settings, "server settings loaded");
        Ok(settings)
    }

    /// The `host:port` pair to hand to the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Moscow time, where the club operates
const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

#[derive(Debug, Deserialize)]
struct ClubSettingsSource {
    utc_offset_hours: i32,
}

/// Settings of the club itself, overridable with `CLUB_*` variables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClubSettings {
    offset: FixedOffset,
}

impl ClubSettings {
    /// Load settings, e.g. `CLUB_UTC_OFFSET_HOURS=5` for Yekaterinburg
    pub fn load() -> Result<Self> {
        Self::load_with_prefix("CLUB")
    }

    fn load_with_prefix(prefix: &str) -> Result<Self> {
        let source = config::Config::builder()
            .set_default("utc_offset_hours", i64::from(DEFAULT_UTC_OFFSET_HOURS))?
            .add_source(config::Environment::with_prefix(prefix))
            .build()
            .context("unable to build club settings")?
            .try_deserialize::<ClubSettingsSource>()
            .context("invalid club settings")?;

        let settings = Self::with_utc_offset_hours(source.utc_offset_hours)?;
        debug!(prefix, ?settings, "club settings loaded");
        Ok(settings)
    }

    /// Settings for a club `hours` east of UTC
    pub fn with_utc_offset_hours(hours: i32) -> Result<Self> {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("UTC offset out of range: {} hours", hours))?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The club's calendar date at `now`
    pub fn date_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// The club's calendar date right now
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = ServerSettings::load("FITNESS_TEST_DEFAULTS", 3001).unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.cors_origin, "*");
        assert_eq!(settings.bind_address(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            std::env::set_var("FITNESS_TEST_ENV_PORT", "4100");
            std::env::set_var("FITNESS_TEST_ENV_HOST", "127.0.0.1");
            std::env::set_var("FITNESS_TEST_ENV_CORS_ORIGIN", "https://fitnessplus.ru");
        }

        let settings = ServerSettings::load("FITNESS_TEST_ENV", 3000).unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:4100");
        assert_eq!(settings.cors_origin, "https://fitnessplus.ru");

        unsafe {
            std::env::remove_var("FITNESS_TEST_ENV_PORT");
            std::env::remove_var("FITNESS_TEST_ENV_HOST");
            std::env::remove_var("FITNESS_TEST_ENV_CORS_ORIGIN");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        unsafe {
            std::env::set_var("FITNESS_TEST_BAD_PORT", "not-a-port");
        }

        assert!(ServerSettings::load("FITNESS_TEST_BAD", 3000).is_err());

        unsafe {
            std::env::remove_var("FITNESS_TEST_BAD_PORT");
        }
    }

    #[test]
    #[serial]
    fn test_club_defaults_to_moscow_time() {
        let club = ClubSettings::load_with_prefix("FITNESS_TEST_CLUB_DEFAULTS").unwrap();
        assert_eq!(club.offset().local_minus_utc(), 3 * 3600);

        // 01:30 in Moscow is still the previous day in UTC
        let now = "2024-05-09T22:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(club.date_at(now), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(now.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
    }

    #[test]
    #[serial]
    fn test_club_offset_override() {
        unsafe {
            std::env::set_var("FITNESS_TEST_CLUB_UTC_OFFSET_HOURS", "-2");
        }

        let club = ClubSettings::load_with_prefix("FITNESS_TEST_CLUB").unwrap();

        unsafe {
            std::env::remove_var("FITNESS_TEST_CLUB_UTC_OFFSET_HOURS");
        }

        let now = "2024-05-10T01:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(club.date_at(now), NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
    }

    #[test]
    fn test_club_offset_out_of_range() {
        assert!(ClubSettings::with_utc_offset_hours(24).is_err());
        assert!(ClubSettings::with_utc_offset_hours(i32::MAX).is_err());
        assert!(ClubSettings::with_utc_offset_hours(-12).is_ok());
    }
}
