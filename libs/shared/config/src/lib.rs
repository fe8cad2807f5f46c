use std::env;
use tracing::warn;

/// Scheduling knobs shared by the availability resolver and the booking
/// commit path.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Step between candidate start-times, in minutes.
    pub slot_granularity_minutes: i64,
    /// How far ahead of today a booking may be placed.
    pub max_advance_days: i64,
    /// Minimum lead time before a candidate start is offered.
    pub min_lead_minutes: i64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: 15,
            max_advance_days: 60,
            min_lead_minutes: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub scheduling: SchedulingConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = SchedulingConfig::default();
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            scheduling: SchedulingConfig {
                slot_granularity_minutes: env_i64(
                    "SLOT_GRANULARITY_MINUTES",
                    defaults.slot_granularity_minutes,
                ),
                max_advance_days: env_i64("MAX_ADVANCE_DAYS", defaults.max_advance_days),
                min_lead_minutes: env_i64("MIN_LEAD_MINUTES", defaults.min_lead_minutes),
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a number, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}
