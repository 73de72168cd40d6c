use std::net::{IpAddr, SocketAddr};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_access_expiration_secs: u64,
    pub jwt_refresh_expiration_secs: u64,
    pub frontend_url: String,
    pub booking: BookingConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Booking-window policy for field availability.
///
/// Fields are bookable between `open_hour:00` and `close_hour:00` local time,
/// in increments of `slot_minutes`. These bounds are configuration, not field
/// data.
#[derive(Debug, Clone, Copy)]
pub struct BookingConfig {
    pub open_hour: u32,
    pub close_hour: u32,
    pub slot_minutes: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            open_hour: 0,
            close_hour: 24,
            slot_minutes: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`, `JWT_SECRET`
    /// Optional with defaults: `SERVER_HOST`, `SERVER_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `FIELD_OPEN_HOUR`, `FIELD_CLOSE_HOUR`, `SLOT_MINUTES`
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set, or if a variable
    /// contains an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        // Hosted platforms provide PORT; fall back to SERVER_PORT, then 3000
        let server_port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        // In production, default to 0.0.0.0 so the platform can route traffic
        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = std::env::var("SERVER_HOST")
            .unwrap_or_else(|_| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_access_expiration_secs = env_u64("JWT_ACCESS_EXPIRATION_SECS", 900)?;
        let jwt_refresh_expiration_secs = env_u64("JWT_REFRESH_EXPIRATION_SECS", 604_800)?;

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());

        let booking = BookingConfig {
            open_hour: env_u32("FIELD_OPEN_HOUR", 0)?,
            close_hour: env_u32("FIELD_CLOSE_HOUR", 24)?,
            slot_minutes: env_u32("SLOT_MINUTES", 30)?,
        };
        if booking.open_hour >= booking.close_hour || booking.close_hour > 24 {
            return Err(anyhow::anyhow!(
                "FIELD_OPEN_HOUR must be < FIELD_CLOSE_HOUR <= 24"
            ));
        }
        if booking.slot_minutes == 0 || 60 % booking.slot_minutes != 0 {
            return Err(anyhow::anyhow!("SLOT_MINUTES must evenly divide an hour"));
        }

        Ok(Self {
            database_url,
            server_host,
            server_port,
            environment,
            log_level,
            jwt_secret,
            jwt_access_expiration_secs,
            jwt_refresh_expiration_secs,
            frontend_url,
            booking,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

fn env_u32(name: &str, default: u32) -> anyhow::Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("{name} must be a valid u32")),
        Err(_) => Ok(default),
    }
}

fn env_u64(name: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{name} must be a valid u64")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = Config {
            database_url: String::new(),
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: 3000,
            environment: Environment::Development,
            log_level: "info".to_string(),
            jwt_secret: String::new(),
            jwt_access_expiration_secs: 900,
            jwt_refresh_expiration_secs: 604_800,
            frontend_url: String::new(),
            booking: BookingConfig::default(),
        };
        let addr = config.socket_addr();
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_booking_defaults() {
        let booking = BookingConfig::default();
        assert_eq!(booking.open_hour, 0);
        assert_eq!(booking.close_hour, 24);
        assert_eq!(booking.slot_minutes, 30);
    }
}
