use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{} must be set", key))
}

fn defaulted(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Read configuration from the environment, loading `.env` first if
    /// one is present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: required("DATABASE_URL"),
            jwt_secret: required("JWT_SECRET"),
            jwt_expiration_hours: defaulted("JWT_EXPIRATION_HOURS", "24")
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: defaulted("SERVER_HOST", "0.0.0.0"),
            server_port: defaulted("SERVER_PORT", "3000")
                .parse()
                .expect("SERVER_PORT must be a number"),
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .expect("SERVER_HOST and SERVER_PORT must form a valid socket address")
    }
}
