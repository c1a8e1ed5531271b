//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::db::DEFAULT_POOL_SIZE;

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

#[derive(Clone, Debug, Deserialize)]
/// Server settings read from `config/*.yaml` and `APP_*` variables.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}
