use clap::{Parser, ValueEnum};
use linkcut_core::{BaseUrl, StorageError};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "LINKCUT_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "LINKCUT_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "LINKCUT_STORAGE_BACKEND";
pub const FILE_STORAGE_PATH_ENV: &str = "LINKCUT_FILE_STORAGE_PATH";
pub const DATABASE_DSN_ENV: &str = "LINKCUT_DATABASE_DSN";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "memory")]
    Memory,
    #[value(name = "file")]
    File,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Memory => write!(f, "memory"),
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkcut-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public prefix of emitted short URLs; derived from the listen address
    /// when not given.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Memory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = FILE_STORAGE_PATH_ENV, required_if_eq("storage", "file"))]
    pub file_path: Option<PathBuf>,

    #[arg(long, env = DATABASE_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_dsn: Option<String>,
}

impl CLI {
    /// The effective base URL, with the trailing `/` enforced.
    pub fn base_url(&self) -> Result<BaseUrl, StorageError> {
        match &self.base_url {
            Some(base) => BaseUrl::new(base.clone()),
            None => BaseUrl::new(format!("http://{}/", self.listen_addr)),
        }
    }
}
