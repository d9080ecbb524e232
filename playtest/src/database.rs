use crate::{error::Error, PlaytestConfiguration};
use rusqlite::{Connection, OpenFlags};
use std::{collections::BTreeMap, fmt::Debug, fs, path::PathBuf, sync::Mutex};
use tracing::{debug, info};

pub(crate) const MEMORY_PREFIX: &str = "memory:";

pub trait DatabasePlugin: Debug {
    fn default_data_source(&self) -> &str;
    fn data_source_names(&self) -> Vec<String>;
    fn connection(&self, name: &str) -> Result<Connection, Error>;
    fn on_start(&self) -> Result<(), Error>;
    /// Called when a started application stops, on every way out.
    fn on_stop(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DataSourceUrl {
    Memory(String),
    File(PathBuf),
}

impl DataSourceUrl {
    fn parse(url: &str) -> Self {
        match url.strip_prefix(MEMORY_PREFIX) {
            Some(name) => DataSourceUrl::Memory(name.into()),
            None => DataSourceUrl::File(url.into()),
        }
    }

    fn open(&self) -> Result<Connection, Error> {
        let connection = match self {
            DataSourceUrl::Memory(name) => Connection::open_with_flags(
                format!("file:{}?mode=memory&cache=shared", name),
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )?,
            DataSourceUrl::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Connection::open(path)?
            }
        };

        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(connection)
    }
}

/// SQLite data sources described by the configuration.
///
/// In-memory data sources live as long as the plugin: a keeper connection is
/// held for each of them so that every other connection sees the same data.
#[derive(Debug)]
pub struct SqliteDatabasePlugin {
    default_data_source: String,
    data_sources: BTreeMap<String, DataSourceUrl>,
    keepers: Mutex<Vec<Connection>>,
}

impl SqliteDatabasePlugin {
    pub fn new(configuration: &PlaytestConfiguration) -> Result<Self, Error> {
        let data_sources = configuration
            .data_sources()
            .iter()
            .map(|(name, url)| (name.clone(), DataSourceUrl::parse(url)))
            .collect::<BTreeMap<_, _>>();

        let mut keepers = Vec::new();
        for url in data_sources.values() {
            if let DataSourceUrl::Memory(_) = url {
                keepers.push(url.open()?);
            }
        }

        Ok(Self {
            default_data_source: configuration.default_data_source().into(),
            data_sources,
            keepers: Mutex::new(keepers),
        })
    }
}

impl DatabasePlugin for SqliteDatabasePlugin {
    fn default_data_source(&self) -> &str {
        &self.default_data_source
    }

    fn data_source_names(&self) -> Vec<String> {
        self.data_sources.keys().cloned().collect()
    }

    fn connection(&self, name: &str) -> Result<Connection, Error> {
        self.data_sources
            .get(name)
            .ok_or_else(|| Error::UnknownDataSource(name.into()))?
            .open()
    }

    fn on_start(&self) -> Result<(), Error> {
        for (name, url) in &self.data_sources {
            url.open()?;
            debug!("data source '{}' is reachable ({:?})", name, url);
        }
        info!(
            "database plugin started with {} data source(s)",
            self.data_sources.len()
        );
        Ok(())
    }

    // Connections close when dropped and in-memory keepers live as long as the
    // plugin, so a stop has nothing to release.
    fn on_stop(&self) {
        let keepers = self.keepers.lock().map(|k| k.len()).unwrap_or(0);
        info!(
            "database plugin stopped, {} in-memory data source(s) still held",
            keepers
        );
    }
}
