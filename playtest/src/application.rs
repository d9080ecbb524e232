use crate::{
    database::{DatabasePlugin, SqliteDatabasePlugin},
    error::Error,
    evolutions, PlaytestConfiguration,
};
use rusqlite::Connection;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Application {
    configuration: PlaytestConfiguration,
    database: Option<Arc<dyn DatabasePlugin + Send + Sync>>,
}

impl Application {
    pub fn new(configuration: PlaytestConfiguration) -> Result<Self, Error> {
        let database: Option<Arc<dyn DatabasePlugin + Send + Sync>> =
            if configuration.database_plugin_enabled() {
                Some(Arc::new(SqliteDatabasePlugin::new(&configuration)?))
            } else {
                None
            };

        Ok(Self {
            configuration,
            database,
        })
    }

    pub fn with_database_plugin(
        configuration: PlaytestConfiguration,
        database: Arc<dyn DatabasePlugin + Send + Sync>,
    ) -> Self {
        Self {
            configuration,
            database: Some(database),
        }
    }

    pub fn configuration(&self) -> &PlaytestConfiguration {
        &self.configuration
    }

    pub fn database(&self) -> Result<&(dyn DatabasePlugin + Send + Sync), Error> {
        self.database
            .as_deref()
            .ok_or(Error::DatabasePluginNotRegistered)
    }

    pub fn with_connection<T, F>(&self, data_source: &str, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Connection) -> Result<T, Error>,
    {
        let mut connection = self.database()?.connection(data_source)?;
        f(&mut connection)
    }

    /// The application stops when the returned guard is dropped.
    pub fn start(&self) -> Result<RunningApplication<'_>, Error> {
        if let Some(database) = &self.database {
            database.on_start()?;
        }
        let running = RunningApplication { application: self };

        if self.database.is_some() && self.configuration.evolutions_enabled() {
            evolutions::check_evolutions(self)?;
        }
        info!("application started");

        Ok(running)
    }
}

#[derive(Debug)]
pub struct RunningApplication<'a> {
    application: &'a Application,
}

impl<'a> RunningApplication<'a> {
    pub fn application(&self) -> &'a Application {
        self.application
    }
}

impl Drop for RunningApplication<'_> {
    fn drop(&mut self) {
        if let Some(database) = &self.application.database {
            database.on_stop();
        }
        debug!("application stopped");
    }
}

/// Runs `block` against a started application. The application is stopped on
/// every way out of `block`, unwinding included.
pub fn running<T, F>(application: &Application, block: F) -> Result<T, Error>
where
    F: FnOnce(&Application) -> Result<T, Error>,
{
    let running = application.start()?;
    block(running.application())
}
