use crate::{database::MEMORY_PREFIX, error::Error};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

const DEFAULT_DATA_SOURCE: &str = "default";

/// How the application under test reaches its databases and evolutions.
#[derive(Debug, Clone)]
pub struct PlaytestConfiguration {
    application_path: PathBuf,
    application_secret: String,
    data_sources: BTreeMap<String, String>,
    default_data_source: String,
    database_plugin_enabled: bool,
    evolutions_enabled: bool,
    auto_apply: bool,
    auto_apply_downs: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfiguration {
    #[serde(default)]
    application: ApplicationSection,
    #[serde(default)]
    db: BTreeMap<String, DataSourceSection>,
    #[serde(default)]
    evolutions: EvolutionsSection,
    default_data_source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationSection {
    path: Option<PathBuf>,
    secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataSourceSection {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct EvolutionsSection {
    enabled: Option<bool>,
    auto_apply: Option<bool>,
    auto_apply_downs: Option<bool>,
}

impl PlaytestConfiguration {
    pub fn new() -> Self {
        Self {
            application_path: PathBuf::from("."),
            application_secret: String::from("changeme"),
            data_sources: BTreeMap::new(),
            default_data_source: String::from(DEFAULT_DATA_SOURCE),
            database_plugin_enabled: true,
            evolutions_enabled: true,
            auto_apply: false,
            auto_apply_downs: false,
        }
    }

    /// Reads a TOML configuration file. A relative `application.path` or
    /// data source file is resolved against the directory holding the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let file: FileConfiguration = toml::from_str(&contents)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut configuration = Self::new();

        if let Some(application_path) = file.application.path {
            configuration.set_application_path(base.join(application_path));
        } else {
            configuration.set_application_path(base);
        }
        if let Some(secret) = file.application.secret {
            configuration.set_application_secret(secret);
        }
        for (name, data_source) in file.db {
            configuration.set_data_source(name, resolve_url(base, data_source.url));
        }
        if let Some(default_data_source) = file.default_data_source {
            configuration.set_default_data_source(default_data_source);
        }
        if let Some(enabled) = file.evolutions.enabled {
            configuration.set_evolutions_enabled(enabled);
        }
        if let Some(auto_apply) = file.evolutions.auto_apply {
            configuration.set_auto_apply(auto_apply);
        }
        if let Some(auto_apply_downs) = file.evolutions.auto_apply_downs {
            configuration.set_auto_apply_downs(auto_apply_downs);
        }

        Ok(configuration)
    }

    pub fn set_application_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.application_path = path.into();
    }

    pub fn application_path(&self) -> &Path {
        &self.application_path
    }

    pub fn evolutions_path(&self) -> PathBuf {
        self.application_path.join("conf").join("evolutions")
    }

    pub fn set_application_secret<S: Into<String>>(&mut self, secret: S) {
        self.application_secret = secret.into();
    }

    pub fn application_secret(&self) -> &str {
        &self.application_secret
    }

    /// Registers a data source. `url` is either `memory:<name>` or a path to
    /// a SQLite file.
    pub fn set_data_source<S1: Into<String>, S2: Into<String>>(&mut self, name: S1, url: S2) {
        self.data_sources.insert(name.into(), url.into());
    }

    pub fn data_sources(&self) -> &BTreeMap<String, String> {
        &self.data_sources
    }

    pub fn set_default_data_source<S: Into<String>>(&mut self, name: S) {
        self.default_data_source = name.into();
    }

    pub fn default_data_source(&self) -> &str {
        &self.default_data_source
    }

    pub fn set_database_plugin_enabled(&mut self, value: bool) {
        self.database_plugin_enabled = value;
    }

    pub fn database_plugin_enabled(&self) -> bool {
        self.database_plugin_enabled
    }

    pub fn set_evolutions_enabled(&mut self, value: bool) {
        self.evolutions_enabled = value;
    }

    pub fn evolutions_enabled(&self) -> bool {
        self.evolutions_enabled
    }

    pub fn set_auto_apply(&mut self, value: bool) {
        self.auto_apply = value;
    }

    pub fn auto_apply(&self) -> bool {
        self.auto_apply
    }

    pub fn set_auto_apply_downs(&mut self, value: bool) {
        self.auto_apply_downs = value;
    }

    pub fn auto_apply_downs(&self) -> bool {
        self.auto_apply_downs
    }
}

fn resolve_url(base: &Path, url: String) -> String {
    if url.starts_with(MEMORY_PREFIX) || Path::new(&url).is_absolute() {
        url
    } else {
        base.join(url).to_string_lossy().into_owned()
    }
}

impl Default for PlaytestConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.toml");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
default_data_source = "main"

[application]
path = "app"
secret = "s3cr3t"

[db.main]
url = "memory:main"

[evolutions]
auto_apply = true
"#
        )
        .unwrap();

        let configuration = PlaytestConfiguration::load(&path).unwrap();

        assert_eq!(configuration.application_path(), dir.path().join("app"));
        assert_eq!(
            configuration.evolutions_path(),
            dir.path().join("app").join("conf").join("evolutions")
        );
        assert_eq!(configuration.application_secret(), "s3cr3t");
        assert_eq!(configuration.default_data_source(), "main");
        assert_eq!(configuration.data_sources()["main"], "memory:main");
        assert!(configuration.auto_apply());
        assert!(!configuration.auto_apply_downs());
        assert!(configuration.evolutions_enabled());
        assert!(configuration.database_plugin_enabled());
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.toml");
        fs::write(&path, "[db.main]\nurl = 3\n").unwrap();

        assert!(matches!(
            PlaytestConfiguration::load(&path),
            Err(Error::TomlError(_))
        ));
    }

    #[test]
    fn file_data_sources_resolve_against_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.toml");
        fs::write(
            &path,
            "[db.default]\nurl = \"../target/app.db\"\n\n[db.cache]\nurl = \"memory:cache\"\n",
        )
        .unwrap();

        let configuration = PlaytestConfiguration::load(&path).unwrap();

        assert_eq!(
            Path::new(&configuration.data_sources()["default"]),
            dir.path().join("..").join("target").join("app.db")
        );
        assert_eq!(configuration.data_sources()["cache"], "memory:cache");
    }
}
