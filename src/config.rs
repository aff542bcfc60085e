use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::file;
use crate::options::Options;
use crate::store::{normalize_key, Store, Values};
use crate::traits::ConfigSource;
use crate::value::{FromConfigValue, ToConfigValue};

/// Config is a format-preserving key/value file with an optional read-only
/// override layer:
///
/// - **Override** (read-only, higher priority): loaded from `override_path`.
/// - **Primary** (read-write): loaded from and saved to `path`.
///
/// Reads check the override first; a key present there shadows every primary
/// occurrence of the same key. Writes and deletes only touch the primary
/// layer, so a shadowed write becomes visible once the override is cleared.
///
/// Nothing reaches the disk until [`save`](Config::save), unless
/// [`Options::auto_save`] is set.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    override_path: Option<PathBuf>,
    options: Options,
    primary: Store,
    overlay: Option<Store>,
}

impl Config {
    /// Create an empty config bound to `path`. Nothing is read until
    /// [`load`](Config::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, Options::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: Options) -> Self {
        let options = options.validated();
        Self {
            path: path.into(),
            override_path: None,
            primary: Store::new(options.clone()),
            overlay: None,
            options,
        }
    }

    /// Create a config bound to `path` and load it. A missing file yields an
    /// empty config.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::new(path);
        config.load()?;
        Ok(config)
    }

    /// Conventional location for an application's config file:
    /// `<user config dir>/<app>/<app>.cfg`, or the working directory when the
    /// platform has no config dir.
    pub fn default_path(app_name: &str) -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(app_name);
        path.push(format!("{}.cfg", app_name));
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point the config at another file. Takes effect on the next
    /// `load`/`save`; the in-memory document is kept.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn override_path(&self) -> Option<&Path> {
        self.override_path.as_deref()
    }

    /// Bind (and immediately load) or clear the override file.
    ///
    /// Returns whether an override file existed. Clearing always returns
    /// `false` and makes primary values visible again without a reload. On
    /// error the previous override stays in place.
    pub fn set_override_path(&mut self, path: Option<PathBuf>) -> Result<bool, ConfigError> {
        let overlay = self.read_override(path.as_deref())?;
        if path.is_none() && self.overlay.is_some() {
            debug!("override cleared");
        }
        let found = overlay.is_some();
        self.override_path = path;
        self.overlay = overlay;
        Ok(found)
    }

    /// Read the primary file (and the override, if bound) from disk,
    /// discarding unsaved changes.
    ///
    /// Returns `Ok(false)` when no file exists at `path`; the config is then
    /// empty. When either file fails to load, nothing in memory changes.
    pub fn load(&mut self) -> Result<bool, ConfigError> {
        let primary = self.read_store(&self.path)?;
        let overlay = self.read_override(self.override_path.as_deref())?;

        let found = primary.is_some();
        self.primary = primary.unwrap_or_else(|| Store::new(self.options.clone()));
        self.overlay = overlay;
        Ok(found)
    }

    /// Write the primary document to `path`, creating parent directories as
    /// needed. The override file is never written.
    pub fn save(&self) -> Result<(), ConfigError> {
        file::write_atomic(&self.path, &self.primary.to_bytes())
    }

    /// Last value of `key`, or None when neither layer has it.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let key = normalize_key(key)?;
        Ok(self.last(key).map(str::to_string))
    }

    /// Read `key` converted to the type of `default`. Returns `default` when
    /// the key is absent and a conversion error when the stored text does not
    /// parse.
    pub fn read<T: FromConfigValue>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        let key = normalize_key(key)?;
        match self.last(key) {
            Some(text) => T::from_config_value(text).ok_or_else(|| ConfigError::Conversion {
                key: key.to_string(),
                value: text.to_string(),
                target: T::TYPE_NAME,
            }),
            None => Ok(default),
        }
    }

    /// Every value of `key` in file order.
    pub fn read_all(&self, key: &str) -> Result<Values<'_>, ConfigError> {
        let key = normalize_key(key)?;
        Ok(self.values(key))
    }

    pub fn contains_key(&self, key: &str) -> Result<bool, ConfigError> {
        let key = normalize_key(key)?;
        Ok(self.contains(key))
    }

    /// Set `key` to `value` in the primary layer.
    pub fn write<V: ToConfigValue>(&mut self, key: &str, value: V) -> Result<(), ConfigError> {
        self.primary.set(key, &value.to_config_value())?;
        self.after_change()
    }

    /// Replace all values of `key` in the primary layer with `values`.
    pub fn write_all<I, S>(&mut self, key: &str, values: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.primary.set_all(key, values)?;
        self.after_change()
    }

    /// Remove every occurrence of `key` from the primary layer.
    pub fn delete(&mut self, key: &str) -> Result<(), ConfigError> {
        let removed = self.primary.remove(key)?;
        debug!(key = key.trim(), removed, "deleted config key");
        self.after_change()
    }

    fn after_change(&self) -> Result<(), ConfigError> {
        if self.options.auto_save {
            self.save()?;
        }
        Ok(())
    }

    fn read_store(&self, path: &Path) -> Result<Option<Store>, ConfigError> {
        let Some(data) = file::read(path)? else {
            return Ok(None);
        };
        let store = Store::parse(&data, self.options.clone())?;
        debug!("loaded config {:?} ({} lines)", path, store.document().len());
        Ok(Some(store))
    }

    fn read_override(&self, path: Option<&Path>) -> Result<Option<Store>, ConfigError> {
        match path {
            Some(path) => self.read_store(path),
            None => Ok(None),
        }
    }
}

impl ConfigSource for Config {
    fn last(&self, key: &str) -> Option<&str> {
        self.overlay
            .as_ref()
            .and_then(|o| o.last(key))
            .or_else(|| self.primary.last(key))
    }

    fn values(&self, key: &str) -> Values<'_> {
        match &self.overlay {
            Some(overlay) if overlay.contains(key) => overlay.values(key),
            _ => self.primary.values(key),
        }
    }

    /// Primary keys first, then keys only the override has.
    fn keys(&self) -> Vec<&str> {
        let mut keys = self.primary.keys();
        if let Some(overlay) = &self.overlay {
            for key in overlay.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_path_ends_with_app_file() {
        let path = Config::default_path("openerp");
        assert!(path.ends_with("openerp/openerp.cfg"));
    }

    #[test]
    fn conversion_failure_is_distinct_from_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.cfg");
        fs::write(&path, "Count: many\n").unwrap();
        let config = Config::open(&path).unwrap();

        assert_eq!(config.read("Missing", 7).unwrap(), 7);
        let err = config.read("Count", 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Conversion { ref key, ref value, target: "32-bit integer" }
                if key == "Count" && value == "many"
        ));
        assert_eq!(config.read("Count", String::new()).unwrap(), "many");
    }

    #[test]
    fn auto_save_persists_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto.cfg");
        let options = Options {
            auto_save: true,
            ..Options::default()
        };
        let mut config = Config::with_options(&path, options);
        config.write("Key1", "Value 1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Key1: Value 1\n");
        config.delete("Key1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn load_discards_unsaved_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.cfg");
        fs::write(&path, "Key: saved\n").unwrap();
        let mut config = Config::open(&path).unwrap();
        config.write("Key", "unsaved").unwrap();
        assert!(config.load().unwrap());
        assert_eq!(config.get("Key").unwrap().as_deref(), Some("saved"));
    }

    #[test]
    fn failed_load_keeps_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("primary.cfg");
        let overlay = dir.path().join("override.cfg");
        fs::write(&primary, "Key: saved\nOther: 1\n").unwrap();
        fs::write(&overlay, "Key: shadow\n").unwrap();

        let mut config = Config::open(&primary).unwrap();
        config.set_override_path(Some(overlay.clone())).unwrap();
        config.write("Other", "unsaved").unwrap();

        fs::write(&overlay, b"Key: \xFF\n").unwrap();
        assert!(matches!(config.load(), Err(ConfigError::Encoding(_))));
        assert_eq!(config.get("Key").unwrap().as_deref(), Some("shadow"));
        assert_eq!(config.get("Other").unwrap().as_deref(), Some("unsaved"));

        let broken = dir.path().join("broken.cfg");
        fs::write(&broken, b"\xFE\n").unwrap();
        assert!(config.set_override_path(Some(broken)).is_err());
        assert_eq!(config.override_path(), Some(overlay.as_path()));
        assert_eq!(config.get("Key").unwrap().as_deref(), Some("shadow"));
    }

    #[test]
    fn keys_merge_layers() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("primary.cfg");
        let overlay = dir.path().join("override.cfg");
        fs::write(&primary, "A: 1\nB: 2\n").unwrap();
        fs::write(&overlay, "B: 20\nC: 30\n").unwrap();

        let mut config = Config::open(&primary).unwrap();
        assert!(config.set_override_path(Some(overlay)).unwrap());
        assert_eq!(config.keys(), vec!["A", "B", "C"]);
        assert_eq!(config.get("B").unwrap().as_deref(), Some("20"));
    }
}
