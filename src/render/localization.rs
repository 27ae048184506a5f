//! Translated strings for view labels

use rustc_hash::FxHashMap;

/// Supplies translated strings for the current UI locale
pub trait Localizer: Send + Sync {
    /// Translation of `key`, if any
    fn get_string(&self, key: &str) -> Option<String>;

    /// Translation of `key`, falling back to the key itself
    fn localize(&self, key: &str) -> String {
        self.get_string(key).unwrap_or_else(|| key.to_string())
    }
}

/// Localizer without translations; every key renders as itself
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyLocalizer;

impl Localizer for KeyLocalizer {
    fn get_string(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-memory string catalogs per locale
///
/// Lookup tries the full locale (`fr-CA`), then its language (`fr`).
#[derive(Debug, Clone, Default)]
pub struct CatalogLocalizer {
    locale: String,
    catalogs: FxHashMap<String, FxHashMap<String, String>>,
}

impl CatalogLocalizer {
    /// Create a localizer for `locale`
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            catalogs: FxHashMap::default(),
        }
    }

    /// Add a translation
    pub fn with_string(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.catalogs
            .entry(locale.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }

    /// The current locale
    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Localizer for CatalogLocalizer {
    fn get_string(&self, key: &str) -> Option<String> {
        let language = self.locale.split(['-', '_']).next().unwrap_or_default();
        [self.locale.as_str(), language]
            .into_iter()
            .filter_map(|locale| self.catalogs.get(locale))
            .find_map(|catalog| catalog.get(key))
            .cloned()
    }
}
