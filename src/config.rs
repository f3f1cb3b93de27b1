//! Feature flag management
//!
//! Flags resolve in layers, lowest to highest priority:
//! 1. `[features]` in `AppConfig` (defaults, config file, GUILDHALL_ env vars)
//! 2. The `feature_flags` table, loaded into memory at startup
//! 3. `?ff=key:on,key:off` on the request URL, only when
//!    `features.allow_url_overrides` is set
//!
//! Resolution happens once per request through the `ResolvedFeatures`
//! extractor; handlers receive the result instead of querying flags ad hoc.

use crate::app_config::FeaturesConfig;
use crate::orm::feature_flags;
use actix_web::dev::Payload;
use actix_web::web::{Data, Query};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use dashmap::DashMap;
use futures::future::{ready, Ready};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Query parameter carrying URL overrides.
const URL_OVERRIDE_PARAM: &str = "ff";

/// Every flag the application consults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Elections,
    Nominations,
    LiveResults,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Elections, Feature::Nominations, Feature::LiveResults];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Elections => "elections",
            Self::Nominations => "nominations",
            Self::LiveResults => "live_results",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "elections" => Some(Self::Elections),
            "nominations" => Some(Self::Nominations),
            "live_results" => Some(Self::LiveResults),
            _ => None,
        }
    }

    fn baseline(&self, features: &FeaturesConfig) -> bool {
        match self {
            Self::Elections => features.elections,
            Self::Nominations => features.nominations,
            Self::LiveResults => features.live_results,
        }
    }
}

/// Which layer produced a resolved value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    Config,
    Database,
    Url,
}

/// In-memory copy of the `feature_flags` table.
pub struct FeatureFlagStore {
    flags: DashMap<String, bool>,
}

impl Default for FeatureFlagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureFlagStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            flags: DashMap::new(),
        }
    }

    /// Replace the cached flags with the current table contents
    pub async fn load_from_database(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let rows = feature_flags::Entity::find()
            .order_by_asc(feature_flags::Column::Key)
            .all(db)
            .await?;

        self.flags.clear();
        for row in rows {
            if Feature::from_key(&row.key).is_none() {
                log::warn!("Ignoring unknown feature flag '{}' in database", row.key);
                continue;
            }
            self.flags.insert(row.key, row.enabled);
        }

        log::info!("Loaded {} feature flags from database", self.flags.len());
        Ok(())
    }

    /// Set a cached value without touching the database
    pub fn insert(&self, feature: Feature, enabled: bool) {
        self.flags.insert(feature.key().to_string(), enabled);
    }

    /// Database-layer value for a flag, if the table has a row for it
    pub fn get(&self, feature: Feature) -> Option<bool> {
        self.flags.get(feature.key()).map(|v| *v)
    }
}

/// Create a new Arc-wrapped store
pub fn create_flag_store() -> Arc<FeatureFlagStore> {
    Arc::new(FeatureFlagStore::new())
}

/// Parse `key:on,key:off` into known flags. Unknown keys and values are skipped.
pub fn parse_url_overrides(raw: &str) -> Vec<(Feature, bool)> {
    raw.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once(':')?;
            let feature = Feature::from_key(key.trim())?;
            let enabled = match value.trim() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                _ => return None,
            };
            Some((feature, enabled))
        })
        .collect()
}

/// Flag values for a single request.
#[derive(Clone, Debug)]
pub struct ResolvedFeatures {
    values: HashMap<Feature, (bool, FlagSource)>,
}

impl ResolvedFeatures {
    /// Layer configuration, database and URL values.
    pub fn resolve(
        baseline: &FeaturesConfig,
        store: Option<&FeatureFlagStore>,
        url_overrides: &[(Feature, bool)],
    ) -> Self {
        let mut values = HashMap::new();

        for feature in Feature::ALL {
            let mut value = (feature.baseline(baseline), FlagSource::Config);
            if let Some(enabled) = store.and_then(|s| s.get(feature)) {
                value = (enabled, FlagSource::Database);
            }
            values.insert(feature, value);
        }

        if baseline.allow_url_overrides {
            for (feature, enabled) in url_overrides {
                values.insert(*feature, (*enabled, FlagSource::Url));
            }
        } else if !url_overrides.is_empty() {
            log::debug!("URL feature overrides ignored; allow_url_overrides is off");
        }

        Self { values }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.values.get(&feature).map_or(false, |(v, _)| *v)
    }

    pub fn source(&self, feature: Feature) -> FlagSource {
        self.values
            .get(&feature)
            .map_or(FlagSource::Config, |(_, s)| *s)
    }

    /// Disabled features behave as if the route did not exist.
    pub fn require(&self, feature: Feature) -> Result<(), Error> {
        if self.is_enabled(feature) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorNotFound("Not found"))
        }
    }

    fn from_request_parts(req: &HttpRequest) -> Self {
        let baseline = crate::app_config::features();
        let store = req.app_data::<Data<Arc<FeatureFlagStore>>>();

        let overrides = Query::<HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.get(URL_OVERRIDE_PARAM).map(|raw| parse_url_overrides(raw)))
            .unwrap_or_default();

        Self::resolve(&baseline, store.map(|s| s.get_ref().as_ref()), &overrides)
    }
}

/// Resolves once and caches the result in request extensions.
impl FromRequest for ResolvedFeatures {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(resolved) = req.extensions().get::<ResolvedFeatures>() {
            return ready(Ok(resolved.clone()));
        }

        let resolved = Self::from_request_parts(req);
        req.extensions_mut().insert(resolved.clone());
        ready(Ok(resolved))
    }
}
