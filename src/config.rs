// src/config.rs
// =============================================================================
// BuildConfig: an immutable snapshot of everything one build needs.
//
// The CLI collects raw arguments, then BuildConfig::new validates them once.
// After that the builder only reads from it, so two builds never share
// mutable settings.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// The starting page for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub lang: String,
    pub title: String,
}

impl Seed {
    pub fn new(lang: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            title: title.into(),
        }
    }
}

// Parses "en=Graph theory" into Seed { lang: "en", title: "Graph theory" }
impl FromStr for Seed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lang, title) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedSeed(s.to_string()))?;
        Ok(Seed::new(lang.trim(), title.trim()))
    }
}

/// What to do when a seed page cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Drop that language and build with the others
    #[default]
    SkipLanguage,
    /// Fail the whole build
    Abort,
}

/// How pages are fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Maximum number of page fetches in flight at once
    pub concurrency: usize,
    /// Per-fetch deadline; a timed-out fetch counts as an unavailable page
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    seeds: Vec<Seed>,
    removal_chance: f64,
    inversion_chance: f64,
    max_pages: usize,
    seed_policy: SeedPolicy,
    rng_seed: Option<u64>,
    fetch: FetchConfig,
}

impl BuildConfig {
    /// Validates and freezes a configuration.
    ///
    /// Seed order defines language order, which in turn drives the
    /// round-robin schedule of the builder.
    pub fn new(
        seeds: Vec<Seed>,
        removal_chance: f64,
        inversion_chance: f64,
        max_pages: usize,
    ) -> Result<Self, ConfigError> {
        if seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }
        for (i, seed) in seeds.iter().enumerate() {
            if !is_language_code(&seed.lang) {
                return Err(ConfigError::InvalidLanguage(seed.lang.clone()));
            }
            if seed.title.trim().is_empty() {
                return Err(ConfigError::EmptyTitle(seed.lang.clone()));
            }
            if seeds[..i].iter().any(|other| other.lang == seed.lang) {
                return Err(ConfigError::DuplicateLanguage(seed.lang.clone()));
            }
        }
        check_chance("removal chance", removal_chance)?;
        check_chance("inversion chance", inversion_chance)?;
        if max_pages == 0 {
            return Err(ConfigError::ZeroMaxPages);
        }

        Ok(Self {
            seeds,
            removal_chance,
            inversion_chance,
            max_pages,
            seed_policy: SeedPolicy::default(),
            rng_seed: None,
            fetch: FetchConfig::default(),
        })
    }

    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }

    pub fn with_rng_seed(mut self, rng_seed: Option<u64>) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Result<Self, ConfigError> {
        if fetch.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.fetch = fetch;
        Ok(self)
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.seeds.iter().map(|s| s.lang.as_str())
    }

    pub fn removal_chance(&self) -> f64 {
        self.removal_chance
    }

    pub fn inversion_chance(&self) -> f64 {
        self.inversion_chance
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed_policy
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }
}

fn check_chance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons, so it is rejected here too
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ChanceOutOfRange { name, value })
    }
}

// Wikipedia language codes look like "en", "fr", "zh-yue", "simple"
fn is_language_code(lang: &str) -> bool {
    !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds() -> Vec<Seed> {
        vec![Seed::new("en", "Cat"), Seed::new("fr", "Chat")]
    }

    #[test]
    fn test_parse_seed() {
        let seed: Seed = "en=Graph theory".parse().unwrap();
        assert_eq!(seed, Seed::new("en", "Graph theory"));
    }

    #[test]
    fn test_parse_seed_keeps_equals_in_title() {
        let seed: Seed = "en=E=mc2".parse().unwrap();
        assert_eq!(seed.title, "E=mc2");
    }

    #[test]
    fn test_parse_seed_without_separator() {
        let result: Result<Seed, _> = "Graph theory".parse();
        assert!(matches!(result, Err(ConfigError::MalformedSeed(_))));
    }

    #[test]
    fn test_valid_config() {
        let config = BuildConfig::new(seeds(), 0.8, 0.1, 100).unwrap();
        assert_eq!(config.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
        assert_eq!(config.seed_policy(), SeedPolicy::SkipLanguage);
    }

    #[test]
    fn test_rejects_out_of_range_chances() {
        assert!(matches!(
            BuildConfig::new(seeds(), 1.5, 0.0, 10),
            Err(ConfigError::ChanceOutOfRange { name: "removal chance", .. })
        ));
        assert!(matches!(
            BuildConfig::new(seeds(), 0.0, f64::NAN, 10),
            Err(ConfigError::ChanceOutOfRange { name: "inversion chance", .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_language() {
        let seeds = vec![Seed::new("en", "Cat"), Seed::new("en", "Dog")];
        assert_eq!(
            BuildConfig::new(seeds, 0.0, 0.0, 10),
            Err(ConfigError::DuplicateLanguage("en".to_string()))
        );
    }

    #[test]
    fn test_rejects_zero_max_pages_and_empty_seeds() {
        assert_eq!(BuildConfig::new(seeds(), 0.0, 0.0, 0), Err(ConfigError::ZeroMaxPages));
        assert_eq!(BuildConfig::new(vec![], 0.0, 0.0, 10), Err(ConfigError::NoSeeds));
    }

    #[test]
    fn test_rejects_bad_language_code() {
        let seeds = vec![Seed::new("EN!", "Cat")];
        assert!(matches!(
            BuildConfig::new(seeds, 0.0, 0.0, 10),
            Err(ConfigError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = BuildConfig::new(seeds(), 0.0, 0.0, 10).unwrap();
        let fetch = FetchConfig {
            concurrency: 0,
            ..FetchConfig::default()
        };
        assert_eq!(config.with_fetch(fetch), Err(ConfigError::ZeroConcurrency));
    }
}
