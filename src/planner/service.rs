//! Planner Service
//!
//! Turns planning requests into model calls: builds the prompt and schema,
//! consults the response cache, validates the answer into typed structs and
//! maps provider failures to user-facing errors.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::models::{
    CountryInfo, DestinationSuggestion, ItineraryStyle, PackingListCategory, TravelPlan,
};
use super::prompts;
use crate::cache::{CacheStats, KeyValueStore, ResponseCache, SharedCache};
use crate::error::{PlannerError, Result};
use crate::provider::{classify_error, ErrorClass, GenerativeModel};

// == Request Kind ==
/// What a model call is for; names the action in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Suggestions,
    CountryInfo,
    OffBeatSuggestions,
    TravelPlan,
    RebuildPlan,
    PackingList,
}

impl Action {
    pub fn describe(self) -> &'static str {
        match self {
            Action::Suggestions => "generate travel suggestions",
            Action::CountryInfo => "fetch destination details",
            Action::OffBeatSuggestions => "generate off-beat suggestions",
            Action::TravelPlan => "generate a travel plan",
            Action::RebuildPlan => "rebuild the travel plan",
            Action::PackingList => "generate a packing list",
        }
    }
}

/// Builds a cache signature from request parameters.
///
/// Parameters are trimmed and lower-cased so cosmetic differences share an
/// entry. `:` and `\` inside a parameter are backslash-escaped, so distinct
/// parameter lists never produce the same signature.
pub fn cache_signature(kind: &str, parts: &[&str]) -> String {
    let mut key = kind.to_string();
    for part in parts {
        key.push(':');
        for c in part.trim().to_lowercase().chars() {
            if c == ':' || c == '\\' {
                key.push('\\');
            }
            key.push(c);
        }
    }
    key
}

// == Planner Service ==
/// Entry point for every planning operation.
pub struct PlannerService {
    model: Arc<dyn GenerativeModel>,
    cache: SharedCache,
}

impl PlannerService {
    /// Creates a service over `model`, caching into `store`.
    pub fn new(model: Arc<dyn GenerativeModel>, cache: ResponseCache<Box<dyn KeyValueStore>>) -> Self {
        Self {
            model,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Handle to the shared cache, for maintenance tasks.
    pub fn cache(&self) -> SharedCache {
        self.cache.clone()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    // == Operations ==

    /// Suggests 7-8 countries for a budget, season and continent.
    pub async fn travel_suggestions(
        &self,
        budget: &str,
        time_of_year: &str,
        continent: &str,
    ) -> Result<Vec<DestinationSuggestion>> {
        let key = cache_signature("suggestions", &[budget, time_of_year, continent]);
        let prompt = prompts::suggestions_prompt(budget, time_of_year, continent);
        let schema = prompts::suggestions_schema();
        self.request(Action::Suggestions, &prompt, &schema, Some(&key))
            .await
    }

    /// Describes a country the user named directly.
    ///
    /// Never fails: a provider failure yields a placeholder destination.
    pub async fn country_info(&self, country: &str) -> DestinationSuggestion {
        let country = country.trim();
        let key = cache_signature("country", &[country]);
        let prompt = prompts::country_info_prompt(country);
        let schema = prompts::country_info_schema();

        let info = match self
            .request::<CountryInfo>(Action::CountryInfo, &prompt, &schema, Some(&key))
            .await
        {
            Ok(info) => info,
            Err(e) => {
                warn!("Using fallback details for {}: {}", country, e);
                CountryInfo::fallback()
            }
        };
        info.into_destination(country)
    }

    /// Suggests lesser-known destinations. Not cached, so every call varies.
    pub async fn off_beat_suggestions(&self) -> Result<Vec<DestinationSuggestion>> {
        let prompt = prompts::off_beat_prompt();
        let schema = prompts::suggestions_schema();
        self.request(Action::OffBeatSuggestions, &prompt, &schema, None)
            .await
    }

    /// Generates a day-by-day plan; `duration == 0` lets the model choose.
    ///
    /// Activities get fresh ids on every call, cache hits included.
    pub async fn travel_plan(
        &self,
        country: &str,
        duration: u32,
        style: ItineraryStyle,
        notes: &str,
    ) -> Result<TravelPlan> {
        let duration_text = duration.to_string();
        let style_text = style.to_string();
        let key = cache_signature("plan", &[country, &duration_text, &style_text, notes]);
        let prompt = prompts::travel_plan_prompt(country.trim(), duration, style, notes);
        let schema = prompts::travel_plan_schema();

        let mut plan: TravelPlan = self
            .request_plan(Action::TravelPlan, &prompt, &schema, Some(&key))
            .await?;
        plan.assign_fresh_ids();
        info!(
            "Generated {}-day plan for {}",
            plan.day_count(),
            country.trim()
        );
        Ok(plan)
    }

    /// Re-optimizes the user's edited plan, keeping its day count.
    ///
    /// `notes` are the original plan notes; `refinement` the new request.
    pub async fn rebuild_plan(
        &self,
        country: &str,
        style: ItineraryStyle,
        plan: &TravelPlan,
        notes: &str,
        refinement: &str,
    ) -> Result<TravelPlan> {
        plan.validate()?;
        let combined = prompts::combine_notes(notes, refinement);
        let prompt =
            prompts::rebuild_plan_prompt(country.trim(), plan.day_count(), style, plan, &combined);
        let schema = prompts::travel_plan_schema();

        let mut rebuilt = self
            .request_plan(Action::RebuildPlan, &prompt, &schema, None)
            .await?;
        rebuilt.assign_fresh_ids();
        Ok(rebuilt)
    }

    /// Generates a packing list for the plan's activities.
    pub async fn packing_list(
        &self,
        country: &str,
        plan: &TravelPlan,
    ) -> Result<Vec<PackingListCategory>> {
        let prompt = prompts::packing_list_prompt(country.trim(), plan);
        let schema = prompts::packing_list_schema();
        self.request(Action::PackingList, &prompt, &schema, None)
            .await
    }

    // == Model Calls ==

    async fn request_plan(
        &self,
        action: Action,
        prompt: &str,
        schema: &Value,
        cache_key: Option<&str>,
    ) -> Result<TravelPlan> {
        self.request_checked(action, prompt, schema, cache_key, |plan: &TravelPlan| {
            plan.validate().is_ok()
        })
        .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        action: Action,
        prompt: &str,
        schema: &Value,
        cache_key: Option<&str>,
    ) -> Result<T> {
        self.request_checked(action, prompt, schema, cache_key, |_: &T| true)
            .await
    }

    /// Runs one schema-constrained call, answering from the cache when a
    /// fresh entry parses and passes `accept`.
    ///
    /// Only accepted responses are cached.
    async fn request_checked<T, F>(
        &self,
        action: Action,
        prompt: &str,
        schema: &Value,
        cache_key: Option<&str>,
        accept: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        if let Some(key) = cache_key {
            let cached = self.cache.lock().await.get(key);
            if let Some(value) = cached {
                match serde_json::from_value::<T>(value) {
                    Ok(parsed) if accept(&parsed) => return Ok(parsed),
                    Ok(_) => warn!("Ignoring unusable cached response for {}", key),
                    Err(e) => warn!("Ignoring cached response for {} that no longer parses: {}", key, e),
                }
            }
        }

        let value = self.model.generate(prompt, schema).await.map_err(|e| {
            let message = e.to_string();
            error!(
                "{} call to {} failed: {}",
                action.describe(),
                self.model.name(),
                message
            );
            match classify_error(&message) {
                ErrorClass::Quota => PlannerError::QuotaExceeded,
                ErrorClass::Generic => generation_error(action),
            }
        })?;

        let parsed: T = serde_json::from_value(value.clone()).map_err(|e| {
            error!(
                "Response to {} did not match the schema: {}",
                action.describe(),
                e
            );
            generation_error(action)
        })?;
        if !accept(&parsed) {
            error!("Model returned an unusable response to {}", action.describe());
            return Err(generation_error(action));
        }

        if let Some(key) = cache_key {
            self.cache.lock().await.set(key, value);
        }
        Ok(parsed)
    }
}

fn generation_error(action: Action) -> PlannerError {
    PlannerError::Generation {
        action: action.describe().to_string(),
    }
}
