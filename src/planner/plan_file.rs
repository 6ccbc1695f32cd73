//! Saved plan files
//!
//! A saved plan is a pretty-printed JSON document holding the plan, the
//! destination it was made for, and when it was saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::models::{DestinationSuggestion, TravelPlan};
use crate::error::{PlannerError, Result};

const INVALID_FORMAT: &str = "Invalid itinerary file format.";
const UNREADABLE: &str = "Failed to read or parse the file.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    pub id: String,
    pub name: String,
    pub plan: TravelPlan,
    pub destination: DestinationSuggestion,
    pub saved_at: DateTime<Utc>,
}

impl SavedPlan {
    /// Wraps a plan for saving under `name`.
    pub fn new(name: impl Into<String>, plan: TravelPlan, destination: DestinationSuggestion) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            plan,
            destination,
            saved_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlannerError::Internal(e.to_string()))
    }

    /// Download name derived from the plan name.
    pub fn file_name(&self) -> String {
        file_name_for(&self.name)
    }

    // == Load ==
    /// Parses a saved plan file.
    ///
    /// The document must carry `plan`, `destination` and `plan.itinerary`.
    /// Activities without an id receive one.
    pub fn load(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text).map_err(|e| {
            warn!("Saved plan is not JSON: {}", e);
            PlannerError::InvalidFile(UNREADABLE.to_string())
        })?;

        let has_structure = raw.get("destination").is_some_and(|d| !d.is_null())
            && raw
                .get("plan")
                .and_then(|p| p.get("itinerary"))
                .is_some_and(|i| !i.is_null());
        if !has_structure {
            return Err(PlannerError::InvalidFile(INVALID_FORMAT.to_string()));
        }

        let mut saved: SavedPlan = serde_json::from_value(raw).map_err(|e| {
            warn!("Saved plan does not match the expected shape: {}", e);
            PlannerError::InvalidFile(INVALID_FORMAT.to_string())
        })?;
        saved.plan.assign_missing_ids();
        Ok(saved)
    }
}

/// Keeps letters, digits, spaces and `-`, turns whitespace runs into `_`,
/// lower-cases, and appends `.json`.
pub fn file_name_for(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else if c.is_ascii_alphanumeric() || c == '-' {
            stem.push(c.to_ascii_lowercase());
            in_space = false;
        }
    }

    if stem.is_empty() {
        "itinerary.json".to_string()
    } else {
        format!("{}.json", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::models::tests::sample_plan;
    use crate::planner::models::CostBreakdown;
    use serde_json::json;

    fn destination() -> DestinationSuggestion {
        DestinationSuggestion {
            name: "Nepal".to_string(),
            country: "Nepal".to_string(),
            description: "Mountains".to_string(),
            visa_info: "Visa on arrival".to_string(),
            average_cost: 700.0,
            cost_breakdown: CostBreakdown {
                accommodation: 300.0,
                food: 200.0,
                activities: 200.0,
            },
        }
    }

    #[test]
    fn test_round_trip_preserves_itinerary() {
        let saved = SavedPlan::new("Trip to Nepal", sample_plan(), destination());
        let text = saved.to_json().unwrap();

        let loaded = SavedPlan::load(&text).unwrap();
        assert_eq!(loaded.plan.day_count(), 2);
        let names: Vec<&str> = loaded.plan.activities().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Temple", "Market", "Hike"]);
        assert!(loaded.plan.activities().all(|a| !a.id.is_empty()));
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_saved_at_is_iso8601() {
        let saved = SavedPlan::new("x", sample_plan(), destination());
        let value: Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
        let stamp = value["savedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_load_assigns_missing_ids() {
        let mut value = serde_json::to_value(SavedPlan::new("x", sample_plan(), destination())).unwrap();
        value["plan"]["itinerary"][0]["activities"][0]
            .as_object_mut()
            .unwrap()
            .remove("id");
        value["plan"]["itinerary"][1]["activities"][0]["id"] = json!("");

        let loaded = SavedPlan::load(&value.to_string()).unwrap();
        assert!(loaded.plan.activities().all(|a| !a.id.is_empty()));
        assert_eq!(loaded.plan.itinerary[0].activities[1].id, "b");
    }

    #[test]
    fn test_load_rejects_missing_structure() {
        let full = serde_json::to_value(SavedPlan::new("x", sample_plan(), destination())).unwrap();

        for path in ["plan", "destination"] {
            let mut broken = full.clone();
            broken.as_object_mut().unwrap().remove(path);
            let err = SavedPlan::load(&broken.to_string()).unwrap_err();
            assert_eq!(err.to_string(), INVALID_FORMAT);
        }

        let mut broken = full.clone();
        broken["plan"].as_object_mut().unwrap().remove("itinerary");
        let err = SavedPlan::load(&broken.to_string()).unwrap_err();
        assert_eq!(err.to_string(), INVALID_FORMAT);
    }

    #[test]
    fn test_load_rejects_non_json() {
        let err = SavedPlan::load("<html>").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidFile(_)));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(file_name_for("Trip to Nepal"), "trip_to_nepal.json");
        assert_eq!(file_name_for("Été  2025!"), "t_2025.json");
        assert_eq!(file_name_for("summer-trip"), "summer-trip.json");
        assert_eq!(file_name_for("!!!"), "itinerary.json");
        assert_eq!(file_name_for(""), "itinerary.json");
    }
}
