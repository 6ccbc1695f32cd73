//! Planner domain types
//!
//! Typed shapes for every model response and for the plan the client edits.
//! Field names follow the camelCase JSON used by the model schemas and the
//! saved-plan file.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlannerError, Result};

/// Estimated spend split into the three buckets the prompts ask for (USD).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.accommodation + self.food + self.activities
    }
}

/// A candidate country to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSuggestion {
    pub name: String,
    pub country: String,
    pub description: String,
    pub visa_info: String,
    /// Estimated 7-day solo trip cost in USD
    pub average_cost: f64,
    pub cost_breakdown: CostBreakdown,
}

/// Country details returned when the user names a destination directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub description: String,
    pub visa_info: String,
    pub average_cost: f64,
    pub cost_breakdown: CostBreakdown,
}

impl CountryInfo {
    /// Placeholder used when the model cannot describe a country.
    pub fn fallback() -> Self {
        Self {
            description: "An amazing travel destination with rich culture and beautiful landscapes."
                .to_string(),
            visa_info:
                "Visa requirements could not be fetched. Please check official government sources."
                    .to_string(),
            average_cost: 0.0,
            cost_breakdown: CostBreakdown::default(),
        }
    }

    pub fn into_destination(self, country: &str) -> DestinationSuggestion {
        DestinationSuggestion {
            name: country.to_string(),
            country: country.to_string(),
            description: self.description,
            visa_info: self.visa_info,
            average_cost: self.average_cost,
            cost_breakdown: self.cost_breakdown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Touristy,
    #[serde(rename = "Off-beat")]
    OffBeat,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::Touristy => f.write_str("Touristy"),
            ActivityType::OffBeat => f.write_str("Off-beat"),
        }
    }
}

/// Requested balance between well-known sights and local experiences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItineraryStyle {
    #[default]
    Mixed,
    Touristy,
    #[serde(rename = "Off-beat")]
    OffBeat,
}

impl fmt::Display for ItineraryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItineraryStyle::Mixed => f.write_str("Mixed"),
            ItineraryStyle::Touristy => f.write_str("Touristy"),
            ItineraryStyle::OffBeat => f.write_str("Off-beat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialLink {
    pub title: String,
    pub url: String,
}

/// One activity in a day's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryLocation {
    /// Stable identifier; empty until assigned
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub link: String,
    pub average_cost: f64,
    pub cost_breakdown: CostBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<OfficialLink>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: u32,
    pub title: String,
    pub activities: Vec<ItineraryLocation>,
    /// Markdown bullet list of dos, don'ts and scam warnings
    pub keep_in_mind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingListCategory {
    pub category_name: String,
    pub items: Vec<String>,
}

// == Travel Plan ==
/// A generated itinerary plus the client's packing-list state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub itinerary: Vec<DailyPlan>,
    pub optimization_suggestions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_links: Option<Vec<OfficialLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packing_list: Option<Vec<PackingListCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_packing_items: Option<BTreeMap<String, bool>>,
}

impl TravelPlan {
    /// Rejects plans the rest of the service cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.itinerary.is_empty() {
            return Err(PlannerError::InvalidRequest(
                "itinerary must contain at least one day".to_string(),
            ));
        }
        Ok(())
    }

    pub fn day_count(&self) -> usize {
        self.itinerary.len()
    }

    pub fn activities(&self) -> impl Iterator<Item = &ItineraryLocation> {
        self.itinerary.iter().flat_map(|day| day.activities.iter())
    }

    /// Sum of the per-activity cost estimates.
    pub fn activity_cost(&self) -> f64 {
        self.activities().map(|a| a.average_cost).sum()
    }

    // == Identifiers ==
    /// Gives every activity a new random id.
    pub fn assign_fresh_ids(&mut self) {
        for activity in self.activities_mut() {
            activity.id = Uuid::new_v4().to_string();
        }
    }

    /// Gives an id to every activity that lacks one, keeping existing ids.
    pub fn assign_missing_ids(&mut self) {
        for activity in self.activities_mut() {
            if activity.id.trim().is_empty() {
                activity.id = Uuid::new_v4().to_string();
            }
        }
    }

    fn activities_mut(&mut self) -> impl Iterator<Item = &mut ItineraryLocation> {
        self.itinerary
            .iter_mut()
            .flat_map(|day| day.activities.iter_mut())
    }

    // == Editing ==
    /// Removes the activity `activity_id` from day `day_index`.
    ///
    /// Returns whether anything was removed.
    pub fn delete_activity(&mut self, day_index: usize, activity_id: &str) -> bool {
        let Some(day) = self.itinerary.get_mut(day_index) else {
            return false;
        };
        let before = day.activities.len();
        day.activities.retain(|a| a.id != activity_id);
        day.activities.len() != before
    }

    /// Reorders day `day_index` to follow `order`, a permutation of its ids.
    pub fn reorder_activities(&mut self, day_index: usize, order: &[String]) -> Result<()> {
        let day = self.itinerary.get_mut(day_index).ok_or_else(|| {
            PlannerError::InvalidRequest(format!("no day at index {}", day_index))
        })?;

        let current: HashSet<&str> = day.activities.iter().map(|a| a.id.as_str()).collect();
        let requested: HashSet<&str> = order.iter().map(String::as_str).collect();
        if order.len() != day.activities.len() || current != requested {
            return Err(PlannerError::InvalidRequest(
                "new order must list every activity of the day exactly once".to_string(),
            ));
        }

        let mut remaining = std::mem::take(&mut day.activities);
        for id in order {
            if let Some(pos) = remaining.iter().position(|a| &a.id == id) {
                day.activities.push(remaining.swap_remove(pos));
            }
        }
        Ok(())
    }

    // == Packing List ==
    /// Replaces the packing list and clears every checkmark.
    pub fn set_packing_list(&mut self, list: Vec<PackingListCategory>) {
        self.packing_list = Some(list);
        self.checked_packing_items = Some(BTreeMap::new());
    }

    /// Flips the checked state of `item`; returns the new state.
    pub fn toggle_packing_item(&mut self, item: &str) -> bool {
        let checked = self.checked_packing_items.get_or_insert_with(BTreeMap::new);
        let state = checked.entry(item.to_string()).or_insert(false);
        *state = !*state;
        *state
    }

    /// Adds `item` to `category`, keeping the category sorted.
    ///
    /// Returns `false` when there is no packing list, the category does not
    /// exist, or the item is already listed anywhere.
    pub fn add_packing_item(&mut self, category: &str, item: &str) -> bool {
        let Some(list) = self.packing_list.as_mut() else {
            return false;
        };
        if list.iter().any(|c| c.items.iter().any(|i| i == item)) {
            return false;
        }
        match list.iter_mut().find(|c| c.category_name == category) {
            Some(cat) => {
                cat.items.push(item.to_string());
                cat.items.sort();
                true
            }
            None => false,
        }
    }
}

// == Plan Edits ==
/// One user edit to a plan, as sent to `POST /plans/edit`.
///
/// Tagged by `op` on the wire, e.g.
/// `{"op": "deleteActivity", "dayIndex": 0, "activityId": "a1"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PlanEdit {
    #[serde(rename_all = "camelCase")]
    DeleteActivity { day_index: usize, activity_id: String },
    #[serde(rename_all = "camelCase")]
    ReorderActivities { day_index: usize, order: Vec<String> },
    #[serde(rename_all = "camelCase")]
    SetPackingList { packing_list: Vec<PackingListCategory> },
    TogglePackingItem { item: String },
    AddPackingItem { category: String, item: String },
}

impl PlanEdit {
    /// Applies the edit to `plan` in place.
    ///
    /// An edit that would change nothing (unknown activity, duplicate or
    /// misplaced packing item) is rejected rather than silently ignored.
    pub fn apply(&self, plan: &mut TravelPlan) -> Result<()> {
        match self {
            PlanEdit::DeleteActivity {
                day_index,
                activity_id,
            } => {
                if !plan.delete_activity(*day_index, activity_id) {
                    return Err(PlannerError::InvalidRequest(format!(
                        "no activity {} on day index {}",
                        activity_id, day_index
                    )));
                }
            }
            PlanEdit::ReorderActivities { day_index, order } => {
                plan.reorder_activities(*day_index, order)?;
            }
            PlanEdit::SetPackingList { packing_list } => {
                plan.set_packing_list(packing_list.clone());
            }
            PlanEdit::TogglePackingItem { item } => {
                plan.toggle_packing_item(item);
            }
            PlanEdit::AddPackingItem { category, item } => {
                let item = item.trim();
                if item.is_empty() || !plan.add_packing_item(category, item) {
                    return Err(PlannerError::InvalidRequest(format!(
                        "cannot add {:?} to packing category {:?}",
                        item, category
                    )));
                }
            }
        }
        Ok(())
    }
}
