//! Prompt templates and response schemas
//!
//! Each request pairs a prompt with the Gemini response schema its answer
//! must follow. Schemas use the API's upper-case type names.

use serde_json::{json, Value};

use super::models::{ItineraryLocation, ItineraryStyle, TravelPlan};

/// The trip cost basis every estimate is phrased against.
const COST_BASIS: &str = "An estimated average cost in USD for a solo traveler for a 7-day trip, including mid-range (3-4 star) hotels, daily meals, and one tourist activity per day. Provide only a single number for the cost. Also provide a breakdown of this 7-day cost into 'accommodation', 'food', and 'activities'.";

const LINK_RULE: &str = "A **valid, working URL from TripAdvisor** for the specific activity. If a TripAdvisor link is absolutely not available, you may use a link from Viator or GetYourGuide. This is a strict requirement; do not use any other sources like blogs, government sites, or Google Maps.";

const COST_RULE: &str = "For most activities, 'accommodation' will be 0. Include 'food' costs only if it's a primary part of the experience (like a food tour). 'activities' should be the ticket/entrance fee. The total 'averageCost' must be the sum of the breakdown. If an activity is free, all cost values should be 0.";

// == Schemas ==

fn cost_breakdown_schema(description: &str) -> Value {
    json!({
        "type": "OBJECT",
        "description": description,
        "properties": {
            "accommodation": { "type": "NUMBER" },
            "food": { "type": "NUMBER" },
            "activities": { "type": "NUMBER" }
        },
        "required": ["accommodation", "food", "activities"]
    })
}

fn destination_properties() -> Value {
    json!({
        "description": { "type": "STRING" },
        "visaInfo": {
            "type": "STRING",
            "description": "Visa requirements for Indian citizens, including e-visa or visa on arrival details."
        },
        "averageCost": {
            "type": "NUMBER",
            "description": "Estimated 7-day cost in USD for a solo traveler."
        },
        "costBreakdown": cost_breakdown_schema("Breakdown of the 7-day cost.")
    })
}

/// Schema for [`super::models::CountryInfo`].
pub fn country_info_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": destination_properties(),
        "required": ["description", "visaInfo", "averageCost", "costBreakdown"]
    })
}

/// Schema for a list of [`super::models::DestinationSuggestion`].
pub fn suggestions_schema() -> Value {
    let mut properties = destination_properties();
    properties["name"] = json!({ "type": "STRING", "description": "The name of the country." });
    properties["country"] = json!({ "type": "STRING", "description": "The name of the country." });

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": ["name", "country", "description", "visaInfo", "averageCost", "costBreakdown"]
        }
    })
}

/// Schema for [`TravelPlan`].
pub fn travel_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "itinerary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "INTEGER" },
                        "title": { "type": "STRING" },
                        "activities": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": { "type": "STRING" },
                                    "description": { "type": "STRING" },
                                    "type": { "type": "STRING", "enum": ["Touristy", "Off-beat"] },
                                    "link": {
                                        "type": "STRING",
                                        "description": "A valid, working URL for booking or information from a reputable site like TripAdvisor about the activity."
                                    },
                                    "averageCost": {
                                        "type": "NUMBER",
                                        "description": "Estimated cost per person in USD. Must be the sum of the breakdown."
                                    },
                                    "costBreakdown": cost_breakdown_schema("Cost breakdown per person. Accommodation is usually 0.")
                                },
                                "required": ["name", "description", "type", "link", "averageCost", "costBreakdown"]
                            }
                        },
                        "keepInMind": {
                            "type": "STRING",
                            "description": "A bulleted markdown list of dos, don'ts and local scam warnings relevant to the day's activities."
                        }
                    },
                    "required": ["day", "title", "activities", "keepInMind"]
                }
            },
            "optimizationSuggestions": {
                "type": "STRING",
                "description": "A paragraph with tips to optimize the travel schedule."
            },
            "officialLinks": {
                "type": "ARRAY",
                "description": "Up to 4 official tourism links for the country.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "url": { "type": "STRING" }
                    },
                    "required": ["title", "url"]
                }
            }
        },
        "required": ["itinerary", "optimizationSuggestions", "officialLinks"]
    })
}

/// Schema for a list of [`super::models::PackingListCategory`].
pub fn packing_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "categoryName": { "type": "STRING" },
                "items": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["categoryName", "items"]
        }
    })
}

// == Prompts ==

fn style_instruction(style: ItineraryStyle) -> &'static str {
    match style {
        ItineraryStyle::Mixed => "The itinerary should include a good mix of both popular tourist attractions and off-beat local experiences.",
        ItineraryStyle::Touristy => "The itinerary should focus exclusively on popular, well-known tourist attractions.",
        ItineraryStyle::OffBeat => "The itinerary should focus exclusively on unique, off-the-beaten-path experiences and local secrets.",
    }
}

fn user_requests(notes: &str) -> String {
    if notes.trim().is_empty() {
        String::new()
    } else {
        format!(
            "*   **User Requests:** Please carefully consider and incorporate the following user preferences into the itinerary: \"{}\"",
            notes.trim()
        )
    }
}

pub fn country_info_prompt(country: &str) -> String {
    format!(
        "You are an expert travel agent. For the country \"{country}\", provide:
1. A short, compelling description of why it's a good travel destination (2-3 sentences).
2. A summary of visa requirements for Indian citizens. Specifically mention if an e-visa or visa on arrival is available.
3. {COST_BASIS}"
    )
}

/// `continent == "Any"` (or blank) leaves the region open.
pub fn suggestions_prompt(budget: &str, time_of_year: &str, continent: &str) -> String {
    let region = if continent.trim().is_empty() || continent.eq_ignore_ascii_case("any") {
        String::new()
    } else {
        format!(" within {}", continent.trim())
    };
    format!(
        "You are an expert travel agent. Based on a {budget} budget and traveling during {time_of_year}, suggest 7-8 countries to visit{region}. For each country, provide:
1. Its name.
2. A short, compelling description (2-3 sentences).
3. A summary of visa requirements for Indian citizens (mention e-visa/visa on arrival).
4. {COST_BASIS}"
    )
}

pub fn off_beat_prompt() -> String {
    format!(
        "You are an expert travel agent who specializes in lesser-known destinations. Suggest 7-8 underrated countries that most travelers overlook but that offer rich culture, nature and good value. Avoid the world's most visited countries. For each country, provide:
1. Its name.
2. A short, compelling description (2-3 sentences) of what makes it special.
3. A summary of visa requirements for Indian citizens (mention e-visa/visa on arrival).
4. {COST_BASIS}"
    )
}

/// `duration == 0` lets the model pick the trip length.
pub fn travel_plan_prompt(country: &str, duration: u32, style: ItineraryStyle, notes: &str) -> String {
    let length = if duration == 0 {
        "Decide the ideal trip length for a first-time visitor who wants to see the country's highlights without rushing (typically between 5 and 14 days), then create a day-by-day plan for that many days.".to_string()
    } else {
        format!("Create a day-by-day plan for a {}-day trip.", duration)
    };
    let style = style_instruction(style);
    let requests = user_requests(notes);

    format!(
        "You are an expert travel planner specializing in {country}.
Your task is to create a highly optimized and logical travel itinerary.

**Instructions:**

1.  **Generate Itinerary:** {length}
    *   **Style:** {style}
    *   **Daily Structure:** For each day, provide a day number, a creative title, and a list of 2-4 activities.
    *   **Activity Details:** For each activity, you **must** provide:
        1.  Its name.
        2.  A short description (1-2 sentences).
        3.  Classification as 'Touristy' or 'Off-beat'.
        4.  {LINK_RULE}
        5.  An estimated average cost per person in USD.
        6.  A cost breakdown into 'accommodation', 'food', and 'activities'. {COST_RULE}
    *   **Logical Flow:** Ensure daily activities are geographically grouped.
    *   **Keep in Mind Section:** For each day, provide a \"Keep in Mind\" section. This must be a short, bulleted list of crucial advice including at least one \"Do\", one \"Don't\", and a warning about a specific, relevant scam if common. Use markdown for bullet points (e.g., `* Do try the local street food...`).
    {requests}

2.  **Provide Official Links:** List up to 4 highly relevant official tourism links for {country} (e.g., national tourism board, national parks). For each, provide a concise title and the full URL.

3.  **Review and Optimize:** Write a summary of optimization suggestions (e.g., best order to visit attractions, morning/afternoon splits)."
    )
}

/// Activity fields the model needs to re-plan; ids and day layout are dropped.
fn activity_digest(activity: &ItineraryLocation) -> Value {
    json!({
        "name": activity.name,
        "description": activity.description,
        "type": activity.kind,
        "link": activity.link,
        "averageCost": activity.average_cost,
        "costBreakdown": activity.cost_breakdown,
    })
}

pub fn rebuild_plan_prompt(
    country: &str,
    duration: usize,
    style: ItineraryStyle,
    plan: &TravelPlan,
    notes: &str,
) -> String {
    let activities: Vec<Value> = plan.activities().map(activity_digest).collect();
    let activity_json =
        serde_json::to_string_pretty(&activities).unwrap_or_else(|_| "[]".to_string());
    let style = style_instruction(style);
    let requests = user_requests(notes);

    format!(
        "You are an expert travel planner specializing in {country}.
A user has modified their itinerary and wants you to re-optimize it.

**Instructions:**

1.  **Rebuild Itinerary:** The user has provided the following list of activities they want to do. Create a new, optimized {duration}-day itinerary using **only** these activities. Do not add or remove any activities from this list.
    *   **User's Selected Activities:**
        ```json
{activity_json}
        ```
    *   **Style:** {style}
    *   **Logic:** Group the activities logically and geographically for each day into a {duration}-day plan.
    *   **Structure:** For each day, provide a day number, a creative title, and the list of activities. For each activity, retain its original details. If an activity is missing a link, you **must** find a valid one. {LINK_RULE} Ensure the cost breakdown rules are followed: {COST_RULE}
    *   **Keep in Mind Section:** Based on the newly arranged activities for each day, generate a *new* \"Keep in Mind\" section with relevant dos, don'ts, and scam warnings. Use markdown for bullet points.
    {requests}

2.  **Provide Official Links:** List up to 4 highly relevant official tourism links for {country}.

3.  **Review and Optimize:** Write a *new* summary of optimization suggestions based on the rebuilt itinerary."
    )
}

pub fn packing_list_prompt(country: &str, plan: &TravelPlan) -> String {
    let activities: Vec<&str> = plan.activities().map(|a| a.name.as_str()).collect();
    format!(
        "You are an expert travel planner. Create a practical packing list for a {days}-day trip to {country}. The traveler plans these activities: {activities}.
Group the items into 4-7 categories (for example Clothing, Toiletries, Documents, Electronics, Health, Activity Gear). Each category should list 3-10 concise item names tailored to the destination's climate, culture and the planned activities. Do not repeat an item across categories.",
        days = plan.day_count(),
        activities = activities.join(", "),
    )
}

/// Joins the original plan notes with refinement notes, dropping blanks.
pub fn combine_notes(notes: &str, refinement: &str) -> String {
    [notes.trim(), refinement.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\nAdditional Refinements:\n")
}
