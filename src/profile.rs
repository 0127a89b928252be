//! User profile model and the accumulator that builds it step by step.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// Where the user lives. Replaced wholesale on merge: a patch carrying
/// a `location` overwrites all three fields, so callers editing one
/// field must carry the others forward themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

fn serialize_password<S>(password: &Option<SecretString>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match password {
        Some(p) => s.serialize_some(p.expose_secret()),
        None => s.serialize_none(),
    }
}

/// Profile collected across the wizard's steps.
///
/// Every field is optional (or empty) until the terminal submission
/// step; the wizard only insists on the email before verification and
/// the password pair at the end. Serialized field names follow the
/// submission backend's camelCase contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    // Basic demographics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,

    // Tobacco consumption history
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tobacco_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_use: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_consumption: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_smoking_age: Option<u32>,

    // Triggers and context
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub main_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub situational_triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotional_triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_times: Vec<String>,

    // Health and lifestyle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medical_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mental_health_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_activity_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet_habits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol_consumption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caffeine_consumption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<String>,

    // Motivation and readiness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_reason_to_quit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_to_quit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_quit_method: Option<String>,

    // Behavioral and psychological
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_discipline_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coping_strategies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_habits: Vec<String>,

    // Financial
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_tobacco_expense: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_reward_method: Vec<String>,

    // Digital preferences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub communication_preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub motivational_content_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will_share_progress: Option<String>,

    /// Set by the controller at the terminal step, never mid-wizard.
    /// Redacted in Debug output; exposed on the wire for submission.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_password"
    )]
    pub password: Option<SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A partial profile update: only the fields present in the patch are
/// applied. One patch per user edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub location: Option<Location>,
    pub occupation: Option<String>,
    pub education_level: Option<String>,
    pub tobacco_types: Option<Vec<String>>,
    pub brand_preference: Option<String>,
    pub years_of_use: Option<u32>,
    pub daily_consumption: Option<u32>,
    pub first_smoking_age: Option<u32>,
    pub main_reasons: Option<Vec<String>>,
    pub situational_triggers: Option<Vec<String>>,
    pub emotional_triggers: Option<Vec<String>>,
    pub preferred_times: Option<Vec<String>>,
    pub medical_conditions: Option<Vec<String>>,
    pub mental_health_conditions: Option<Vec<String>>,
    pub physical_activity_level: Option<String>,
    pub diet_habits: Option<String>,
    pub alcohol_consumption: Option<String>,
    pub caffeine_consumption: Option<String>,
    pub sleep_hours: Option<u32>,
    pub sleep_quality: Option<String>,
    pub primary_reason_to_quit: Option<String>,
    pub confidence_level: Option<u8>,
    pub readiness_to_quit: Option<String>,
    pub preferred_quit_method: Option<String>,
    pub self_discipline_level: Option<String>,
    pub coping_strategies: Option<Vec<String>>,
    pub alternative_habits: Option<Vec<String>>,
    pub monthly_tobacco_expense: Option<u32>,
    pub preferred_reward_method: Option<Vec<String>>,
    pub communication_preferences: Option<Vec<String>>,
    pub motivational_content_types: Option<Vec<String>>,
    pub will_share_progress: Option<String>,
}

/// Holds the partial profile for the session and merges edits into it.
///
/// No validation happens here; validators and the controller check
/// fields at transition time, the accumulator just stores.
#[derive(Debug, Default)]
pub struct ProfileAccumulator {
    profile: UserProfile,
}

impl ProfileAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: fields present in the patch replace, absent fields
    /// are left untouched. `location` is one field at this level, so a
    /// patch carrying it replaces the whole nested object.
    pub fn merge(&mut self, update: ProfileUpdate) {
        let p = &mut self.profile;
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = update.$field {
                    p.$field = Some(v);
                })*
            };
        }
        macro_rules! apply_list {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = update.$field {
                    p.$field = v;
                })*
            };
        }
        apply!(
            name,
            email,
            age,
            gender,
            location,
            occupation,
            education_level,
            brand_preference,
            years_of_use,
            daily_consumption,
            first_smoking_age,
            physical_activity_level,
            diet_habits,
            alcohol_consumption,
            caffeine_consumption,
            sleep_hours,
            sleep_quality,
            primary_reason_to_quit,
            confidence_level,
            readiness_to_quit,
            preferred_quit_method,
            self_discipline_level,
            monthly_tobacco_expense,
            will_share_progress,
        );
        apply_list!(
            tobacco_types,
            main_reasons,
            situational_triggers,
            emotional_triggers,
            preferred_times,
            medical_conditions,
            mental_health_conditions,
            coping_strategies,
            alternative_habits,
            preferred_reward_method,
            communication_preferences,
            motivational_content_types,
        );
    }

    /// Current snapshot, by reference. Callers display it; they do not
    /// mutate it directly.
    pub fn read(&self) -> &UserProfile {
        &self.profile
    }

    /// Mutable access for the controller's terminal stamping (password,
    /// completion time).
    pub(crate) fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }
}
