use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// e.g. `15 years, 3 months`.
    pub verbose_age: Option<String>,
    /// Kept as the portal's text, e.g. `10 Jan 2009`.
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub compass_id: Option<String>,
    /// School-wide code, e.g. `ABC-0000`.
    pub display_code: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Includes the preferred name, e.g. `John (Johnny) Doe`.
    pub full_name: Option<String>,
    pub preferred_name: Option<String>,
    pub preferred_last_name: Option<String>,
    pub form_group: Option<String>,
    pub house: Option<String>,
    pub photo_url: Option<String>,
    pub year_level: Option<i64>,
}

/// Name forms the portal renders for a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    pub name: Option<String>,
    pub name_first_pref_last_id_form: Option<String>,
    pub name_pref_last_id: Option<String>,
    pub title: Option<String>,
}
