//! `GetCalendarEventsByUser`: classes, exams and events on the user's
//! calendar.

use chrono::{NaiveDate, Utc};
use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, lenient_string, parse_timestamp};
use compass_core::entities::{CalendarEvent, CalendarEventLocation, CalendarEventManager};
use compass_session::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetCalendarEventsByUser";
const PATH: &str =
    "/Services/Calendar.svc/GetCalendarEventsByUser?sessionstate=readonly&ExcludeNonRelevantPd=true";

/// Date range and page size for [`CompassClient::get_calendar_events`].
///
/// Unset dates default to today (UTC); an unset limit falls back to the
/// client's `calendar_limit` default. A range spanning several days may need
/// a larger limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEventsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl CalendarEventsQuery {
    /// Events on a single day.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            end_date: Some(date),
            limit: None,
        }
    }

    /// Events from `start` to `end`, inclusive.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            limit: None,
        }
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn body(&self, user_id: i64, default_limit: u32) -> Value {
        let today = Utc::now().date_naive();
        json!({
            "userId": user_id,
            "homePage": true,
            "activityId": null,
            "locationId": null,
            "staffIds": null,
            "startDate": self.start_date.unwrap_or(today).format("%Y-%m-%d").to_string(),
            "endDate": self.end_date.unwrap_or(today).format("%Y-%m-%d").to_string(),
            "page": 1,
            "start": 0,
            "limit": self.limit.unwrap_or(default_limit),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLocation {
    #[serde(rename = "locationID", deserialize_with = "lenient_i64")]
    location_id: Option<i64>,
    location_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawManager {
    #[serde(rename = "managerUserID", deserialize_with = "lenient_i64")]
    manager_user_id: Option<i64>,
    manager_import_identifier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawEvent {
    #[serde(deserialize_with = "lenient_i64")]
    activity_id: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    instance_id: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    all_day: Option<bool>,
    start: Option<String>,
    finish: Option<String>,
    end: Option<String>,
    locations: Option<Vec<RawLocation>>,
    managers: Option<Vec<RawManager>>,
    long_title: Option<String>,
    long_title_without_time: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    period: Option<i64>,
    #[serde(deserialize_with = "lenient_bool")]
    roll_marked: Option<bool>,
    subject_long_name: Option<String>,
    title: Option<String>,
}

fn normalize(raw: RawEvent) -> CalendarEvent {
    CalendarEvent {
        activity_id: raw.activity_id,
        instance_id: raw.instance_id,
        all_day: raw.all_day,
        start: parse_timestamp(raw.start.as_deref()),
        end: parse_timestamp(raw.end.or(raw.finish).as_deref()),
        locations: raw
            .locations
            .unwrap_or_default()
            .into_iter()
            .map(|l| CalendarEventLocation {
                location_id: l.location_id,
                location_name: l.location_name,
            })
            .collect(),
        managers: raw
            .managers
            .unwrap_or_default()
            .into_iter()
            .map(|m| CalendarEventManager {
                user_id: m.manager_user_id,
                identifier: m.manager_import_identifier,
            })
            .collect(),
        long_title: raw.long_title,
        long_title_without_time: raw.long_title_without_time,
        period: raw.period,
        roll_marked: raw.roll_marked,
        subject_long_name: raw.subject_long_name,
        subject_title: raw.title,
    }
}

/// Normalize and order by start time. Events without a start sort last;
/// ties keep portal order.
fn normalize_all(raw: Vec<RawEvent>) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = raw.into_iter().map(normalize).collect();
    events.sort_by_key(|e| (e.start.is_none(), e.start));
    events
}

/// Decode a captured `GetCalendarEventsByUser` response, sorted by start.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<CalendarEvent>> {
    let raw: Vec<RawEvent> = decode_envelope(OPERATION, response)?;
    Ok(normalize_all(raw))
}

impl CompassClient {
    /// Calendar events for the signed-in user, sorted by start time.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_calendar_events(&self, query: CalendarEventsQuery) -> Result<Vec<CalendarEvent>> {
        let body = query.body(self.get_user_id()?, self.defaults().calendar_limit);
        let raw: Vec<RawEvent> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        let events = normalize_all(raw);
        tracing::debug!(count = events.len(), "calendar events fetched");
        Ok(events)
    }
}
