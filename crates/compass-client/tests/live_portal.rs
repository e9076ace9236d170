//! # Live portal checks
//!
//! These tests talk to a real Compass portal and are `#[ignore]`d by default.
//! When run, they still skip (not fail) if the portal or credentials are
//! missing.
//!
//! ## Required environment variables
//!
//! ```bash
//! COMPASS_PORTAL__BASE_URL=school.compass.education
//! COMPASS_CREDENTIALS__USERNAME=...
//! COMPASS_CREDENTIALS__PASSWORD=...
//! ```
//!
//! `COMPASS_SESSION__COOKIES` may replace the credentials with cookies from
//! an earlier login.
//!
//! ## Run
//!
//! ```bash
//! cargo test -p compass-client --test live_portal -- --ignored --nocapture
//! ```

use compass_client::{CalendarEventsQuery, CompassClient, FeedItemsQuery, LearningTasksQuery};
use compass_config::CompassConfig;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn load_env() {
    let workspace_env = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join(".env"));

    if let Some(env_path) = workspace_env {
        let _ = dotenvy::from_path(&env_path);
    }
}

/// A connected client, or `None` when nothing is configured.
async fn live_client() -> Option<CompassClient> {
    init_tracing();
    load_env();
    let config = CompassConfig::load().ok()?;
    if !config.portal.is_configured()
        || !(config.credentials.is_configured() || config.session.is_configured())
    {
        eprintln!("SKIP: no live Compass portal configured");
        return None;
    }
    Some(CompassClient::connect(&config).await.expect("connect to live portal"))
}

#[tokio::test]
#[ignore = "needs a live Compass portal"]
async fn live_user_profile() {
    let Some(mut client) = live_client().await else {
        return;
    };

    let id = client.get_user_id().unwrap();
    assert!(id > 0);

    let details = client.get_user_details().await.unwrap();
    assert!(details.full_name.is_some() || details.first_name.is_some());

    let name = client.get_user_name().await.unwrap();
    assert!(name.name.is_some());

    client.logout().await.unwrap();
}

#[tokio::test]
#[ignore = "needs a live Compass portal"]
async fn live_reference_data() {
    let Some(mut client) = live_client().await else {
        return;
    };

    let locations = client.get_all_locations().await.unwrap();
    eprintln!("locations: {}", locations.len());
    let terms = client.get_all_terms().await.unwrap();
    assert!(!terms.is_empty());
    let year_levels = client.get_all_year_levels().await.unwrap();
    eprintln!("year levels: {}", year_levels.len());
    let campuses = client.get_all_campuses().await.unwrap();
    eprintln!("campuses: {}", campuses.len());
    let subjects = client.get_all_subjects().await.unwrap();
    eprintln!("subjects: {}", subjects.len());

    client.logout().await.unwrap();
}

#[tokio::test]
#[ignore = "needs a live Compass portal"]
async fn live_calendar_and_feed() {
    let Some(mut client) = live_client().await else {
        return;
    };

    let events = client
        .get_calendar_events(CalendarEventsQuery::default().limit(100))
        .await
        .unwrap();
    let starts: Vec<_> = events.iter().filter_map(|e| e.start).collect();
    assert!(starts.windows(2).all(|w| w[0] <= w[1]), "events sorted by start");

    let items = client
        .get_feed_items(FeedItemsQuery::default().count(5))
        .await
        .unwrap();
    assert!(items.len() <= 5);

    client.logout().await.unwrap();
}

#[tokio::test]
#[ignore = "needs a live Compass portal"]
async fn live_learning_tasks_for_latest_group() {
    let Some(mut client) = live_client().await else {
        return;
    };

    let groups = client.get_all_academic_groups().await.unwrap();
    let Some(group_id) = groups.iter().filter_map(|g| g.id).max() else {
        eprintln!("SKIP: portal lists no academic groups");
        return;
    };
    let tasks = client
        .get_all_learning_tasks(LearningTasksQuery::new(group_id).limit(20))
        .await
        .unwrap();
    eprintln!("learning tasks in group {group_id}: {}", tasks.len());

    client.logout().await.unwrap();
}
