mod support;

use std::sync::Arc;

use serde_json::json;
use slotwatch::adapter::outbound::sqlite::SqliteStore;
use slotwatch::port::{KeyValueStore, StateStore};
use slotwatch::testkit::clinic::MockClinic;
use support::t0;

#[tokio::test]
async fn sqlite_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("state.db").display().to_string();
    let clinic = MockClinic::new("Reggie Lewis", 42);

    {
        let state = StateStore::new(Arc::new(SqliteStore::open(&url).unwrap()));
        state.save_count(&clinic).await.unwrap();
        state.save_post_time(&clinic, t0()).await.unwrap();
        state
            .save_session("ma-immunization", json!({"_session": "abc"}), t0())
            .await
            .unwrap();
    }

    let state = StateStore::new(Arc::new(SqliteStore::open(&url).unwrap()));
    assert_eq!(state.get_count(&clinic).await.unwrap(), 42);
    assert_eq!(state.get_post_time(&clinic).await.unwrap(), Some(t0()));
    let session = state.get_session("ma-immunization").await.unwrap().unwrap();
    assert_eq!(session.cookies["_session"], "abc");
}

#[tokio::test]
async fn sqlite_set_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("state.db").display().to_string()).unwrap();

    store.set("slack-vaccine-appt:Alpha", "10").await.unwrap();
    store.set("slack-vaccine-appt:Alpha", "20").await.unwrap();
    assert_eq!(
        store.get("slack-vaccine-appt:Alpha").await.unwrap(),
        Some("20".to_string())
    );
    assert_eq!(store.get("slack-vaccine-appt:Beta").await.unwrap(), None);
}
