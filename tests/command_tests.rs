#![cfg(feature = "telegram")]

use std::sync::Arc;

use pricewatch::adapter::outbound::history::JsonHistoryStore;
use pricewatch::adapter::outbound::notifier::telegram::control::{NO_DATA_TEXT, WELCOME_TEXT};
use pricewatch::adapter::outbound::notifier::telegram::{
    command_response_for_message, TelegramControl,
};
use pricewatch::domain::{History, Observation};
use pricewatch::port::HistoryStore;

fn control_for(dir: &tempfile::TempDir) -> (Arc<JsonHistoryStore>, TelegramControl) {
    let store = Arc::new(JsonHistoryStore::new(dir.path().join("history.json")));
    let control = TelegramControl::new(store.clone());
    (store, control)
}

#[test]
fn price_without_history_returns_no_data_message() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (_, control) = control_for(&dir);

    assert_eq!(
        command_response_for_message("/price", &control).as_deref(),
        Some(NO_DATA_TEXT)
    );
}

#[test]
fn price_returns_newest_stored_text() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (store, control) = control_for(&dir);
    store
        .save(&History::from_entries(vec![
            Observation {
                id: 2,
                date: "16/10/2026, 15:00:00".into(),
                price: "1.299,00 €".into(),
            },
            Observation {
                id: 1,
                date: "15/10/2026, 15:00:00".into(),
                price: "1.399,00 €".into(),
            },
        ]))
        .expect("seed history");

    assert_eq!(
        command_response_for_message("/price@pricewatch_bot", &control).as_deref(),
        Some("Current price: 1.299,00 €")
    );
}

#[test]
fn corrupt_history_reads_as_no_data() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (store, control) = control_for(&dir);
    std::fs::write(store.path(), "[{").expect("write corrupt file");

    assert_eq!(
        command_response_for_message("/price", &control).as_deref(),
        Some(NO_DATA_TEXT)
    );
}

#[test]
fn start_returns_welcome() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (_, control) = control_for(&dir);

    assert_eq!(
        command_response_for_message("/start", &control).as_deref(),
        Some(WELCOME_TEXT)
    );
}

#[test]
fn other_messages_get_no_reply() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (_, control) = control_for(&dir);

    assert!(command_response_for_message("what is the price?", &control).is_none());
    assert!(command_response_for_message("/pause", &control).is_none());
}
