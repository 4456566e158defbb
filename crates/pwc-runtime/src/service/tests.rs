use super::*;
use crate::store::{MemoryStore, StoreError};
use chrono::{Duration, TimeZone};
use pwc_event::EventKind;
use pwc_types::ErrorCode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::collections::BTreeMap;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
}

fn channel() -> ChannelName {
    "streamer".parse().unwrap()
}

fn service() -> SolveService<MemoryStore> {
    SolveService::from_config(MemoryStore::new(), &PwcConfig::default())
}

fn crossword_puzzle() -> crossword::Puzzle {
    let across = BTreeMap::from([(1, "Audience session".into()), (4, "Notions".into())]);
    let down = BTreeMap::from([
        (1, "Sound of a duck, almost".into()),
        (2, "Christmas, in Paris, minus a letter".into()),
        (3, "Latin arts".into()),
    ]);
    crossword::Puzzle::from_grid(&["QANDA", "U#O#R", "IDEAS"], across, down).unwrap()
}

fn bee_puzzle() -> spellingbee::Puzzle {
    let official = vec!["COUNT".to_string(), "COUNTRY".to_string()];
    let unofficial = vec!["CONTO".to_string()];
    spellingbee::Puzzle::infer(&official, &unofficial, false).unwrap()
}

fn kinds(stream: &mut ViewerStream) -> Vec<EventKind> {
    std::iter::from_fn(|| stream.try_recv()).map(|e| e.kind).collect()
}

async fn solving_crossword(service: &SolveService<MemoryStore>) {
    service
        .select_puzzle::<crossword::State>(&channel(), crossword_puzzle())
        .await
        .unwrap();
    service
        .toggle_status::<crossword::State>(&channel(), t0())
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_values_load_as_defaults() {
    let service = service();
    let state = service.state::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(state.status(), Status::Created);
    assert!(!state.has_puzzle());
    let settings = service.settings::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(settings, crossword::Settings::default());
}

#[tokio::test]
async fn connect_seeds_settings_then_state() {
    let service = service();
    let mut before = service.connect::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(kinds(&mut before), vec![EventKind::Settings]);

    service
        .select_puzzle::<crossword::State>(&channel(), crossword_puzzle())
        .await
        .unwrap();
    assert_eq!(kinds(&mut before), vec![EventKind::State]);

    let mut after = service.connect::<crossword::State>(&channel()).await.unwrap();
    let seeded: Vec<_> = std::iter::from_fn(|| after.try_recv()).collect();
    assert_eq!(seeded[0].kind, EventKind::Settings);
    assert_eq!(seeded[1].kind, EventKind::State);
    let payload = seeded[1].payload.as_ref().unwrap();
    assert_eq!(payload["status"], json!("selected"));
    assert_eq!(payload["puzzle"]["cells"], json!([]));
}

#[tokio::test]
async fn crossword_solve_publishes_and_completes() {
    let service = service();
    let mut viewer = service.connect::<crossword::State>(&channel()).await.unwrap();
    solving_crossword(&service).await;
    kinds(&mut viewer);

    let later = t0() + Duration::seconds(90);
    for (clue, answer) in [("1a", "Q AND A"), ("4a", "ideas"), ("1d", "QUI"), ("2d", "NOE")] {
        let outcome = service
            .answer_crossword(&channel(), clue, answer, later)
            .await
            .unwrap();
        assert!(!outcome.completed, "{clue}");
    }
    assert_eq!(kinds(&mut viewer), vec![EventKind::State; 4]);

    let outcome = service
        .answer_crossword(&channel(), "3d", "ARS", later)
        .await
        .unwrap();
    assert!(outcome.completed);
    assert_eq!(kinds(&mut viewer), vec![EventKind::State, EventKind::Complete]);

    let state = service.state::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(state.status(), Status::Complete);
    assert_eq!(state.clock.total_solve_duration.to_string(), "1m30s");
    assert!(state.clock.last_start_time.is_none());
}

#[tokio::test]
async fn answers_require_solving() {
    let service = service();
    service
        .select_puzzle::<crossword::State>(&channel(), crossword_puzzle())
        .await
        .unwrap();
    let err = service
        .answer_crossword(&channel(), "1a", "QANDA", t0())
        .await
        .unwrap_err();
    assert!(err.is_policy());
    assert_eq!(err.code(), "ENGINE_NOT_SOLVING");
}

#[tokio::test]
async fn answer_limits() {
    let mut config = PwcConfig::default();
    config.limits.max_answer_bytes = 8;
    let service = SolveService::from_config(MemoryStore::new(), &config);
    solving_crossword(&service).await;

    let err = service
        .answer_crossword(&channel(), "1a", "QANDAQANDA", t0())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AnswerTooLong { len: 10, max: 8 }));

    let err = service
        .answer_crossword(&channel(), "1a", "   ", t0())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmptyAnswer));
}

#[tokio::test]
async fn failed_answer_publishes_nothing() {
    let service = service();
    solving_crossword(&service).await;
    let mut viewer = service.connect::<crossword::State>(&channel()).await.unwrap();
    kinds(&mut viewer);

    let err = service
        .answer_crossword(&channel(), "1a", "QAND", t0())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_ANSWER_LENGTH");
    assert!(kinds(&mut viewer).is_empty());
}

#[tokio::test]
async fn enabling_correct_only_clears_wrong_cells() {
    let service = service();
    solving_crossword(&service).await;
    service
        .answer_crossword(&channel(), "1a", "QANDX", t0())
        .await
        .unwrap();
    let mut viewer = service.connect::<crossword::State>(&channel()).await.unwrap();
    kinds(&mut viewer);

    let effect = service
        .update_setting::<crossword::State>(&channel(), "only_allow_correct_answers", &json!(true), t0())
        .await
        .unwrap();
    assert_eq!(effect, SettingEffect::ClearIncorrectCells);
    assert_eq!(kinds(&mut viewer), vec![EventKind::Settings, EventKind::State]);

    let state = service.state::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(state.cells[0], vec!["Q", "A", "N", "D", ""]);
    let settings = service.settings::<crossword::State>(&channel()).await.unwrap();
    assert!(settings.only_allow_correct_answers);

    let err = service
        .answer_crossword(&channel(), "3d", "XRS", t0())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_INCORRECT_ANSWER");
}

#[tokio::test]
async fn setting_without_effect_only_publishes_settings() {
    let service = service();
    let mut viewer = service.connect::<crossword::State>(&channel()).await.unwrap();
    kinds(&mut viewer);

    service
        .update_setting::<crossword::State>(&channel(), "clues_to_show", &json!("across"), t0())
        .await
        .unwrap();
    let events: Vec<_> = std::iter::from_fn(|| viewer.try_recv()).collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload.as_ref().unwrap()["clues_to_show"], json!("across"));

    let err = service
        .update_setting::<crossword::State>(&channel(), "colour", &json!(true), t0())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_UNKNOWN_SETTING");
    assert!(kinds(&mut viewer).is_empty());
}

#[tokio::test]
async fn toggle_cycle_and_policy_errors() {
    let service = service();
    let err = service
        .toggle_status::<crossword::State>(&channel(), t0())
        .await
        .unwrap_err();
    assert!(err.is_policy());

    service
        .select_puzzle::<crossword::State>(&channel(), crossword_puzzle())
        .await
        .unwrap();
    let statuses = [
        service.toggle_status::<crossword::State>(&channel(), t0()).await.unwrap(),
        service.toggle_status::<crossword::State>(&channel(), t0()).await.unwrap(),
        service.toggle_status::<crossword::State>(&channel(), t0()).await.unwrap(),
    ];
    assert_eq!(statuses, [Status::Solving, Status::Paused, Status::Solving]);
}

#[tokio::test]
async fn show_clue_validates_and_publishes() {
    let service = service();
    let mut viewer = service.connect::<crossword::State>(&channel()).await.unwrap();
    kinds(&mut viewer);

    let err = service
        .show_clue::<crossword::State>(&channel(), "1a")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_NO_PUZZLE_SELECTED");

    service
        .select_puzzle::<crossword::State>(&channel(), crossword_puzzle())
        .await
        .unwrap();
    kinds(&mut viewer);

    assert_eq!(
        service.show_clue::<crossword::State>(&channel(), "3D").await.unwrap(),
        "3d"
    );
    assert_eq!(viewer.try_recv(), Some(Event::show_clue("3d")));

    let err = service
        .show_clue::<crossword::State>(&channel(), "9a")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_CLUE_NOT_FOUND");

    let err = service
        .show_clue::<spellingbee::State>(&channel(), "1a")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_UNSUPPORTED");
}

#[tokio::test]
async fn spelling_bee_genius_and_completion() {
    let service = service();
    service
        .select_puzzle::<spellingbee::State>(&channel(), bee_puzzle())
        .await
        .unwrap();
    service
        .toggle_status::<spellingbee::State>(&channel(), t0())
        .await
        .unwrap();
    let mut viewer = service.connect::<spellingbee::State>(&channel()).await.unwrap();
    kinds(&mut viewer);

    let outcome = service
        .answer_spelling_bee(&channel(), "count", t0())
        .await
        .unwrap();
    assert_eq!(outcome, AnswerOutcome::default());
    assert_eq!(kinds(&mut viewer), vec![EventKind::State]);

    let err = service
        .answer_spelling_bee(&channel(), "CONTO", t0())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ENGINE_UNOFFICIAL_WORD");

    let outcome = service
        .answer_spelling_bee(&channel(), "COUNTRY", t0())
        .await
        .unwrap();
    assert!(outcome.completed && outcome.genius);
    assert_eq!(
        kinds(&mut viewer),
        vec![EventKind::State, EventKind::Complete, EventKind::Genius]
    );

    let state = service.state::<spellingbee::State>(&channel()).await.unwrap();
    assert_eq!(state.score, 19);
    assert_eq!(state.words, BTreeMap::from([("COUNT".into(), 0), ("COUNTRY".into(), 1)]));
}

#[tokio::test]
async fn disallowing_unofficial_answers_reindexes() {
    let service = service();
    service
        .update_setting::<spellingbee::State>(&channel(), "allow_unofficial_answers", &json!(true), t0())
        .await
        .unwrap();
    service
        .select_puzzle::<spellingbee::State>(&channel(), bee_puzzle())
        .await
        .unwrap();
    service
        .toggle_status::<spellingbee::State>(&channel(), t0())
        .await
        .unwrap();
    service.answer_spelling_bee(&channel(), "CONTO", t0()).await.unwrap();
    service.answer_spelling_bee(&channel(), "COUNT", t0()).await.unwrap();

    let state = service.state::<spellingbee::State>(&channel()).await.unwrap();
    assert_eq!(state.words["COUNT"], 1);

    let mut viewer = service.connect::<spellingbee::State>(&channel()).await.unwrap();
    kinds(&mut viewer);
    let effect = service
        .update_setting::<spellingbee::State>(&channel(), "allow_unofficial_answers", &json!(false), t0())
        .await
        .unwrap();
    assert_eq!(effect, SettingEffect::ClearUnofficialAnswers);
    assert_eq!(kinds(&mut viewer), vec![EventKind::Settings, EventKind::State]);

    let state = service.state::<spellingbee::State>(&channel()).await.unwrap();
    assert_eq!(state.words, BTreeMap::from([("COUNT".into(), 0)]));
    assert_eq!(state.score, 5);
}

#[tokio::test]
async fn allowing_unofficial_answers_reindexes_found_words() {
    let service = service();
    service
        .select_puzzle::<spellingbee::State>(&channel(), bee_puzzle())
        .await
        .unwrap();
    service
        .toggle_status::<spellingbee::State>(&channel(), t0())
        .await
        .unwrap();
    service.answer_spelling_bee(&channel(), "COUNTRY", t0()).await.unwrap();
    let state = service.state::<spellingbee::State>(&channel()).await.unwrap();
    assert_eq!(state.words["COUNTRY"], 1);

    let mut viewer = service.connect::<spellingbee::State>(&channel()).await.unwrap();
    kinds(&mut viewer);
    let effect = service
        .update_setting::<spellingbee::State>(&channel(), "allow_unofficial_answers", &json!(true), t0())
        .await
        .unwrap();
    assert_eq!(effect, SettingEffect::ReindexAnswers);
    assert_eq!(kinds(&mut viewer), vec![EventKind::Settings, EventKind::State]);

    let state = service.state::<spellingbee::State>(&channel()).await.unwrap();
    assert_eq!(state.words, BTreeMap::from([("COUNTRY".into(), 2)]));

    service.answer_spelling_bee(&channel(), "CONTO", t0()).await.unwrap();
    let state = service.state::<spellingbee::State>(&channel()).await.unwrap();
    assert_eq!(
        state.words,
        BTreeMap::from([("CONTO".into(), 0), ("COUNTRY".into(), 2)])
    );
}

#[tokio::test]
async fn shuffle_requires_solving() {
    let service = service();
    service
        .select_puzzle::<spellingbee::State>(&channel(), bee_puzzle())
        .await
        .unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let err = service.shuffle_letters(&channel(), &mut rng).await.unwrap_err();
    assert!(err.is_policy());

    service
        .toggle_status::<spellingbee::State>(&channel(), t0())
        .await
        .unwrap();
    let before = service.state::<spellingbee::State>(&channel()).await.unwrap().letters;
    service.shuffle_letters(&channel(), &mut rng).await.unwrap();
    let after = service.state::<spellingbee::State>(&channel()).await.unwrap().letters;
    assert_ne!(before, after);
}

#[tokio::test]
async fn kinds_are_isolated_per_channel() {
    let service = service();
    let other: ChannelName = "other".parse().unwrap();
    solving_crossword(&service).await;

    let mut bee_viewer = service.connect::<spellingbee::State>(&channel()).await.unwrap();
    let mut other_viewer = service.connect::<crossword::State>(&other).await.unwrap();
    kinds(&mut bee_viewer);
    kinds(&mut other_viewer);

    service
        .answer_crossword(&channel(), "1a", "QANDA", t0())
        .await
        .unwrap();
    assert!(kinds(&mut bee_viewer).is_empty());
    assert!(kinds(&mut other_viewer).is_empty());
    assert_eq!(
        service.state::<crossword::State>(&other).await.unwrap().status(),
        Status::Created
    );
}

#[tokio::test]
async fn concurrent_answers_are_serialized() {
    let service = Arc::new(service());
    solving_crossword(&service).await;

    let answers = [("1a", "QANDA"), ("4a", "IDEAS"), ("1d", "QUI"), ("2d", "NOE"), ("3d", "ARS")];
    let tasks: Vec<_> = answers
        .into_iter()
        .map(|(clue, answer)| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .answer_crossword(&channel(), clue, answer, t0())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut completions = 0;
    for task in tasks {
        if task.await.unwrap().completed {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
    let state = service.state::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(state.status(), Status::Complete);
}

#[tokio::test]
async fn idle_channel_locks_are_released() {
    let service = Arc::new(service());
    for n in 0..50 {
        let channel: ChannelName = format!("viewer{n}").parse().unwrap();
        service
            .select_puzzle::<crossword::State>(&channel, crossword_puzzle())
            .await
            .unwrap();
        service
            .update_setting::<spellingbee::State>(&channel, "font_size", &json!("large"), t0())
            .await
            .unwrap();
    }
    assert_eq!(service.lock_count(), 1);

    let held = service.lock(PuzzleKind::Crossword, &channel()).await;
    let waiter = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { solving_crossword(&service).await })
    };
    tokio::task::yield_now().await;
    service
        .select_puzzle::<spellingbee::State>(&channel(), bee_puzzle())
        .await
        .unwrap();
    assert_eq!(service.lock_count(), 2);
    assert!(!waiter.is_finished());

    drop(held);
    waiter.await.unwrap();
    let state = service.state::<crossword::State>(&channel()).await.unwrap();
    assert_eq!(state.status(), Status::Solving);
}

#[derive(Default)]
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}

#[tokio::test]
async fn store_errors_propagate_and_skip_publish() {
    let service = SolveService::from_config(BrokenStore, &PwcConfig::default());
    let mut viewer = service.connect::<crossword::State>(&channel()).await.unwrap();
    kinds(&mut viewer);

    let err = service
        .select_puzzle::<crossword::State>(&channel(), crossword_puzzle())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Io(_))));
    assert!(err.is_recoverable());
    assert!(kinds(&mut viewer).is_empty());
}

#[tokio::test]
async fn corrupt_value_is_a_serialization_error() {
    let store = MemoryStore::new();
    store
        .set(&PuzzleKind::Crossword.state_key(&channel()), b"not json".to_vec())
        .await
        .unwrap();
    let service = SolveService::from_config(store, &PwcConfig::default());
    let err = service
        .toggle_status::<crossword::State>(&channel(), t0())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "SERVICE_SERIALIZATION");
}
