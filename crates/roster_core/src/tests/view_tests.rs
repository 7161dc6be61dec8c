use super::*;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use shared::{
    domain::CompanyId,
    protocol::{CompanyRecord, CoordinatorStat, RosterPageResponse},
};
use tokio::net::TcpListener;

use crate::{
    aggregate::StatsViewState,
    events::RosterEvent,
    query::RosterViewState,
};

#[derive(Clone)]
struct BackendState {
    companies: Arc<Mutex<Vec<CompanyRecord>>>,
    stats: Arc<Mutex<Vec<CoordinatorStat>>>,
    fail_stats: Arc<Mutex<bool>>,
}

async fn handle_companies(State(state): State<BackendState>) -> Json<RosterPageResponse> {
    let companies = state.companies.lock().await.clone();
    let total = companies.len() as u64;
    Json(RosterPageResponse { companies, total })
}

async fn handle_stats(
    State(state): State<BackendState>,
) -> Result<Json<Vec<CoordinatorStat>>, StatusCode> {
    if *state.fail_stats.lock().await {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.stats.lock().await.clone()))
}

async fn spawn_backend() -> (String, BackendState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = BackendState {
        companies: Arc::new(Mutex::new(vec![CompanyRecord {
            id: CompanyId::from("c1"),
            name: "Acme".to_string(),
            job_title: None,
            cgpa: None,
            stipend: None,
            location: None,
            arrival_date: None,
            company_type: None,
            coordinator: Some("Maya".to_string()),
            tracked: false,
            invited: false,
            called: false,
        }])),
        stats: Arc::new(Mutex::new(vec![CoordinatorStat {
            coordinator: "Maya".to_string(),
            total: 1,
            tracked: 0,
            invited: 0,
            called: 0,
            companies: Vec::new(),
        }])),
        fail_stats: Arc::new(Mutex::new(false)),
    };
    let app = Router::new()
        .route("/companies", get(handle_companies))
        .route("/coordinator-stats", get(handle_stats))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

async fn wait_for_roster(roster: &Arc<RosterQueryController>) {
    let mut rx = roster.subscribe_events();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if !matches!(roster.snapshot().await, RosterViewState::Loading) {
                break;
            }
            let _ = rx.recv().await;
        }
    })
    .await
    .expect("roster settle timeout");
}

fn expect_roster(view: &ActiveView) -> Arc<RosterQueryController> {
    match view {
        ActiveView::Roster(roster) => roster.clone(),
        ActiveView::Performance(_) => panic!("expected the roster pane"),
    }
}

#[tokio::test]
async fn router_starts_on_the_roster_pane() {
    let (url, _state) = spawn_backend().await;
    let router = ViewRouter::new(&url);

    let active = router.active().await;
    let roster = expect_roster(&active);
    assert!(Arc::ptr_eq(&roster, &router.roster()));
}

#[tokio::test]
async fn switching_panes_tracks_the_active_variant() {
    let (url, _state) = spawn_backend().await;
    let router = ViewRouter::new(&url);

    let stats = router.show_performance().await;
    match router.active().await {
        ActiveView::Performance(active) => assert!(Arc::ptr_eq(&active, &stats)),
        ActiveView::Roster(_) => panic!("expected the performance pane"),
    }
    assert!(matches!(stats.snapshot().await, StatsViewState::Loaded(_)));

    let roster = router.show_roster().await;
    let active = expect_roster(&router.active().await);
    assert!(Arc::ptr_eq(&active, &roster));
    wait_for_roster(&roster).await;
    assert!(matches!(roster.snapshot().await, RosterViewState::Loaded(_)));
}

#[tokio::test]
async fn roster_controller_persists_across_switches() {
    let (url, _state) = spawn_backend().await;
    let router = ViewRouter::new(&url);
    let before = router.roster();
    before.set_search("Acme").await.expect("search");
    wait_for_roster(&before).await;

    router.show_performance().await;
    let after = router.show_roster().await;

    // Same controller, so paging/sort/search context survives the detour
    // through the performance pane.
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.params().await.search.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn each_performance_activation_builds_a_fresh_view() {
    let (url, _state) = spawn_backend().await;
    let router = ViewRouter::new(&url);

    let first = router.show_performance().await;
    first.select("Maya").await;
    router.show_roster().await;

    let second = router.show_performance().await;
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.selected().await, None);
}

#[tokio::test]
async fn failed_stats_load_still_activates_the_pane() {
    let (url, state) = spawn_backend().await;
    *state.fail_stats.lock().await = true;
    let router = ViewRouter::new(&url);

    let stats = router.show_performance().await;
    assert!(matches!(
        router.active().await,
        ActiveView::Performance(_)
    ));
    assert!(matches!(stats.snapshot().await, StatsViewState::Failed(_)));
}

#[tokio::test]
async fn events_flow_while_the_roster_pane_is_active() {
    let (url, _state) = spawn_backend().await;
    let router = ViewRouter::new(&url);
    let roster = router.roster();
    let mut rx = roster.subscribe_events();

    router.show_roster().await;
    let event = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await.expect("event") {
                event @ (RosterEvent::RosterLoaded { .. } | RosterEvent::RosterFailed(_)) => {
                    break event
                }
                _ => {}
            }
        }
    })
    .await
    .expect("settle timeout");
    assert!(matches!(event, RosterEvent::RosterLoaded { .. }));
}
