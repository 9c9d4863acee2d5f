use crate::*;
use std::sync::Arc;

fn seeded(id: i64) -> Session {
    let mut s = Session::new(id);
    s.seed(SYSTEM_PROMPT, &render_context(&UserContext::new("Seattle", "rainy")));
    s
}

// ========== Messages ==========

#[test]
fn test_message_serialization() {
    let msg = ChatMessage::assistant("hi there");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "hi there" }));
}

#[test]
fn test_role_display() {
    assert_eq!(Role::System.to_string(), "system");
    assert_eq!(Role::User.to_string(), "user");
    assert_eq!(Role::Assistant.to_string(), "assistant");
}

// ========== Seeding ==========

#[test]
fn test_new_session_is_unseeded() {
    let s = Session::new(42);
    assert_eq!(s.id(), 42);
    assert_eq!(s.message_count(), 0);
    assert!(s.turns().is_empty());
}

#[test]
fn test_seed_writes_prompt_then_context() {
    let mut s = Session::new(1);
    assert!(s.seed(SYSTEM_PROMPT, &render_context(&UserContext::new("Seattle", "rainy"))));
    assert_eq!(s.messages()[0], ChatMessage::system(SYSTEM_PROMPT));
    assert_eq!(s.messages()[1].role, Role::System);
    assert!(s.messages()[1].content.contains("user_location: Seattle"));
}

#[test]
fn test_seed_only_once() {
    let mut s = seeded(1);
    assert!(!s.seed(SYSTEM_PROMPT, "other context"));
    assert_eq!(s.message_count(), 2);
}

// ========== Turns ==========

#[test]
fn test_answered_turn() {
    let mut s = seeded(1);
    let turn = s.begin_turn("what should I wear?");
    assert_eq!(s.turns()[turn].status, TurnStatus::Pending);
    s.answer_turn(turn, "A raincoat.").unwrap();

    let roles: Vec<Role> = s.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::System, Role::User, Role::Assistant]);
    assert_eq!(s.turns()[turn].status, TurnStatus::Answered);
    assert_eq!(s.turns()[turn].message_index, 2);
}

#[test]
fn test_failed_turn_keeps_user_message() {
    let mut s = seeded(1);
    let turn = s.begin_turn("hello?");
    s.fail_turn(turn).unwrap();
    assert_eq!(s.message_count(), 3);
    assert_eq!(s.messages()[2], ChatMessage::user("hello?"));
    assert_eq!(s.turns()[turn].status, TurnStatus::Failed);
}

#[test]
fn test_closed_turn_rejected() {
    let mut s = seeded(1);
    let turn = s.begin_turn("hello?");
    s.fail_turn(turn).unwrap();
    assert_eq!(
        s.answer_turn(turn, "late reply").unwrap_err(),
        SessionError::TurnClosed { turn, status: TurnStatus::Failed }
    );
    assert_eq!(s.message_count(), 3);
    assert_eq!(s.fail_turn(7).unwrap_err(), SessionError::UnknownTurn(7));
}

#[test]
fn test_updated_at_advances() {
    let mut s = Session::new(3);
    let created = s.created_at;
    s.begin_turn("x");
    assert!(s.updated_at >= created);
}

// ========== Context ==========

#[test]
fn test_render_context() {
    let out = render_context(&UserContext::new("Seattle", "rainy"));
    assert!(out.contains("user_location: Seattle"));
    assert!(out.contains("user_weather: rainy"));
    assert!(!out.contains(LOCATION_PLACEHOLDER));
    assert!(!out.contains(WEATHER_PLACEHOLDER));
}

#[test]
fn test_render_empty_fields() {
    let out = render_context(&UserContext::default());
    assert!(out.contains("user_location: \n"));
    assert!(out.contains("user_weather: \n"));
}

#[test]
fn test_render_does_not_rescan_substituted_text() {
    let out = render_context(&UserContext::new("<user_weather>", "sunny"));
    assert!(out.contains("user_location: <user_weather>\n"));
    assert!(out.contains("user_weather: sunny\n"));
}

#[test]
fn test_render_custom_template() {
    let ctx = UserContext::new("Oslo", "snow");
    assert_eq!(render_template("<user_weather> in <user_location>", &ctx), "snow in Oslo");
    assert_eq!(render_template("no tokens", &ctx), "no tokens");
}

// ========== Manager ==========

#[test]
fn test_get_or_create() {
    let mgr = SessionManager::new();
    assert!(mgr.is_empty());
    let a = mgr.get_or_create(5);
    let b = mgr.get_or_create(5);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(mgr.len(), 1);
    assert!(mgr.contains(5));
    assert!(!mgr.contains(6));
    assert!(mgr.get(6).is_none());
}

#[tokio::test]
async fn test_mutations_visible_through_registry() {
    let mgr = SessionManager::new();
    {
        let handle = mgr.get_or_create(9);
        let mut s = handle.lock().await;
        s.begin_turn("remember me");
    }
    let snap = mgr.snapshot(9).await.unwrap();
    assert_eq!(snap.messages(), &[ChatMessage::user("remember me")]);
    assert!(mgr.snapshot(10).await.is_none());
}

#[tokio::test]
async fn test_concurrent_seed_once() {
    let mgr = Arc::new(SessionManager::new());
    let mut tasks = Vec::new();
    for i in 0..8 {
        let mgr = mgr.clone();
        tasks.push(tokio::spawn(async move {
            let handle = mgr.get_or_create(77);
            let mut s = handle.lock().await;
            s.seed(SYSTEM_PROMPT, "ctx");
            s.begin_turn(format!("msg {i}"));
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }
    let snap = mgr.snapshot(77).await.unwrap();
    let system_count = snap.messages().iter().filter(|m| m.role == Role::System).count();
    assert_eq!(system_count, 2);
    assert_eq!(snap.message_count(), 10);
    assert_eq!(mgr.len(), 1);
}
