//! End-to-end tests of the action dispatcher against a real SQLite database

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{payload, student, TestEnvironment, SCHOOL_NAME, WEBAPP_URL};
use pretty_assertions::assert_eq;
use schooldesk::school::replies;
use schooldesk::school::{
    Account, ContentCatalog, ConversationMode, Formatting, InMemorySessionStore, InboundEvent, SectionId,
    SessionStore,
};
use schooldesk::storage::{get_connection, FeedbackCategory, FeedbackStore, UserDirectory, UserRole};

#[tokio::test]
async fn test_greeting_is_idempotent() {
    let env = TestEnvironment::new();

    for _ in 0..3 {
        let reply = env.dispatch(InboundEvent::greeting(student(7))).await;
        assert!(reply.text.contains("Маша"));
        assert!(reply.text.contains(SCHOOL_NAME));
    }

    assert_eq!(env.user_count(), 1);
    let profile = env.users.lookup(7).await.unwrap().unwrap();
    assert_eq!(profile.username, "masha");
    assert_eq!(profile.first_name, "Маша");
    assert_eq!(profile.last_name, "Иванова");
    assert_eq!(profile.role, UserRole::Student);
}

#[tokio::test]
async fn test_greeting_refreshes_profile_fields() {
    let env = TestEnvironment::new();

    env.dispatch(InboundEvent::greeting(student(7))).await;
    let first = env.users.lookup(7).await.unwrap().unwrap();

    env.dispatch(InboundEvent::greeting(Account::new(7).with_names("maria", "Мария", "")))
        .await;
    let second = env.users.lookup(7).await.unwrap().unwrap();

    assert_eq!(env.user_count(), 1);
    assert_eq!(second.username, "maria");
    assert_eq!(second.first_name, "Мария");
    assert_eq!(second.last_name, "");
    assert_eq!(second.registered_at, first.registered_at);
}

#[tokio::test]
async fn test_greeting_keeps_role_assigned_elsewhere() {
    let env = TestEnvironment::new();
    env.dispatch(InboundEvent::greeting(student(7))).await;

    let conn = get_connection(&env.db_pool).unwrap();
    conn.execute("UPDATE users SET role = 'teacher' WHERE telegram_id = 7", [])
        .unwrap();
    drop(conn);

    env.send_payload(7, &payload("main_menu", None)).await;
    env.dispatch(InboundEvent::greeting(student(7))).await;

    let profile = env.users.lookup(7).await.unwrap().unwrap();
    assert_eq!(profile.role, UserRole::Teacher);
    assert_eq!(env.user_count(), 1);
}

#[tokio::test]
async fn test_welcome_offers_mini_app() {
    let env = TestEnvironment::new();

    let reply = env.dispatch(InboundEvent::greeting(student(1))).await;

    assert_eq!(reply, replies::welcome("Маша", SCHOOL_NAME, WEBAPP_URL));
}

#[tokio::test]
async fn test_grades_payload_returns_catalog_body() {
    let env = TestEnvironment::new();

    let reply = env
        .send_payload(5, r#"{"action":"open_section","section":"grades","role":"student"}"#)
        .await;

    assert_eq!(reply.formatting, Formatting::Markdown);
    assert_eq!(Some(reply.text.as_str()), env.catalog.get(SectionId::Grades));
    assert!(reply.text.contains("Общий средний балл: 4.4"));
    assert!(reply.actions.is_empty());
}

#[tokio::test]
async fn test_every_section_resolves() {
    let env = TestEnvironment::new();

    for section in ["schedule", "homework", "grades", "announcements"] {
        let reply = env.send_payload(5, &payload("open_section", Some(section))).await;
        assert_eq!(reply.formatting, Formatting::Markdown, "section {section}");
        assert!(!reply.text.is_empty());
        assert_ne!(reply, replies::section_not_found());
    }
}

#[tokio::test]
async fn test_unknown_section_is_reported() {
    let env = TestEnvironment::new();

    let reply = env.send_payload(5, &payload("open_section", Some("unknown_key"))).await;

    assert_eq!(reply, replies::section_not_found());
}

#[tokio::test]
async fn test_unknown_action_creates_no_state() {
    let env = TestEnvironment::new();

    let reply = env.send_payload(9, &payload("dance", None)).await;

    assert_eq!(reply, replies::unknown_action());
    assert_eq!(env.sessions.get(9).await.unwrap(), ConversationMode::None);
    assert!(env.sessions.is_empty().await);
    assert_eq!(env.user_count(), 0);
}

#[tokio::test]
async fn test_malformed_payload_changes_nothing() {
    let env = TestEnvironment::new();
    env.send_payload(3, &payload("feedback", None)).await;

    for raw in ["{not json", "[1, 2]", "42", "\"main_menu\""] {
        let reply = env.send_payload(3, raw).await;
        assert_eq!(reply, replies::malformed_request(), "input {raw:?}");
    }

    assert_eq!(
        env.sessions.get(3).await.unwrap(),
        ConversationMode::AwaitingFeedback { category: None }
    );
    assert_eq!(env.user_count(), 0);
}

#[tokio::test]
async fn test_empty_payload_gets_dedicated_reply() {
    let env = TestEnvironment::new();

    let reply = env.send_payload(3, "").await;

    assert_eq!(reply, replies::no_app_data());
    assert_eq!(reply.text, "Не удалось получить данные от приложения 😅");
}

#[tokio::test]
async fn test_slash_command_during_feedback_is_not_stored() {
    let env = TestEnvironment::new();
    env.send_payload(14, &payload("feedback", None)).await;

    let reply = env.dispatch(InboundEvent::free_text(student(14), "/help")).await;
    assert_eq!(reply, replies::feedback_not_command());
    assert!(env.feedback.list_for(14).await.unwrap().is_empty());

    env.dispatch(InboundEvent::free_text(student(14), "Нужна помощь с расписанием"))
        .await;
    let stored = env.feedback.list_for(14).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message, "Нужна помощь с расписанием");
}

#[tokio::test]
async fn test_feedback_then_main_menu_clears_state() {
    let env = TestEnvironment::new();

    let reply = env.send_payload(42, &payload("feedback", None)).await;
    assert_eq!(reply, replies::feedback_menu());
    assert!(env.sessions.get(42).await.unwrap().is_awaiting_feedback());

    let reply = env.send_payload(42, &payload("main_menu", None)).await;
    assert_eq!(reply, replies::welcome("Маша", SCHOOL_NAME, WEBAPP_URL));
    assert_eq!(env.sessions.get(42).await.unwrap(), ConversationMode::None);
}

#[tokio::test]
async fn test_opening_section_abandons_feedback() {
    let env = TestEnvironment::new();

    env.send_payload(42, &payload("feedback", None)).await;
    env.send_payload(42, &payload("open_section", Some("schedule"))).await;

    assert_eq!(env.sessions.get(42).await.unwrap(), ConversationMode::None);
    let reply = env.dispatch(InboundEvent::free_text(student(42), "Привет")).await;
    assert_eq!(reply, replies::use_app_hint(WEBAPP_URL));
}

#[tokio::test]
async fn test_feedback_flow_persists_message() {
    let env = TestEnvironment::new();

    env.send_payload(11, &payload("feedback", None)).await;
    let reply = env
        .dispatch(InboundEvent::category_selection(student(11), "feedback_question"))
        .await;
    assert_eq!(reply, replies::feedback_prompt(FeedbackCategory::Question));

    let reply = env
        .dispatch(InboundEvent::free_text(student(11), "  Когда родительское собрание?  "))
        .await;
    assert_eq!(reply, replies::feedback_thanks());
    assert_eq!(env.sessions.get(11).await.unwrap(), ConversationMode::None);

    let stored = env.feedback.list_for(11).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, Some(FeedbackCategory::Question));
    assert_eq!(stored[0].message, "Когда родительское собрание?");
}

#[tokio::test]
async fn test_feedback_without_category_is_stored() {
    let env = TestEnvironment::new();

    env.send_payload(12, &payload("feedback", None)).await;
    env.dispatch(InboundEvent::free_text(student(12), "Спасибо учителям!")).await;

    let stored = env.feedback.list_for(12).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, None);
}

#[tokio::test]
async fn test_stale_category_button() {
    let env = TestEnvironment::new();

    let reply = env
        .dispatch(InboundEvent::category_selection(student(13), "feedback_complaint"))
        .await;

    assert_eq!(reply, replies::feedback_expired());
    assert!(env.sessions.is_empty().await);
}

#[tokio::test]
async fn test_users_have_independent_state() {
    let env = Arc::new(TestEnvironment::new());

    let first = {
        let env = Arc::clone(&env);
        tokio::spawn(async move { env.send_payload(1, &payload("feedback", None)).await })
    };
    let second = {
        let env = Arc::clone(&env);
        tokio::spawn(async move { env.send_payload(2, &payload("open_section", Some("homework"))).await })
    };
    first.await.unwrap();
    second.await.unwrap();

    assert!(env.sessions.get(1).await.unwrap().is_awaiting_feedback());
    assert_eq!(env.sessions.get(2).await.unwrap(), ConversationMode::None);
}

#[tokio::test]
async fn test_abandoned_feedback_expires() {
    let env = TestEnvironment::with_sessions(InMemorySessionStore::with_ttl(Some(Duration::from_millis(20))));

    env.send_payload(21, &payload("feedback", None)).await;
    tokio::time::sleep(Duration::from_millis(40)).await;

    let reply = env.dispatch(InboundEvent::free_text(student(21), "поздно")).await;
    assert_eq!(reply, replies::use_app_hint(WEBAPP_URL));
    assert!(env.feedback.list_for(21).await.unwrap().is_empty());
}
