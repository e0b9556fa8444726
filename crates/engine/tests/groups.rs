use sea_orm::Database;

use engine::{Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_users(usernames: &[&str]) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    for username in usernames {
        engine
            .create_user(username, username, &format!("{username}@example.com"), "password")
            .await
            .unwrap();
    }
    engine
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn create_user_rejects_duplicates() {
    let engine = engine_with_users(&["alice"]).await;

    let err = engine
        .create_user("alice", "Alice", "alice@example.com", "secret")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));

    let err = engine
        .create_user("bob", "Bob", "bob@example.com", "")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("password must not be empty".to_string())
    );

    let err = engine
        .create_user("  ", "Nobody", "", "secret")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("username must not be empty".to_string())
    );
}

#[tokio::test]
async fn new_group_makes_creator_admin() {
    let engine = engine_with_users(&["alice", "bob", "carol"]).await;

    let group = engine
        .new_group(
            "  Lisbon trip ",
            Some("flights and food"),
            &names(&["bob", "carol", "bob", "alice"]),
            "alice",
        )
        .await
        .unwrap();

    assert_eq!(group.name, "Lisbon trip");
    assert_eq!(group.description.as_deref(), Some("flights and food"));
    assert_eq!(group.creator, "alice");
    assert_eq!(group.member_ids().collect::<Vec<_>>(), ["alice", "bob", "carol"]);
    assert!(group.is_admin("alice"));
    assert!(!group.is_admin("bob"));

    let loaded = engine.group(&group.id, "carol").await.unwrap();
    assert_eq!(loaded.member_ids().collect::<Vec<_>>(), ["alice", "bob", "carol"]);
    assert!(loaded.is_admin("alice"));
}

#[tokio::test]
async fn new_group_rejects_unknown_users_and_blank_names() {
    let engine = engine_with_users(&["alice"]).await;

    let err = engine
        .new_group("Trip", None, &names(&["ghost"]), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine.new_group("   ", None, &[], "alice").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("group name must not be empty".to_string())
    );

    assert!(engine.groups_for_user("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn groups_for_user_only_lists_memberships() {
    let engine = engine_with_users(&["alice", "bob", "carol"]).await;

    let shared = engine
        .new_group("Flat", None, &names(&["bob"]), "alice")
        .await
        .unwrap();
    engine
        .new_group("Solo", None, &[], "carol")
        .await
        .unwrap();

    let bob_groups = engine.groups_for_user("bob").await.unwrap();
    assert_eq!(bob_groups.len(), 1);
    assert_eq!(bob_groups[0].id, shared.id);
    assert_eq!(bob_groups[0].members.len(), 2);

    assert_eq!(engine.groups_for_user("carol").await.unwrap().len(), 1);
}

#[tokio::test]
async fn group_is_hidden_from_non_members() {
    let engine = engine_with_users(&["alice", "mallory"]).await;
    let group = engine.new_group("Flat", None, &[], "alice").await.unwrap();

    let err = engine.group(&group.id, "mallory").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let missing = uuid::Uuid::new_v4().to_string();
    let err = engine.group(&missing, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine.group("not-an-id", "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidId(_)));
}

#[tokio::test]
async fn members_are_managed_by_admins() {
    let engine = engine_with_users(&["alice", "bob", "carol", "dave"]).await;
    let group = engine
        .new_group("Flat", None, &names(&["bob"]), "alice")
        .await
        .unwrap();

    let err = engine
        .add_group_members(&group.id, &names(&["carol"]), "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let group = engine
        .add_group_members(&group.id, &names(&["carol", "bob", "carol"]), "alice")
        .await
        .unwrap();
    assert_eq!(group.member_ids().collect::<Vec<_>>(), ["alice", "bob", "carol"]);

    let group = engine
        .remove_group_member(&group.id, "bob", "alice")
        .await
        .unwrap();
    assert_eq!(group.member_ids().collect::<Vec<_>>(), ["alice", "carol"]);

    let group = engine
        .add_group_members(&group.id, &names(&["dave", "bob"]), "alice")
        .await
        .unwrap();
    assert_eq!(
        group.member_ids().collect::<Vec<_>>(),
        ["alice", "carol", "dave", "bob"]
    );

    let reloaded = engine.group(&group.id, "dave").await.unwrap();
    assert_eq!(
        reloaded.member_ids().collect::<Vec<_>>(),
        ["alice", "carol", "dave", "bob"]
    );
}

#[tokio::test]
async fn creator_cannot_be_removed() {
    let engine = engine_with_users(&["alice", "bob"]).await;
    let group = engine
        .new_group("Flat", None, &names(&["bob"]), "alice")
        .await
        .unwrap();

    let err = engine
        .remove_group_member(&group.id, "alice", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMember(_)));

    let err = engine
        .remove_group_member(&group.id, "carol", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
