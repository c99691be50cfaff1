use std::collections::HashSet;

use mmdb_core::{NewSkill, NewUser, RecordError, Records, UserPatch};

fn records() -> Records {
    Records::in_memory()
}

#[tokio::test]
async fn create_then_find() {
    let records = records();
    let created = records
        .users
        .create(NewUser::new("alice", "nyc"))
        .await
        .unwrap();

    assert!(!created.uuid.is_empty());
    assert!(created.skills.is_empty());

    let found = records.users.find(&created.uuid).await.unwrap();
    assert_eq!(found, created);
}

#[tokio::test]
async fn identifiers_are_unique() {
    let records = records();
    let mut ids = HashSet::new();
    for i in 0..20 {
        let user = records
            .users
            .create(NewUser::new(format!("user-{i}"), "x"))
            .await
            .unwrap();
        assert!(ids.insert(user.uuid));
    }
}

#[tokio::test]
async fn duplicate_name_conflicts() {
    let records = records();
    let original = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();

    let err = records
        .users
        .create(NewUser::new("alice", "sf"))
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::Conflict(_)));
    assert_eq!(err.to_string(), "name already in use");
    assert_eq!(records.users.list().await.unwrap().len(), 1);
    assert_eq!(records.users.find(&original.uuid).await.unwrap(), original);
}

#[tokio::test]
async fn concurrent_creates_keep_names_unique() {
    let records = records();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let users = records.users.clone();
        handles.push(tokio::spawn(async move {
            users.create(NewUser::new("racer", "x")).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn empty_fields_are_rejected() {
    let records = records();
    let err = records
        .users
        .create(NewUser::new("", "nyc"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid [name]");

    let err = records.users.find("").await.unwrap_err();
    assert_eq!(err.to_string(), "invalid [uuid]");
}

#[tokio::test]
async fn list_on_empty_store() {
    let err = records().users.list().await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound(_)));
    assert_eq!(err.to_string(), "no users yet");
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let err = records().users.find("nope").await.unwrap_err();
    assert_eq!(err.to_string(), "user not found");
}

#[tokio::test]
async fn update_merges_provided_fields() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();

    let updated = records
        .users
        .update(&user.uuid, UserPatch::new("", "sf"))
        .await
        .unwrap();
    assert_eq!(updated.name, "alice");
    assert_eq!(updated.location, "sf");
    assert_eq!(records.users.find(&user.uuid).await.unwrap(), updated);
}

#[tokio::test]
async fn update_without_fields_is_rejected() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();

    let err = records
        .users
        .update(&user.uuid, UserPatch::new("", ""))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "nothing to update");
    assert_eq!(records.users.find(&user.uuid).await.unwrap(), user);
}

#[tokio::test]
async fn rename_onto_existing_name_conflicts() {
    let records = records();
    records.users.create(NewUser::new("alice", "nyc")).await.unwrap();
    let bob = records.users.create(NewUser::new("bob", "sf")).await.unwrap();

    let err = records
        .users
        .update(&bob.uuid, UserPatch::new("alice", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::Conflict(_)));

    // keeping your own name is not a conflict
    records
        .users
        .update(&bob.uuid, UserPatch::new("bob", "la"))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_twice() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();

    let deleted = records.users.delete(&user.uuid).await.unwrap();
    assert_eq!(deleted.uuid, user.uuid);

    let err = records.users.delete(&user.uuid).await.unwrap_err();
    assert_eq!(err.to_string(), "user not found");
    assert_eq!(records.users.find(&user.uuid).await.unwrap_err().to_string(), "user not found");
}

#[tokio::test]
async fn skills_append_in_order() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();

    records.users.add_skill(&user.uuid, NewSkill::new("go", 3)).await.unwrap();
    let user = records
        .users
        .add_skill(&user.uuid, NewSkill::new("rust", 5))
        .await
        .unwrap();

    let kinds: Vec<_> = user.skills.iter().map(|s| s.kind.as_str()).collect();
    assert_eq!(kinds, vec!["go", "rust"]);
    assert_ne!(user.skills[0].uuid, user.skills[1].uuid);
}

#[tokio::test]
async fn invalid_skill_is_rejected() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();

    let err = records
        .users
        .add_skill(&user.uuid, NewSkill::new("go", 0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid [level]");

    let err = records
        .users
        .add_skill("missing", NewSkill::new("go", 1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "user not found");
}

#[tokio::test]
async fn remove_middle_skill_keeps_the_rest() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();
    for (kind, level) in [("go", 1), ("rust", 2), ("sql", 3)] {
        records
            .users
            .add_skill(&user.uuid, NewSkill::new(kind, level))
            .await
            .unwrap();
    }
    let user = records.users.find(&user.uuid).await.unwrap();
    let middle = user.skills[1].uuid.clone();

    let user = records.users.remove_skill(&user.uuid, &middle).await.unwrap();
    let kinds: Vec<_> = user.skills.iter().map(|s| s.kind.as_str()).collect();
    assert_eq!(kinds, vec!["go", "sql"]);

    let stored = records.users.find(&user.uuid).await.unwrap();
    assert_eq!(stored.skills.len(), 2);
}

#[tokio::test]
async fn removing_unknown_skill_is_a_no_op() {
    let records = records();
    let user = records.users.create(NewUser::new("alice", "nyc")).await.unwrap();
    let user = records
        .users
        .add_skill(&user.uuid, NewSkill::new("go", 2))
        .await
        .unwrap();

    let after = records.users.remove_skill(&user.uuid, "nope").await.unwrap();
    assert_eq!(after.skills, user.skills);

    let err = records.users.remove_skill(&user.uuid, "").await.unwrap_err();
    assert_eq!(err.to_string(), "invalid [skill_uuid]");
}
