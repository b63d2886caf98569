use std::path::PathBuf;

use learning_pal::auth::{AuthContext, FileSessionStore, MemorySessionStore, SessionStore, User};
use chrono::Utc;

fn temp_store(tag: &str) -> FileSessionStore {
    let path = std::env::temp_dir().join(format!(
        "learning_pal_test_{}_{}.json",
        tag,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    FileSessionStore::new(path)
}

#[test]
fn login_fabricates_demo_record() {
    let mut auth = AuthContext::init(MemorySessionStore::default()).unwrap();
    assert!(auth.current_user().is_none());

    let user = auth.login("alex.j@student.com", "hunter2").unwrap();
    assert_eq!(user.name, "alex.j");
    assert_eq!(user.email, "alex.j@student.com");
    assert_eq!(user.role, "student");
}

#[test]
fn login_without_at_sign_uses_whole_email_as_name() {
    let mut auth = AuthContext::init(MemorySessionStore::default()).unwrap();
    let user = auth.login("alex", "").unwrap();
    assert_eq!(user.name, "alex");
}

#[test]
fn logout_clears_store_and_context() {
    let store = MemorySessionStore::default();
    let mut auth = AuthContext::init(store).unwrap();
    auth.login("a@b.c", "").unwrap();
    auth.logout().unwrap();
    assert!(auth.current_user().is_none());
}

#[test]
fn session_survives_reinit_from_file() {
    let store = temp_store("survives");
    {
        let mut auth = AuthContext::init(store.clone()).unwrap();
        auth.login("alex.j@student.com", "pw").unwrap();
    }

    // a fresh context over the same path sees the persisted record
    let auth = AuthContext::init(store.clone()).unwrap();
    let user = auth.current_user().unwrap();
    assert_eq!(user.name, "alex.j");

    store.clear().unwrap();
}

#[test]
fn file_store_roundtrip_and_clear() {
    let store = temp_store("roundtrip");
    assert!(store.load().unwrap().is_none());

    let user = User {
        email: "x@y.z".to_string(),
        name: "x".to_string(),
        role: "student".to_string(),
        logged_in_at: Utc::now(),
    };
    store.save(&user).unwrap();
    assert_eq!(store.load().unwrap(), Some(user));

    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
    // clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn missing_path_loads_as_logged_out() {
    let store = FileSessionStore::new(PathBuf::from("/nonexistent/dir/session.json"));
    assert!(store.load().unwrap().is_none());
}
