use plan_core::model::{CourseId, CourseState, ProgressDraft, ProgressRecord, User, UserId};
use plan_core::time::fixed_now;
use storage::repository::{ProgressRepository, StorageError, UserRepository};
use storage::sqlite::SqliteRepository;

fn build_record(course: u32, state: CourseState) -> ProgressRecord {
    let mut draft = ProgressDraft::new(CourseId::new(course), state);
    if state == CourseState::Passed {
        draft = draft.with_final_grade(8.0);
    }
    draft.validate(fixed_now()).unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

async fn insert_user(repo: &SqliteRepository, email: &str) -> UserId {
    let user = User::new(email, fixed_now());
    repo.insert_user(&user).await.expect("insert user");
    user.id
}

#[tokio::test]
async fn sqlite_roundtrips_progress_records() {
    let repo = connect("memdb_roundtrip").await;
    let user = insert_user(&repo, "ada@example.edu").await;

    let record = ProgressDraft::new(CourseId::new(19), CourseState::Passed)
        .with_final_grade(9.0)
        .with_retake(1, Some(4.0))
        .with_retake(2, Some(2.0))
        .validate(fixed_now())
        .unwrap();
    repo.upsert(user, &record).await.unwrap();

    let fetched = repo.list_by_user(user).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0], record);
    assert_eq!(fetched[0].retake_badges(), vec![4.0, 2.0]);
}

#[tokio::test]
async fn sqlite_upsert_replaces_the_whole_row() {
    let repo = connect("memdb_replace").await;
    let user = insert_user(&repo, "ada@example.edu").await;

    let first = ProgressDraft::new(CourseId::new(1), CourseState::InProgress)
        .with_retake(1, Some(3.0))
        .validate(fixed_now())
        .unwrap();
    repo.upsert(user, &first).await.unwrap();

    // The replacement has no retakes; the old grade must not survive.
    let second = build_record(1, CourseState::Passed);
    repo.upsert(user, &second).await.unwrap();

    let fetched = repo.list_by_user(user).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].state, CourseState::Passed);
    assert_eq!(fetched[0].retake_count, 0);
    assert!(fetched[0].retake_badges().is_empty());
}

#[tokio::test]
async fn sqlite_delete_is_a_noop_when_absent() {
    let repo = connect("memdb_delete").await;
    let user = insert_user(&repo, "ada@example.edu").await;
    repo.upsert(user, &build_record(1, CourseState::InProgress))
        .await
        .unwrap();

    repo.delete_one(user, CourseId::new(2)).await.unwrap();
    assert_eq!(repo.list_by_user(user).await.unwrap().len(), 1);

    repo.delete_one(user, CourseId::new(1)).await.unwrap();
    assert!(repo.list_by_user(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_lists_records_per_user_only() {
    let repo = connect("memdb_per_user").await;
    let alice = insert_user(&repo, "alice@example.edu").await;
    let bob = insert_user(&repo, "bob@example.edu").await;

    repo.upsert(alice, &build_record(1, CourseState::Passed))
        .await
        .unwrap();
    repo.upsert(alice, &build_record(2, CourseState::InProgress))
        .await
        .unwrap();
    repo.upsert(bob, &build_record(1, CourseState::InProgress))
        .await
        .unwrap();

    let records = repo.list_by_user(alice).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].course_id, CourseId::new(1));
    assert_eq!(records[1].course_id, CourseId::new(2));
    assert_eq!(repo.list_by_user(bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_rejects_duplicate_emails() {
    let repo = connect("memdb_users").await;
    insert_user(&repo, "ada@example.edu").await;

    let duplicate = User::new("ada@example.edu", fixed_now());
    let err = repo.insert_user(&duplicate).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let found = repo
        .find_by_email("ada@example.edu")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(found.name, "ada");
    assert!(repo.find_by_email("nobody@example.edu").await.unwrap().is_none());
}
