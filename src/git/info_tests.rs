use super::*;

fn commit(name: &str, email: &str, seconds: i64) -> CommitEntry {
    CommitEntry {
        author_name: name.to_string(),
        author_email: email.to_string(),
        date: timestamp::from_unix_seconds(seconds),
    }
}

fn identity(name: &str, email: &str) -> Identity {
    Identity {
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[test]
fn history_counts_total_and_user_commits() {
    let me = identity("Ada", "ada@example.com");
    let commits = vec![
        commit("Bob", "bob@example.com", 300),
        commit("Ada", "ada@example.com", 200),
        commit("Ada", "ada@example.com", 100),
    ];

    let summary = HistorySummary::from_commits(commits, &me);

    assert_eq!(summary.total_commits, 3);
    assert_eq!(summary.user_commits, 2);
    assert_eq!(summary.last_commit_date, timestamp::from_unix_seconds(300));
    assert_eq!(summary.last_user_commit_date, timestamp::from_unix_seconds(200));
    assert_eq!(summary.first_commit_date, timestamp::from_unix_seconds(100));
}

#[test]
fn history_matches_user_by_name_or_email() {
    let me = identity("Ada", "ada@example.com");
    let commits = vec![
        commit("Ada Lovelace", "ada@example.com", 3),
        commit("Ada", "ada@laptop.local", 2),
        commit("Eve", "eve@example.com", 1),
    ];

    let summary = HistorySummary::from_commits(commits, &me);

    assert_eq!(summary.user_commits, 2);
}

#[test]
fn history_is_bounded_to_limit() {
    let me = Identity::default();
    let commits = (0..1500_i64)
        .rev()
        .map(|i| commit("Bot", "bot@example.com", 1_000_000 + i));

    let summary = HistorySummary::from_commits(commits, &me);

    assert_eq!(summary.total_commits, HISTORY_LIMIT);
    assert_eq!(summary.total_commits, 1000);
    // Oldest commit inside the window, not the true first commit.
    assert_eq!(
        summary.first_commit_date,
        timestamp::from_unix_seconds(1_000_000 + 500)
    );
}

#[test]
fn history_empty_repository() {
    let summary = HistorySummary::from_commits(Vec::new(), &Identity::default());
    assert_eq!(summary, HistorySummary::default());
}

#[test]
fn unknown_identities_collide() {
    let me = Identity::default();
    let summary =
        HistorySummary::from_commits(vec![commit("Unknown", "someone@else", 1)], &me);
    assert_eq!(summary.user_commits, 1);
}

#[test]
fn not_detected_serializes_to_discriminator_only() {
    let json = serde_json::to_string(&GitInfo::not_detected()).unwrap();
    assert_eq!(json, r#"{"git_detected":false}"#);
}

#[test]
fn failed_serializes_error() {
    let json = serde_json::to_string(&GitInfo::failed("boom".to_string())).unwrap();
    assert_eq!(json, r#"{"git_detected":false,"git_error":"boom"}"#);
}

#[test]
fn detected_serializes_flat() {
    let info = GitInfo::detected(RepositorySummary {
        current_user: "Ada".to_string(),
        current_email: "ada@example.com".to_string(),
        total_commits: 2,
        user_commits: 1,
        project_created: timestamp::from_unix_seconds(0),
        last_total_commit_date: None,
        last_user_commit_date: None,
        remotes: vec!["git@example.com:ada/app.git".to_string()],
        current_branch: "main".to_string(),
        ahead: 1,
        behind: 0,
        has_remote_tracking: true,
        uncommitted_changes: 0,
        is_clean: true,
    });

    let value = serde_json::to_value(&info).unwrap();

    assert_eq!(value["git_detected"], true);
    assert_eq!(value["current_branch"], "main");
    assert_eq!(value["project_created"], "1970-01-01T00:00:00.000Z");
    assert!(value.get("repository").is_none());
    assert!(value.get("git_error").is_none());
}

#[test]
fn legacy_record_without_status_fields_loads() {
    let json = r#"{
        "project_created": "2023-01-01T00:00:00.000Z",
        "current_user": "Ada",
        "current_email": "ada@example.com",
        "total_commits": 12,
        "user_commits": 10,
        "last_total_commit_date": "2024-01-01T00:00:00.000Z",
        "last_user_commit_date": null,
        "remotes": [],
        "current_branch": "main",
        "git_detected": true
    }"#;

    let info: GitInfo = serde_json::from_str(json).unwrap();

    let summary = info.summary().unwrap();
    assert_eq!(summary.total_commits, 12);
    assert_eq!(summary.ahead, 0);
    assert!(!summary.has_remote_tracking);
    assert_eq!(info.uncommitted_changes(), 0);
}

#[test]
fn not_detected_round_trip_has_no_repository() {
    let info: GitInfo = serde_json::from_str(r#"{"git_detected":false}"#).unwrap();
    assert_eq!(info, GitInfo::not_detected());
    assert!(info.summary().is_none());
}
