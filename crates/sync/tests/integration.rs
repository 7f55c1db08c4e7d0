use rollcall_store::TeamStore;
use rollcall_sync::report::RunMode;
use rollcall_sync::{run, NamedSource, SyncConfig, SyncInput};

const ROSTER_HEADER: &str = "Name,Email,WhatsApp,Roll Number,Course,Batch,Residency,Mess Food,Role,Team Name,Check In,Board,Room Number,Team Number";
const SUBMISSION_HEADER: &str = "#,Start Time,Completion Time,Email,Name,Team Name,Team Number,Room Number,Problem Statement,Github Repo";

fn csv_of(header: &str, rows: &[&str]) -> String {
    let mut text = String::from(header);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text
}

fn sync(
    store: &mut TeamStore,
    roster: Option<&str>,
    submissions: Option<&str>,
    mode: RunMode,
) -> rollcall_sync::SyncReport {
    let input = SyncInput {
        roster: roster.map(|text| NamedSource {
            label: "roster.csv".to_string(),
            text: text.to_string(),
        }),
        submissions: submissions.map(|text| NamedSource {
            label: "submissions.csv".to_string(),
            text: text.to_string(),
        }),
    };
    run(store, &SyncConfig::default(), &input, mode, ":memory:").unwrap()
}

/// Four messy rows forming one complete team.
fn messy_team_rows() -> Vec<String> {
    vec![
        "Priya Sharma , PRIYA@Uni.Edu ,99 887 76655,2024btech101,b.tech,2024,Hostel,YES ,Leader,Team VAD,in,yers,204,12".to_string(),
        "Arjun Rao,arjun@uni.edu,9988776656,2024BTECH102,BTech,2024,Day Scholar,no,Member,Team VAD,,,,".to_string(),
        "Meera Iyer,meera@uni.edu,9988776657,2024bba103,bba,2024,Hosteller,yes,member,Team VAD,,,,".to_string(),
        "Dev Patel,dev@uni.edu,9988776658,2024BDES104,bdes,2024,hosteller,yes,member,Team VAD,,,,".to_string(),
    ]
}

// -------------------------------------------------------------------------
// Roster pass
// -------------------------------------------------------------------------

#[test]
fn fresh_roster_inserts_canonical_document() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let rows = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let roster = csv_of(ROSTER_HEADER, &refs);
    let report = sync(&mut store, Some(&roster), None, RunMode::Apply);

    let pass = report.roster.unwrap();
    assert_eq!(pass.inserted, vec!["Team VAD"]);
    assert_eq!(pass.summary.skipped, 0);

    let stored = store.find_by_name_ci("team vad").unwrap().unwrap().team;
    assert_eq!(stored.leader.email, "priya@uni.edu");
    assert_eq!(stored.leader.whatsapp, "9988776655");
    assert_eq!(stored.leader.roll_number, "2024BTECH101");
    assert_eq!(stored.room_number, "EB2 - 204");
    assert_eq!(stored.team_number, "12");
    assert!(stored.checked_in);
    assert!(stored.board_given);
    assert_eq!(stored.members.len(), 3);
}

#[test]
fn applying_the_same_roster_twice_reaches_a_fixed_point() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let rows: Vec<String> = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let roster = csv_of(ROSTER_HEADER, &refs);

    sync(&mut store, Some(&roster), None, RunMode::Apply);
    let before = store.find_by_name_ci("Team VAD").unwrap().unwrap();

    let report = sync(&mut store, Some(&roster), None, RunMode::Apply);
    let pass = report.roster.unwrap();
    assert!(pass.inserted.is_empty());
    assert!(pass.updated.is_empty());
    assert_eq!(pass.summary.unchanged, 1);

    let after = store.find_by_name_ci("Team VAD").unwrap().unwrap();
    assert_eq!(before.team, after.team);
}

#[test]
fn alias_spelling_updates_existing_team_instead_of_inserting() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let rows: Vec<String> = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    sync(&mut store, Some(&csv_of(ROSTER_HEADER, &refs)), None, RunMode::Apply);

    // Same team re-exported under the short name, now with a room move.
    let renamed: Vec<String> = rows
        .iter()
        .map(|r| r.replace("Team VAD", "vad"))
        .map(|r| r.replace(",204,", ",EB1 105,"))
        .collect();
    let refs: Vec<&str> = renamed.iter().map(String::as_str).collect();
    let report = sync(&mut store, Some(&csv_of(ROSTER_HEADER, &refs)), None, RunMode::Apply);

    let pass = report.roster.unwrap();
    assert!(pass.inserted.is_empty(), "alias must not create a duplicate");
    assert_eq!(pass.updated.len(), 1);
    assert_eq!(pass.updated[0].team, "Team VAD");
    assert_eq!(store.count().unwrap(), 1);

    let stored = store.find_by_name_ci("Team VAD").unwrap().unwrap().team;
    assert_eq!(stored.room_number, "EB1 - 105");
}

#[test]
fn incomplete_unknown_team_is_never_inserted() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let roster = csv_of(
        ROSTER_HEADER,
        &[
            "L,l@x.y,1,2024BTECH001,btech,2024,Hosteller,yes,leader,Duo,,,,",
            "M,m@x.y,2,2024BTECH002,btech,2024,Hosteller,yes,member,Duo,,,,",
        ],
    );
    let report = sync(&mut store, Some(&roster), None, RunMode::Apply);
    let pass = report.roster.unwrap();
    assert!(pass.inserted.is_empty());
    assert_eq!(pass.summary.skipped, 1);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn checkin_never_reverts() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let rows: Vec<String> = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    sync(&mut store, Some(&csv_of(ROSTER_HEADER, &refs)), None, RunMode::Apply);
    assert!(store.find_by_name_ci("Team VAD").unwrap().unwrap().team.checked_in);

    // Re-export with the check-in cell blank again.
    let blanked: Vec<String> = rows.iter().map(|r| r.replace(",in,", ",,")).collect();
    let refs: Vec<&str> = blanked.iter().map(String::as_str).collect();
    sync(&mut store, Some(&csv_of(ROSTER_HEADER, &refs)), None, RunMode::Apply);
    assert!(store.find_by_name_ci("Team VAD").unwrap().unwrap().team.checked_in);
}

#[test]
fn short_rows_are_dropped_and_counted() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let roster = csv_of(
        ROSTER_HEADER,
        &["garbage,row", "", "   ", "only,five,fields,in,this"],
    );
    let report = sync(&mut store, Some(&roster), None, RunMode::Apply);
    let pass = report.roster.unwrap();
    assert_eq!(pass.dropped_rows, 2);
    assert_eq!(store.count().unwrap(), 0);
}

// -------------------------------------------------------------------------
// Dry run
// -------------------------------------------------------------------------

#[test]
fn dry_run_writes_nothing_and_reports_like_apply() {
    let rows: Vec<String> = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let roster = csv_of(ROSTER_HEADER, &refs);
    let submissions = csv_of(
        SUBMISSION_HEADER,
        &["1,t0,t1,priya@uni.edu,Priya,vad,12,204,Build a thing,https://github.com/x/y"],
    );

    let mut store = TeamStore::open_in_memory().unwrap();
    let dry = sync(&mut store, Some(&roster), Some(&submissions), RunMode::DryRun);
    assert_eq!(store.count().unwrap(), 0, "dry run must not write");

    let apply = sync(&mut store, Some(&roster), Some(&submissions), RunMode::Apply);
    assert_eq!(store.count().unwrap(), 1);

    // Identical reports apart from meta (mode, timestamp).
    let dry_json = serde_json::to_value(&dry).unwrap();
    let apply_json = serde_json::to_value(&apply).unwrap();
    assert_eq!(dry_json["roster"], apply_json["roster"]);
    assert_eq!(dry_json["submissions"], apply_json["submissions"]);
    assert_eq!(dry_json["meta"]["mode"], "dry-run");
    assert_eq!(apply_json["meta"]["mode"], "apply");
}

// -------------------------------------------------------------------------
// Submission pass
// -------------------------------------------------------------------------

#[test]
fn submissions_resolve_teams_inserted_by_the_roster_pass() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let rows: Vec<String> = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let roster = csv_of(ROSTER_HEADER, &refs);
    let submissions = csv_of(
        SUBMISSION_HEADER,
        &["1,t0,t1,priya@uni.edu,Priya,TeamVAD,,EB2-204,Route optimizer,https://github.com/v/r"],
    );

    let report = sync(&mut store, Some(&roster), Some(&submissions), RunMode::Apply);
    let pass = report.submissions.unwrap();
    assert!(pass.not_found.is_empty());
    assert_eq!(pass.updated.len(), 1);

    let stored = store.find_by_name_ci("Team VAD").unwrap().unwrap().team;
    assert_eq!(stored.problem_statement, "Route optimizer");
    assert_eq!(stored.repo_link, "https://github.com/v/r");
    // Room was already EB2 - 204 from the roster; no spurious change.
    assert!(!pass.updated[0]
        .changes
        .iter()
        .any(|c| c.field == "room_number"));
}

#[test]
fn later_submission_rows_override_earlier_ones() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let rows: Vec<String> = messy_team_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let roster = csv_of(ROSTER_HEADER, &refs);
    let submissions = csv_of(
        SUBMISSION_HEADER,
        &[
            "1,t0,t1,p@x.y,P,Team VAD,,,First statement,https://github.com/old/repo",
            "2,t0,t1,p@x.y,P,Team VAD,,,Final statement,https://github.com/new/repo",
        ],
    );

    let report = sync(&mut store, Some(&roster), Some(&submissions), RunMode::Apply);
    let pass = report.submissions.unwrap();
    assert_eq!(pass.updated.len(), 2);

    let stored = store.find_by_name_ci("Team VAD").unwrap().unwrap().team;
    assert_eq!(stored.problem_statement, "Final statement");
    assert_eq!(stored.repo_link, "https://github.com/new/repo");
}

#[test]
fn unknown_submission_team_lands_in_not_found() {
    let mut store = TeamStore::open_in_memory().unwrap();
    let submissions = csv_of(
        SUBMISSION_HEADER,
        &["1,t0,t1,x@x.y,X,No Such Team,,,Statement,"],
    );
    let report = sync(&mut store, None, Some(&submissions), RunMode::Apply);
    let pass = report.submissions.unwrap();
    assert_eq!(pass.not_found, vec!["No Such Team"]);
    assert_eq!(pass.summary.not_found, 1);
}

#[test]
fn ambiguous_fuzzy_match_is_skipped_with_candidates() {
    use chrono::Utc;
    use rollcall_model::{CanonicalTeam, Course, Person, Residency};

    fn person(email: &str) -> Person {
        Person {
            name: "X".to_string(),
            email: email.to_string(),
            whatsapp: "1".to_string(),
            roll_number: String::new(),
            course: Course::BTech,
            batch: "2024".to_string(),
            residency: Residency::Hosteller,
            mess_food: true,
        }
    }
    fn team(name: &str, tag: &str) -> CanonicalTeam {
        CanonicalTeam {
            name: name.to_string(),
            leader: person(&format!("l{tag}@x.y")),
            members: vec![
                person(&format!("a{tag}@x.y")),
                person(&format!("b{tag}@x.y")),
                person(&format!("c{tag}@x.y")),
            ],
            checked_in: false,
            board_given: false,
            room_number: String::new(),
            team_number: String::new(),
            problem_statement: String::new(),
            repo_link: String::new(),
            created_at: Utc::now(),
        }
    }

    // Two stored teams that only meet at the fuzzy level. They cannot both
    // arrive through the roster pass (the second would fuzzy-match the
    // first), so they are seeded directly.
    let mut store = TeamStore::open_in_memory().unwrap();
    store.insert(&team("spark x", "1")).unwrap();
    store.insert(&team("sparkx", "2")).unwrap();

    let submissions = csv_of(
        SUBMISSION_HEADER,
        &["1,t0,t1,x@x.y,X,SPARK.X,,,Statement,"],
    );
    let report = sync(&mut store, None, Some(&submissions), RunMode::Apply);
    let pass = report.submissions.unwrap();
    assert_eq!(pass.summary.skipped, 1);
    let reason = serde_json::to_value(&pass.skipped[0].reason).unwrap();
    assert_eq!(reason["kind"], "ambiguous");
    assert_eq!(reason["candidates"].as_array().unwrap().len(), 2);
}
