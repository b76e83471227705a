mod common;
use common::{add_pet, setup_empty_db};
use predicates::str::contains;
use std::fs;

#[test]
fn export_then_import_into_another_database() {
    let src = setup_empty_db();
    let a = add_pet(&src, "Mochi", "gecko", &["--min", "2", "--max", "4"]);
    let b = add_pet(&src, "Tama", "cat", &[]);
    src.run_at("2025-09-09 08:00", &["feed", &a.to_string()]).success();
    src.run(&["feed", &a.to_string(), &b.to_string()]).success();
    src.run(&["move", &b.to_string(), "--up"]).success();

    let file = src.file("pets.json");
    src.run(&["export", "--file", &file])
        .success()
        .stdout(contains("Exported 2 pets and 3 feedings"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(json["pets"].as_array().unwrap().len(), 2);
    // pets are exported in display order
    assert_eq!(json["pets"][0]["name"], "Tama");
    assert_eq!(json["pets"][1]["type"], "gecko");
    assert_eq!(json["pets"][1]["idealMaxDays"], 4);
    assert!(json["feeds"][0]["petId"].is_i64());

    let dst = setup_empty_db();
    dst.run(&["import", "--file", &file, "--yes"])
        .success()
        .stdout(contains("Imported 2 pets and 3 feedings."));

    assert_eq!(dst.list_json(), src.list_json());
}

#[test]
fn existing_export_is_kept_without_force() {
    let db = setup_empty_db();
    let file = db.file("pets.json");
    fs::write(&file, "keep me").unwrap();

    // no answer on stdin: the prompt is declined
    db.run(&["export", "--file", &file]).failure();
    assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");

    db.run(&["export", "--file", &file, "--force"]).success();
    assert!(fs::read_to_string(&file).unwrap().contains("\"pets\""));
}

#[test]
fn invalid_documents_leave_the_database_untouched() {
    let db = setup_empty_db();
    let id = add_pet(&db, "Keep", "cat", &[]);

    let cases = [
        ("missing.json", r#"{"pets": []}"#, "no 'feeds' collection"),
        (
            "orphan.json",
            r#"{"pets": [{"id": 1, "name": "A", "type": "cat"}],
                "feeds": [{"id": 1, "petId": 2, "date": "2025-09-01"}]}"#,
            "unknown pet #2",
        ),
        (
            "bounds.json",
            r#"{"pets": [{"id": 1, "name": "A", "type": "cat", "idealMinDays": 3, "idealMaxDays": 1}],
                "feeds": []}"#,
            "greater than max days",
        ),
        ("broken.json", "{ not json", "Malformed JSON document"),
    ];

    for (name, content, message) in cases {
        let file = db.file(name);
        fs::write(&file, content).unwrap();
        db.run(&["import", "--file", &file, "--yes"])
            .failure()
            .stderr(contains(message));
    }

    assert_eq!(db.listed_ids(), vec![id]);
}

#[test]
fn import_collapses_same_day_duplicates() {
    let db = setup_empty_db();
    let file = db.file("dups.json");
    fs::write(
        &file,
        r#"{"pets": [{"id": 5, "name": "Mochi", "type": "gecko", "order": 0}],
            "feeds": [
              {"id": 1, "petId": 5, "date": "2025-09-10T08:00:00"},
              {"id": 2, "petId": 5, "date": "2025-09-10T19:00:00"},
              {"id": 3, "petId": 5, "date": "2025-09-09T08:00:00"}
            ]}"#,
    )
    .unwrap();

    db.run(&["import", "--file", &file, "--yes"])
        .success()
        .stdout(contains("1 same-day duplicate feeding(s) were dropped."))
        .stdout(contains("Imported 1 pets and 2 feedings."));

    assert_eq!(db.listed_ids(), vec![5]);
    assert_eq!(db.list_json()["entries"][0]["fed_today"], true);
}

#[test]
fn backup_copies_and_compresses() {
    let db = setup_empty_db();
    let plain = db.file("backup.sqlite");
    db.run(&["backup", "--file", &plain]).success();
    assert!(fs::metadata(&plain).unwrap().len() > 0);

    let zipped = db.file("backup2.sqlite");
    db.run(&["backup", "--file", &zipped, "--compress"]).success();
    assert!(fs::metadata(db.file("backup2.zip")).is_ok());
}
