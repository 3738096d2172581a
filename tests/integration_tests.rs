//! Integration tests for the trainreg CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a trainreg command isolated from the user's config
fn trainreg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trainreg").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("TRAINREG_FILE")
        .env_remove("TRAINREG_DATE_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a project whose register is `trainings.csv`
fn setup_csv_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path()).arg("init").assert().success();
    fs::write(
        tmp.path().join(".trainreg/config.yaml"),
        "data_file: trainings.csv\ndate_format: \"%d/%m/%Y\"\n",
    )
    .unwrap();
    tmp
}

/// Helper to add a record and return its id
fn add_record(tmp: &TempDir, employee: &str, course: &str, date: Option<&str>) -> String {
    let mut args = vec!["add", "-f", "id", "--employee", employee, "--course", course];
    if let Some(d) = date {
        args.push("--date");
        args.push(d);
    }
    let output = trainreg(tmp.path()).args(&args).output().unwrap();
    assert!(output.status.success(), "add failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn register(tmp: &TempDir) -> String {
    fs::read_to_string(tmp.path().join("trainings.csv")).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path())
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Training completion register"));

    trainreg(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep a register of which employee"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trainreg"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path())
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trainreg"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_config_and_register() {
    let tmp = TempDir::new().unwrap();

    trainreg(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".trainreg/config.yaml").is_file());
    assert!(tmp.path().join("trainings.xlsx").is_file());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path()).arg("init").assert().success();
    trainreg(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_register_is_created_on_first_use() {
    let tmp = setup_csv_project();
    trainreg(tmp.path())
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout("0\n");
    assert_eq!(register(&tmp), "id,employee,course,completion_date\n");
}

// ============================================================================
// Add / List
// ============================================================================

#[test]
fn test_add_appends_one_row() {
    let tmp = setup_csv_project();
    let id = add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    assert!(id.starts_with("TRN-"));

    let contents = register(&tmp);
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains(&format!("{},Ana,NR-10,2024-03-05", id)));
}

#[test]
fn test_add_without_employee_is_rejected() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);
    let before = register(&tmp);

    trainreg(tmp.path())
        .args(["add", "--course", "NR-35"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("employee must not be empty"));

    trainreg(tmp.path())
        .args(["add", "--employee", "Bob", "--course", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("course must not be empty"));

    assert_eq!(register(&tmp), before);
}

#[test]
fn test_add_rejects_unreadable_date() {
    let tmp = setup_csv_project();
    trainreg(tmp.path())
        .args(["add", "-e", "Ana", "-c", "NR-10", "-d", "31/02/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized date"));
}

#[test]
fn test_list_shows_records_with_status() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("2024-03-05"));
    add_record(&tmp, "Bob", "NR-35", None);

    trainreg(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana"))
        .stdout(predicate::str::contains("05/03/2024"))
        .stdout(predicate::str::contains("pending"))
        .stdout(predicate::str::contains("2 record(s) found"));
}

#[test]
fn test_list_csv_includes_short_ids() {
    let tmp = setup_csv_project();
    let id = add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));

    trainreg(tmp.path())
        .args(["list", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "short_id,id,employee,course,date,status\n",
        ))
        .stdout(predicate::str::contains(format!(
            "@1,{},Ana,NR-10,05/03/2024,completed",
            id
        )));
}

#[test]
fn test_list_filters() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana Souza", "NR-10", Some("05/03/2024"));
    add_record(&tmp, "Bob", "NR-35", None);
    add_record(&tmp, "Ana Lima", "First Aid", None);

    trainreg(tmp.path())
        .args(["list", "--employee", "ana", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana Souza"))
        .stdout(predicate::str::contains("Ana Lima"))
        .stdout(predicate::str::contains("Bob").not());

    trainreg(tmp.path())
        .args(["list", "--employee", "Ana Souza", "--count"])
        .assert()
        .success()
        .stdout("1\n");

    trainreg(tmp.path())
        .args(["list", "--status", "pending", "--course", "nr", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_list_json_output() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);

    trainreg(tmp.path())
        .args(["list", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"employee\": \"Ana\""))
        .stdout(predicate::str::contains("\"status\": \"pending\""));
}

// ============================================================================
// Show / Edit / Delete by reference
// ============================================================================

#[test]
fn test_show_by_short_id() {
    let tmp = setup_csv_project();
    let id = add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    trainreg(tmp.path()).args(["list", "-q"]).assert().success();

    trainreg(tmp.path())
        .args(["show", "@1", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id))
        .stdout(predicate::str::contains("\"completion_date\": \"05/03/2024\""));
}

#[test]
fn test_show_unknown_reference_fails() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);
    trainreg(tmp.path())
        .args(["show", "@9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no record found"));
}

#[test]
fn test_edit_by_short_id_sets_and_clears_date() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    let bob = add_record(&tmp, "Bob", "NR-35", None);
    trainreg(tmp.path()).args(["list", "-q"]).assert().success();

    trainreg(tmp.path())
        .args(["edit", "@2", "--date", "01/06/2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
    assert!(register(&tmp).contains(&format!("{},Bob,NR-35,2024-06-01", bob)));

    trainreg(tmp.path())
        .args(["edit", &bob, "--clear-date", "--course", "NR-35 Refresher"])
        .assert()
        .success();
    assert!(register(&tmp).contains(&format!("{},Bob,NR-35 Refresher,\n", bob)));
}

#[test]
fn test_edit_rejects_empty_employee() {
    let tmp = setup_csv_project();
    let id = add_record(&tmp, "Ana", "NR-10", None);
    let before = register(&tmp);

    trainreg(tmp.path())
        .args(["edit", &id, "--employee", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("employee must not be empty"));
    assert_eq!(register(&tmp), before);
}

#[test]
fn test_edit_without_changes_fails() {
    let tmp = setup_csv_project();
    let id = add_record(&tmp, "Ana", "NR-10", None);
    trainreg(tmp.path())
        .args(["edit", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn test_delete_by_short_id() {
    let tmp = setup_csv_project();
    let ana = add_record(&tmp, "Ana", "NR-10", None);
    add_record(&tmp, "Bob", "NR-35", None);
    trainreg(tmp.path()).args(["list", "-q"]).assert().success();

    trainreg(tmp.path())
        .args(["delete", "@1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    let contents = register(&tmp);
    assert!(!contents.contains(&ana));
    assert!(contents.contains("Bob"));
}

// ============================================================================
// Key-based edit / delete (exactly-one match policy)
// ============================================================================

#[test]
fn test_key_edit_with_unique_match() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);
    add_record(&tmp, "Ana", "NR-35", None);

    trainreg(tmp.path())
        .args([
            "edit",
            "--match-employee",
            "Ana",
            "--match-course",
            "NR-10",
            "--date",
            "2024-01-15",
        ])
        .assert()
        .success();

    let contents = register(&tmp);
    assert!(contents.contains("Ana,NR-10,2024-01-15"));
    assert!(contents.contains("Ana,NR-35,\n"));
}

#[test]
fn test_key_edit_with_duplicates_changes_nothing() {
    let tmp = setup_csv_project();
    let first = add_record(&tmp, "Ana", "NR-10", None);
    let second = add_record(&tmp, "Ana", "NR-10", None);
    let before = register(&tmp);

    trainreg(tmp.path())
        .args([
            "edit",
            "--match-employee",
            "Ana",
            "--match-course",
            "NR-10",
            "--date",
            "2024-01-15",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("records match"));
    assert_eq!(register(&tmp), before);

    // Both remain addressable by id
    trainreg(tmp.path())
        .args(["edit", &second, "--date", "2024-01-15"])
        .assert()
        .success();
    let contents = register(&tmp);
    assert!(contents.contains(&format!("{},Ana,NR-10,\n", first)));
    assert!(contents.contains(&format!("{},Ana,NR-10,2024-01-15", second)));
}

#[test]
fn test_key_delete_without_match_changes_nothing() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    let before = register(&tmp);

    // Date mismatch: the stored record has a date, the key has none
    trainreg(tmp.path())
        .args([
            "delete",
            "--match-employee",
            "Ana",
            "--match-course",
            "NR-10",
            "--yes",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no record found"));
    assert_eq!(register(&tmp), before);

    trainreg(tmp.path())
        .args([
            "delete",
            "--match-employee",
            "Ana",
            "--match-course",
            "NR-10",
            "--match-date",
            "05/03/2024",
            "--yes",
        ])
        .assert()
        .success();
    assert_eq!(register(&tmp), "id,employee,course,completion_date\n");
}

// ============================================================================
// Summary / Chart / Report
// ============================================================================

#[test]
fn test_summary_counts() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    add_record(&tmp, "Ana", "NR-35", None);
    add_record(&tmp, "Bob", "NR-10", Some("06/03/2024"));

    trainreg(tmp.path())
        .args(["summary", "-f", "csv"])
        .assert()
        .success()
        .stdout("total,completed,pending\n3,2,1\n");

    trainreg(tmp.path())
        .args(["summary", "-f", "csv", "--employee", "ana"])
        .assert()
        .success()
        .stdout("total,completed,pending\n2,1,1\n");
}

#[test]
fn test_chart_groups_by_employee() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);
    add_record(&tmp, "Ana", "NR-35", None);
    add_record(&tmp, "Bob", "NR-10", None);

    trainreg(tmp.path())
        .args(["chart", "--by", "employee", "-f", "csv"])
        .assert()
        .success()
        .stdout("employee,count\nAna,2\nBob,1\n");

    trainreg(tmp.path())
        .args(["chart", "--by", "course", "--kind", "pie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("66.7%"));
}

#[test]
fn test_report_warns_about_missing_logo() {
    let tmp = setup_csv_project();
    fs::write(
        tmp.path().join(".trainreg/config.yaml"),
        "data_file: trainings.csv\nlogo: missing-logo.png\n",
    )
    .unwrap();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));

    trainreg(tmp.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Training Completion Report"))
        .stdout(predicate::str::contains("## By Course"))
        .stderr(predicate::str::contains("logo not found"));
}

#[test]
fn test_report_to_file() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);

    trainreg(tmp.path())
        .args(["report", "-o", "out/report.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));
    let report = fs::read_to_string(tmp.path().join("out/report.md")).unwrap();
    assert!(report.contains("## Pending Trainings"));
}

// ============================================================================
// Export and spreadsheet loading
// ============================================================================

#[test]
fn test_export_csv_has_status_column() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    add_record(&tmp, "Bob", "NR-35", None);

    trainreg(tmp.path())
        .args(["export", "csv", "-o", "export.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 record(s)"));

    let contents = fs::read_to_string(tmp.path().join("export.csv")).unwrap();
    assert_eq!(
        contents,
        "employee,course,completion_date,status\nAna,NR-10,05/03/2024,completed\nBob,NR-35,,pending\n"
    );
}

#[test]
fn test_export_csv_to_stdout_respects_filter() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    add_record(&tmp, "Bob", "NR-35", None);

    trainreg(tmp.path())
        .args(["export", "csv", "-o", "-", "--status", "pending"])
        .assert()
        .success()
        .stdout("employee,course,completion_date,status\nBob,NR-35,,pending\n");
}

#[test]
fn test_export_default_name_is_timestamped() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", None);

    trainreg(tmp.path())
        .args(["export", "csv"])
        .assert()
        .success();

    let exported: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with("trainings_") && n.ends_with(".csv"))
        .collect();
    assert_eq!(exported.len(), 1);
    // trainings_DDMMYYYY_HHMM.csv
    assert_eq!(exported[0].len(), "trainings_01012025_0000.csv".len());
}

#[test]
fn test_export_xlsx_reloads_same_values() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    add_record(&tmp, "Bob", "NR-35", None);

    trainreg(tmp.path())
        .args(["export", "xlsx", "-o", "export.xlsx"])
        .assert()
        .success();

    trainreg(tmp.path())
        .args(["list", "--file", "export.xlsx", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana,NR-10,05/03/2024,completed"))
        .stdout(predicate::str::contains("Bob,NR-35,,pending"));
}

#[test]
fn test_xlsx_register_round_trip() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path()).arg("init").assert().success();

    trainreg(tmp.path())
        .args(["add", "-e", "Ana", "-c", "NR-10", "-d", "05/03/2024"])
        .assert()
        .success();

    trainreg(tmp.path())
        .args(["list", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana,NR-10,05/03/2024,completed"));
}

#[test]
fn test_localized_headers_are_normalized() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("legacy.csv"),
        "Nome;Treinamento;Data de Conclusão;Setor\nJoão;NR-10;05/03/2024;Ops\nMaria;NR-35;;Ops\n",
    )
    .unwrap();

    trainreg(tmp.path())
        .args(["list", "--file", "legacy.csv", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("João,NR-10,05/03/2024,completed"))
        .stdout(predicate::str::contains("Maria,NR-35,,pending"))
        .stdout(predicate::str::contains("Ops").not());
}

#[test]
fn test_legacy_register_gains_stable_ids() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("legacy.csv"),
        "Nome;Treinamento;Data de Conclusão\nJoão;NR-10;05/03/2024\nMaria;NR-35;\n",
    )
    .unwrap();

    trainreg(tmp.path())
        .args(["list", "--file", "legacy.csv", "-q"])
        .assert()
        .success();

    trainreg(tmp.path())
        .args(["edit", "@2", "--file", "legacy.csv", "--date", "01/01/2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria"));

    let contents = fs::read_to_string(tmp.path().join("legacy.csv")).unwrap();
    assert!(contents.starts_with("id,employee,course,completion_date\n"));
    assert!(contents.contains(",João,NR-10,2024-03-05\n"));
    assert!(contents.contains(",Maria,NR-35,2025-01-01\n"));

    trainreg(tmp.path())
        .args(["show", "@1", "--file", "legacy.csv", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"employee\": \"João\""));
}

#[test]
fn test_legacy_xlsx_register_ids_survive_restart() {
    let tmp = setup_csv_project();
    add_record(&tmp, "Ana", "NR-10", Some("05/03/2024"));
    add_record(&tmp, "Bob", "NR-35", None);

    // Exported workbooks carry no id column
    trainreg(tmp.path())
        .args(["export", "xlsx", "-o", "legacy.xlsx"])
        .assert()
        .success();

    trainreg(tmp.path())
        .args(["list", "--file", "legacy.xlsx", "-q"])
        .assert()
        .success();

    trainreg(tmp.path())
        .args(["delete", "@1", "--file", "legacy.xlsx", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana"));

    trainreg(tmp.path())
        .args(["list", "--file", "legacy.xlsx", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana").not())
        .stdout(predicate::str::contains("Bob,NR-35,,pending"));
}

#[test]
fn test_read_only_spreadsheet_format_is_reported() {
    let tmp = TempDir::new().unwrap();
    trainreg(tmp.path())
        .args(["add", "--file", "register.ods", "-e", "Ana", "-c", "NR-10"])
        .assert()
        .failure();
}
