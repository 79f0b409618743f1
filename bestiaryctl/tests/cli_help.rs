use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn isolated(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bestiaryctl");
    cmd.current_dir(dir)
        .env_remove("BESTIARY_CONFIG")
        .env_remove("BESTIARY_CATALOG_URL")
        .env("BESTIARY_FAVORITES_DIR", dir.join("favorites"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = cargo_bin_cmd!("bestiaryctl");
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for subcommand in ["list", "show", "categories", "favorites"] {
        assert!(text.contains(subcommand), "help missing '{subcommand}'");
    }
    assert!(text.contains("--server"), "help missing --server");
}

#[test]
fn list_help_documents_filters() {
    let mut cmd = cargo_bin_cmd!("bestiaryctl");
    cmd.args(["list", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--category")
                .and(predicate::str::contains("--favorites"))
                .and(predicate::str::contains("--order")),
        );
}

#[test]
fn favorites_round_trip_through_favorites_dir() {
    let dir = tempfile::tempdir().unwrap();

    isolated(dir.path())
        .args(["favorites", "add", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 25"));
    isolated(dir.path())
        .args(["favorites", "add", "150"])
        .assert()
        .success();

    isolated(dir.path())
        .args(["favorites", "list"])
        .assert()
        .success()
        .stdout(predicate::eq("25\n150\n"));

    assert!(dir.path().join("favorites/app-favorites.json").is_file());

    isolated(dir.path())
        .args(["favorites", "toggle", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is no longer a favorite"));

    isolated(dir.path())
        .args(["favorites", "clear"])
        .assert()
        .success();
    isolated(dir.path())
        .args(["favorites", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn blank_ids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    isolated(dir.path())
        .args(["favorites", "add", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid creature id"));
}
