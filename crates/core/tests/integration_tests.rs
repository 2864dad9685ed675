//! Integration tests for mita-core
//!
//! These tests open real database files in temporary directories and check
//! the store, templating and snapshot workflows end-to-end.

use mita_core::{
    command_definitions::VariableRecord,
    error::Error,
    file_handling::{read_snapshot, write_snapshot, Snapshot},
    interpolation::{build_bindings, renderer_for, Renderer},
    store::{Store, SCHEMA_VERSION},
};
use rusqlite::Connection;
use tempfile::TempDir;

fn database_path(temp_dir: &TempDir) -> String {
    temp_dir
        .path()
        .join("mita")
        .join("database.db")
        .to_str()
        .unwrap()
        .to_string()
}

fn table_names(path: &str) -> Vec<String> {
    let conn = Connection::open(path).unwrap();
    let mut statement = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    let names = statement
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

/// Adding a pair makes it listable; adding it again is refused.
#[test]
fn test_add_command_then_duplicate() {
    let store = Store::open_in_memory().unwrap();

    let id = store.add_command("list files", "ls -la").unwrap();
    let commands = store.list_commands().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].id, id);
    assert_eq!(commands[0].label, "list files");
    assert_eq!(commands[0].command, "ls -la");

    let again = store.add_command("list files", "ls -la");
    assert!(matches!(again, Err(Error::DuplicateCommand { .. })));
    assert_eq!(store.list_commands().unwrap().len(), 1);
}

/// The same label may be used for different command texts.
#[test]
fn test_same_label_different_commands() {
    let store = Store::open_in_memory().unwrap();

    store.add_command("logs", "journalctl -f").unwrap();
    store.add_command("logs", "tail -f /var/log/syslog").unwrap();

    let commands = store.list_commands().unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].command, "journalctl -f");
    assert_eq!(commands[1].command, "tail -f /var/log/syslog");
}

#[test]
fn test_modify_and_delete_commands() {
    let store = Store::open_in_memory().unwrap();
    let id = store.add_command("status", "git status").unwrap();

    assert_eq!(store.modify_command(id, "git status -sb", "short status").unwrap(), 1);
    let commands = store.list_commands().unwrap();
    assert_eq!(commands[0].label, "short status");
    assert_eq!(commands[0].command, "git status -sb");

    assert_eq!(store.delete_command(id).unwrap(), 1);
    assert!(store.list_commands().unwrap().is_empty());
}

/// Unknown ids are a silent no-op for both update and delete.
#[test]
fn test_unknown_command_id_is_noop() {
    let store = Store::open_in_memory().unwrap();
    store.add_command("uptime", "uptime").unwrap();
    let before = store.list_commands().unwrap();

    assert_eq!(store.delete_command(9_999).unwrap(), 0);
    assert_eq!(store.modify_command(9_999, "x", "y").unwrap(), 0);

    assert_eq!(store.list_commands().unwrap(), before);
}

#[test]
fn test_delete_commands_by_text() {
    let store = Store::open_in_memory().unwrap();
    store.add_command("a", "make test").unwrap();
    store.add_command("b", "make test").unwrap();
    store.add_command("c", "make build").unwrap();

    assert_eq!(store.delete_commands_by_text("make test").unwrap(), 2);
    let remaining = store.list_commands().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].label, "c");
}

/// A second set keeps the first value as history.
#[test]
fn test_set_variable_shifts_history() {
    let store = Store::open_in_memory().unwrap();

    store.set_variable("host", "staging").unwrap();
    assert_eq!(
        store.get_variable("host").unwrap(),
        Some(VariableRecord {
            name: "host".to_string(),
            value: "staging".to_string(),
            past_value: None,
        })
    );

    store.set_variable("host", "prod").unwrap();
    let variable = store.get_variable("host").unwrap().unwrap();
    assert_eq!(variable.value, "prod");
    assert_eq!(variable.past_value.as_deref(), Some("staging"));
}

/// Swapping twice gives back the original row.
#[test]
fn test_swap_is_an_involution() {
    let store = Store::open_in_memory().unwrap();
    store.set_variable("region", "us-east-1").unwrap();
    store.set_variable("region", "eu-west-1").unwrap();
    let original = store.get_variable("region").unwrap().unwrap();

    store.swap_variable("region").unwrap();
    let swapped = store.get_variable("region").unwrap().unwrap();
    assert_eq!(swapped.value, "us-east-1");
    assert_eq!(swapped.past_value.as_deref(), Some("eu-west-1"));

    store.swap_variable("region").unwrap();
    assert_eq!(store.get_variable("region").unwrap().unwrap(), original);
}

#[test]
fn test_swap_without_history_leaves_row_unchanged() {
    let store = Store::open_in_memory().unwrap();
    store.set_variable("user", "root").unwrap();
    let before = store.get_variable("user").unwrap();

    let result = store.swap_variable("user");
    assert!(matches!(result, Err(Error::NoHistory(name)) if name == "user"));
    assert_eq!(store.get_variable("user").unwrap(), before);
}

#[test]
fn test_swap_missing_variable_creates_nothing() {
    let store = Store::open_in_memory().unwrap();

    let result = store.swap_variable("ghost");
    assert!(matches!(result, Err(Error::VariableNotFound(name)) if name == "ghost"));
    assert!(store.get_variable("ghost").unwrap().is_none());
    assert!(store.list_variables().unwrap().is_empty());
}

#[test]
fn test_list_and_delete_variables() {
    let store = Store::open_in_memory().unwrap();
    store.set_variable("b", "2").unwrap();
    store.set_variable("a", "1").unwrap();

    let names: Vec<String> = store
        .list_variables()
        .unwrap()
        .into_iter()
        .map(|variable| variable.name)
        .collect();
    assert_eq!(names, vec!["b", "a"]);

    assert_eq!(store.delete_variable("b").unwrap(), 1);
    assert_eq!(store.delete_variable("b").unwrap(), 0);
    assert_eq!(store.list_variables().unwrap().len(), 1);
}

/// Opening a new file stamps the version and creates tables exactly once.
#[test]
fn test_fresh_store_initialization_is_idempotent() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = database_path(&temp_dir);

    {
        let store = Store::open(&path).unwrap();
        assert_eq!(store.created_tables(), &["commands", "variables"]);
        store.add_command("hello", "echo hello").unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert!(store.created_tables().is_empty());
    assert_eq!(store.list_commands().unwrap().len(), 1);

    let conn = Connection::open(&path).unwrap();
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

/// A database from another schema version is refused untouched.
#[test]
fn test_version_mismatch_is_refused() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = database_path(&temp_dir);
    std::fs::create_dir_all(temp_dir.path().join("mita")).unwrap();

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION + 41))
            .unwrap();
    }

    let result = Store::open(&path);
    assert!(matches!(
        result,
        Err(Error::IncompatibleVersion { found, expected })
            if found == SCHEMA_VERSION + 41 && expected == SCHEMA_VERSION
    ));
    assert!(table_names(&path).is_empty());
}

/// Variables read from the store drive rendering; no-render leaves text alone.
#[test]
fn test_render_stored_command_workflow() {
    let store = Store::open_in_memory().unwrap();
    store.add_command("connect", "ssh {{ user }}@{{ host }} -p {{ port }}").unwrap();
    store.set_variable("user", "deploy").unwrap();
    store.set_variable("host", "10.0.0.5").unwrap();

    let command = store.list_commands().unwrap().remove(0);
    let bindings = build_bindings(&store.list_variables().unwrap());

    let rendered = renderer_for(false).render(&command.command, &bindings).unwrap();
    assert_eq!(rendered, "ssh deploy@10.0.0.5 -p ");

    let raw = renderer_for(true).render(&command.command, &bindings).unwrap();
    assert_eq!(raw, command.command);
}

/// Shell syntax in a stored command comes back exactly, around the placeholders.
#[test]
fn test_render_stored_shell_command_keeps_braces() {
    let store = Store::open_in_memory().unwrap();
    let text = "find ${HOME}/{{ dir }} -name '*.log' -exec awk '{print $1}' {} \\;";
    store.add_command("logs", text).unwrap();
    store.set_variable("dir", "logs").unwrap();

    let command = store.list_commands().unwrap().remove(0);
    let bindings = build_bindings(&store.list_variables().unwrap());

    let rendered = renderer_for(false).render(&command.command, &bindings).unwrap();
    assert_eq!(
        rendered,
        "find ${HOME}/logs -name '*.log' -exec awk '{print $1}' {} \\;"
    );
}

/// Export from one store, import into another.
#[test]
fn test_snapshot_export_import_workflow() {
    let temp_dir = tempfile::tempdir().unwrap();
    let snapshot_path = temp_dir.path().join("backup.yml");
    let snapshot_path = snapshot_path.to_str().unwrap();

    let source = Store::open_in_memory().unwrap();
    source.add_command("disk", "df -h").unwrap();
    source.add_command("mem", "free -m").unwrap();
    source.set_variable("env", "dev").unwrap();
    source.set_variable("env", "prod").unwrap();

    write_snapshot(snapshot_path, &Snapshot::capture(&source).unwrap()).unwrap();

    let target = Store::open_in_memory().unwrap();
    let report = read_snapshot(snapshot_path)
        .unwrap()
        .restore(&target, "mita")
        .unwrap();
    assert_eq!(report.commands_added, 2);
    assert_eq!(report.variables_restored, 1);

    let labels: Vec<String> = target
        .list_commands()
        .unwrap()
        .into_iter()
        .map(|command| command.label)
        .collect();
    assert_eq!(labels, vec!["disk", "mem"]);
    assert_eq!(
        target.list_variables().unwrap(),
        source.list_variables().unwrap()
    );
}
