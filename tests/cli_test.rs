mod utils;

use clap::Parser;
use recipegen::cli::{run, Args};
use recipegen::config::{Config, ReplacementRule};
use recipegen::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use utils::{list_files, Project};

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("recipegen")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_default_args() {
    let parsed = Args::try_parse_from(make_args(&[])).unwrap();

    assert_eq!(parsed.config, PathBuf::from("config.json"));
    assert!(!parsed.dry_run);
    assert!(!parsed.explain);
    assert!(!parsed.stats);
    assert!(!parsed.scan);
    assert!(!parsed.verbose);
    assert_eq!(parsed.preview, None);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--config",
        "mods/config.json",
        "--dry-run",
        "--explain",
        "--stats",
        "--scan",
        "--preview",
        "5",
        "--verbose",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, PathBuf::from("mods/config.json"));
    assert!(parsed.dry_run);
    assert!(parsed.explain);
    assert!(parsed.stats);
    assert!(parsed.scan);
    assert!(parsed.verbose);
    assert_eq!(parsed.preview, Some(5));

    let options = parsed.run_options();
    assert!(options.dry_run && options.explain && options.per_type_stats);
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["-c", "a.json", "-n", "-e", "-v"])).unwrap();

    assert_eq!(parsed.config, PathBuf::from("a.json"));
    assert!(parsed.dry_run);
    assert!(parsed.explain);
    assert!(parsed.verbose);
}

#[test]
fn test_unknown_argument() {
    assert!(Args::try_parse_from(make_args(&["--force"])).is_err());
    assert!(Args::try_parse_from(make_args(&["--preview", "many"])).is_err());
}

fn args_for(config: PathBuf) -> Args {
    Args::try_parse_from(make_args(&["--config", config.to_str().unwrap()])).unwrap()
}

#[test]
fn test_run_generates_files() {
    let project = Project::new(vec![ReplacementRule::new("tree", ["oak", "birch"])])
        .template("recipe_{tree}.json", "{modid}:{tree}");
    let config_path = project.save_config();

    let stats = run(args_for(config_path)).unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(project.read_output("recipe_oak.json"), "minecraft:oak");
}

#[test]
fn test_run_with_write_failures_returns_error() {
    let project = Project::new(vec![ReplacementRule::new("tree", ["oak", "birch"])])
        .template("{tree}.json", "{tree}");
    std::fs::create_dir_all(project.output_dir().join("oak.json")).unwrap();
    let config_path = project.save_config();

    let err = run(args_for(config_path)).unwrap_err();

    assert!(matches!(err, Error::PartialFailure { failed: 1, total: 2 }));
    assert_eq!(project.read_output("birch.json"), "birch");
}

#[test]
fn test_run_missing_config_is_fatal() {
    let project = Project::new(vec![]);
    let err = run(args_for(project.dir.path().join("missing.json"))).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
}

#[test]
fn test_run_invalid_config_is_fatal() {
    let project = Project::new(vec![]);
    let path = project.dir.path().join("config.json");
    std::fs::write(&path, "{ invalid").unwrap();

    let err = run(args_for(path)).unwrap_err();
    assert!(matches!(err, Error::ConfigParseError(_)));
}

#[test]
fn test_run_scan_updates_config() {
    let mut project = Project::new(vec![ReplacementRule::new("tree", ["oak"])])
        .template("b_{tree}.json", "{tree}")
        .template("a_{tree}.json", "{tree}");
    project.config.set_template_files(Vec::<String>::new());
    let config_path = project.save_config();

    let mut args = args_for(config_path.clone());
    args.scan = true;
    args.dry_run = true;
    let stats = run(args).unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(Config::load(&config_path).unwrap().template_files(), ["a_{tree}.json", "b_{tree}.json"]);
    assert!(list_files(&project.output_dir()).is_empty());
}

#[test]
fn test_run_preview_writes_nothing() {
    let project = Project::new(vec![ReplacementRule::new("tree", ["oak", "birch", "spruce"])])
        .template("{tree}.json", "{tree}");
    let config_path = project.save_config();

    let mut args = args_for(config_path);
    args.preview = Some(2);
    let stats = run(args).unwrap();

    assert_eq!(stats.total, 2);
    assert!(!project.output_dir().exists());
}
