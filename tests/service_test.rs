mod utils;

use recipegen::config::ReplacementRule;
use recipegen::processor::{Event, RunOptions};
use recipegen::service::GenerationService;
use utils::{list_files, Project};

#[test]
fn test_background_run_streams_events() {
    let project = Project::new(vec![ReplacementRule::new("tree", ["oak", "birch"])])
        .template("recipe_{tree}.json", "{tree}");

    let service = GenerationService::new();
    let handle = service.start(project.config.clone(), RunOptions::default()).unwrap();
    let events: Vec<Event> = handle.events().iter().collect();
    let stats = handle.join().unwrap();

    assert_eq!(stats.total, 2);
    assert!(events.contains(&Event::Progress("recipe_oak.json".to_string())));
    assert!(events.contains(&Event::Progress("recipe_birch.json".to_string())));
    assert_eq!(events.last(), Some(&Event::Completed(stats)));
    assert_eq!(list_files(&project.output_dir()), ["recipe_birch.json", "recipe_oak.json"]);
    assert!(!service.is_running());
}

#[test]
fn test_service_can_run_again_after_join() {
    let project = Project::new(vec![ReplacementRule::new("tree", ["oak"])])
        .template("{tree}.json", "{tree}");
    let service = GenerationService::new();
    let options = RunOptions { dry_run: true, ..RunOptions::default() };

    let first = service.start(project.config.clone(), options).unwrap().join().unwrap();
    let second = service.start(project.config.clone(), options).unwrap().join().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total, 1);
}

#[test]
fn test_cancel_stops_background_run() {
    let values: Vec<String> = (0..200).map(|i| format!("v{i}")).collect();
    let project = Project::new(vec![
        ReplacementRule::new("a", values.clone()),
        ReplacementRule::new("b", values),
    ])
    .template("{a}_{b}.json", "{a}{b}");

    let service = GenerationService::new();
    let options = RunOptions { dry_run: true, ..RunOptions::default() };
    let handle = service.start(project.config.clone(), options).unwrap();

    let mut last = None;
    for event in handle.events() {
        if matches!(&event, Event::Progress(m) if m.starts_with("[dry run]")) {
            handle.cancel();
        }
        last = Some(event);
    }
    let stats = handle.join().unwrap();

    assert!(stats.total < 40_000);
    assert!(matches!(last, Some(Event::Cancelled(s)) if s.total == stats.total));
}

#[test]
fn test_rule_without_values_does_not_block_other_templates() {
    let project = Project::new(vec![
        ReplacementRule::new("tree", ["oak", "birch"]),
        ReplacementRule::new("tool", Vec::<String>::new()),
    ])
    .template("{tree}.json", "{tree}")
    .template("{tool}.json", "{tool}");

    let service = GenerationService::new();
    let handle = service.start(project.config.clone(), RunOptions::default()).unwrap();
    let events: Vec<Event> = handle.events().iter().collect();
    let stats = handle.join().unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(list_files(&project.output_dir()), ["birch.json", "oak.json"]);
    assert!(events.contains(&Event::Warning("rule 'tool' has no values".to_string())));
    assert!(events.contains(&Event::Warning("No combinations generated for {tool}.json".to_string())));
}

#[test]
fn test_missing_template_dir_skips_each_template() {
    let mut project = Project::new(vec![ReplacementRule::new("tree", ["oak"])])
        .template("{tree}.json", "{tree}")
        .template("{tree}_slab.json", "{tree}");
    project.config.template_dir = project.dir.path().join("nope").display().to_string();

    let service = GenerationService::new();
    let handle = service.start(project.config.clone(), RunOptions::default()).unwrap();
    let events: Vec<Event> = handle.events().iter().collect();
    let stats = handle.join().unwrap();

    assert_eq!(stats.total, 0);
    let skipped: Vec<&str> = stats.skipped_templates.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(skipped, ["{tree}.json", "{tree}_slab.json"]);
    assert!(matches!(events.last(), Some(Event::Completed(_))));
    assert!(list_files(&project.output_dir()).is_empty());
}
