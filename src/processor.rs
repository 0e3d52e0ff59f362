//! Batch generation.
//!
//! The [`Processor`] walks the configured templates, enumerates the
//! combinations each one needs and writes one output file per combination.
//! Progress is reported through an [`EventSink`] and the run can be stopped
//! between templates and between files with a [`CancelToken`].

use crate::combination::{self, Combination};
use crate::config::{Config, ReplacementRule};
use crate::engine::ReplacementEngine;
use crate::template::{Template, TemplateLoader};
use crate::writer::OutputWriter;
use indexmap::{IndexMap, IndexSet};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

/// Flags controlling a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute everything but write nothing.
    pub dry_run: bool,
    /// Collect a trace of every replacement per combination.
    pub explain: bool,
    /// Count generated files per placeholder type and value.
    pub per_type_stats: bool,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Files written, or files that would be written under a dry run.
    pub total: usize,
    /// Generated files per placeholder type, then per value.
    pub by_type: IndexMap<String, IndexMap<String, usize>>,
    /// Templates that could not be loaded, with the reason.
    pub skipped_templates: Vec<(String, String)>,
    /// Output files that could not be written, with the reason.
    pub failures: Vec<(String, String)>,
}

impl Stats {
    fn record(&mut self, combination: &Combination) {
        for (r#type, value) in combination {
            *self
                .by_type
                .entry(r#type.clone())
                .or_default()
                .entry(value.clone())
                .or_insert(0) += 1;
        }
    }
}

/// Messages emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Progress(String),
    Warning(String),
    /// Replacement trace of one combination, see [`RunOptions::explain`].
    Explain { combination: Combination, lines: Vec<String> },
    Completed(Stats),
    Cancelled(Stats),
    Failed(String),
}

/// Receiver of run events.
pub trait EventSink {
    fn emit(&self, event: Event);
}

impl EventSink for mpsc::Sender<Event> {
    fn emit(&self, event: Event) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.send(event);
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        match event {
            Event::Progress(message) => info!("{}", message),
            Event::Warning(message) => warn!("{}", message),
            Event::Explain { combination, lines } => {
                info!("Combination: {:?}", combination);
                for line in lines {
                    info!("  {}", line);
                }
            }
            Event::Completed(stats) => info!("Generation completed: {} files.", stats.total),
            Event::Cancelled(stats) => info!("Generation cancelled after {} files.", stats.total),
            Event::Failed(message) => error!("{}", message),
        }
    }
}

/// Cooperative cancellation flag shared between a run and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs generation for every template of a [`Config`].
pub struct Processor<'a> {
    config: &'a Config,
    engine: ReplacementEngine<'a>,
    loader: TemplateLoader,
}

impl<'a> Processor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            engine: ReplacementEngine::new(config),
            loader: TemplateLoader::new(config.template_dir_path()),
        }
    }

    /// Active rules matching the file name placeholders of `template`, in
    /// the order the placeholders appear in the file name. Placeholders
    /// without a rule are left as literal text.
    pub fn ordered_rules(&self, template: &Template) -> Vec<&'a ReplacementRule> {
        let config = self.config;
        template
            .filename_placeholders()
            .iter()
            .filter_map(|placeholder| config.active_rule(placeholder))
            .collect()
    }

    /// Combinations for `template`, empty when none of its file name
    /// placeholders has an active rule.
    pub fn combinations(&self, template: &Template) -> Vec<Combination> {
        let rules = self.ordered_rules(template);
        let needed: IndexSet<String> = rules.iter().map(|rule| rule.r#type.clone()).collect();
        combination::generate(rules, &needed)
    }

    /// Output file name for one combination, with namespace separators made
    /// file system safe.
    pub fn output_filename(&self, template: &Template, combination: &Combination) -> String {
        self.engine.apply(&template.filename(), combination, None).replace(':', "_")
    }

    /// Returns up to `limit` `(template, output file)` pairs without touching
    /// the output directory. Unreadable templates are skipped.
    pub fn preview(&self, limit: usize) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for filename in self.config.template_files() {
            let Ok(template) = self.loader.load_single(filename) else {
                continue;
            };
            for combination in self.combinations(&template) {
                if pairs.len() >= limit {
                    return pairs;
                }
                pairs.push((filename.clone(), self.output_filename(&template, &combination)));
            }
        }
        pairs
    }

    /// Runs the whole batch.
    ///
    /// Missing and undecodable templates are skipped with a warning and
    /// write failures are collected; neither stops the batch. When `cancel`
    /// fires, the run stops before the next template or file and the partial
    /// stats are returned through [`Event::Cancelled`].
    pub fn run(&self, options: RunOptions, cancel: &CancelToken, sink: &dyn EventSink) -> Stats {
        let mut stats = Stats::default();
        let writer = OutputWriter::new(self.config.output_dir_path());

        sink.emit(Event::Progress(format!(
            "Starting generation of {} templates.",
            self.config.template_files().len()
        )));

        for filename in self.config.template_files() {
            if cancel.is_cancelled() {
                return self.cancelled(stats, sink);
            }

            let template = match self.loader.load_single(filename) {
                Ok(template) => template,
                Err(e) => {
                    sink.emit(Event::Warning(format!("Skipping template: {}", e)));
                    stats.skipped_templates.push((filename.clone(), e.to_string()));
                    continue;
                }
            };

            if !self.process_template(&template, options, cancel, sink, &writer, &mut stats) {
                return self.cancelled(stats, sink);
            }
        }

        if options.dry_run {
            sink.emit(Event::Progress("Dry run, no files were written.".to_string()));
        }
        sink.emit(Event::Completed(stats.clone()));
        stats
    }

    /// Generates every combination of one template. Returns `false` when the
    /// run was cancelled midway.
    fn process_template(
        &self,
        template: &Template,
        options: RunOptions,
        cancel: &CancelToken,
        sink: &dyn EventSink,
        writer: &OutputWriter,
        stats: &mut Stats,
    ) -> bool {
        let filename = template.filename();
        sink.emit(Event::Progress(format!("Processing template {}", filename)));

        let combinations = self.combinations(template);
        if combinations.is_empty() {
            sink.emit(Event::Warning(format!("No combinations generated for {}", filename)));
            return true;
        }
        debug!("{} combinations for {}", combinations.len(), filename);

        for combination in combinations {
            if cancel.is_cancelled() {
                return false;
            }

            let output_name = self.output_filename(template, &combination);
            let mut trace = options.explain.then(Vec::new);
            let content = self.engine.apply(template.content(), &combination, trace.as_mut());

            match writer.write(&output_name, &content, options.dry_run) {
                Ok(_) => {
                    stats.total += 1;
                    if options.per_type_stats {
                        stats.record(&combination);
                    }
                    let prefix = if options.dry_run { "[dry run] " } else { "" };
                    sink.emit(Event::Progress(format!("{}{}", prefix, output_name)));
                }
                Err(e) => {
                    error!("{}", e);
                    sink.emit(Event::Warning(e.to_string()));
                    stats.failures.push((output_name, e.to_string()));
                }
            }

            if let Some(lines) = trace {
                if !lines.is_empty() {
                    sink.emit(Event::Explain { combination, lines });
                }
            }
        }
        true
    }

    fn cancelled(&self, stats: Stats, sink: &dyn EventSink) -> Stats {
        sink.emit(Event::Progress("Generation cancelled.".to_string()));
        sink.emit(Event::Cancelled(stats.clone()));
        stats
    }
}
