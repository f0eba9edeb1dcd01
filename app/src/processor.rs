// ==============================================================================
// processor.rs - Template Processing Pipeline
// ==============================================================================
// Description: Compiles a line template against a feature table and writes one
//              translated line per record to an output sink
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::cache::DatasetCache;
use crate::parsers::TableReader;
use crate::schema::Record;
use crate::template::Template;

/// Counters for one processing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    /// Records pulled from the source
    pub records_read: usize,
    /// Lines written to the sink
    pub lines_written: usize,
    /// Records whose output was blank and was skipped
    pub blank_skipped: usize,
    /// Records whose translation failed
    pub records_failed: usize,
}

pub struct TemplateProcessor {
    template_text: String,
    cache: DatasetCache,
    skip_blank: bool,
}

impl TemplateProcessor {
    pub fn new(template_text: impl Into<String>, cache: DatasetCache) -> Self {
        Self {
            template_text: template_text.into(),
            cache,
            skip_blank: false,
        }
    }

    /// Drop records whose translated line is empty or whitespace
    pub fn skip_blank(mut self, skip: bool) -> Self {
        self.skip_blank = skip;
        self
    }

    /// Main processing pipeline for a table file
    pub fn process_file(&self, input: &Path, sink: &mut dyn Write) -> Result<ProcessingStats> {
        info!("Processing feature table {:?}", input);

        // 1. Open the table and read its header
        let reader = TableReader::open(input)
            .with_context(|| format!("Failed to open feature table {:?}", input))?;

        // 2. Bind the template to the header
        let template = Template::compile(&self.template_text, reader.header())
            .context("Failed to compile template")?;

        // 3. Translate every row
        self.process_records(&template, reader, sink)
    }

    /// Apply a compiled template to each record in order
    ///
    /// A record whose translation fails is logged and counted, and the run
    /// continues with the next record. Errors from the record source itself
    /// or from the sink end the run.
    pub fn process_records<I, R, E>(
        &self,
        template: &Template,
        records: I,
        sink: &mut dyn Write,
    ) -> Result<ProcessingStats>
    where
        I: IntoIterator<Item = std::result::Result<R, E>>,
        R: Record,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut stats = ProcessingStats::default();

        for record in records {
            let record = record
                .with_context(|| format!("Failed to read record {}", stats.records_read + 1))?;
            stats.records_read += 1;

            let line = match template.apply_with(&record, &self.cache) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Record {} skipped: {}", stats.records_read, e);
                    stats.records_failed += 1;
                    continue;
                }
            };

            if self.skip_blank && line.trim().is_empty() {
                debug!("Record {} produced a blank line", stats.records_read);
                stats.blank_skipped += 1;
                continue;
            }

            writeln!(sink, "{}", line).context("Failed to write output line")?;
            stats.lines_written += 1;
        }

        sink.flush().context("Failed to flush output")?;

        info!(
            "Processing complete: {} records, {} lines written, {} blank, {} failed",
            stats.records_read, stats.lines_written, stats.blank_skipped, stats.records_failed
        );

        Ok(stats)
    }
}
