//! Pipeline orchestrator.
//!
//! A run moves through these stages in order:
//! 1. **Reading**: open the three sources and collect raw records
//! 2. **Normalizing**: map columns to fields and clean every value
//! 3. **Validating**: presence, type/range and consistency checks, then dedup
//! 4. **Coercing**: build typed books, users and orders
//! 5. **Merging**: join orders to books and users, load the sink, write artifacts
//!
//! Row-scoped failures become rejected rows and the run continues.
//! Run-scoped failures stop the run in `Failed` with the diagnostics
//! gathered so far.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, info_span, warn};

use bks_ingest::{RecordReader, SourcePaths, discover_dataset, list_dataset_folders};
use bks_model::{
    Book, Dataset, Diagnostics, NormalizedRecord, Order, PipelineState, RawRecord, RejectReason,
    RejectedRow, RunStatus, SourceKind, User,
};
use bks_normalize::normalize_record;
use bks_transform::{CoercionRules, coerce_book, coerce_order, coerce_user};
use bks_validate::{deduplicate, validate_all};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::merge::merge;
use crate::output::{ArtifactPaths, RunArtifacts, write_run_artifacts};
use crate::sink::{MemorySink, Sink};

/// What a run produced. Returned for failed runs too.
#[derive(Debug)]
pub struct RunReport {
    pub status: RunStatus,
    pub state: PipelineState,
    pub diagnostics: Diagnostics,
    /// Present once the run reaches `Completed`.
    pub dataset: Option<Arc<Dataset>>,
    pub artifacts: ArtifactPaths,
    pub error: Option<PipelineError>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

/// Run the pipeline over one dataset and load the result into `sink`.
pub fn run_pipeline(paths: &SourcePaths, sink: &mut dyn Sink, config: &PipelineConfig) -> RunReport {
    let span = info_span!("pipeline", books = %paths.books.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut run = Run::default();
    let outcome = run.execute(paths, sink, config);
    run.finish(outcome, start.elapsed())
}

/// Run the pipeline over a dataset folder.
pub fn run_dataset_folder(dir: &Path, sink: &mut dyn Sink, config: &PipelineConfig) -> RunReport {
    match discover_dataset(dir) {
        Ok(paths) => run_pipeline(&paths, sink, config),
        Err(err) => Run::default().finish(Err(err.into()), Duration::ZERO),
    }
}

/// One dataset folder processed by [`run_all_datasets`].
#[derive(Debug)]
pub struct DatasetRun {
    pub name: String,
    pub folder: PathBuf,
    pub report: RunReport,
    pub sink: MemorySink,
}

/// Run every dataset folder under `base`, each into its own memory sink.
///
/// Artifacts of folder `NAME` go to `<output_dir>/NAME`.
pub fn run_all_datasets(base: &Path, config: &PipelineConfig) -> Result<Vec<DatasetRun>> {
    let folders = list_dataset_folders(base)?;
    info!(base = %base.display(), datasets = folders.len(), "discovered dataset folders");

    let mut runs = Vec::with_capacity(folders.len());
    for folder in folders {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut folder_config = config.clone();
        folder_config.output_dir = config.output_dir.join(&name);

        let span = info_span!("dataset", name = %name);
        let _guard = span.enter();
        let mut sink = MemorySink::new();
        let report = run_dataset_folder(&folder, &mut sink, &folder_config);
        runs.push(DatasetRun {
            name,
            folder,
            report,
            sink,
        });
    }
    Ok(runs)
}

/// Mutable state of a single run.
#[derive(Debug, Default)]
struct Run {
    diagnostics: Diagnostics,
    artifacts: ArtifactPaths,
}

impl Run {
    fn state(&self) -> PipelineState {
        self.diagnostics.state
    }

    /// Move to the next stage, recording the one just left.
    fn advance(&mut self, to: PipelineState) -> Result<()> {
        let from = self.state();
        self.diagnostics.state = from.transition(to)?;
        if from != PipelineState::Idle {
            self.diagnostics.mark_completed(from);
        }
        debug!(from = %from, to = %to, "stage transition");
        Ok(())
    }

    fn reject_all(&mut self, rows: impl IntoIterator<Item = RejectedRow>) {
        for row in rows {
            self.diagnostics.record_rejection(row);
        }
    }

    fn execute(
        &mut self,
        paths: &SourcePaths,
        sink: &mut dyn Sink,
        config: &PipelineConfig,
    ) -> Result<Arc<Dataset>> {
        config.validate()?;
        let options = config.normalize_options();
        let validation_rules = config.validation_rules();
        let coercion_rules = config.coercion_rules()?;

        // ====================================================================
        // Stage 1: Reading
        // ====================================================================
        self.advance(PipelineState::Reading)?;
        let raw = info_span!("read").in_scope(|| self.read_sources(paths))?;

        // ====================================================================
        // Stage 2: Normalizing
        // ====================================================================
        self.advance(PipelineState::Normalizing)?;
        let normalized = info_span!("normalize").in_scope(|| {
            let mut normalized = BTreeMap::new();
            for (kind, records) in raw {
                let mut rows = Vec::with_capacity(records.len());
                for record in &records {
                    match normalize_record(record, &options) {
                        Ok(row) => rows.push(row),
                        Err(err) => self.diagnostics.record_rejection(
                            RejectedRow::new(kind, record.index, err.reason(), err.to_string())
                                .with_field(err.field),
                        ),
                    }
                }
                self.diagnostics.source_mut(kind).normalized = rows.len();
                debug!(source = %kind, normalized = rows.len(), "normalized source");
                normalized.insert(kind, rows);
            }
            normalized
        });

        // ====================================================================
        // Stage 3: Validating
        // ====================================================================
        self.advance(PipelineState::Validating)?;
        let unique = info_span!("validate").in_scope(|| {
            let mut unique: BTreeMap<SourceKind, Vec<NormalizedRecord>> = BTreeMap::new();
            for (kind, rows) in normalized {
                let validated = validate_all(rows, &validation_rules);
                self.diagnostics.source_mut(kind).validated = validated.valid.len();
                self.reject_all(validated.rejected);

                let deduped = deduplicate(validated.valid);
                self.diagnostics.source_mut(kind).unique = deduped.rows.len();
                debug!(
                    source = %kind,
                    unique = deduped.rows.len(),
                    superseded = deduped.superseded.len(),
                    "validated source"
                );
                self.reject_all(deduped.superseded);
                unique.insert(kind, deduped.rows);
            }
            unique
        });

        // ====================================================================
        // Stage 4: Coercing
        // ====================================================================
        self.advance(PipelineState::Coercing)?;
        let (books, users, orders) =
            info_span!("coerce").in_scope(|| self.coerce_sources(unique, &coercion_rules));

        // ====================================================================
        // Stage 5: Merging
        // ====================================================================
        self.advance(PipelineState::Merging)?;
        let span = info_span!("merge");
        let _guard = span.enter();

        let merged = merge(&orders, &books, &users);
        self.reject_all(merged.rejected);
        let dataset = Dataset::new(merged.rows)?.into_shared();
        self.diagnostics.orders.accepted = dataset.len();
        self.diagnostics.final_rows = dataset.len();
        info!(rows = dataset.len(), "merged dataset");

        sink.load(Arc::clone(&dataset))?;

        if config.write_artifacts {
            // Diagnostics are written as they stand once this stage succeeds.
            let mut snapshot = self.diagnostics.clone();
            snapshot.mark_completed(PipelineState::Merging);
            snapshot.state = PipelineState::Completed;
            let orders: Vec<Order> = orders.into_iter().map(|(_, order)| order).collect();
            self.artifacts = write_run_artifacts(
                RunArtifacts {
                    dataset: &dataset,
                    books: &books,
                    users: &users,
                    orders: &orders,
                    diagnostics: &snapshot,
                },
                &config.output_dir,
            )?;
        }

        self.advance(PipelineState::Completed)?;
        Ok(dataset)
    }

    fn read_sources(&mut self, paths: &SourcePaths) -> Result<BTreeMap<SourceKind, Vec<RawRecord>>> {
        let mut raw = BTreeMap::new();
        for kind in SourceKind::ALL {
            let reader = RecordReader::open(kind, paths.path(kind))?;
            let mut records = Vec::new();
            for item in reader {
                self.diagnostics.source_mut(kind).rows_read += 1;
                match item {
                    Ok(record) => records.push(record),
                    Err(err) => self.diagnostics.record_rejection(RejectedRow::new(
                        kind,
                        err.index,
                        RejectReason::ParseError,
                        err.message,
                    )),
                }
            }
            info!(
                source = %kind,
                rows_read = self.diagnostics.source(kind).rows_read,
                parsed = records.len(),
                "read source"
            );
            raw.insert(kind, records);
        }
        Ok(raw)
    }

    fn coerce_sources(
        &mut self,
        mut unique: BTreeMap<SourceKind, Vec<NormalizedRecord>>,
        rules: &CoercionRules,
    ) -> (Vec<Book>, Vec<User>, Vec<(usize, Order)>) {
        let mut take = |kind: SourceKind| unique.remove(&kind).unwrap_or_default();
        let (book_rows, user_rows, order_rows) = (
            take(SourceKind::Books),
            take(SourceKind::Users),
            take(SourceKind::Orders),
        );

        let mut books = Vec::with_capacity(book_rows.len());
        for record in &book_rows {
            match coerce_book(record, rules) {
                Ok(book) => books.push(book),
                Err(err) => self
                    .diagnostics
                    .record_rejection(err.into_rejected(record.source, record.index)),
            }
        }

        let mut users = Vec::with_capacity(user_rows.len());
        for record in &user_rows {
            match coerce_user(record, rules) {
                Ok(user) => users.push(user),
                Err(err) => self
                    .diagnostics
                    .record_rejection(err.into_rejected(record.source, record.index)),
            }
        }

        let mut orders = Vec::with_capacity(order_rows.len());
        for record in &order_rows {
            match coerce_order(record, rules) {
                Ok(order) => orders.push((record.index, order)),
                Err(err) => self
                    .diagnostics
                    .record_rejection(err.into_rejected(record.source, record.index)),
            }
        }

        self.diagnostics.books.coerced = books.len();
        self.diagnostics.books.accepted = books.len();
        self.diagnostics.users.coerced = users.len();
        self.diagnostics.users.accepted = users.len();
        self.diagnostics.orders.coerced = orders.len();
        info!(
            books = books.len(),
            users = users.len(),
            orders = orders.len(),
            "coerced sources"
        );
        (books, users, orders)
    }

    fn finish(mut self, outcome: Result<Arc<Dataset>>, elapsed: Duration) -> RunReport {
        let (status, dataset, error) = match outcome {
            Ok(dataset) => {
                let status = if self.diagnostics.has_rejections() {
                    RunStatus::PartialSuccess
                } else {
                    RunStatus::Success
                };
                (status, Some(dataset), None)
            }
            Err(err) => {
                let state = self.state();
                if state.can_transition_to(PipelineState::Failed) {
                    self.diagnostics.state = PipelineState::Failed;
                }
                error!(stage = %state, error = %err, "pipeline failed");
                (RunStatus::Failed, None, Some(err))
            }
        };

        if self.diagnostics.has_rejections() {
            for (reason, count) in self.diagnostics.rejected_by_reason() {
                warn!(reason = %reason, count, "rejected rows");
            }
        }
        info!(
            status = %status,
            rows_read = self.diagnostics.rows_read(),
            final_rows = self.diagnostics.final_rows,
            rejected = self.diagnostics.rejected_total(),
            duration_ms = elapsed.as_millis(),
            "pipeline finished"
        );

        RunReport {
            status,
            state: self.diagnostics.state,
            diagnostics: self.diagnostics,
            dataset,
            artifacts: self.artifacts,
            error,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_records_completed_stages() {
        let mut run = Run::default();
        run.advance(PipelineState::Reading).unwrap();
        run.advance(PipelineState::Normalizing).unwrap();
        assert_eq!(run.state(), PipelineState::Normalizing);
        assert_eq!(run.diagnostics.completed_stages, vec![PipelineState::Reading]);
    }

    #[test]
    fn skipping_a_stage_is_fatal() {
        let mut run = Run::default();
        let err = run.advance(PipelineState::Coercing).unwrap_err();
        assert!(matches!(err, PipelineError::FatalConfiguration(_)));
        let report = run.finish(Err(err), Duration::ZERO);
        assert_eq!(report.state, PipelineState::Failed);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn invalid_config_fails_before_reading() {
        let config = PipelineConfig {
            currency_scale: 99,
            ..PipelineConfig::default()
        };
        let paths = SourcePaths::in_folder(Path::new("/nonexistent"));
        let report = run_pipeline(&paths, &mut MemorySink::new(), &config);
        assert_eq!(report.status, RunStatus::Failed);
        assert!(report.diagnostics.completed_stages.is_empty());
        assert!(matches!(
            report.error,
            Some(PipelineError::FatalConfiguration(_))
        ));
    }
}
