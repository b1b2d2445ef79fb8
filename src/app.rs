//! Batch driver: load the indicator tables, run every analysis job, persist the results.

use crate::analysis::{
    COMPARER_COLUMNS, CRIME_INDEX_COLUMN, DependenceAnalyzer, GDP_COLUMN, MURDER_RATE_COLUMN,
    ResultTable,
};
use crate::config::AppConfig;
use crate::table::{COUNTRY_COLUMN, IndicatorTable};
use anyhow::{Context, Result};
use std::{fs, path::PathBuf, time::Instant};
use tracing::{error, info};

/// Input tables, one CSV file each in the input directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Gdp,
    QualityOfLife,
    Crime,
    Murder,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Gdp,
        Source::QualityOfLife,
        Source::Crime,
        Source::Murder,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Source::Gdp => "gdp_per_capita.csv",
            Source::QualityOfLife => "quality_of_life.csv",
            Source::Crime => "crime_index.csv",
            Source::Murder => "murder_percent.csv",
        }
    }
}

/// All input tables, loaded up front so a bad file aborts before anything is written.
#[derive(Debug, Clone)]
pub struct Sources {
    pub gdp: IndicatorTable,
    pub quality_of_life: IndicatorTable,
    pub crime: IndicatorTable,
    pub murder: IndicatorTable,
}

impl Sources {
    pub fn get(&self, source: Source) -> &IndicatorTable {
        match source {
            Source::Gdp => &self.gdp,
            Source::QualityOfLife => &self.quality_of_life,
            Source::Crime => &self.crime,
            Source::Murder => &self.murder,
        }
    }
}

/// One output table: `comparable_column` from `target` compared against GDP and every
/// quality-of-life indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisJob {
    pub target: Source,
    pub comparable_column: String,
    pub output_file: String,
}

impl AnalysisJob {
    pub fn new(
        target: Source,
        comparable_column: impl Into<String>,
        output_file: impl Into<String>,
    ) -> Self {
        AnalysisJob {
            target,
            comparable_column: comparable_column.into(),
            output_file: output_file.into(),
        }
    }

    pub fn crime() -> Self {
        AnalysisJob::new(Source::Crime, CRIME_INDEX_COLUMN, "crime_dependencies.csv")
    }

    pub fn murder() -> Self {
        AnalysisJob::new(Source::Murder, MURDER_RATE_COLUMN, "murder_dependencies.csv")
    }

    /// Comparer columns in processing order: GDP first, then the quality-of-life indicators.
    pub fn comparer_columns() -> impl Iterator<Item = &'static str> {
        std::iter::once(GDP_COLUMN).chain(COMPARER_COLUMNS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every job ran; paths of the files written, in job order
    Completed(Vec<PathBuf>),
    /// The input tables could not be read; nothing was written
    Aborted,
}

pub struct App {
    config: AppConfig,
    analyzer: DependenceAnalyzer,
    jobs: Vec<AnalysisJob>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let analyzer = DependenceAnalyzer::new().with_verbose(config.verbose);
        App {
            config,
            analyzer,
            jobs: vec![AnalysisJob::crime(), AnalysisJob::murder()],
        }
    }

    pub fn with_jobs(mut self, jobs: Vec<AnalysisJob>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_analyzer(mut self, analyzer: DependenceAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jobs(&self) -> &[AnalysisJob] {
        &self.jobs
    }

    pub fn read_sources(&self) -> Result<Sources> {
        let load = |source: Source| {
            IndicatorTable::from_csv_path(self.config.input_dir.join(source.file_name()))
        };
        Ok(Sources {
            gdp: load(Source::Gdp)?,
            quality_of_life: load(Source::QualityOfLife)?,
            crime: load(Source::Crime)?,
            murder: load(Source::Murder)?,
        })
    }

    /// Run all jobs.
    ///
    /// A failure to read the inputs is logged and reported as [`RunOutcome::Aborted`]; any
    /// later failure (missing column, zero median, write error) is returned as an error.
    pub fn run(&self) -> Result<RunOutcome> {
        let start = Instant::now();
        info!(input_dir = %self.config.input_dir.display(), "reading indicator tables");

        let sources = match self.read_sources() {
            Ok(sources) => sources,
            Err(err) => {
                error!("Error reading indicator tables: {:#}", err);
                return Ok(RunOutcome::Aborted);
            }
        };

        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("creating output directory {}", self.config.output_dir.display())
        })?;

        let mut written = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            let results = self.run_job(&sources, job)?;
            let path = self.config.output_dir.join(&job.output_file);
            results.write_csv(&path)?;
            written.push(path);
        }

        info!(outputs = written.len(), elapsed = ?start.elapsed(), "run complete");
        Ok(RunOutcome::Completed(written))
    }

    /// Build the result table for one job without touching the filesystem.
    pub fn run_job(&self, sources: &Sources, job: &AnalysisJob) -> Result<ResultTable> {
        let target = sources.get(job.target);
        let gdp_and_target = sources.gdp.inner_join(target, COUNTRY_COLUMN)?;
        let target_and_qol = target.inner_join(&sources.quality_of_life, COUNTRY_COLUMN)?;

        info!(
            comparable = %job.comparable_column,
            gdp_rows = gdp_and_target.nrows(),
            quality_of_life_rows = target_and_qol.nrows(),
            "running analysis job"
        );

        let mut results = ResultTable::new();
        for comparer_column in AnalysisJob::comparer_columns() {
            let table = if comparer_column == GDP_COLUMN {
                &gdp_and_target
            } else {
                &target_and_qol
            };
            self.analyzer.calculate_dependence_by_column(
                table,
                &mut results,
                comparer_column,
                &job.comparable_column,
            )?;
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_jobs() {
        let app = App::new(AppConfig::new("data"));
        assert_eq!(app.jobs(), &[AnalysisJob::crime(), AnalysisJob::murder()]);
        assert_eq!(app.jobs()[1].comparable_column, "RATE_PER_100000_N");
        assert_eq!(app.jobs()[0].output_file, "crime_dependencies.csv");
    }

    #[test]
    fn test_comparer_order_starts_with_gdp() {
        let columns: Vec<&str> = AnalysisJob::comparer_columns().collect();
        assert_eq!(columns.len(), 8);
        assert_eq!(columns[0], "GDP");
        assert_eq!(columns[1], "QUALITY_OF_LIFE_INDEX");
        assert_eq!(columns[7], "CLIMATE_INDEX");
    }

    #[test]
    fn test_source_file_names() {
        let names: Vec<&str> = Source::ALL.iter().map(|s| s.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "gdp_per_capita.csv",
                "quality_of_life.csv",
                "crime_index.csv",
                "murder_percent.csv"
            ]
        );
    }
}
