//! CSV and JSON output files.
//!
//! Undefined statistics are written as empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::compare::{ComparisonResult, ConditionComparison};
use crate::error::CoreResult;
use crate::factor_analysis::FactorAnalysis;
use crate::pairs::PairTable;
use crate::pipeline::AnalysisReport;
use crate::types::LevelFactor;

/// In-memory CSV table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv_string(&self) -> String {
        let mut csv = String::new();
        push_line(&mut csv, &self.header);
        for row in &self.rows {
            push_line(&mut csv, row);
        }
        csv
    }

    pub fn write(&self, path: &Path) -> CoreResult<()> {
        fs::write(path, self.to_csv_string())?;
        Ok(())
    }
}

fn push_line(csv: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    csv.push_str(&escaped.join(","));
    csv.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Every pair record with the labels of both documents.
pub fn pairs_table(table: &PairTable) -> CsvTable {
    let mut csv = CsvTable::new(&[
        "doc_i", "doc_j", "similarity", "same_clip", "same_context", "same_genre", "condition",
        "clip_i", "clip_j", "context_i", "context_j", "genre_i", "genre_j",
    ]);
    for r in table.records() {
        let (li, lj) = (table.labels(r.doc_i), table.labels(r.doc_j));
        csv.push(vec![
            r.doc_i.to_string(),
            r.doc_j.to_string(),
            r.similarity.to_string(),
            r.same_clip.to_string(),
            r.same_context.to_string(),
            r.same_genre.to_string(),
            r.condition.to_string(),
            li.clip.clone(),
            lj.clip.clone(),
            li.context.clone(),
            lj.context.clone(),
            li.genre.clone(),
            lj.genre.clone(),
        ]);
    }
    csv
}

pub fn condition_summary_table(report: &AnalysisReport) -> CsvTable {
    let mut csv = CsvTable::new(&["condition", "n", "mean", "std", "min", "max"]);
    for c in &report.condition_summary {
        csv.push(vec![
            c.condition.to_string(),
            c.summary.n.to_string(),
            cell(c.summary.mean),
            cell(c.summary.sd),
            cell(c.summary.min),
            cell(c.summary.max),
        ]);
    }
    csv
}

const COMPARISON_HEADER: [&str; 13] = [
    "comparison", "group1", "group2", "mean1", "mean2", "std1", "std2", "n1", "n2", "t", "p", "d",
    "sig",
];

fn comparison_row(r: &ComparisonResult) -> Vec<String> {
    vec![
        r.comparison.clone(),
        r.group_a.label.clone(),
        r.group_b.label.clone(),
        cell(r.group_a.mean),
        cell(r.group_b.mean),
        cell(r.group_a.sd),
        cell(r.group_b.sd),
        r.group_a.n.to_string(),
        r.group_b.n.to_string(),
        cell(r.t_test.statistic),
        cell(r.t_test.p_value),
        cell(r.cohens_d),
        r.significance.to_string(),
    ]
}

pub fn binary_table(report: &AnalysisReport) -> CsvTable {
    let mut csv = CsvTable::new(&COMPARISON_HEADER);
    for effect in &report.binary.effects {
        csv.push(comparison_row(&effect.result));
    }
    csv
}

/// Compared conditions only; insufficient-data outcomes are omitted.
pub fn condition_comparison_table(report: &AnalysisReport) -> CsvTable {
    let mut csv = CsvTable::new(&COMPARISON_HEADER);
    for outcome in [&report.combined.primary, &report.combined.genre] {
        if let ConditionComparison::Compared(r) = outcome {
            csv.push(comparison_row(r));
        }
    }
    csv
}

pub fn omnibus_table(report: &AnalysisReport) -> CsvTable {
    let a = &report.omnibus.anova;
    let mut csv = CsvTable::new(&[
        "n_conditions", "n_pairs", "df_between", "df_within", "ss_between", "ss_within",
        "ss_total", "F", "p", "eta_squared", "sig",
    ]);
    csv.push(vec![
        report.omnibus.n_conditions.to_string(),
        report.omnibus.n_pairs.to_string(),
        a.df_between.to_string(),
        a.df_within.to_string(),
        a.ss_between.to_string(),
        a.ss_within.to_string(),
        a.ss_total.to_string(),
        cell(a.f_statistic),
        cell(a.p_value),
        cell(a.eta_squared),
        report.omnibus.significance.to_string(),
    ]);
    csv
}

/// Within-level statistics, most convergent first.
pub fn within_table(analysis: &FactorAnalysis) -> CsvTable {
    let mut csv = CsvTable::new(&[analysis.factor.key(), "mean", "std", "n", "cv"]);
    for l in analysis.within.by_mean_desc() {
        csv.push(vec![
            l.level.clone(),
            l.mean.to_string(),
            cell(l.sd),
            l.n.to_string(),
            cell(l.cv),
        ]);
    }
    csv
}

/// Within-level consistency, most consistent first.
pub fn consistency_table(analysis: &FactorAnalysis) -> CsvTable {
    let mut csv = CsvTable::new(&[analysis.factor.key(), "mean", "std", "cv", "n"]);
    for l in analysis.within.by_cv_asc() {
        csv.push(vec![
            l.level.clone(),
            l.mean.to_string(),
            cell(l.sd),
            cell(l.cv),
            l.n.to_string(),
        ]);
    }
    csv
}

pub fn pairwise_table(analysis: &FactorAnalysis) -> CsvTable {
    let key = analysis.factor.key();
    let mut csv = CsvTable::new(&[
        format!("{}1", key),
        format!("{}2", key),
        "mean1".into(),
        "mean2".into(),
        "difference".into(),
        "t".into(),
        "p".into(),
        "d".into(),
        "sig".into(),
    ]);
    for p in &analysis.pairwise {
        csv.push(vec![
            p.level_a.clone(),
            p.level_b.clone(),
            cell(p.result.group_a.mean),
            cell(p.result.group_b.mean),
            cell(p.result.difference),
            cell(p.result.t_test.statistic),
            cell(p.result.t_test.p_value),
            cell(p.result.cohens_d),
            p.result.significance.to_string(),
        ]);
    }
    csv
}

pub fn moderator_table(analysis: &FactorAnalysis) -> CsvTable {
    let mut csv = CsvTable::new(&[
        analysis.factor.key(), "clip_mean", "clip_sd", "context_mean", "context_sd",
        "difference", "effect_size", "t", "p", "sig", "n_clip", "n_context",
    ]);
    for m in &analysis.moderator.levels {
        let r = &m.result;
        csv.push(vec![
            m.level.clone(),
            cell(r.group_a.mean),
            cell(r.group_a.sd),
            cell(r.group_b.mean),
            cell(r.group_b.sd),
            cell(r.difference),
            cell(r.cohens_d),
            cell(r.t_test.statistic),
            cell(r.t_test.p_value),
            r.significance.to_string(),
            r.group_a.n.to_string(),
            r.group_b.n.to_string(),
        ]);
    }
    csv
}

pub fn clip_context_consistency_table(analysis: &FactorAnalysis) -> CsvTable {
    let mut csv = CsvTable::new(&[
        analysis.factor.key(), "clip_mean", "clip_sd", "clip_cv", "context_mean", "context_sd",
        "context_cv", "cv_difference", "levene_stat", "levene_p", "sig", "n_clip", "n_context",
    ]);
    for c in &analysis.consistency {
        csv.push(vec![
            c.level.clone(),
            cell(c.clip.mean),
            cell(c.clip.sd),
            cell(c.clip_cv),
            cell(c.context.mean),
            cell(c.context.sd),
            cell(c.context_cv),
            cell(c.cv_difference),
            cell(c.levene.statistic),
            cell(c.levene.p_value),
            c.significance.to_string(),
            c.clip.n.to_string(),
            c.context.n.to_string(),
        ]);
    }
    csv
}

pub fn interaction_table(report: &AnalysisReport) -> CsvTable {
    let mut csv = CsvTable::new(&["genre", "context", "mean", "std", "n"]);
    for c in &report.interaction.cells {
        csv.push(vec![
            c.genre.clone(),
            c.context.clone(),
            c.mean.to_string(),
            cell(c.sd),
            c.n.to_string(),
        ]);
    }
    csv
}

/// Which files [`write_all`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            csv: true,
            json: true,
        }
    }
}

/// Write every output table and the JSON report into `dir`.
///
/// Returns the written paths in write order.
pub fn write_all(
    report: &AnalysisReport,
    table: &PairTable,
    dir: &Path,
    prefix: &str,
    options: ExportOptions,
) -> CoreResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut emit = |name: String, csv: CsvTable| -> CoreResult<()> {
        let path = dir.join(format!("{}_{}.csv", prefix, name));
        csv.write(&path)?;
        written.push(path);
        Ok(())
    };

    if options.csv {
        emit("pairs".into(), pairs_table(table))?;
        emit("similarity_by_condition".into(), condition_summary_table(report))?;
        emit("binary_comparisons".into(), binary_table(report))?;
        emit("condition_comparisons".into(), condition_comparison_table(report))?;
        emit("omnibus".into(), omnibus_table(report))?;
        for factor in LevelFactor::ALL {
            let analysis = report.factor(factor);
            let key = factor.key();
            emit(format!("within_{}_analysis", key), within_table(analysis))?;
            emit(format!("{}_pairwise_comparisons", key), pairwise_table(analysis))?;
            emit(format!("{}_consistency", key), consistency_table(analysis))?;
            if !analysis.moderator.levels.is_empty() {
                emit(format!("{}_moderator_clip_vs_context", key), moderator_table(analysis))?;
            }
            if !analysis.consistency.is_empty() {
                emit(
                    format!("{}_clip_vs_context_consistency", key),
                    clip_context_consistency_table(analysis),
                )?;
            }
        }
        emit("genre_context_interaction".into(), interaction_table(report))?;
    }

    if options.json {
        let path = dir.join(format!("{}_analysis_report.json", prefix));
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        written.push(path);
    }

    info!(
        target: "framed_listening_core",
        dir = %dir.display(),
        files = written.len(),
        "Wrote analysis outputs"
    );
    Ok(written)
}
