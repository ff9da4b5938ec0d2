//! Human-readable rendering of an [`AnalysisReport`].

use std::fmt;

use crate::compare::{ComparisonResult, ConditionComparison};
use crate::factor_analysis::{FactorAnalysis, FactorConsistency};
use crate::pipeline::AnalysisReport;

const RULE_WIDTH: usize = 70;

/// Render the full narrative report.
pub fn render_text(report: &AnalysisReport) -> String {
    TextReport(report).to_string()
}

/// Display adapter for an [`AnalysisReport`].
pub struct TextReport<'a>(pub &'a AnalysisReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        banner(f, &format!("FRAMED LISTENING ANALYSIS ({})", r.backend))?;
        writeln!(f, "Run {} at {}", r.run_id, r.generated_at.to_rfc3339())?;
        writeln!(f, "{} documents, {} pairs", r.n_documents, r.n_pairs)?;

        section(f, "SIMILARITY BY CONDITION")?;
        for c in &r.condition_summary {
            writeln!(
                f,
                "  {:<36} N={:<6} M={}  SD={}",
                c.condition.as_str(),
                c.summary.n,
                num(c.summary.mean, 4),
                num(c.summary.sd, 4)
            )?;
        }

        section(f, "BINARY FACTOR EFFECTS")?;
        for effect in &r.binary.effects {
            comparison(f, &effect.result)?;
        }
        if let Some(top) = r.binary.largest_effect() {
            writeln!(f, "\n-> Largest effect: {} (d = {})", top.factor, num(top.result.cohens_d, 3))?;
        }

        section(f, "CONDITION COMPARISONS")?;
        condition_comparison(f, &r.combined.primary)?;
        condition_comparison(f, &r.combined.genre)?;

        section(f, "OMNIBUS ANOVA")?;
        let anova = &r.omnibus.anova;
        writeln!(
            f,
            "  F({}, {}) = {}, p = {} {}",
            anova.df_between,
            anova.df_within,
            num(anova.f_statistic, 3),
            num(anova.p_value, 4),
            r.omnibus.significance
        )?;
        writeln!(f, "  eta^2 = {}", num(anova.eta_squared, 4))?;

        factor(f, &r.context)?;
        factor(f, &r.genre)?;

        banner(f, "OVERALL CONSISTENCY COMPARISON")?;
        factor_consistency(f, &r.consistency.genre)?;
        factor_consistency(f, &r.consistency.context)?;
        writeln!(
            f,
            "\n  Mean CV: genre {}, context {} (difference {})",
            num(r.consistency.genre.mean_cv, 4),
            num(r.consistency.context.mean_cv, 4),
            num(r.consistency.mean_cv_difference, 4)
        )?;
        if let Some(t) = &r.consistency.t_test {
            match r.consistency.more_consistent {
                Some(more) => writeln!(
                    f,
                    "  -> {}s produce significantly more consistent thoughts (t = {}, p = {})",
                    more,
                    num(t.statistic, 2),
                    num(t.p_value, 4)
                )?,
                None => writeln!(
                    f,
                    "  -> No significant difference (t = {}, p = {})",
                    num(t.statistic, 2),
                    num(t.p_value, 4)
                )?,
            }
        }

        banner(f, "GENRE x CONTEXT INTERACTION")?;
        if r.interaction.cells.is_empty() {
            writeln!(f, "  No context-driven pairs")?;
        } else {
            writeln!(f, "Top {} combinations (highest similarity):", r.interaction.top_k)?;
            for cell in r.interaction.top() {
                writeln!(f, "  {} + {}: M={:.4} (N={})", cell.genre, cell.context, cell.mean, cell.n)?;
            }
            writeln!(f, "Bottom {} combinations (lowest similarity):", r.interaction.top_k)?;
            for cell in r.interaction.bottom() {
                writeln!(f, "  {} + {}: M={:.4} (N={})", cell.genre, cell.context, cell.mean, cell.n)?;
            }
        }
        Ok(())
    }
}

fn factor(f: &mut fmt::Formatter<'_>, analysis: &FactorAnalysis) -> fmt::Result {
    let name = analysis.factor.label();
    banner(f, &format!("{} ANALYSIS", name.to_uppercase()))?;

    section(f, &format!("1. WITHIN-{} SIMILARITY", name.to_uppercase()))?;
    for (rank, level) in analysis.within.by_mean_desc().iter().enumerate() {
        writeln!(
            f,
            "  {}. {}: M={:.4}, SD={}, CV={}, N={}",
            rank + 1,
            level.level,
            level.mean,
            num(level.sd, 4),
            num(level.cv, 4),
            level.n
        )?;
    }
    if let (Some(top), Some(bottom)) = (analysis.within.most_convergent(), analysis.within.most_diverse()) {
        writeln!(f, "  -> {} produces the most similar thoughts", top.level)?;
        writeln!(f, "  -> {} produces the most diverse thoughts", bottom.level)?;
    }

    section(f, &format!("2. PAIRWISE {} COMPARISONS", name.to_uppercase()))?;
    let significant: Vec<_> = analysis
        .pairwise
        .iter()
        .filter(|p| p.result.significance.is_significant())
        .collect();
    if significant.is_empty() {
        writeln!(f, "  No significant differences found")?;
    }
    for pair in significant {
        comparison(f, &pair.result)?;
    }

    section(f, &format!("3. CLIP VS CONTEXT WITHIN {}S", name.to_uppercase()))?;
    for level in &analysis.moderator.levels {
        comparison(f, &level.result)?;
    }
    let summary = &analysis.moderator.summary;
    writeln!(f, "\n  Clip-dominant: {}", list(&summary.clip_dominant))?;
    writeln!(f, "  Context-dominant: {}", list(&summary.context_dominant))?;
    writeln!(f, "  No significant difference: {}", list(&summary.no_difference))?;
    writeln!(
        f,
        "  Mean |d| = {}, range {} to {}",
        num(summary.mean_abs_d, 3),
        num(summary.min_d, 3),
        num(summary.max_d, 3)
    )?;

    section(f, &format!("4. {} CONSISTENCY", name.to_uppercase()))?;
    for (rank, level) in analysis.within.by_cv_asc().iter().enumerate() {
        writeln!(f, "  {}. {}: CV={}", rank + 1, level.level, num(level.cv, 4))?;
    }
    for c in &analysis.consistency {
        writeln!(
            f,
            "  {}: clip CV={}, context CV={}, Levene F={}, p={} {}",
            c.level,
            num(c.clip_cv, 4),
            num(c.context_cv, 4),
            num(c.levene.statistic, 3),
            num(c.levene.p_value, 4),
            c.significance
        )?;
    }
    Ok(())
}

fn factor_consistency(f: &mut fmt::Formatter<'_>, c: &FactorConsistency) -> fmt::Result {
    writeln!(f, "\n{} CONSISTENCY:", c.factor.label().to_uppercase())?;
    match (&c.most_consistent, &c.least_consistent) {
        (Some(most), Some(least)) => {
            writeln!(f, "  Most consistent: {} (CV={})", most.level, num(most.cv, 4))?;
            writeln!(f, "  Least consistent: {} (CV={})", least.level, num(least.cv, 4))?;
            writeln!(f, "  Range: {}", num(c.cv_range, 4))
        }
        _ => writeln!(f, "  No levels with a defined CV"),
    }
}

fn condition_comparison(f: &mut fmt::Formatter<'_>, outcome: &ConditionComparison) -> fmt::Result {
    match outcome {
        ConditionComparison::Compared(result) => comparison(f, result),
        ConditionComparison::InsufficientData { comparison, n1, n2 } => writeln!(
            f,
            "\n{}: insufficient data (N={} vs N={})",
            comparison, n1, n2
        ),
    }
}

fn comparison(f: &mut fmt::Formatter<'_>, r: &ComparisonResult) -> fmt::Result {
    writeln!(f, "\n{}:", r.comparison)?;
    for g in [&r.group_a, &r.group_b] {
        writeln!(f, "  {}: M={}, SD={} (N={})", g.label, num(g.mean, 4), num(g.sd, 4), g.n)?;
    }
    writeln!(
        f,
        "  t({}) = {}, p = {} {}, d = {}",
        r.t_test.df,
        num(r.t_test.statistic, 3),
        num(r.t_test.p_value, 4),
        r.significance,
        num(r.cohens_d, 3)
    )
}

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n{}", title)?;
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

fn num(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        format!("{} ({})", items.len(), items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(Some(0.123456), 4), "0.1235");
        assert_eq!(num(None, 4), "n/a");
    }

    #[test]
    fn test_list_formatting() {
        assert_eq!(list(&[]), "none");
        assert_eq!(list(&["calm".to_string(), "sad".to_string()]), "2 (calm, sad)");
    }
}
