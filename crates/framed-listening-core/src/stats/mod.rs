//! Statistics primitives.
//!
//! Undefined statistics (SD of a single value, Cohen's d with zero pooled SD,
//! a t-test with no degrees of freedom) are `None`, never NaN.

mod descriptive;
mod effect;
mod hypothesis;

pub use descriptive::{
    coefficient_of_variation, mean, median, sample_std, sample_variance, SampleSummary,
};
pub use effect::{cohens_d, Significance};
pub use hypothesis::{
    levene_median, one_way_anova, student_t_test, AnovaResult, LeveneResult, TTestResult,
};
