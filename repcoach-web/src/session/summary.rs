//! End-of-session summary
//!
//! Per exercise: repetition count, average of every score category, and the
//! categories or joints that averaged below the improvement threshold.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::scoring::RepetitionScore;
use crate::thresholds::ExerciseKind;

/// Averages strictly below this are listed as areas for improvement
pub const IMPROVEMENT_THRESHOLD: f32 = 95.0;

const RULE: &str = "---------------------------------";

/// Average of one score category across a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAverage {
    pub name: String,
    /// Scalar average, or the mean of the per-joint averages
    pub average: f32,
    /// Per-joint averages by score key, empty for scalar categories
    pub joints: BTreeMap<String, f32>,
}

/// Aggregated results for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSummary {
    pub exercise: ExerciseKind,
    pub total_reps: usize,
    pub metrics: Vec<MetricAverage>,
    /// Sorted, deduplicated category names and joint titles
    pub improvement_areas: Vec<String>,
}

impl ExerciseSummary {
    /// Summarize the scores of one exercise; `None` when there are none
    pub fn from_scores<'a>(
        exercise: ExerciseKind,
        scores: impl IntoIterator<Item = &'a RepetitionScore>,
    ) -> Option<Self> {
        let scores: Vec<&RepetitionScore> = scores.into_iter().collect();
        if scores.is_empty() {
            return None;
        }

        let metrics: Vec<MetricAverage> = [
            scalar_metric(RepetitionScore::HULL, scores.iter().map(|s| s.hull_score)),
            joint_metric(
                RepetitionScore::DYNAMIC,
                scores
                    .iter()
                    .flat_map(|s| s.dynamic_angle_scores.iter().map(|(k, v)| (k.clone(), *v))),
            ),
            joint_metric(
                RepetitionScore::STATIC,
                scores
                    .iter()
                    .flat_map(|s| s.static_angle_scores.iter().map(|(k, v)| (k.as_str().to_string(), *v))),
            ),
            scalar_metric(RepetitionScore::WRIST, scores.iter().map(|s| s.wrist_distance_score)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut improvement_areas: Vec<String> = Vec::new();
        for metric in &metrics {
            if metric.joints.is_empty() {
                if metric.average < IMPROVEMENT_THRESHOLD {
                    improvement_areas.push(metric.name.clone());
                }
            } else {
                improvement_areas.extend(
                    metric
                        .joints
                        .iter()
                        .filter(|(_, avg)| **avg < IMPROVEMENT_THRESHOLD)
                        .map(|(key, _)| title_case(key)),
                );
            }
        }
        improvement_areas.sort();
        improvement_areas.dedup();

        Some(Self {
            exercise,
            total_reps: scores.len(),
            metrics,
            improvement_areas,
        })
    }

    pub fn metric(&self, name: &str) -> Option<&MetricAverage> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// Summary over every exercise performed, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub exercises: Vec<ExerciseSummary>,
}

impl SessionSummary {
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn exercise(&self, exercise: ExerciseKind) -> Option<&ExerciseSummary> {
        self.exercises.iter().find(|e| e.exercise == exercise)
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session Summary")?;
        writeln!(f, "{}", RULE)?;

        for summary in &self.exercises {
            writeln!(f)?;
            writeln!(f, "Exercise: {}", summary.exercise.title())?;
            writeln!(f, "  Total Reps: {}", summary.total_reps)?;
            writeln!(f)?;
            writeln!(f, "  Average Scores:")?;
            for metric in &summary.metrics {
                writeln!(f, "    - {}: {:.1}%", metric.name, metric.average)?;
            }

            writeln!(f)?;
            if summary.improvement_areas.is_empty() {
                writeln!(f, "  >> Great job! All scores are above {}%!", IMPROVEMENT_THRESHOLD)?;
            } else {
                writeln!(f, "  >> Areas for Improvement:")?;
                for area in &summary.improvement_areas {
                    writeln!(f, "     - {}", area)?;
                }
            }
            writeln!(f, "{}", RULE)?;
        }
        Ok(())
    }
}

fn scalar_metric(name: &str, values: impl Iterator<Item = f32>) -> Option<MetricAverage> {
    Some(MetricAverage {
        name: name.to_string(),
        average: mean(values)?,
        joints: BTreeMap::new(),
    })
}

/// Average each joint across reps, then average the joint averages
fn joint_metric(name: &str, values: impl Iterator<Item = (String, f32)>) -> Option<MetricAverage> {
    let mut per_joint: BTreeMap<String, Vec<f32>> = BTreeMap::new();
    for (key, value) in values {
        per_joint.entry(key).or_default().push(value);
    }

    let joints: BTreeMap<String, f32> = per_joint
        .into_iter()
        .filter_map(|(key, samples)| Some((key, mean(samples.into_iter())?)))
        .collect();

    Some(MetricAverage {
        name: name.to_string(),
        average: mean(joints.values().copied())?,
        joints,
    })
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0f32, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}

/// `elbow_r_up` -> `Elbow R Up`
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::StaticJoint;

    fn score(hull: f32, wrist: f32) -> RepetitionScore {
        RepetitionScore {
            hull_score: hull,
            wrist_distance_score: wrist,
            ..RepetitionScore::default()
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let scores = [score(90.0, 100.0), score(100.0, 100.0)];
        let summary = ExerciseSummary::from_scores(ExerciseKind::HammerCurl, &scores).unwrap();

        assert_eq!(summary.total_reps, 2);
        let hull = summary.metric(RepetitionScore::HULL).unwrap();
        assert!((hull.average - 95.0).abs() < 1e-4);
        assert!(summary.improvement_areas.is_empty());
    }

    #[test]
    fn test_joint_metric_averages_per_joint() {
        let mut first = score(100.0, 100.0);
        first.dynamic_angle_scores.insert("elbow_r_up".into(), 80.0);
        first.dynamic_angle_scores.insert("elbow_l_up".into(), 100.0);
        let mut second = score(100.0, 100.0);
        second.dynamic_angle_scores.insert("elbow_r_up".into(), 90.0);
        second.static_angle_scores.insert(StaticJoint::KneeR, 100.0);

        let summary = ExerciseSummary::from_scores(ExerciseKind::HammerCurl, [&first, &second]).unwrap();

        let dynamic = summary.metric(RepetitionScore::DYNAMIC).unwrap();
        assert!((dynamic.joints["elbow_r_up"] - 85.0).abs() < 1e-4);
        assert!((dynamic.joints["elbow_l_up"] - 100.0).abs() < 1e-4);
        assert!((dynamic.average - 92.5).abs() < 1e-4);

        let statics = summary.metric(RepetitionScore::STATIC).unwrap();
        assert!((statics.average - 100.0).abs() < 1e-4);

        assert_eq!(summary.improvement_areas, vec!["Elbow R Up".to_string()]);
    }

    #[test]
    fn test_empty_joint_metric_is_skipped() {
        let summary = ExerciseSummary::from_scores(ExerciseKind::OverheadPress, &[score(100.0, 100.0)]).unwrap();
        let names: Vec<&str> = summary.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![RepetitionScore::HULL, RepetitionScore::WRIST]);
    }

    #[test]
    fn test_no_scores() {
        assert!(ExerciseSummary::from_scores(ExerciseKind::HammerCurl, std::iter::empty()).is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("elbow_r_up"), "Elbow R Up");
        assert_eq!(title_case("knee_l"), "Knee L");
    }

    #[test]
    fn test_report_text() {
        let summary = SessionSummary {
            exercises: vec![
                ExerciseSummary::from_scores(ExerciseKind::HammerCurl, &[score(90.0, 80.0)]).unwrap(),
            ],
        };
        let text = summary.to_string();

        assert!(text.starts_with("Session Summary\n---------------------------------\n"));
        assert!(text.contains("Exercise: Hammer Curl\n  Total Reps: 1\n"));
        assert!(text.contains("    - Hull Score: 90.0%\n"));
        assert!(text.contains("  >> Areas for Improvement:\n     - Hull Score\n     - Wrist Distance Score\n"));
    }

    #[test]
    fn test_report_all_clear() {
        let summary = SessionSummary {
            exercises: vec![
                ExerciseSummary::from_scores(ExerciseKind::HammerCurl, &[score(100.0, 100.0)]).unwrap(),
            ],
        };
        assert!(summary.to_string().contains("  >> Great job! All scores are above 95%!\n"));
    }
}
