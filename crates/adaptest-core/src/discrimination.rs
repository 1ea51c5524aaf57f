//! Item-quality analysis with the upper/lower group discrimination index.
//!
//! `D = p_top - p_bottom`: the difference in correct rates between the
//! highest- and lowest-scoring examinee groups on a single item. Positive
//! values mean the item separates strong from weak performers; negative
//! values point at a miskeyed or otherwise flawed item.
//!
//! This is batch analytics over historical responses, not part of the live
//! session loop.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result, ScoreGroup};
use crate::model::{DiscriminationQuality, DiscriminationResult};

/// Combined group size needed before an index is considered meaningful.
pub const MIN_VALID_SAMPLE: usize = 20;

/// Kelley's upper/lower 27% split.
pub const DEFAULT_GROUP_FRACTION: f64 = 0.27;

fn correct_rate(scores: &[i64], group: ScoreGroup) -> Result<f64> {
    if scores.is_empty() {
        return Err(InvalidInput::EmptyScores { group }.into());
    }
    let mut correct = 0usize;
    for (index, &value) in scores.iter().enumerate() {
        match value {
            0 => {}
            1 => correct += 1,
            _ => return Err(InvalidInput::NonBinaryScore { group, index, value }.into()),
        }
    }
    Ok(correct as f64 / scores.len() as f64)
}

/// Discrimination index from binary (0/1) outcomes of the top and bottom
/// performance groups on the same item.
pub fn calculate_discrimination_index(
    top_scores: &[i64],
    bottom_scores: &[i64],
) -> Result<DiscriminationResult> {
    let top_group_correct_rate = correct_rate(top_scores, ScoreGroup::Top)?;
    let bottom_group_correct_rate = correct_rate(bottom_scores, ScoreGroup::Bottom)?;
    let sample_size = top_scores.len() + bottom_scores.len();

    Ok(DiscriminationResult {
        discrimination_index: top_group_correct_rate - bottom_group_correct_rate,
        top_group_correct_rate,
        bottom_group_correct_rate,
        sample_size,
        is_statistically_valid: sample_size >= MIN_VALID_SAMPLE,
    })
}

/// Qualitative band for a discrimination index.
pub fn interpret_discrimination(index: f64) -> DiscriminationQuality {
    if index >= 0.4 {
        DiscriminationQuality::Excellent
    } else if index >= 0.3 {
        DiscriminationQuality::Good
    } else if index >= 0.2 {
        DiscriminationQuality::Acceptable
    } else if index >= 0.1 {
        DiscriminationQuality::Marginal
    } else {
        DiscriminationQuality::Poor
    }
}

/// One examinee's aggregate result, as seen by a single item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamineeRecord {
    /// Total test score used to rank examinees.
    pub total_score: f64,
    /// Whether this examinee answered the item correctly.
    pub item_correct: bool,
}

/// Build top and bottom groups for one item from historical records.
///
/// Examinees are ranked by total score (stable for ties) and the upper and
/// lower `fraction` of them form the groups. Each group holds at least one
/// examinee and the groups never overlap when there are two or more records.
pub fn split_performance_groups(
    records: &[ExamineeRecord],
    fraction: f64,
) -> Result<(Vec<i64>, Vec<i64>)> {
    if records.is_empty() {
        return Err(InvalidInput::EmptyRecords.into());
    }
    if !(fraction > 0.0 && fraction <= 0.5) {
        return Err(InvalidInput::InvalidGroupFraction(fraction).into());
    }

    let mut ranked: Vec<&ExamineeRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = ranked.len();
    let group_size = ((n as f64 * fraction).round() as usize).clamp(1, (n / 2).max(1));
    let outcome = |r: &&ExamineeRecord| i64::from(r.item_correct);

    let top = ranked[..group_size].iter().map(outcome).collect();
    let bottom = ranked[n - group_size..].iter().map(outcome).collect();
    Ok((top, bottom))
}

/// Top/bottom outcomes for one item, as loaded from an analysis file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcomes {
    pub id: String,
    pub top: Vec<i64>,
    pub bottom: Vec<i64>,
}

/// Analysis verdict for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAnalysis {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DiscriminationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<DiscriminationQuality>,
    /// Why the item could not be analysed, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemAnalysis {
    /// Poor items and items with unusable data both need a human look.
    pub fn needs_review(&self) -> bool {
        self.quality.map_or(true, |q| q.needs_review())
    }
}

/// Analyse a batch of items. Items with invalid data are reported with their
/// error rather than failing the batch.
pub fn analyze_items(items: &[ItemOutcomes]) -> Vec<ItemAnalysis> {
    items
        .iter()
        .map(|item| match calculate_discrimination_index(&item.top, &item.bottom) {
            Ok(result) => ItemAnalysis {
                item_id: item.id.clone(),
                quality: Some(interpret_discrimination(result.discrimination_index)),
                result: Some(result),
                error: None,
            },
            Err(e) => {
                tracing::warn!("item {} skipped: {}", item.id, e);
                ItemAnalysis {
                    item_id: item.id.clone(),
                    result: None,
                    quality: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_separation() {
        let r = calculate_discrimination_index(&[1, 1, 1, 1], &[0, 0, 0, 0]).unwrap();
        assert!((r.discrimination_index - 1.0).abs() < 1e-12);
        assert_eq!(r.sample_size, 8);
        assert!(!r.is_statistically_valid);
    }

    #[test]
    fn equal_groups() {
        let r = calculate_discrimination_index(&[1, 0, 1, 0], &[0, 1, 0, 1]).unwrap();
        assert!(r.discrimination_index.abs() < 1e-12);
        assert_eq!(r.top_group_correct_rate, 0.5);
    }

    #[test]
    fn mixed_groups() {
        let r = calculate_discrimination_index(&[1, 1, 1, 0], &[1, 0, 0, 0]).unwrap();
        assert!((r.discrimination_index - 0.5).abs() < 1e-12);
        assert_eq!(r.top_group_correct_rate, 0.75);
        assert_eq!(r.bottom_group_correct_rate, 0.25);
    }

    #[test]
    fn inverted_groups_are_negative() {
        let r = calculate_discrimination_index(&[0, 0, 1, 0], &[1, 1, 1, 0]).unwrap();
        assert!(r.discrimination_index < 0.0);
        assert_eq!(
            interpret_discrimination(r.discrimination_index),
            DiscriminationQuality::Poor
        );
    }

    #[test]
    fn validity_needs_twenty_examinees() {
        let r = calculate_discrimination_index(&[1; 10], &[0; 10]).unwrap();
        assert_eq!(r.sample_size, 20);
        assert!(r.is_statistically_valid);
        let r = calculate_discrimination_index(&[1; 10], &[0; 9]).unwrap();
        assert!(!r.is_statistically_valid);
    }

    #[test]
    fn rejects_bad_scores() {
        let err = calculate_discrimination_index(&[1, 2, 0], &[0, 0]).unwrap_err();
        assert_eq!(
            err.reason(),
            &InvalidInput::NonBinaryScore {
                group: ScoreGroup::Top,
                index: 1,
                value: 2
            }
        );
        assert!(calculate_discrimination_index(&[1], &[-1]).is_err());
        assert_eq!(
            calculate_discrimination_index(&[], &[1]).unwrap_err().reason(),
            &InvalidInput::EmptyScores {
                group: ScoreGroup::Top
            }
        );
        assert!(calculate_discrimination_index(&[1], &[]).is_err());
    }

    #[test]
    fn quality_bands() {
        assert_eq!(interpret_discrimination(0.45), DiscriminationQuality::Excellent);
        assert_eq!(interpret_discrimination(0.4), DiscriminationQuality::Excellent);
        assert_eq!(interpret_discrimination(0.35), DiscriminationQuality::Good);
        assert_eq!(interpret_discrimination(0.25), DiscriminationQuality::Acceptable);
        assert_eq!(interpret_discrimination(0.15), DiscriminationQuality::Marginal);
        assert_eq!(interpret_discrimination(0.05), DiscriminationQuality::Poor);
        assert_eq!(interpret_discrimination(-0.3), DiscriminationQuality::Poor);
        assert_eq!(interpret_discrimination(f64::NAN), DiscriminationQuality::Poor);
    }

    #[test]
    fn kelley_split() {
        let records: Vec<ExamineeRecord> = (0..10)
            .map(|i| ExamineeRecord {
                total_score: i as f64,
                item_correct: i >= 5,
            })
            .collect();
        let (top, bottom) = split_performance_groups(&records, DEFAULT_GROUP_FRACTION).unwrap();
        // round(10 * 0.27) = 3
        assert_eq!(top, vec![1, 1, 1]);
        assert_eq!(bottom, vec![0, 0, 0]);
    }

    #[test]
    fn split_edge_cases() {
        let one = [ExamineeRecord {
            total_score: 3.0,
            item_correct: true,
        }];
        let (top, bottom) = split_performance_groups(&one, 0.27).unwrap();
        assert_eq!((top.len(), bottom.len()), (1, 1));

        assert!(split_performance_groups(&[], 0.27).is_err());
        assert!(split_performance_groups(&one, 0.0).is_err());
        assert!(split_performance_groups(&one, 0.6).is_err());
        assert!(split_performance_groups(&one, f64::NAN).is_err());
    }

    #[test]
    fn batch_reports_bad_items_without_failing() {
        let items = vec![
            ItemOutcomes {
                id: "good".into(),
                top: vec![1, 1, 1, 1],
                bottom: vec![0, 1, 0, 0],
            },
            ItemOutcomes {
                id: "broken".into(),
                top: vec![1, 3],
                bottom: vec![0],
            },
        ];
        let analysis = analyze_items(&items);
        assert_eq!(analysis.len(), 2);
        assert_eq!(analysis[0].quality, Some(DiscriminationQuality::Excellent));
        assert!(!analysis[0].needs_review());
        assert!(analysis[1].error.is_some());
        assert!(analysis[1].needs_review());
    }
}
