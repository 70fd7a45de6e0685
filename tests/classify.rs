use account_pulse::classify::{
    CategoryBreakdown, ContentClassification, EmotionClassification, CONTENT_TYPES, EMOTIONS,
    HOOKS, TOPICS,
};
use account_pulse::error::AnalyzeError;

fn breakdown(label: &str, count: u64, avg_engagement: f64) -> CategoryBreakdown {
    CategoryBreakdown {
        label: label.to_string(),
        count,
        avg_engagement,
    }
}

fn full_set(labels: &[&str]) -> Vec<CategoryBreakdown> {
    labels
        .iter()
        .map(|label| breakdown(label, 10, 2000.0))
        .collect()
}

#[test]
fn validation_reorders_to_canonical_label_order() {
    let mut shuffled = full_set(&CONTENT_TYPES);
    shuffled.reverse();

    let result = ContentClassification::validate(shuffled, full_set(&TOPICS))
        .expect("shuffled but complete response should validate");

    let labels: Vec<&str> = result
        .content_performance
        .iter()
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(labels, CONTENT_TYPES.to_vec());
}

#[test]
fn validation_rejects_missing_category() {
    let mut incomplete = full_set(&TOPICS);
    incomplete.pop();

    let result = ContentClassification::validate(full_set(&CONTENT_TYPES), incomplete);
    assert!(matches!(result, Err(AnalyzeError::CollaboratorMalformed(_))));
}

#[test]
fn validation_rejects_unknown_category() {
    let mut wrong = full_set(&EMOTIONS);
    wrong[0].label = "Melancholy".to_string();

    let result = EmotionClassification::validate(wrong, full_set(&HOOKS));
    assert!(matches!(result, Err(AnalyzeError::CollaboratorMalformed(_))));
}

#[test]
fn validation_rejects_duplicate_category() {
    let mut duplicated = full_set(&HOOKS);
    duplicated[1].label = duplicated[0].label.clone();

    let result = EmotionClassification::validate(full_set(&EMOTIONS), duplicated);
    assert!(matches!(result, Err(AnalyzeError::CollaboratorMalformed(_))));
}

#[test]
fn validation_rejects_invalid_average_engagement() {
    let mut invalid = full_set(&CONTENT_TYPES);
    invalid[2].avg_engagement = -1.0;

    let result = ContentClassification::validate(invalid, full_set(&TOPICS));
    assert!(matches!(result, Err(AnalyzeError::CollaboratorMalformed(_))));

    let mut nan = full_set(&CONTENT_TYPES);
    nan[0].avg_engagement = f64::NAN;

    let result = ContentClassification::validate(nan, full_set(&TOPICS));
    assert!(matches!(result, Err(AnalyzeError::CollaboratorMalformed(_))));
}
