use crate::corpus::{CategoryCatalog, QuestionRecord};
use crate::session::answer::AnswerRecord;
use crate::session::result::CategoryScore;

pub struct GradeBoundary {
    pub min_percentage: f64,
    pub grade: &'static str,
}

/// Highest threshold first; the first one met wins.
pub const GRADE_TABLE: &[GradeBoundary] = &[
    GradeBoundary { min_percentage: 90.0, grade: "A+" },
    GradeBoundary { min_percentage: 80.0, grade: "A" },
    GradeBoundary { min_percentage: 70.0, grade: "B" },
    GradeBoundary { min_percentage: 60.0, grade: "C" },
    GradeBoundary { min_percentage: 50.0, grade: "D" },
];

pub const FAILING_GRADE: &str = "F";

pub fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 * 100.0 / total as f64
}

pub fn grade(percentage: f64) -> &'static str {
    GRADE_TABLE
        .iter()
        .find(|b| percentage >= b.min_percentage)
        .map(|b| b.grade)
        .unwrap_or(FAILING_GRADE)
}

/// Tally answered questions per active category. A question with several
/// active tags counts toward each of them. Categories nobody answered are left out.
pub fn category_breakdown(
    questions: &[QuestionRecord],
    answers: &[AnswerRecord],
    active: &[String],
    catalog: &CategoryCatalog,
) -> Vec<CategoryScore> {
    let mut scores: Vec<CategoryScore> = active
        .iter()
        .map(|tag| CategoryScore {
            tag: tag.clone(),
            name: catalog.display_name(tag).to_string(),
            total: 0,
            correct: 0,
            percentage: 0.0,
        })
        .collect();

    for answer in answers {
        let Some(question) = questions.get(answer.position) else {
            continue;
        };
        for score in scores.iter_mut().filter(|s| question.has_category(&s.tag)) {
            score.total += 1;
            if answer.correct {
                score.correct += 1;
            }
        }
    }

    scores.retain(|s| s.total > 0);
    for score in &mut scores {
        score.percentage = percentage(score.correct, score.total);
    }
    scores
}
