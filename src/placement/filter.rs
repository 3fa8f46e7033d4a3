use super::domain::QuizQuestion;

/// Number of questions offered before the respondent's age is known.
pub const DEFAULT_PREVIEW_LEN: usize = 10;

/// Narrows the bank to the questions relevant for one respondent.
///
/// Before the age is known the first [`DEFAULT_PREVIEW_LEN`] questions are returned so the
/// quiz can start immediately. Once it is known, every question without an age band is kept
/// along with the questions whose band contains the age. Malformed bands never match.
pub fn filter_questions_by_age(questions: &[QuizQuestion], age: Option<u32>) -> Vec<&QuizQuestion> {
    filter_questions_with_preview(questions, age, DEFAULT_PREVIEW_LEN)
}

pub fn filter_questions_with_preview(
    questions: &[QuizQuestion],
    age: Option<u32>,
    preview_len: usize,
) -> Vec<&QuizQuestion> {
    let Some(age) = age else {
        return questions.iter().take(preview_len).collect();
    };

    questions
        .iter()
        .filter(|question| match &question.age_range {
            None => true,
            Some(_) => question
                .parsed_age_range()
                .map(|range| range.contains(age))
                .unwrap_or(false),
        })
        .collect()
}
