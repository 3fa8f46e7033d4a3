use crate::infra::{build_engine, InMemoryPlacementRepository, LoggingMailer};
use clap::Args;
use kidquest_placement::config::AppConfig;
use kidquest_placement::error::AppError;
use kidquest_placement::placement::{
    filter_questions_with_preview, AnswerValue, PlacementEngine, PlacementResult,
    PlacementService, QuestionKind, QuizAnswer, QuizQuestion, QuizSession, StudentId, Subject,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Respondent age; omit to list the opening questions shown before the age is known
    #[arg(long)]
    pub(crate) age: Option<u32>,
    /// Print the questions as JSON instead of a listing
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file containing an array of answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Store the placement for this student and queue the nurture e-mail
    #[arg(long)]
    pub(crate) student: Option<String>,
    /// Print the placement as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Age reported by the scripted learner
    #[arg(long, default_value_t = 8)]
    pub(crate) age: u32,
    /// Student identifier used when storing the placement
    #[arg(long, default_value = "demo-student")]
    pub(crate) student: String,
    /// Answer every graded question incorrectly to exercise the hold-back path
    #[arg(long)]
    pub(crate) struggling: bool,
}

fn load_engine() -> Result<PlacementEngine, AppError> {
    let config = AppConfig::load()?;
    build_engine(&config.placement)
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let engine = load_engine()?;
    let QuestionsArgs { age, json } = args;

    let questions: Vec<&QuizQuestion> =
        filter_questions_with_preview(engine.bank().questions(), age, engine.config().preview_len);

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    match age {
        Some(age) => println!("{} questions for age {}", questions.len(), age),
        None => println!("{} opening questions (age not yet known)", questions.len()),
    }
    for (position, question) in questions.iter().enumerate() {
        let band = question.age_range.as_deref().unwrap_or("all ages");
        println!(
            "{:>2}. [{}] {} ({:?}, {})",
            position + 1,
            question.id,
            question.question,
            question.category,
            band
        );
        if !question.options.is_empty() {
            println!("      options: {}", question.options.join(" | "));
        }
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = load_engine()?;
    let raw = std::fs::read_to_string(&args.answers)?;
    let answers: Vec<QuizAnswer> = serde_json::from_str(&raw)?;
    let answered = answers.len();

    let result = match args.student {
        Some(student) => {
            let service = PlacementService::new(
                engine,
                Arc::new(InMemoryPlacementRepository::default()),
                Arc::new(LoggingMailer::default()),
            );
            service.complete(StudentId(student), answers)?.result
        }
        None => engine.score(&answers),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Scored {} answers from {}", answered, args.answers.display());
        render_placement(&result);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        age,
        student,
        struggling,
    } = args;

    let engine = load_engine()?;
    let config = engine.config().clone();
    let repository = Arc::new(InMemoryPlacementRepository::default());
    let mailer = Arc::new(LoggingMailer::default());
    let service = PlacementService::new(engine, repository.clone(), mailer.clone());
    let bank = service.engine().bank();

    println!("Placement quiz demo (age {age})");
    let mut session = QuizSession::new();
    while let Some(question) = session.current_question(bank, &config) {
        let value = scripted_answer(question, &config.age_question_id, age, struggling);
        println!("- {} -> {}", question.id, value);
        session = session.answer(bank, &config, value, Some(20));
    }

    let answers = session.into_answers();
    let student_id = StudentId(student);
    let record = service.complete(student_id.clone(), answers)?;

    println!();
    render_placement(&record.result);

    println!(
        "\nStored {} placement(s) for {}",
        repository.history(&student_id).len(),
        student_id.0
    );
    let sent = mailer.sent();
    if sent.is_empty() {
        println!("Nurture e-mails: none queued");
    } else {
        println!("Nurture e-mails:");
        for request in sent {
            println!("  - template={} -> {}", request.template, request.student_id.0);
        }
    }

    Ok(())
}

fn scripted_answer(
    question: &QuizQuestion,
    age_question_id: &str,
    age: u32,
    struggling: bool,
) -> AnswerValue {
    if question.id == age_question_id {
        return AnswerValue::text(age.to_string());
    }

    match (&question.correct_answer, question.kind) {
        (Some(expected), _) if !struggling => expected.clone(),
        (Some(_), _) => question
            .options
            .iter()
            .find(|option| question.grade(&AnswerValue::text(option.as_str())) == Some(false))
            .map(|option| AnswerValue::text(option.as_str()))
            .unwrap_or_else(|| AnswerValue::text("not sure")),
        (None, QuestionKind::Scale) => AnswerValue::Numeric(if struggling { 1.0 } else { 4.0 }),
        (None, _) => question
            .options
            .first()
            .map(|option| AnswerValue::text(option.as_str()))
            .unwrap_or_else(|| AnswerValue::text("")),
    }
}

fn render_placement(result: &PlacementResult) {
    println!("Placement: {}", result.summary());
    println!("Start quest: {}", result.recommended_start_quest);

    println!("\nSubject levels");
    for subject in Subject::ALL {
        println!("- {}: {}/10", subject.label(), result.level(subject));
    }

    print_list("Strengths", &result.strengths);
    print_list("Growth areas", &result.growth_areas);
    print_list("Recommendations", &result.recommendations);
    print_list("Neurodivergent supports", &result.neurodivergent_supports);
}

fn print_list(title: &str, entries: &[String]) {
    if entries.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for entry in entries {
        println!("- {entry}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kidquest_placement::placement::{LearningStyle, Tier};

    fn scripted_placement(age: u32, struggling: bool) -> PlacementResult {
        let engine = PlacementEngine::standard();
        let config = engine.config();
        let mut session = QuizSession::new();
        while let Some(question) = session.current_question(engine.bank(), config) {
            let value = scripted_answer(question, &config.age_question_id, age, struggling);
            session = session.answer(engine.bank(), config, value, None);
        }
        engine.score(&session.into_answers())
    }

    #[test]
    fn confident_learner_is_promoted_one_tier() {
        let result = scripted_placement(6, false);
        assert_eq!(result.tier, Tier::Explorers);
        assert_eq!(result.overall_level, 9);
        assert_eq!(result.learning_style, LearningStyle::Visual);
        assert!(!result.neurodivergent_supports.is_empty());
    }

    #[test]
    fn struggling_learner_stays_in_the_youngest_tier() {
        let result = scripted_placement(6, true);
        assert_eq!(result.tier, Tier::EarlyExplorers);
        assert_eq!(result.overall_level, 2);
        assert_eq!(result.recommended_start_quest, "counting-meadow");
    }
}
