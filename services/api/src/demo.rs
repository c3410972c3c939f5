use crate::infra::{fill_template, RecordingMailDispatcher};
use chrono::Local;
use clap::Args;
use mrp_planner::config::{AppConfig, ExportConfig};
use mrp_planner::error::AppError;
use mrp_planner::workflows::assessment::projection::{FIXED_KEYS, MISSION_FIELD_KEYS};
use mrp_planner::workflows::assessment::{
    AnswerValue, AssessmentServiceError, AssessmentSession, DocumentRenderer, ExportPipeline,
    MissionDetails, QuestionCatalog, QuestionTemplate, RenderError, RiskSeverity, ShapeKind,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Callsign printed on the profile
    #[arg(long, default_value = "DAGGER 11")]
    pub(crate) callsign: String,
    /// Pilot in command
    #[arg(long, default_value = "Maj Reyes")]
    pub(crate) pic: String,
    /// Co-pilot or student
    #[arg(long, default_value = "Lt Cruz")]
    pub(crate) cp: String,
    /// Lesson flown
    #[arg(long, default_value = "Formation")]
    pub(crate) lesson: String,
    /// Print every projected template field after the walkthrough
    #[arg(long)]
    pub(crate) show_fields: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    demo_flow(&args, config.export).map_err(AppError::from)
}

fn demo_flow(args: &DemoArgs, export: ExportConfig) -> Result<(), AssessmentServiceError> {
    println!("Mission Risk Profile demo");

    let mut session = AssessmentSession::standard();
    session.begin()?;
    session.submit_mission_details(demo_mission(args))?;

    let mission = session.mission().clone();
    println!(
        "Crew {} (PIC) / {} (CP) | callsign {} | lesson {} | {}",
        mission.pic_name, mission.cp_name, mission.callsign, mission.lesson, mission.date_time
    );

    println!("\nScripted answers");
    let mut raised: Vec<String> = Vec::new();
    let mut green_count = 0usize;
    while let Some(index) = session.navigation().current_question_index() {
        let question = match session.catalog().question(index) {
            Some(question) => *question,
            None => break,
        };
        let value = scripted_answer(&question);
        match describe_raised(&question, &value) {
            Some(line) => raised.push(line),
            None => green_count += 1,
        }
        session.submit_answer(value)?;
    }
    for line in &raised {
        println!("  {line}");
    }
    println!("  {green_count} questions answered green");

    session.set_comments("Soft brakes raised with maintenance before stepping.".to_string())?;

    let scores = session.scores();
    println!("\nTotals");
    println!(
        "  PIC {} points -> sign-off {}",
        scores.pic_total,
        scores.pic_mda.label()
    );
    println!(
        "  CP  {} points -> sign-off {}",
        scores.cp_total,
        scores.cp_mda.label()
    );

    let renderer = Arc::new(SummaryTextRenderer);
    let mailer = Arc::new(RecordingMailDispatcher::default());
    let pipeline = ExportPipeline::new(renderer, mailer.clone(), export);

    let fields = session.projected_fields();
    pipeline.notify_reviewer(&mission, &fields)?;
    session.mark_review_notified();
    session.lock();

    for message in mailer.sent() {
        println!(
            "\nReview notification recorded for {}",
            message.recipients.join(", ")
        );
        println!("  Subject: {}", message.subject);
        println!(
            "  Attachment: {} ({} bytes)",
            message.attachment.filename,
            message.attachment.bytes.len()
        );
    }

    let document = pipeline.render_document(&mission, &fields)?;
    println!("\nExport ready: {} ({} bytes)", document.filename, document.bytes.len());

    if args.show_fields {
        println!("\nProjected template fields");
        for (key, value) in &fields {
            println!("  {key} = {value}");
        }
    }

    Ok(())
}

pub(crate) fn run_placeholders() -> Result<(), AppError> {
    let catalog = QuestionCatalog::standard();

    println!("Template placeholder markers");
    println!("\nMission header");
    for key in MISSION_FIELD_KEYS {
        println!("  {{{key}}}");
    }
    println!("\nQuestions");
    for key in catalog.placeholder_keys() {
        println!("  {{{key}}}");
    }
    println!("\nTotals, sign-off, and comments");
    for key in FIXED_KEYS {
        println!("  {{{key}}}");
    }

    let total = MISSION_FIELD_KEYS.len() + catalog.placeholder_keys().len() + FIXED_KEYS.len();
    println!("\n{total} markers total");
    Ok(())
}

fn demo_mission(args: &DemoArgs) -> MissionDetails {
    MissionDetails {
        callsign: args.callsign.clone(),
        pic_name: args.pic.clone(),
        cp_name: args.cp.clone(),
        ac_nr: "N-042".to_string(),
        lesson: args.lesson.clone(),
        area_assignment: "Area 3".to_string(),
        date_time: Local::now().format("%Y-%m-%dT%H:%M").to_string(),
    }
}

/// A fixed answer mix: a handful of raised items so totals, sign-off, and
/// the hazard mirror all show up in the output.
fn scripted_answer(question: &QuestionTemplate) -> AnswerValue {
    match question.id {
        "short_notice" => AnswerValue::Individual {
            pic: Some(RiskSeverity::Yellow),
            cp: Some(RiskSeverity::Green),
        },
        "last_sortie" => AnswerValue::Individual {
            pic: Some(RiskSeverity::Red),
            cp: Some(RiskSeverity::Yellow),
        },
        "unfamiliar_airfield" => AnswerValue::Shared {
            severity: Some(RiskSeverity::Red),
        },
        "other_hazard_aircraft" => AnswerValue::Custom {
            description: "Soft brakes reported on preflight".to_string(),
            severity: RiskSeverity::Yellow,
        },
        _ => match question.shape.kind() {
            ShapeKind::Individual => AnswerValue::Individual {
                pic: Some(RiskSeverity::Green),
                cp: Some(RiskSeverity::Green),
            },
            ShapeKind::Shared => AnswerValue::Shared {
                severity: Some(RiskSeverity::Green),
            },
            ShapeKind::Custom => AnswerValue::Custom {
                description: String::new(),
                severity: RiskSeverity::Green,
            },
        },
    }
}

fn describe_raised(question: &QuestionTemplate, value: &AnswerValue) -> Option<String> {
    let category = question.category.label();
    match value {
        AnswerValue::Individual { pic, cp } => {
            let pic = pic.unwrap_or(RiskSeverity::Green);
            let cp = cp.unwrap_or(RiskSeverity::Green);
            if pic == RiskSeverity::Green && cp == RiskSeverity::Green {
                return None;
            }
            Some(format!(
                "[{category}] {}: PIC {} / CP {} (+{}/+{})",
                question.id,
                pic.label(),
                cp.label(),
                pic.points(),
                cp.points()
            ))
        }
        AnswerValue::Shared { severity } => {
            let severity = severity.unwrap_or(RiskSeverity::Green);
            if severity == RiskSeverity::Green {
                return None;
            }
            Some(format!(
                "[{category}] {}: both {} (+{points}/+{points})",
                question.id,
                severity.label(),
                points = severity.points()
            ))
        }
        AnswerValue::Custom {
            description,
            severity,
        } => {
            if description.trim().is_empty() || *severity == RiskSeverity::Green {
                return None;
            }
            Some(format!(
                "[{category}] {}: \"{description}\" {} (+{points}/+{points})",
                question.id,
                severity.label(),
                points = severity.points()
            ))
        }
    }
}

const DEMO_TEMPLATE: &str = "\
Mission Risk Profile
Callsign {callsign}  Lesson {lesson}  Date {date_time}
PIC {pic_name}  CP {cp_name}  Aircraft {ac_nr}  Area {area_assignment}

PIC total {pic_mrp} (sign-off {pic_mda})
CP total {cp_mrp} (sign-off {cp_mda})

Comments: {comments}
";

/// Disk-free renderer for the demo; the serve path reads the configured
/// template file instead.
struct SummaryTextRenderer;

impl DocumentRenderer for SummaryTextRenderer {
    fn render(&self, fields: &BTreeMap<String, String>) -> Result<Vec<u8>, RenderError> {
        Ok(fill_template(DEMO_TEMPLATE, fields).into_bytes())
    }
}
