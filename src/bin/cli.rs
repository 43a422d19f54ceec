//! SapienzaAdvisor CLI
//!
//! Shows a course page and performs the course page actions from a terminal.

use std::path::PathBuf;

use advisor::{
    error::{AppError, Result},
    models::{AuthContext, Config, ReviewDraft},
    pipeline::{self, CourseViewState, ReviewSort},
    services::{CourseActions, HttpCourseApi, save_download},
    utils::http,
};
use clap::{Parser, Subcommand};

/// SapienzaAdvisor - course reviews and lecture notes
#[derive(Parser, Debug)]
#[command(name = "advisor", version, about = "SapienzaAdvisor course client")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "advisor.toml")]
    config: PathBuf,

    /// Bearer token for the backend services
    #[arg(long, env = "ADVISOR_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a course with its ratings, reviews and notes
    Show {
        course_id: i64,

        /// Sort reviews by "date" or "rating"
        #[arg(long)]
        sort: Option<String>,

        /// "asc" or "desc"
        #[arg(long, default_value = "asc")]
        order: String,

        /// Rating dimension when sorting by rating
        #[arg(long)]
        category: Option<String>,

        /// Print the view-state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review a course
    Review {
        course_id: i64,
        #[arg(long)]
        clarity: u8,
        #[arg(long)]
        feasibility: u8,
        #[arg(long)]
        availability: u8,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Upload lecture notes to a course
    Upload {
        course_id: i64,
        file: PathBuf,
        #[arg(long)]
        description: String,
    },

    /// Rate lecture notes
    RateNote {
        course_id: i64,
        note_id: i64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Report a course review
    ReportReview {
        course_id: i64,
        review_id: i64,
        #[arg(long)]
        reason: String,
    },

    /// Report lecture notes
    ReportNote {
        course_id: i64,
        note_id: i64,
        #[arg(long)]
        reason: String,
    },

    /// Download lecture notes
    Download {
        note_id: i64,
        /// Directory to save into (default: download.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_view(state: &CourseViewState) {
    match (&state.course_name, &state.course_error) {
        (Some(name), _) => {
            println!("{name}");
            if let Some(teacher) = &state.teacher_name {
                println!("Professor {teacher}");
            }
        }
        (None, Some(error)) => println!("Course {}: {error}", state.course_id),
        (None, None) => println!("Course {}", state.course_id),
    }

    println!();
    match &state.ratings_error {
        Some(error) => println!("Ratings: {error}"),
        None => println!(
            "Clarity {:.1} | Feasibility {:.1} | Availability {:.1}",
            state.ratings.average_clarity,
            state.ratings.average_feasibility,
            state.ratings.average_availability
        ),
    }

    println!();
    println!("Reviews ({})", state.reviews.len());
    if let Some(error) = &state.reviews_error {
        println!("  {error}");
    }
    for item in &state.reviews {
        let r = &item.review;
        println!(
            "  #{} {} clarity {} feasibility {} availability {}{}",
            r.id,
            r.created_at.date(),
            r.rating_clarity,
            r.rating_feasibility,
            r.rating_availability,
            if item.can_report { " [report]" } else { "" }
        );
        if let Some(comment) = r.comment.as_deref().filter(|c| !c.is_empty()) {
            println!("      {comment}");
        }
    }

    println!();
    println!("Notes ({})", state.notes.len());
    if let Some(error) = &state.notes_error {
        println!("  {error}");
    }
    for item in &state.notes {
        let n = &item.note;
        let mut actions = Vec::new();
        if item.can_rate {
            actions.push("rate");
        }
        if item.can_report {
            actions.push("report");
        }
        println!(
            "  #{} {} ({:.2} stars, {} ratings){}",
            n.id,
            n.description.as_deref().unwrap_or(""),
            n.average_rating,
            n.ratings.len(),
            if actions.is_empty() {
                String::new()
            } else {
                format!(" [{}]", actions.join(", "))
            }
        );
    }

    println!();
    if let Some(error) = &state.user_error {
        println!("Profile: {error}");
    }
    println!(
        "Add review: {} | Upload notes: {}",
        if state.can_add_review { "yes" } else { "no" },
        if state.can_add_note { "yes" } else { "no" }
    );
}

fn validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!("Config OK");
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Validate => validate(&config),
        command => run(command, &config, cli.token).await,
    }
}

/// Run a command that talks to the backend services.
async fn run(command: Command, config: &Config, token: Option<String>) -> Result<()> {
    let auth = AuthContext::new(token.unwrap_or_default())?;
    let client = http::create_async_client(&config.client)?;
    let api = HttpCourseApi::new(client, config.api.clone(), auth);
    let actions = CourseActions::new(
        &api,
        config.client.max_concurrent,
        config.download.default_file_name.clone(),
    );

    match command {
        Command::Show {
            course_id,
            sort,
            order,
            category,
            json,
        } => {
            let sort = sort
                .map(|criteria| ReviewSort::parse(&criteria, &order, category.as_deref()))
                .transpose()?;
            let view = pipeline::run_course_view(config, &api, course_id, sort).await;
            let state = view.render();
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_view(&state);
            }
        }

        Command::Review {
            course_id,
            clarity,
            feasibility,
            availability,
            comment,
        } => {
            let mut view = pipeline::run_course_view(config, &api, course_id, None).await;
            let draft = ReviewDraft {
                rating_clarity: clarity,
                rating_feasibility: feasibility,
                rating_availability: availability,
                comment,
            };
            let review = actions.submit_review(&mut view, draft).await?;
            log::info!("Review {} submitted", review.id);
        }

        Command::Upload {
            course_id,
            file,
            description,
        } => {
            let bytes = tokio::fs::read(&file).await?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| AppError::validation(format!("bad file path {}", file.display())))?
                .to_string();
            let mut view = pipeline::run_course_view(config, &api, course_id, None).await;
            actions
                .upload_note(&mut view, description, file_name, bytes)
                .await?;
            log::info!("Notes uploaded ({} notes on course)", view.notes().len());
        }

        Command::RateNote {
            course_id,
            note_id,
            rating,
            comment,
        } => {
            let mut view = pipeline::run_course_view(config, &api, course_id, None).await;
            actions.rate_note(&mut view, note_id, rating, comment).await?;
            log::info!("Note {} rated", note_id);
        }

        Command::ReportReview {
            course_id,
            review_id,
            reason,
        } => {
            let mut view = pipeline::run_course_view(config, &api, course_id, None).await;
            let report = actions.report_review(&mut view, review_id, &reason).await?;
            log::info!("Report {} submitted", report.id);
        }

        Command::ReportNote {
            course_id,
            note_id,
            reason,
        } => {
            let mut view = pipeline::run_course_view(config, &api, course_id, None).await;
            let report = actions.report_note(&mut view, note_id, &reason).await?;
            log::info!("Report {} submitted", report.id);
        }

        Command::Download {
            note_id,
            output_dir,
        } => {
            let dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.download.output_dir));
            let download = actions.download_note(note_id).await?;
            let path = save_download(&download, &dir).await?;
            log::info!("Saved {} ({} bytes)", path.display(), download.bytes.len());
        }

        Command::Validate => validate(config)?,
    }

    Ok(())
}
