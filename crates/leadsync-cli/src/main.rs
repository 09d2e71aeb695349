//! `leadsync` CLI: fill in a lead form from the command line.
//!
//! `check` runs the same validation the browser form runs and prints the
//! JSON payload it would send. `submit` sends that payload to a running
//! submission endpoint and reports the result.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use leadsync_core::feedback::SubmitFeedback;
use leadsync_core::form::{Field, FormKind, FormLayout, FormState, NameStyle};
use leadsync_core::response::SubmitResponse;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

/// Shown when the endpoint answers without a message of its own.
const FALLBACK_FAILURE: &str = "Form submission failed";

// ── CLI structure ────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "leadsync",
    version,
    about = "leadsync CLI — validate and submit workshop and corporate lead forms",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         LEADSYNC_ENDPOINT   Submission endpoint URL\n\n\
         {DIM}Examples:{RESET}\n  \
         leadsync check --first-name Jane --last-name Doe --email jane@x.com --role Manager\n  \
         leadsync submit --form corporate --first-name Jane --last-name Doe \\\n      \
         --organization Acme --email jane@acme.com --interest Training"
    ),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a form and print the payload it would submit.
    Check(FormArgs),
    /// Validate a form and submit it to the endpoint.
    Submit {
        #[command(flatten)]
        form: FormArgs,

        /// Submission endpoint URL.
        #[arg(
            long,
            env = "LEADSYNC_ENDPOINT",
            default_value = "http://127.0.0.1:8888/.netlify/functions/keap-submit"
        )]
        endpoint: String,
    },
}

#[derive(Args)]
struct FormArgs {
    /// Which form to fill in.
    #[arg(long, default_value = "workshop")]
    form: FormKind,

    /// Full name (single name input; split at the first space).
    #[arg(long, conflicts_with_all = ["first_name", "last_name"])]
    name: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    organization: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    questions: Option<String>,

    #[arg(long)]
    challenges: Option<String>,

    /// Role option to check (repeatable).
    #[arg(long)]
    role: Vec<String>,

    /// Interest option to check (repeatable).
    #[arg(long)]
    interest: Vec<String>,

    /// Preferred contact method to check (repeatable).
    #[arg(long)]
    contact_method: Vec<String>,

    #[arg(long, hide = true)]
    website: Option<String>,
}

impl FormArgs {
    /// Fill a fresh form the way a person would, in form order.
    fn into_form(self) -> FormState {
        let name_style = if self.name.is_some() {
            NameStyle::Single
        } else {
            NameStyle::Split
        };
        let mut form = FormState::new(FormLayout::new(self.form, name_style));

        let texts = [
            (Field::Name, self.name),
            (Field::FirstName, self.first_name),
            (Field::LastName, self.last_name),
            (Field::Organization, self.organization),
            (Field::Email, self.email),
            (Field::Phone, self.phone),
            (Field::Questions, self.questions),
            (Field::Challenges, self.challenges),
            (Field::Website, self.website),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                form.set_text(field, value);
            }
        }

        let groups = [
            (Field::Role, self.role),
            (Field::Interest, self.interest),
            (Field::ContactMethod, self.contact_method),
        ];
        for (group, options) in groups {
            for option in options {
                form.check(group, option);
            }
        }
        form
    }
}

// ── Pretty output helpers ────────────────────────────────────────────

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn print_field_errors(form: &FormState) {
    for (field, err) in form.errors() {
        eprintln!("  {RED}✗{RESET} {DIM}{:<16}{RESET} {err}", field.name());
    }
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Check(form) => cmd_check(form),
        Commands::Submit { form, endpoint } => cmd_submit(form, &endpoint).await,
    }
}

fn cmd_check(args: FormArgs) -> Result<()> {
    let mut form = args.into_form();
    if let Err(focus) = form.validate_all() {
        print_field_errors(&form);
        bail!("form is invalid; fix '{focus}' first");
    }

    let payload = serde_json::to_string_pretty(&form.payload())
        .context("failed to encode payload")?;
    println!("{payload}");
    Ok(())
}

async fn cmd_submit(args: FormArgs, endpoint: &str) -> Result<()> {
    let mut form = args.into_form();

    // Bots get no feedback at all.
    if form.is_bot() {
        return Ok(());
    }

    let mut feedback = SubmitFeedback::new();
    if let Err(focus) = form.validate_all() {
        feedback.invalid(focus)?;
        print_field_errors(&form);
        bail!("form is invalid; fix '{focus}' first");
    }

    feedback.begin()?;
    eprintln!("{DIM}{}{RESET}", feedback.button_label());

    match post_payload(endpoint, &form).await {
        Ok(resp) => {
            feedback.succeed(&mut form, resp.contact_id.clone())?;
            let message = resp.message.as_deref().unwrap_or("Form submitted");
            match resp.contact_id {
                Some(id) => success(&format!("{message} (contact {id})")),
                None => success(message),
            }
            Ok(())
        }
        Err(e) => {
            feedback.fail(format!("{e:#}"))?;
            Err(e)
        }
    }
}

/// POST the form's payload and read the response envelope.
async fn post_payload(endpoint: &str, form: &FormState) -> Result<SubmitResponse> {
    let resp = reqwest::Client::new()
        .post(endpoint)
        .json(&form.payload())
        .send()
        .await
        .context("request failed")?;

    let status = resp.status();
    let body = resp.text().await.context("failed to read response body")?;
    let parsed: Option<SubmitResponse> = serde_json::from_str(&body).ok();

    match parsed {
        Some(result) if status.is_success() && result.success => Ok(result),
        Some(SubmitResponse {
            message: Some(message),
            ..
        }) => bail!("{message}"),
        _ => bail!("{FALLBACK_FAILURE} ({status})"),
    }
}
