//! intake-runner: headless driver for one complaint form session.
//!
//! Usage:
//!   intake-runner --demo --seed 12345 --data-dir ./data
//!   intake-runner --ipc-mode
//!
//! `--demo` fills in a sample complaint, verifies the challenge, submits,
//! and prints the confirmation. `--ipc-mode` reads one JSON request per
//! line from stdin. With neither flag it prints the initial form state.

use anyhow::Result;
use complaint_intake_core::{
    attachments::FileCandidate,
    command::FormCommand,
    config::FormConfig,
    event::FormEvent,
    snapshot::SessionSnapshot,
    validation::FieldName,
    FormSession,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: FormCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcResponse<'a> {
    events: &'a [FormEvent],
    state:  SessionSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = args
        .windows(2)
        .find(|w| w[0] == "--seed")
        .and_then(|w| w[1].parse::<u64>().ok());
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let demo = args.iter().any(|a| a == "--demo");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let config = load_config(data_dir)?;
    let mut session = match seed {
        Some(seed) => FormSession::new(config, seed),
        None => FormSession::from_entropy(config),
    };

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else if demo {
        println!("Complaint intake: intake-runner");
        println!("  session:   {}", session.session_id());
        println!("  data_dir:  {data_dir}");
        println!();
        run_demo(&mut session)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    }

    Ok(())
}

fn load_config(data_dir: &str) -> Result<FormConfig> {
    if Path::new(data_dir).join("form.json").exists() {
        FormConfig::load(data_dir)
    } else {
        log::warn!("No form.json in {data_dir}; using built-in configuration");
        Ok(FormConfig::default())
    }
}

fn run_ipc_loop(session: &mut FormSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => write_response(&mut stdout, session, &[])?,
            IpcRequest::Command { command } => match session.apply(command) {
                Ok(events) => write_response(&mut stdout, session, &events)?,
                Err(e) => {
                    log::warn!("Command rejected: {e}");
                    write_error(&mut stdout, &e.to_string())?;
                }
            },
        }
    }
    Ok(())
}

fn write_response(out: &mut impl Write, session: &FormSession, events: &[FormEvent]) -> Result<()> {
    let response = IpcResponse { events, state: session.snapshot() };
    writeln!(out, "{}", serde_json::to_string(&response)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn run_demo(session: &mut FormSession) -> Result<()> {
    let description = "On three occasions this year my advisor moved funds between my \
        registered accounts without written instructions. Each transfer triggered \
        redemption charges that were never disclosed to me, and my requests for \
        statements explaining the charges have gone unanswered for two months.";

    let fields = [
        (FieldName::FullName, "Jane Doe"),
        (FieldName::Email, "jane@example.com"),
        (FieldName::PhoneNumber, "(555) 123-4567"),
        (FieldName::AdvisorName, "Bob Smith"),
        (FieldName::Description, description),
        (FieldName::SupportingDocs, "Quarterly statements, email correspondence"),
    ];
    for (field, value) in fields {
        session.apply(FormCommand::SetField { field, value: value.to_string() })?;
    }

    session.apply(FormCommand::AddFiles {
        files: vec![FileCandidate {
            name:       "statement-q2.pdf".to_string(),
            size_bytes: 248_320,
            mime_type:  "application/pdf".to_string(),
        }],
    })?;

    let code = session.challenge().challenge().code.to_lowercase();
    session.apply(FormCommand::SetChallengeInput { value: code })?;
    session.apply(FormCommand::VerifyChallenge)?;
    let events = session.apply(FormCommand::Submit)?;

    for event in &events {
        if let FormEvent::SubmissionGated { message, .. } = event {
            println!("Submission blocked: {message}");
            for (field, error) in session.field_errors() {
                println!("  {field}: {error}");
            }
            return Ok(());
        }
    }

    print_confirmation(&session.snapshot());
    Ok(())
}

fn print_confirmation(state: &SessionSnapshot) {
    let Some(confirmation) = &state.confirmation else {
        println!("(no confirmation)");
        return;
    };
    println!("=== COMPLAINT RECEIVED ===");
    println!("  ticket:       {}", confirmation.ticket_number);
    println!("  submitted:    {}", confirmation.submitted_at_label);
    println!("  name:         {}", confirmation.draft.full_name);
    println!("  email:        {}", confirmation.draft.email);
    if let Some(phone) = &confirmation.draft.phone_number {
        println!("  phone:        {phone}");
    }
    println!("  advisor:      {}", confirmation.draft.advisor_name);
    println!("  attachments:  {}", confirmation.attachments.len());
    for a in &confirmation.attachments {
        println!("    - {} ({})", a.name, a.size_label);
    }
    if let Some(banner) = &state.banner {
        println!();
        println!("{}", banner.title);
        if let Some(detail) = &banner.detail {
            println!("{detail}");
        }
    }
}
