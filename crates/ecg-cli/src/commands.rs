//! The `check` and `analyze` subcommands.
//!
//! Both write the rendered screen to `out` and notifications to `err`, and
//! return whether the run succeeded.

use std::io::Write;

use anyhow::Result;
use ecg_core::{
    AnalysisBackend, AnalyzerSession, CandidateFile, ImageValidator, NotificationLevel, Screen,
};

/// Validates the candidates and prints the resulting upload screen.
///
/// Succeeds only if no candidate was rejected.
pub fn check(
    candidates: Vec<CandidateFile>,
    validator: ImageValidator,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    let mut session = AnalyzerSession::with_validator(validator);
    let outcome = session.add_files(candidates);

    writeln!(out, "{}", Screen::render(&session))?;
    report(&mut session, err)?;

    Ok(outcome.rejected.is_empty())
}

/// Validates the candidates, generates previews, submits whatever was
/// admitted, and prints the upload and result screens.
///
/// Succeeds only if an analysis came back.
pub async fn analyze(
    candidates: Vec<CandidateFile>,
    validator: ImageValidator,
    backend: &dyn AnalysisBackend,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    let mut session = AnalyzerSession::with_validator(validator);
    let outcome = session.add_files(candidates);
    let ready = session.load_previews(outcome.jobs).await?;
    tracing::debug!(previews = ready, "Previews generated");

    writeln!(out, "{}", Screen::render(&session))?;
    report(&mut session, err)?;

    if !session.can_submit() {
        return Ok(false);
    }

    session.submit(backend).await?;

    writeln!(out)?;
    writeln!(out, "{}", Screen::render(&session))?;
    report(&mut session, err)?;

    Ok(session.analysis().error().is_none())
}

fn report(session: &mut AnalyzerSession, err: &mut impl Write) -> std::io::Result<()> {
    for notification in session.drain_notifications() {
        let level = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        };
        writeln!(
            err,
            "[{level}] {}: {}",
            notification.title, notification.description
        )?;
    }
    Ok(())
}
