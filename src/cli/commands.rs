use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::api::dispatcher::{Dispatcher, HttpDispatcher};
use crate::api::error::ClientError;
use crate::cli::config::AppConfig;
use crate::form::form_model::{FormDefinition, FormIdentity};
use crate::form::method_name::derive_method_name;
use crate::hook::{app_main::AppMainHook, hook::HookRunner};
use crate::render::{renderer::TerminalRenderer, validator::ValidatorRegistry};
use crate::run_session;
use crate::state::{loader::FetchOutcome, navigator::Navigator, state_model::Transition};
use crate::trace::logger::TraceLogger;

// ============================================================================
// run subcommand
// ============================================================================

pub fn cmd_run<R: BufRead, W: Write>(
    base_url: &str,
    config: &AppConfig,
    trace_path: Option<&str>,
    input: R,
    output: W,
) -> Result<(), ClientError> {
    let dispatcher = HttpDispatcher::new(config.api.timeout())?;
    let tracer = trace_path.map(TraceLogger::new).unwrap_or_default();
    let mut nav = Navigator::with_login_form(base_url, FormIdentity::new(&config.api.login_form))
        .with_tracer(tracer);
    let hooks = HookRunner::new(Arc::new(AppMainHook));
    let registry = ValidatorRegistry::with_defaults();
    let mut renderer = TerminalRenderer::new(input, output);

    tracing::info!(base_url, form = nav.active_form().name(), "starting session");
    run_session(&mut nav, &dispatcher, &hooks, &registry, &mut renderer)?;
    Ok(())
}

// ============================================================================
// fetch subcommand
// ============================================================================

pub fn cmd_fetch(
    base_url: &str,
    config: &AppConfig,
    form: &str,
    token: Option<&str>,
) -> Result<(), ClientError> {
    let dispatcher = HttpDispatcher::new(config.api.timeout())?;
    let definition = fetch_form(&dispatcher, base_url, form, token)?;
    let json = serde_json::to_string_pretty(&definition).map_err(|e| ClientError::Json {
        context: "form definition".into(),
        source: e,
    })?;
    println!("{}", json);
    for button in &definition.buttons {
        let target = button.target().map(|t| t.name()).unwrap_or("-");
        println!("button {:?} '{}' -> {}", button.position, button.name, target);
    }
    Ok(())
}

/// Fetch a single form definition outside of a session.
pub fn fetch_form<D: Dispatcher>(
    dispatcher: &D,
    base_url: &str,
    form: &str,
    token: Option<&str>,
) -> Result<FormDefinition, ClientError> {
    let mut nav = Navigator::with_login_form(base_url, FormIdentity::new(form));
    if let Some(token) = token {
        nav.apply(Transition::CredentialIssued(token.to_string()));
    }

    match nav.load_form(dispatcher) {
        Some(FetchOutcome::Applied) => nav
            .form()
            .cloned()
            .ok_or_else(|| ClientError::NoForm(form.to_string())),
        Some(FetchOutcome::Displayed(message)) => Err(ClientError::Server(message)),
        Some(FetchOutcome::Reauthenticate) => {
            Err(ClientError::Server("credential rejected".into()))
        }
        Some(FetchOutcome::NoForm) => {
            Err(ClientError::NoForm(format!("{}: reply carried no form", form)))
        }
        Some(FetchOutcome::Transport) => {
            Err(ClientError::NoForm(format!("{}: transport failure", form)))
        }
        Some(FetchOutcome::Stale) | None => Err(ClientError::NoForm(form.to_string())),
    }
}

// ============================================================================
// method subcommand
// ============================================================================

pub fn cmd_method(name: &str) {
    println!("{}", derive_method_name(name));
}
