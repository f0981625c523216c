use crate::{
    api::envelope::{Payload, ResponseEnvelope},
    hook::hook::{HookHandle, HookRunner},
    state::{navigator::Navigator, state_model::Transition},
};

/// What routing a submit reply did. Branches are independent and may co-occur.
#[derive(Debug, Default)]
pub struct RouteOutcome {
    pub credential_updated: bool,
    pub navigated: bool,
    pub hook: Option<HookHandle>,
}

/// Apply every branch a response envelope calls for, in order: credential,
/// post-processing hook, then session update.
pub fn route(nav: &mut Navigator, hooks: &HookRunner, envelope: ResponseEnvelope) -> RouteOutcome {
    let mut outcome = RouteOutcome::default();

    match envelope.payload {
        Some(Payload::LoginResult { token }) => {
            nav.apply(Transition::CredentialIssued(token));
            outcome.credential_updated = true;
        }
        Some(Payload::App { kind, body }) => {
            outcome.hook = hooks.dispatch(&kind, body);
        }
        Some(Payload::FormDefinition(_)) => {
            tracing::debug!("form definition in submit reply ignored");
        }
        None => {}
    }

    if let Some(update) = envelope.session_update {
        tracing::info!(
            library = %update.library_path,
            form = update.next_form.name(),
            "session update"
        );
        nav.apply(Transition::SessionUpdated {
            library_path: update.library_path,
            next_form: update.next_form,
        });
        outcome.navigated = true;
    }

    outcome
}
