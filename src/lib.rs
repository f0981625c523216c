use crate::{
    api::{dispatcher::Dispatcher, error::ClientError},
    form::form_model::ButtonKind,
    hook::hook::{HookHandle, HookRunner},
    render::{
        renderer::{FormRenderer, UserAction},
        validator::ValidatorRegistry,
    },
    state::{navigator::Navigator, state_model::Transition, submitter::SubmitOutcome},
};

pub mod api;
pub mod cli;
pub mod form;
pub mod hook;
pub mod render;
pub mod state;
pub mod trace;

/// Drive a navigator until the user quits.
///
/// Each turn fetches the active form if one is due, renders the current
/// definition, and applies the user's action. Post-processor runs started
/// along the way are awaited before returning.
pub fn run_session<D: Dispatcher, R: FormRenderer>(
    nav: &mut Navigator,
    dispatcher: &D,
    hooks: &HookRunner,
    registry: &ValidatorRegistry,
    renderer: &mut R,
) -> Result<(), ClientError> {
    let mut pending: Vec<HookHandle> = Vec::new();

    let result = loop {
        if let Some(outcome) = nav.load_form(dispatcher) {
            tracing::debug!(?outcome, "form fetch settled");
            continue;
        }

        // Nothing due and nothing loaded: the first fetch failed.
        let Some(form) = nav.form().cloned() else {
            let reason = nav
                .active_error()
                .unwrap_or("initial form fetch failed")
                .to_string();
            break Err(ClientError::NoForm(reason));
        };

        let validators = registry.resolve(&form.schema);
        let data = nav.state().in_flight_data.clone();
        renderer.render(&form, data.as_ref(), nav.active_error(), &validators)?;

        match renderer.next_action(&form, data.as_ref(), &validators)? {
            UserAction::Edit(values) => nav.set_data(Some(values)),
            UserAction::Click(button) => match nav.click(&button) {
                Some(request) => match nav.send_submit(dispatcher, request, hooks) {
                    SubmitOutcome::Routed(routed) => pending.extend(routed.hook),
                    other => tracing::debug!(?other, "submit settled"),
                },
                None if button.kind == ButtonKind::Submit => {
                    tracing::info!(button = %button.name, "nothing to submit");
                }
                None => {}
            },
            UserAction::Reload => {
                nav.apply(Transition::ReloadRequested);
            }
            UserAction::Quit => break Ok(()),
        }

        let (done, running): (Vec<_>, Vec<_>) = pending.drain(..).partition(|h| h.is_finished());
        for handle in done {
            handle.wait();
        }
        pending = running;
    };

    for handle in pending {
        handle.wait();
    }
    result
}
