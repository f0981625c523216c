use serde_json::Value;

use crate::{
    api::{
        dispatcher::Dispatcher,
        envelope::{ResponseEnvelope, submit_body},
        error::DispatchError,
        translator::{Translation, classify},
    },
    form::method_name::derive_method_name,
    hook::hook::HookRunner,
    state::{
        navigator::Navigator,
        router::{RouteOutcome, route},
        state_model::Transition,
    },
};

/// An action submit ready to send.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub method: String,
    pub path: String,
    pub body: Value,
    pub credential: Option<String>,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Routed(RouteOutcome),
    Reauthenticate,
    Displayed(String),
    /// Network, setup or decode failure; logged only
    Transport,
}

impl Navigator {
    /// Take the in-flight data and wrap it under the active form's method name.
    ///
    /// `None` without data, or while another submit is outstanding.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.is_submitting() {
            tracing::debug!("submit ignored, another submit is outstanding");
            return None;
        }
        let data = self.state().in_flight_data.clone()?;

        let method = derive_method_name(self.active_form().name());
        let request = SubmitRequest {
            body: submit_body(&method, data),
            path: self.session().base_path.clone(),
            credential: self.session().credential.clone(),
            method,
        };
        tracing::info!(method = %request.method, "api_call");
        self.apply(Transition::SubmitStarted);
        Some(request)
    }

    pub fn complete_submit(
        &mut self,
        result: Result<Value, DispatchError>,
        hooks: &HookRunner,
    ) -> SubmitOutcome {
        match result {
            Ok(value) => {
                self.apply(Transition::SubmitSettled { ok: true });
                match ResponseEnvelope::from_value(value) {
                    Ok(envelope) => SubmitOutcome::Routed(route(self, hooks, envelope)),
                    Err(e) => {
                        tracing::warn!(error = %e, "submit reply not understood");
                        SubmitOutcome::Transport
                    }
                }
            }

            Err(DispatchError::Http { status, body }) => {
                tracing::info!(status, body = %body, "ApiError");
                self.apply(Transition::SubmitSettled { ok: false });
                match classify(status, &body) {
                    Translation::Reauthenticate => {
                        self.apply(Transition::Reauthenticate);
                        SubmitOutcome::Reauthenticate
                    }
                    Translation::DisplayMessage(message) => {
                        self.apply(Transition::ErrorRaised(message.clone()));
                        SubmitOutcome::Displayed(message)
                    }
                }
            }

            Err(e) => {
                tracing::warn!(error = %e, "submit failed in transport");
                self.apply(Transition::SubmitSettled { ok: false });
                SubmitOutcome::Transport
            }
        }
    }

    /// Submit the in-flight data synchronously. `None` when there was nothing to submit.
    pub fn submit<D: Dispatcher>(
        &mut self,
        dispatcher: &D,
        hooks: &HookRunner,
    ) -> Option<SubmitOutcome> {
        let request = self.begin_submit()?;
        Some(self.send_submit(dispatcher, request, hooks))
    }

    pub fn send_submit<D: Dispatcher>(
        &mut self,
        dispatcher: &D,
        request: SubmitRequest,
        hooks: &HookRunner,
    ) -> SubmitOutcome {
        let result = dispatcher.send(&request.path, &request.body, request.credential.as_deref());
        self.complete_submit(result, hooks)
    }
}
