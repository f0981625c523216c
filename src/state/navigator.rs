use serde_json::Value;

use crate::{
    api::translator::Translation,
    form::form_model::{ButtonKind, ButtonSpec, FormDefinition, FormIdentity},
    state::{
        identity::{FetchTag, FetchTicket},
        state_model::{NavigationState, Phase, SessionState, Transition},
        submitter::SubmitRequest,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Owns which form is active, the session it is fetched under, and the
/// definition currently shown.
///
/// All state changes go through [`Navigator::apply`], which is also where
/// stale fetch results are discarded.
pub struct Navigator {
    session: SessionState,
    nav: NavigationState,
    login_form: FormIdentity,
    form: Option<FormDefinition>,

    submitting: bool,
    next_seq: u64,
    last_applied_seq: u64,
    // Tag of the last fetch handed out; the loader does not re-issue it.
    last_issued: Option<FetchTag>,

    step: u64,
    tracer: TraceLogger,
}

impl Navigator {
    /// Start on the well-known login form.
    pub fn new(base_url: &str) -> Self {
        Self::with_login_form(base_url, FormIdentity::login())
    }

    pub fn with_login_form(base_url: &str, login_form: FormIdentity) -> Self {
        Self {
            session: SessionState::new(base_url),
            nav: NavigationState::new(login_form.clone()),
            login_form,
            form: None,
            submitting: false,
            next_seq: 1,
            last_applied_seq: 0,
            last_issued: None,
            step: 0,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> &NavigationState {
        &self.nav
    }

    pub fn active_form(&self) -> &FormIdentity {
        &self.nav.active_form
    }

    pub fn login_form(&self) -> &FormIdentity {
        &self.login_form
    }

    /// Last successfully loaded definition; kept visible while an error is shown.
    pub fn form(&self) -> Option<&FormDefinition> {
        self.form.as_ref()
    }

    pub fn active_error(&self) -> Option<&str> {
        self.nav.active_error.as_deref()
    }

    pub fn is_erroring(&self) -> bool {
        self.nav.active_error.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// `AwaitingForm` only while a fetch is due or nothing has loaded yet; a
    /// settled fetch that left `needs_reload` set keeps the shown form ready.
    pub fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if self.fetch_pending() || self.form.is_none() {
            Phase::AwaitingForm
        } else {
            Phase::FormReady
        }
    }

    pub fn current_tag(&self) -> FetchTag {
        FetchTag::capture(&self.nav.active_form, &self.session)
    }

    /// Record data emitted by the form renderer.
    pub fn set_data(&mut self, data: Option<Value>) {
        self.apply(Transition::DataChanged(data));
    }

    /// React to a button press. A submit button yields the request to send;
    /// a navigate button switches forms without any request.
    pub fn click(&mut self, button: &ButtonSpec) -> Option<SubmitRequest> {
        match &button.kind {
            ButtonKind::Submit => self.begin_submit(),
            ButtonKind::Navigate(target) => {
                tracing::info!(button = %button.name, target = target.name(), "goto form");
                self.apply(Transition::Navigate(target.clone()));
                None
            }
        }
    }

    pub(crate) fn issue_ticket(&mut self) -> FetchTicket {
        let ticket = FetchTicket {
            seq: self.next_seq,
            tag: self.current_tag(),
        };
        self.next_seq += 1;
        ticket
    }

    pub(crate) fn fetch_pending(&self) -> bool {
        self.nav.needs_reload && self.last_issued.as_ref() != Some(&self.current_tag())
    }

    fn is_fresh(&self, ticket: &FetchTicket) -> bool {
        ticket.tag == self.current_tag() && ticket.seq > self.last_applied_seq
    }

    fn rearm(&mut self) {
        self.nav.needs_reload = true;
        self.last_issued = None;
    }

    /// Apply one transition. Returns `false` when it was discarded, which
    /// only happens to fetch results that no longer match the current state.
    pub fn apply(&mut self, transition: Transition) -> bool {
        let name = transition.name();
        let mut detail: Option<String> = None;

        let applied = match transition {
            Transition::Navigate(target) => {
                self.nav.active_form = target;
                self.rearm();
                true
            }

            Transition::SessionUpdated {
                library_path,
                next_form,
            } => {
                self.session.base_path = self.session.library_path(&library_path);
                self.nav.active_form = next_form;
                self.rearm();
                detail = Some(self.session.base_path.clone());
                true
            }

            Transition::CredentialIssued(token) => {
                if self.session.credential.as_deref() != Some(token.as_str()) {
                    self.session.credential = Some(token);
                    self.rearm();
                }
                true
            }

            Transition::Reauthenticate => {
                let before = self.current_tag();
                self.session.credential = None;
                self.session.base_path = self.session.base_url.clone();
                self.nav.active_form = self.login_form.clone();
                self.nav.needs_reload = true;
                // Re-arming an unchanged tag would refetch the same rejected request forever.
                if self.current_tag() != before {
                    self.last_issued = None;
                }
                true
            }

            Transition::ReloadRequested => {
                self.rearm();
                true
            }

            Transition::FetchIssued(ticket) => {
                detail = Some(format!("seq {}", ticket.seq));
                self.last_issued = Some(ticket.tag);
                true
            }

            Transition::FormLoaded { ticket, form } => {
                detail = Some(format!("seq {}", ticket.seq));
                if self.is_fresh(&ticket) {
                    self.form = Some(form);
                    self.nav.needs_reload = false;
                    self.nav.active_error = None;
                    self.last_applied_seq = ticket.seq;
                    true
                } else {
                    false
                }
            }

            Transition::FetchFailed {
                ticket,
                translation,
            } => {
                detail = Some(format!("seq {}", ticket.seq));
                if self.is_fresh(&ticket) {
                    match translation {
                        Translation::Reauthenticate => {
                            return self.apply(Transition::Reauthenticate);
                        }
                        Translation::DisplayMessage(message) => {
                            self.nav.active_error = Some(message);
                        }
                    }
                    true
                } else {
                    false
                }
            }

            Transition::DataChanged(data) => {
                self.nav.in_flight_data = data;
                true
            }

            Transition::SubmitStarted => {
                self.submitting = true;
                self.nav.in_flight_data = None;
                true
            }

            Transition::SubmitSettled { ok } => {
                self.submitting = false;
                if ok {
                    self.nav.in_flight_data = None;
                    self.nav.active_error = None;
                }
                true
            }

            Transition::ErrorRaised(message) => {
                detail = Some(message.clone());
                self.nav.active_error = Some(message);
                true
            }
        };

        self.trace(name, applied, detail);
        applied
    }

    fn trace(&mut self, name: &str, applied: bool, detail: Option<String>) {
        let form = self.nav.active_form.name().to_string();
        if applied {
            tracing::debug!(transition = name, form = %form, phase = ?self.phase(), "transition");
        } else {
            tracing::debug!(transition = name, form = %form, "discarded stale result");
        }

        if self.tracer.is_enabled() {
            let mut event = TraceEvent::now(self.step, self.phase(), name, &form);
            event = match (applied, detail) {
                (false, Some(d)) => event.with_detail(format!("discarded {}", d)),
                (false, None) => event.with_detail("discarded"),
                (true, Some(d)) => event.with_detail(d),
                (true, None) => event,
            };
            self.tracer.log(&event);
        }
        self.step += 1;
    }
}
