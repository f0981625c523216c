use std::{cell::RefCell, collections::VecDeque};

use forms_client::api::{dispatcher::Dispatcher, error::DispatchError};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub path: String,
    pub body: Value,
    pub credential: Option<String>,
}

/// Replays queued results in order and records every request sent.
#[derive(Default)]
pub struct MockDispatcher {
    replies: RefCell<VecDeque<Result<Value, DispatchError>>>,
    sent: RefCell<Vec<SentRequest>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.replies.borrow_mut().push_back(Ok(value));
        self
    }

    pub fn fail(self, error: DispatchError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.borrow().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Dispatcher for MockDispatcher {
    fn send(
        &self,
        path: &str,
        body: &Value,
        credential: Option<&str>,
    ) -> Result<Value, DispatchError> {
        self.sent.borrow_mut().push(SentRequest {
            path: path.to_string(),
            body: body.clone(),
            credential: credential.map(str::to_string),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(DispatchError::Setup {
                    path: path.to_string(),
                    message: "mock has no reply queued".into(),
                })
            })
    }
}
