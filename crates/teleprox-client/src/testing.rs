//! Test doubles shared by the session and proxy tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use teleprox_protocol::{ErrorObject, ProtocolResult, Request, Response};

use crate::transport::MessageChannel;

/// A canned reply for one exchange on a [`ScriptedChannel`].
pub enum Reply {
    /// Answer with this result, echoing the request id.
    Result(Value),
    /// Answer with this error, echoing the request id.
    Error(ErrorObject),
    /// Answer with a result under a different id.
    WrongId(&'static str),
}

/// In-memory channel that records the methods it sees and answers each
/// exchange from a scripted queue.
pub struct ScriptedChannel {
    replies: VecDeque<Reply>,
    methods: Arc<Mutex<Vec<String>>>,
    pending_id: Option<String>,
}

impl ScriptedChannel {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            methods: Arc::new(Mutex::new(Vec::new())),
            pending_id: None,
        }
    }

    /// Shared handle to the log of method names, in call order.
    pub fn method_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.methods)
    }
}

impl MessageChannel for ScriptedChannel {
    fn send(&mut self, message: &[u8]) -> ProtocolResult<()> {
        let request: Request = serde_json::from_slice(message)?;
        self.methods.lock().unwrap().push(request.method);
        self.pending_id = Some(request.id);
        Ok(())
    }

    fn recv(&mut self) -> ProtocolResult<Vec<u8>> {
        let id = self.pending_id.take().expect("recv without a send");
        let response = match self.replies.pop_front().expect("script exhausted") {
            Reply::Result(value) => Response::success(id, value),
            Reply::Error(error) => Response::failure(id, error),
            Reply::WrongId(other) => Response::success(other, Value::Null),
        };
        Ok(serde_json::to_vec(&response)?)
    }
}
