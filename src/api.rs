use crate::error::HandlerError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::any::Any;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        ErrorResponse {
            error: msg.to_owned(),
        }
    }
}

/// An unexpected failure while serving a request.
#[derive(Debug, Serialize)]
pub struct Fault {
    #[serde(skip)]
    pub message: String,
    pub kind: &'static str,
    pub causes: Vec<String>,
}

impl Fault {
    pub fn from_error(err: &HandlerError) -> Self {
        let mut causes = Vec::new();
        let mut current = std::error::Error::source(err);
        while let Some(source) = current {
            causes.push(source.to_string());
            current = source.source();
        }

        Fault {
            message: err.to_string(),
            kind: err.kind(),
            causes,
        }
    }

    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };

        Fault {
            message,
            kind: "panic",
            causes: vec![],
        }
    }
}

/// Turns faults into the final 500 response.
///
/// With `expose_internals` off (production) the body is always
/// `{"error": {"message": "server error"}}`. Otherwise the fault message and
/// the fault itself are returned to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ErrorResponder {
    expose_internals: bool,
}

impl ErrorResponder {
    pub fn new(expose_internals: bool) -> Self {
        Self { expose_internals }
    }

    pub fn respond(&self, fault: Fault) -> Response {
        tracing::error!(kind = fault.kind, causes = ?fault.causes, "{}", fault.message);

        let body = if self.expose_internals {
            json!({ "message": fault.message, "error": fault })
        } else {
            json!({ "error": { "message": "server error" } })
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }

    pub fn respond_to_error(&self, err: HandlerError) -> Response {
        self.respond(Fault::from_error(&err))
    }

    pub fn respond_to_panic(&self, payload: Box<dyn Any + Send + 'static>) -> Response {
        self.respond(Fault::from_panic(payload))
    }
}
