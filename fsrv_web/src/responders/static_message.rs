use std::io::Cursor;

use async_trait::async_trait;

use super::Request;
use super::Responder;
use super::Response;
use super::Status;
use super::{Validation, ValidationResult};

#[derive(Clone)]
pub struct StaticResponder {
  status_code: u16,
  message: String,
}

impl StaticResponder {
  pub fn new(status_code: u16, message: String) -> StaticResponder {
    StaticResponder {
      status_code: status_code,
      message: message,
    }
  }

  pub fn from_status(status: Status) -> StaticResponder {
    StaticResponder {
      status_code: status.code,
      message: status.reason,
    }
  }

  // standard codes respond with their catalog phrase as the body.
  // anything else responds with an empty body, nothing gets made up
  pub fn from_code(code: u16) -> StaticResponder {
    let status = match Status::from_code(code) {
      Some(status) => status,
      None => Status::custom(code, String::new()),
    };
    return StaticResponder::from_status(status);
  }

  // builds the response without going through the responder machinery.
  // the server uses this for its own error responses
  pub fn quick_response(&self) -> Response<'static> {
    let bytes = self.message.clone().into_bytes();
    let mut response = Response::from_code(self.status_code);
    response
      .headers
      .insert("Content-Length".to_owned(), bytes.len().to_string());
    response
      .headers
      .insert("Content-Type".to_owned(), "text/plain; charset=utf-8".to_owned());
    response.message_body = Some(Box::pin(Cursor::new(bytes)));
    return response;
  }
}

#[async_trait]
impl Responder for StaticResponder {
  fn validate(&self, _request: &Request, _params: &[(String, String)]) -> ValidationResult {
    Ok(None)
  }

  async fn build_response<'r>(
    &self,
    _request: &mut Request<'r>,
    _params: &[(String, String)],
    _validation: Validation,
  ) -> Result<Response<'r>, Status> {
    return Ok(self.quick_response());
  }
}
