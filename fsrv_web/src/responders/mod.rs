pub mod file;
pub mod listing;
pub mod static_message;

use async_trait::async_trait;

use super::request::Request;
use super::response::Response;
use super::status::Status;
use super::validation::{Validation, ValidationResult};

#[async_trait]
pub trait Responder: Send + Sync {
  // tests if the request is worth responding to.
  // whatever gets stashed here is handed back to build_response
  fn validate(&self, _request: &Request, _params: &[(String, String)]) -> ValidationResult {
    Ok(None)
  }

  // NOTE: Request is mutable!  Mostly this is so the message body reader can be read from.
  async fn build_response<'r>(
    &self,
    request: &mut Request<'r>,
    params: &[(String, String)],
    validation: Validation,
  ) -> Result<Response<'r>, Status>;
}

// route params come in as a small list, not a map
pub fn param<'p>(params: &'p [(String, String)], name: &str) -> Option<&'p str> {
  params
    .iter()
    .find(|(key, _)| key == name)
    .map(|(_, value)| value.as_str())
}
