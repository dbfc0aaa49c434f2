use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use super::param;
use super::Request;
use super::Responder;
use super::Response;
use super::Status;
use super::{Validation, ValidationResult};

use super::file::FileResponderError;

// one row of a directory listing
#[derive(Serialize)]
struct ListingEntry {
  name: String,
  size: u64,
  is_dir: bool,
}

pub struct ListingResponder {
  mount_point: PathBuf,
  path_param: String,
}

impl ListingResponder {
  pub fn new(
    mount_point: String,
    path_param: String,
  ) -> Result<ListingResponder, FileResponderError> {
    let mount_point = PathBuf::from(mount_point);
    match mount_point.canonicalize() {
      Ok(abs_path) => Ok(ListingResponder {
        mount_point: abs_path,
        path_param: path_param,
      }),
      Err(_error) => return Err(FileResponderError::BadPath),
    }
  }

  // same containment rule as the file responder: anything that
  // resolves outside the mount point is a plain 404
  fn resolve(&self, params: &[(String, String)]) -> Result<PathBuf, Status> {
    let path_string = match param(params, &self.path_param) {
      Some(path_string) => path_string,
      None => return Err(Status::internal_server_error()),
    };
    let mut dir_path = self.mount_point.clone();
    dir_path.push(path_string.trim_start_matches('/'));
    match dir_path.canonicalize() {
      Ok(abs_dir_path) => {
        if abs_dir_path.starts_with(&self.mount_point) {
          return Ok(abs_dir_path);
        }
        return Err(Status::not_found());
      }
      Err(_error) => return Err(Status::not_found()),
    }
  }
}

#[async_trait]
impl Responder for ListingResponder {
  fn validate(&self, _request: &Request, params: &[(String, String)]) -> ValidationResult {
    let dir_path = self.resolve(params)?;
    if dir_path.is_dir() {
      return Ok(Some(Box::new(dir_path)));
    }
    return Err(Status::not_found()); // only directories get listed
  }

  async fn build_response<'r>(
    &self,
    _request: &mut Request<'r>,
    _params: &[(String, String)],
    validation: Validation,
  ) -> Result<Response<'r>, Status> {
    let dir_path = match validation.and_then(|stashed| stashed.downcast::<PathBuf>().ok()) {
      Some(dir_path) => *dir_path,
      None => return Err(Status::internal_server_error()),
    };

    let mut entries = Vec::<ListingEntry>::new();
    let mut read_dir = match tokio::fs::read_dir(&dir_path).await {
      Ok(read_dir) => read_dir,
      Err(_error) => return Err(Status::internal_server_error()),
    };
    loop {
      match read_dir.next_entry().await {
        Ok(Some(entry)) => {
          let meta = match entry.metadata().await {
            Ok(meta) => meta,
            Err(_error) => continue, // the entry went away mid-listing
          };
          entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            is_dir: meta.is_dir(),
          });
        }
        Ok(None) => break,
        Err(_error) => return Err(Status::internal_server_error()),
      }
    }
    // listings should come out the same way every time
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let body = match serde_json::to_string(&entries) {
      Ok(body) => body.into_bytes(),
      Err(_error) => return Err(Status::internal_server_error()),
    };
    let mut response = Response::from_status(Status::ok());
    response
      .headers
      .insert("Content-Length".to_owned(), body.len().to_string());
    response.headers.insert(
      "Content-Type".to_owned(),
      "application/json; charset=utf-8".to_owned(),
    );
    response.message_body = Some(Box::pin(Cursor::new(body)));
    return Ok(response);
  }
}
