use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader};

use crate::constants::{DEFAULT_MIME_TYPES, MIME_OCTET_STREAM};

use super::param;
use super::Request;
use super::Responder;
use super::Response;
use super::Status;
use super::{Validation, ValidationResult};

#[derive(Clone)]
pub struct FileResponder {
  mount_point: PathBuf,
  path_param: String, // the route parameter that provides the file path relative to the mount point
  use_index: bool,
}

#[derive(Debug)]
pub enum FileResponderError {
  BadPath,
}

// what the range header asks for, after clamping against the file size
enum ByteRange {
  Full,
  Slice { start: u64, length: u64 },
  Unsatisfiable,
}

impl FileResponder {
  pub fn new(
    mount_point: String,
    path_param: String,
    use_index: bool,
  ) -> Result<FileResponder, FileResponderError> {
    let mount_point = PathBuf::from(mount_point);
    match mount_point.canonicalize() {
      Ok(abs_path) => Ok(FileResponder {
        mount_point: abs_path,
        path_param: path_param,
        use_index: use_index,
      }),
      Err(_error) => return Err(FileResponderError::BadPath),
    }
  }

  // resolves the route param against the mount point.
  // the canonicalized result must stay inside the mount point,
  // so traversal requests come out as a plain 404
  fn resolve(&self, params: &[(String, String)]) -> Result<PathBuf, Status> {
    let path_string = match param(params, &self.path_param) {
      Some(path_string) => path_string,
      None => return Err(Status::internal_server_error()), // no path provided
    };
    let mut file_path = self.mount_point.clone();
    file_path.push(path_string.trim_start_matches('/'));
    match file_path.canonicalize() {
      Ok(abs_file_path) => {
        if abs_file_path.starts_with(&self.mount_point) {
          return Ok(abs_file_path);
        }
        return Err(Status::not_found()); // not in the mounted directory
      }
      Err(_error) => return Err(Status::not_found()), // not found or failed to canonicalize
    }
  }
}

#[async_trait]
impl Responder for FileResponder {
  // tests if the provided path exists, and stashes the resolved file
  // so build_response doesn't walk the directory tree again
  fn validate(&self, _request: &Request, params: &[(String, String)]) -> ValidationResult {
    let file_path = self.resolve(params)?;
    if file_path.is_file() {
      return Ok(Some(Box::new(file_path)));
    }
    if self.use_index && file_path.is_dir() {
      // check for index.html or index.htm
      for index in &["index.html", "index.htm"] {
        let candidate = file_path.join(index);
        if candidate.is_file() {
          return Ok(Some(Box::new(candidate)));
        }
      }
    }
    return Err(Status::not_found()); // directory without an index, or not a file at all
  }

  async fn build_response<'r>(
    &self,
    request: &mut Request<'r>,
    _params: &[(String, String)],
    validation: Validation,
  ) -> Result<Response<'r>, Status> {
    let file_path = match validation.and_then(|stashed| stashed.downcast::<PathBuf>().ok()) {
      Some(file_path) => *file_path,
      None => return Err(Status::internal_server_error()), // validation didn't run
    };

    let meta = match tokio::fs::metadata(&file_path).await {
      Ok(meta) => meta,
      Err(_error) => return Err(Status::internal_server_error()),
    };
    let total_size = meta.len();
    let mime_type = mime_for(&file_path);

    let range = match request.header("range") {
      Some(value) => parse_range(value, total_size),
      None => ByteRange::Full,
    };

    match range {
      ByteRange::Full => {
        let file = match File::open(&file_path).await {
          Ok(file) => file,
          Err(_error) => return Err(Status::internal_server_error()),
        };
        let mut response = Response::from_status(Status::ok());
        response
          .headers
          .insert("Content-Length".to_owned(), total_size.to_string());
        response
          .headers
          .insert("Content-Type".to_owned(), mime_type.to_owned());
        response
          .headers
          .insert("Accept-Ranges".to_owned(), "bytes".to_owned());
        response.message_body = Some(Box::pin(BufReader::new(file)));
        return Ok(response);
      }
      ByteRange::Slice { start, length } => {
        let mut file = match File::open(&file_path).await {
          Ok(file) => file,
          Err(_error) => return Err(Status::internal_server_error()),
        };
        if file.seek(SeekFrom::Start(start)).await.is_err() {
          return Err(Status::internal_server_error());
        }
        let end = start + length - 1;
        let mut response = Response::from_status(Status::partial_content());
        response
          .headers
          .insert("Content-Length".to_owned(), length.to_string());
        response.headers.insert(
          "Content-Range".to_owned(),
          format!("bytes {}-{}/{}", start, end, total_size),
        );
        response
          .headers
          .insert("Content-Type".to_owned(), mime_type.to_owned());
        response.message_body = Some(Box::pin(BufReader::new(file.take(length))));
        return Ok(response);
      }
      ByteRange::Unsatisfiable => {
        let mut response = Response::from_status(Status::range_not_satisfiable());
        response
          .headers
          .insert("Content-Length".to_owned(), "0".to_owned());
        response.headers.insert(
          "Content-Range".to_owned(),
          format!("bytes */{}", total_size),
        );
        return Ok(response);
      }
    }
  }
}

fn mime_for(path: &Path) -> &'static str {
  match path.extension().and_then(|ext| ext.to_str()) {
    Some(ext) => {
      let ext = ext.to_lowercase();
      for (known, mime_type) in DEFAULT_MIME_TYPES.iter() {
        if *known == ext {
          return mime_type;
        }
      }
      return MIME_OCTET_STREAM;
    }
    None => return MIME_OCTET_STREAM,
  }
}

// single ranges only. multi-range and anything malformed
// falls back to a full response instead of guessing
fn parse_range(header: &str, total_size: u64) -> ByteRange {
  let spec = match header.strip_prefix("bytes=") {
    Some(spec) => spec.trim(),
    None => return ByteRange::Full,
  };
  if spec.contains(',') {
    return ByteRange::Full;
  }
  let mut parts = spec.splitn(2, '-');
  let start_text = match parts.next() {
    Some(text) => text,
    None => return ByteRange::Full,
  };
  let end_text = match parts.next() {
    Some(text) => text,
    None => return ByteRange::Full, // no dash at all
  };

  if start_text.is_empty() {
    // suffix range: the last n bytes
    let suffix = match end_text.parse::<u64>() {
      Ok(suffix) => suffix,
      Err(_error) => return ByteRange::Full,
    };
    if suffix == 0 || total_size == 0 {
      return ByteRange::Unsatisfiable;
    }
    let length = if suffix > total_size { total_size } else { suffix };
    return ByteRange::Slice {
      start: total_size - length,
      length: length,
    };
  }

  let start = match start_text.parse::<u64>() {
    Ok(start) => start,
    Err(_error) => return ByteRange::Full,
  };
  if start >= total_size {
    return ByteRange::Unsatisfiable;
  }

  if end_text.is_empty() {
    // open range: from start to the end of the file
    return ByteRange::Slice {
      start: start,
      length: total_size - start,
    };
  }

  let end = match end_text.parse::<u64>() {
    Ok(end) => end,
    Err(_error) => return ByteRange::Full,
  };
  if end < start {
    return ByteRange::Full;
  }
  let end = if end >= total_size { total_size - 1 } else { end };
  return ByteRange::Slice {
    start: start,
    length: end - start + 1,
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  fn slice(range: ByteRange) -> Option<(u64, u64)> {
    match range {
      ByteRange::Slice { start, length } => Some((start, length)),
      _ => None,
    }
  }

  #[test]
  fn plain_range() {
    assert_eq!(slice(parse_range("bytes=0-4", 11)), Some((0, 5)));
    assert_eq!(slice(parse_range("bytes=5-10", 11)), Some((5, 6)));
  }

  #[test]
  fn open_ended_range() {
    assert_eq!(slice(parse_range("bytes=6-", 11)), Some((6, 5)));
  }

  #[test]
  fn suffix_range() {
    assert_eq!(slice(parse_range("bytes=-4", 11)), Some((7, 4)));
    // a suffix longer than the file is the whole file
    assert_eq!(slice(parse_range("bytes=-100", 11)), Some((0, 11)));
  }

  #[test]
  fn end_clamps_to_file_size() {
    assert_eq!(slice(parse_range("bytes=5-100", 11)), Some((5, 6)));
  }

  #[test]
  fn start_past_end_is_unsatisfiable() {
    match parse_range("bytes=11-", 11) {
      ByteRange::Unsatisfiable => {}
      _ => panic!("range starting at the file size should be unsatisfiable"),
    }
    match parse_range("bytes=-0", 11) {
      ByteRange::Unsatisfiable => {}
      _ => panic!("zero-length suffix should be unsatisfiable"),
    }
  }

  #[test]
  fn malformed_ranges_fall_back_to_full() {
    for header in &["bytes=abc-def", "bytes=4", "lines=0-4", "bytes=0-1,3-4", "bytes=9-3"] {
      match parse_range(header, 11) {
        ByteRange::Full => {}
        _ => panic!("'{}' should fall back to a full response", header),
      }
    }
  }
}
