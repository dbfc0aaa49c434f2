use std::collections::HashMap;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

use super::status::Status;
use crate::constants::BUFFER_SIZE;

pub struct Response<'r> {
  pub status: Status,
  pub keep_alive: bool, // flag to tell the server to keep alive after responding
  pub headers: HashMap<String, String>,
  pub message_body: Option<Pin<Box<dyn AsyncBufRead + 'r + Send>>>,
}

#[derive(Debug)]
pub enum ResponseError {
  ReadError, // error reading from message body
  WriteError,
}

impl<'r> Response<'r> {
  pub fn from_status(status: Status) -> Response<'r> {
    return Response {
      status: status,
      keep_alive: true,
      headers: HashMap::new(),
      message_body: None,
    };
  }

  // create an empty response for a status code.
  // codes outside the standard table get an empty reason phrase,
  // the catalog is never asked to make one up
  pub fn from_code(code: u16) -> Response<'r> {
    let status = match Status::from_code(code) {
      Some(status) => status,
      None => Status::custom(code, String::new()),
    };
    return Response::from_status(status);
  }

  pub async fn respond<W>(&mut self, buf_writer: &mut BufWriter<W>) -> Result<(), ResponseError>
  where
    W: AsyncWrite + Unpin,
  {
    // write the status line
    let status_line = format!("HTTP/1.1 {} {}\r\n", self.status.code, self.status.reason);
    buf_writer
      .write_all(status_line.as_bytes())
      .await
      .map_err(|_error| ResponseError::WriteError)?;

    // reconcile the connection header with the keep-alive flag
    let connection = if self.keep_alive { "keep-alive" } else { "close" };
    self
      .headers
      .insert("Connection".to_owned(), connection.to_owned());

    // write the response headers
    for (key, val) in self.headers.iter() {
      let header = format!("{}: {}\r\n", key, val);
      buf_writer
        .write_all(header.as_bytes())
        .await
        .map_err(|_error| ResponseError::WriteError)?;
    }

    // headers end with an empty line
    buf_writer
      .write_all(b"\r\n")
      .await
      .map_err(|_error| ResponseError::WriteError)?;

    // write the message body
    if let Some(body_reader) = &mut self.message_body {
      // iterate through message_body until it's empty
      let mut buf = [0u8; BUFFER_SIZE];
      loop {
        match body_reader.read(&mut buf).await {
          Ok(0) => break,
          Ok(size) => match buf_writer.write_all(&buf[0..size]).await {
            Ok(_) => {}
            Err(_error) => return Err(ResponseError::WriteError),
          },
          Err(_error) => return Err(ResponseError::ReadError),
        }
      }
    }

    // flush the stream
    match buf_writer.flush().await {
      Ok(_) => return Ok(()),
      Err(_error) => return Err(ResponseError::WriteError),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  #[tokio::test]
  async fn writes_status_line_and_body() {
    let mut response = Response::from_code(200);
    let bytes = b"hello".to_vec();
    response
      .headers
      .insert("Content-Length".to_owned(), bytes.len().to_string());
    response.message_body = Some(Box::pin(Cursor::new(bytes)));

    let mut buf_writer = BufWriter::new(Vec::new());
    response.respond(&mut buf_writer).await.unwrap();
    let written = String::from_utf8(buf_writer.into_inner()).unwrap();
    assert!(written.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(written.contains("Content-Length: 5\r\n"));
    assert!(written.contains("Connection: keep-alive\r\n"));
    assert!(written.ends_with("\r\n\r\nhello"));
  }

  #[tokio::test]
  async fn close_flag_writes_close_header() {
    let mut response = Response::from_code(404);
    response.keep_alive = false;
    let mut buf_writer = BufWriter::new(Vec::new());
    response.respond(&mut buf_writer).await.unwrap();
    let written = String::from_utf8(buf_writer.into_inner()).unwrap();
    assert!(written.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(written.contains("Connection: close\r\n"));
  }

  #[tokio::test]
  async fn unknown_code_gets_empty_reason() {
    let mut response = Response::from_code(499);
    let mut buf_writer = BufWriter::new(Vec::new());
    response.respond(&mut buf_writer).await.unwrap();
    let written = String::from_utf8(buf_writer.into_inner()).unwrap();
    assert!(written.starts_with("HTTP/1.1 499 \r\n"));
  }
}
