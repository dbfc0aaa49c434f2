use std::collections::HashMap;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::constants::{MAX_HEADERS_SIZE, MAX_REQUEST_LINE_SIZE};

pub struct Request<'r> {
    pub total_size: usize,
    pub method: String,
    pub uri: String,
    pub version: String,
    pub headers: Option<HashMap<String, String>>,
    pub message_body: Option<Pin<Box<dyn AsyncBufRead + 'r + Send + Sync>>>,
}

#[derive(Debug)]
pub enum RequestError {
    IOError(std::io::Error), // io error reading from stream
    MalformedRequestError, // generic error for un-parseable requests and requests that don't meet http standards
    MaxUriSizeError,       // request line is too large
    MaxHeaderSizeError,    // size of headers is too large
}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> RequestError {
        RequestError::IOError(err)
    }
}

impl<'r> Request<'r> {
    // reads the request line. headers and body are left for later so the
    // server can pick a route before committing to the rest of the stream
    pub async fn new<R>(buf_reader: &mut R) -> Result<Request<'r>, RequestError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let mut line = String::new();
        let mut line_reader = buf_reader.take(MAX_REQUEST_LINE_SIZE as u64);
        match line_reader.read_line(&mut line).await {
            Ok(0) => return Err(RequestError::MalformedRequestError), // read an empty line when expecting request line
            Ok(line_size) => {
                // read_line should contain the ending new line char.
                // otherwise we reached the end of Take without finding the real end of the request line
                if !line.ends_with('\n') {
                    return Err(RequestError::MaxUriSizeError);
                }

                // parse request line
                let parts = line.trim_end().splitn(3, ' ').collect::<Vec<&str>>();
                if parts.len() != 3 {
                    return Err(RequestError::MalformedRequestError);
                } // request line should only have 3 parts
                let method = parts[0].to_uppercase();
                let uri = parts[1].to_owned();
                let version = parts[2].to_owned();
                if uri.is_empty() || version.is_empty() {
                    return Err(RequestError::MalformedRequestError);
                }

                return Ok(Request {
                    total_size: line_size,
                    method: method,
                    uri: uri,
                    version: version,
                    headers: None,
                    message_body: None, // the server will assign an appropriate reader based on the request type
                });
            }
            Err(error) => return Err(RequestError::IOError(error)),
        }
    }

    // reads headers from the stream. this function expects to start reading
    // from the position immediately after the request line
    pub async fn parse_headers<R>(&mut self, buf_reader: &mut R) -> Result<(), RequestError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let (headers, headers_size) = read_headers(buf_reader).await?;
        self.total_size = self.total_size + headers_size;
        self.headers = Some(headers);
        Ok(())
    }

    pub fn set_message_body(
        &mut self,
        message_body: Option<Pin<Box<dyn AsyncBufRead + 'r + Send + Sync>>>,
    ) {
        self.message_body = message_body;
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        match &self.headers {
            Some(headers) => headers.get(name).map(|value| value.as_str()),
            None => None,
        }
    }
}

async fn read_headers<R>(
    buf_reader: &mut R,
) -> Result<(HashMap<String, String>, usize), RequestError>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut headers = HashMap::<String, String>::new();
    let reader = buf_reader.take(MAX_HEADERS_SIZE as u64);
    let mut lines = reader.lines();
    let mut terminated = false;
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            terminated = true;
            break;
        } // an empty line marks the end of http headers
        let parts = line.splitn(2, ':').collect::<Vec<&str>>(); // note: multiline headers were deprecated in rfc7230 so we won't support them
        if parts.len() == 2 {
            // field names are case-insensitive, so normalize them for lookups
            let field_name = parts[0].trim().to_lowercase();
            let field_value = parts[1].trim();
            if field_name.is_empty() {
                return Err(RequestError::MalformedRequestError);
            }
            match headers.get_mut(&field_name) {
                // http 1.1 rfc2616 says multiple headers with identical names can be combined with commas
                Some(existing_value) => {
                    existing_value.push(',');
                    existing_value.push_str(field_value);
                }
                None => {
                    headers.insert(field_name, field_value.to_owned());
                }
            };
        } else {
            return Err(RequestError::MalformedRequestError);
        }
    }

    let remaining = lines.into_inner().limit() as usize;
    if !terminated && remaining == 0 {
        return Err(RequestError::MaxHeaderSizeError);
    }

    return Ok((headers, MAX_HEADERS_SIZE - remaining));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn parses_request_line() {
        let mut reader = Cursor::new(&b"GET /files/a.txt HTTP/1.1\r\n"[..]);
        let request = Request::new(&mut reader).await.unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.uri, "/files/a.txt");
        assert_eq!(request.version, "HTTP/1.1");
    }

    #[tokio::test]
    async fn lowercases_method_input() {
        let mut reader = Cursor::new(&b"get / HTTP/1.1\r\n"[..]);
        let request = Request::new(&mut reader).await.unwrap();
        assert_eq!(request.method, "GET");
    }

    #[tokio::test]
    async fn rejects_short_request_line() {
        let mut reader = Cursor::new(&b"GET /\r\n"[..]);
        match Request::new(&mut reader).await {
            Err(RequestError::MalformedRequestError) => {}
            _ => panic!("two-part request line should be malformed"),
        }
    }

    #[tokio::test]
    async fn rejects_empty_stream() {
        let mut reader = Cursor::new(&b""[..]);
        assert!(Request::new(&mut reader).await.is_err());
    }

    #[tokio::test]
    async fn parses_headers_and_combines_duplicates() {
        let mut reader = Cursor::new(
            &b"GET / HTTP/1.1\r\nHost: localhost\r\nAccept: text/html\r\nAccept: text/plain\r\n\r\n"[..],
        );
        let mut request = Request::new(&mut reader).await.unwrap();
        request.parse_headers(&mut reader).await.unwrap();
        assert_eq!(request.header("host"), Some("localhost"));
        assert_eq!(request.header("accept"), Some("text/html,text/plain"));
    }

    #[tokio::test]
    async fn normalizes_header_name_case() {
        let mut reader = Cursor::new(&b"GET / HTTP/1.1\r\nContent-Length: 42\r\n\r\n"[..]);
        let mut request = Request::new(&mut reader).await.unwrap();
        request.parse_headers(&mut reader).await.unwrap();
        assert_eq!(request.header("content-length"), Some("42"));
    }

    #[tokio::test]
    async fn rejects_header_without_colon() {
        let mut reader = Cursor::new(&b"GET / HTTP/1.1\r\nnot-a-header\r\n\r\n"[..]);
        let mut request = Request::new(&mut reader).await.unwrap();
        assert!(request.parse_headers(&mut reader).await.is_err());
    }
}
