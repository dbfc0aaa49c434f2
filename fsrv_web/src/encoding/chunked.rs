use std::io::{Error, ErrorKind};
use std::marker::Unpin;
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project_lite::pin_project;

use tokio::io::{AsyncBufRead, AsyncRead, ReadBuf};

// Must use 'where' style trait bounds because of this bug: https://github.com/taiki-e/pin-project-lite/issues/2
pin_project! {
  pub struct ChunkedDecoder<B>
  where
    B: AsyncBufRead,
    B: Unpin,
  {
    finished: bool,
    chunk_remaining: usize,
    #[pin]
    inner: B,
  }
}

impl<B: AsyncBufRead + Unpin> ChunkedDecoder<B> {
  pub fn new(inner: B) -> ChunkedDecoder<B> {
    ChunkedDecoder {
      finished: false,
      chunk_remaining: 0,
      inner: inner,
    }
  }
}

impl<B: AsyncBufRead + Unpin> AsyncRead for ChunkedDecoder<B> {
  fn poll_read(
    self: Pin<&mut Self>,
    cx: &mut Context<'_>,
    buf: &mut ReadBuf<'_>,
  ) -> Poll<tokio::io::Result<()>> {
    let mut this = self.project();
    if *this.finished || buf.remaining() == 0 {
      return Poll::Ready(Ok(()));
    }

    // at a chunk boundary: eat the previous chunk's CRLF and the next size line.
    // the size line has to fit inside one fill of the inner buffer
    while *this.chunk_remaining == 0 {
      let line = {
        let available = match this.inner.as_mut().poll_fill_buf(cx) {
          Poll::Ready(Ok(available)) => available,
          Poll::Ready(Err(error)) => return Poll::Ready(Err(error)),
          Poll::Pending => return Poll::Pending,
        };
        if available.is_empty() {
          return Poll::Ready(Err(Error::from(ErrorKind::UnexpectedEof)));
        }
        let line_end = match available.iter().position(|byte| *byte == b'\n') {
          Some(line_end) => line_end,
          None => return Poll::Ready(Err(Error::from(ErrorKind::InvalidData))),
        };
        match std::str::from_utf8(&available[..line_end]) {
          Ok(text) => (text.trim().to_owned(), line_end + 1),
          Err(_error) => return Poll::Ready(Err(Error::from(ErrorKind::InvalidData))),
        }
      };
      let (size_text, consumed) = line;
      this.inner.as_mut().consume(consumed);
      if size_text.is_empty() {
        // the terminating CRLF of the previous chunk
        continue;
      }
      // chunk size is transferred as a hex number
      match usize::from_str_radix(&size_text, 16) {
        Ok(0) => {
          // completely finished with all chunks
          // TODO: consume trailer fields once something sends them
          *this.finished = true;
          return Poll::Ready(Ok(()));
        }
        Ok(chunk_size) => *this.chunk_remaining = chunk_size,
        Err(_error) => return Poll::Ready(Err(Error::from(ErrorKind::InvalidData))),
      }
    }

    // hand over as much of the current chunk as the buffers allow
    let take;
    {
      let available = match this.inner.as_mut().poll_fill_buf(cx) {
        Poll::Ready(Ok(available)) => available,
        Poll::Ready(Err(error)) => return Poll::Ready(Err(error)),
        Poll::Pending => return Poll::Pending,
      };
      if available.is_empty() {
        return Poll::Ready(Err(Error::from(ErrorKind::UnexpectedEof)));
      }
      take = std::cmp::min(
        *this.chunk_remaining,
        std::cmp::min(available.len(), buf.remaining()),
      );
      buf.put_slice(&available[..take]);
    }
    this.inner.as_mut().consume(take);
    *this.chunk_remaining -= take;
    return Poll::Ready(Ok(()));
  }
}

// In the following example, three chunks of length 4, 5 and 14 (hexadecimal "E") are shown. The chunk size is transferred as a hexadecimal number followed by \r\n as a line separator, followed by a chunk of data of the given size.

// 4\r\n
// Wiki\r\n
// 5\r\n
// pedia\r\n
// E\r\n
//  in\r\n
// \r\n
// chunks.\r\n
// 0\r\n
// \r\n

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;
  use tokio::io::AsyncReadExt;

  #[tokio::test]
  async fn chunked_decoder() {
    let chunked_data = "4\r\nWiki\r\n5\r\npedia\r\nE\r\n in\r\n\r\nchunks.\r\n0\r\n\r\n".as_bytes();
    let mut chunk_reader = ChunkedDecoder::new(Cursor::new(chunked_data));
    let mut decoded = String::new();
    chunk_reader.read_to_string(&mut decoded).await.unwrap();
    assert_eq!(decoded, "Wikipedia in\r\n\r\nchunks.".to_owned());
  }

  #[tokio::test]
  async fn single_chunk() {
    let chunked_data = "B\r\nhello world\r\n0\r\n\r\n".as_bytes();
    let mut chunk_reader = ChunkedDecoder::new(Cursor::new(chunked_data));
    let mut decoded = String::new();
    chunk_reader.read_to_string(&mut decoded).await.unwrap();
    assert_eq!(decoded, "hello world".to_owned());
  }

  #[tokio::test]
  async fn bad_chunk_size_is_an_error() {
    let chunked_data = "zz\r\noops\r\n0\r\n\r\n".as_bytes();
    let mut chunk_reader = ChunkedDecoder::new(Cursor::new(chunked_data));
    let mut decoded = String::new();
    let result = chunk_reader.read_to_string(&mut decoded).await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn truncated_stream_is_an_error() {
    let chunked_data = "5\r\nhe".as_bytes();
    let mut chunk_reader = ChunkedDecoder::new(Cursor::new(chunked_data));
    let mut decoded = String::new();
    let result = chunk_reader.read_to_string(&mut decoded).await;
    assert!(result.is_err());
  }
}
