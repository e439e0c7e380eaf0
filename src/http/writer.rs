use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::ResponseHeader;

/// Failure while copying a file body to the client.
#[derive(Debug)]
pub enum BodyError {
    /// Reading the file failed
    Read(io::Error),
    /// Writing to the client failed
    Write(io::Error),
}

/// Writes a serialized header block, tracking how much has gone out.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(header: &ResponseHeader) -> Self {
        Self {
            buffer: header.render().into_bytes(),
            written: 0,
        }
    }

    /// Writer for a header followed by a small in-memory body.
    pub fn with_body(header: &ResponseHeader, body: &[u8]) -> Self {
        let mut writer = Self::new(header);
        writer.buffer.extend_from_slice(body);
        writer
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }

            self.written += n;
        }

        stream.flush().await
    }
}

/// Copies `body` to `stream` in chunks of at most `chunk_size` bytes.
///
/// Each chunk is fully written before the next read. Returns the number of
/// bytes sent.
pub async fn stream_body<R, W>(
    body: &mut R,
    stream: &mut W,
    chunk_size: usize,
) -> Result<u64, BodyError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut sent = 0u64;

    loop {
        let n = body.read(&mut chunk).await.map_err(BodyError::Read)?;
        if n == 0 {
            break;
        }

        stream.write_all(&chunk[..n]).await.map_err(BodyError::Write)?;
        sent += n as u64;
    }

    stream.flush().await.map_err(BodyError::Write)?;
    Ok(sent)
}
