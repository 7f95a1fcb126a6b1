//! Line-oriented reader for an SBS-1 feed connection.

use anyhow::{Context, Result};
use skyfeed_core::SbsMessage;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::net::TcpStream;

/// One client connection to a feed server.
///
/// The feed is write-only from the server side, so this only ever reads.
pub struct FeedReader {
    lines: Lines<BufReader<TcpStream>>,
}

impl FeedReader {
    /// Connect to a feed at `addr` ("host:port").
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("failed to connect to feed at {addr}"))?;
        Ok(Self {
            lines: BufReader::new(stream).lines(),
        })
    }

    /// Next raw wire line, or None when the feed closes.
    pub async fn next_raw(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    /// Next decoded message, or None when the feed closes. A line that does
    /// not decode is an error, not silently skipped.
    pub async fn next_message(&mut self) -> Result<Option<SbsMessage>> {
        match self.next_raw().await? {
            Some(line) => {
                let msg = SbsMessage::parse(&line)
                    .with_context(|| format!("bad feed line {line:?}"))?;
                Ok(Some(msg))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_reader_decodes_then_reports_bad_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(
                b"MSG,1,1,1,A1A1A1,1,2024/03/09,18:04:05.037,2024/03/09,18:04:05.037,DAL789,,,,,,,,,,,0\nnot a message\n",
            )
            .await
            .unwrap();
        });

        let mut reader = FeedReader::connect(&addr.to_string()).await.unwrap();
        let msg = reader.next_message().await.unwrap().unwrap();
        assert_eq!(msg.icao(), "A1A1A1");
        assert!(reader.next_message().await.is_err());
    }

    #[tokio::test]
    async fn test_reader_ends_cleanly_when_feed_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (_sock, _) = listener.accept().await.unwrap();
        });

        let mut reader = FeedReader::connect(&addr.to_string()).await.unwrap();
        assert!(reader.next_message().await.unwrap().is_none());
    }
}
