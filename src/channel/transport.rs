use super::token::Header;
use crate::config::Config;
use crate::error::ChannelError;
use std::io::Read;
use tracing::debug;

const CHUNK_SIZE: usize = 16 * 1024;
const USER_AGENT: &str = concat!("league_channel/", env!("CARGO_PKG_VERSION"));

/// Receives each body chunk as it arrives. Returning an error aborts the transfer.
pub type ChunkSink<'s> = dyn FnMut(&[u8]) -> Result<(), ChannelError> + 's;

/// A blocking request/response exchange.
pub trait Transport: Send + Sync {
    /// Performs a GET against `url` with `header` attached, feeding the body to
    /// `sink`, and returns the final HTTP status.
    fn perform(&self, url: &str, header: &Header, sink: &mut ChunkSink<'_>) -> Result<u16, ChannelError>;
}

/// `ureq`-backed transport. The agent pools connections and is safe to share.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &Config) -> Result<Self, ChannelError> {
        if config.scheme != "https" && config.scheme != "http" {
            return Err(ChannelError::TransportInit(format!(
                "unsupported scheme {:?}",
                config.scheme
            )));
        }
        if matches!(config.timeout, Some(t) if t.is_zero()) {
            return Err(ChannelError::TransportInit("timeout must be non-zero".to_string()));
        }

        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(UreqTransport {
            agent: builder.build(),
        })
    }
}

impl Transport for UreqTransport {
    fn perform(&self, url: &str, header: &Header, sink: &mut ChunkSink<'_>) -> Result<u16, ChannelError> {
        let response = match self.agent.get(url).set(header.name, &header.value).call() {
            Ok(resp) => resp,
            // Error statuses still carry a body worth collecting.
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(e) => return Err(ChannelError::HttpError(e.to_string())),
        };

        let status = response.status();
        let mut reader = response.into_reader();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut total = 0usize;
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|e| ChannelError::HttpError(e.to_string()))?;
            if n == 0 {
                break;
            }
            sink(&buf[..n])?;
            total += n;
        }

        debug!(status, bytes = total, "Transfer complete");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::token::TOKEN_HEADER;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serves one canned response and hands back the raw request head.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
            head
        });
        (format!("http://{}", addr), server)
    }

    fn header() -> Header {
        Header {
            name: TOKEN_HEADER,
            value: "RGAPI-00000000-0000-0000-0000-000000000000".to_string(),
        }
    }

    fn transport() -> UreqTransport {
        let config = Config {
            scheme: "http".to_string(),
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        };
        UreqTransport::new(&config).unwrap()
    }

    #[test]
    fn sends_token_and_streams_body() {
        let (base, server) = serve_once("200 OK", "{\"name\":\"x\"}");
        let mut body = Vec::new();
        let status = transport()
            .perform(&format!("{}/lol/summoner/v3/1", base), &header(), &mut |chunk: &[u8]| {
                body.extend_from_slice(chunk);
                Ok(())
            })
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body, b"{\"name\":\"x\"}");

        let head = server.join().unwrap().to_ascii_lowercase();
        assert!(head.starts_with("get /lol/summoner/v3/1 "));
        assert!(head.contains("x-riot-token: rgapi-00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn error_status_is_returned_not_raised() {
        let (base, server) = serve_once("404 Not Found", "{\"status\":{}}");
        let status = transport()
            .perform(&format!("{}/missing", base), &header(), &mut |_: &[u8]| Ok(()))
            .unwrap();
        assert_eq!(status, 404);
        server.join().unwrap();
    }

    #[test]
    fn sink_error_aborts_transfer() {
        let (base, server) = serve_once("200 OK", "payload");
        let err = transport()
            .perform(&base, &header(), &mut |_: &[u8]| Err(ChannelError::TooManyConcurrent(8)))
            .unwrap_err();
        assert!(matches!(err, ChannelError::TooManyConcurrent(8)));
        server.join().unwrap();
    }

    #[test]
    fn rejects_unknown_scheme() {
        let config = Config {
            scheme: "ftp".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            UreqTransport::new(&config),
            Err(ChannelError::TransportInit(_))
        ));
    }
}
