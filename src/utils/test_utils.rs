use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::core::generator::{GenerationError, Generator, HistoryTurn, ImagePayload};

/// Canned plain-text reply used once the scripted queue is exhausted.
pub const DEFAULT_FAKE_REPLY: &str = r#"{"type":"text","content":"ok"}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyCall {
    pub history: Vec<HistoryTurn>,
    pub utterance: String,
}

/// Scripted [`Generator`] that records what it was asked.
#[derive(Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    themes: Mutex<VecDeque<Result<String, GenerationError>>>,
    reply_calls: Mutex<Vec<ReplyCall>>,
    theme_calls: Mutex<Vec<ImagePayload>>,
    delay: Option<Duration>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: Result<String, GenerationError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_theme(self, theme: Result<String, GenerationError>) -> Self {
        self.themes.lock().unwrap().push_back(theme);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reply_calls(&self) -> Vec<ReplyCall> {
        self.reply_calls.lock().unwrap().clone()
    }

    pub fn theme_calls(&self) -> Vec<ImagePayload> {
        self.theme_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn reply(
        &self,
        history: &[HistoryTurn],
        utterance: &str,
    ) -> Result<String, GenerationError> {
        self.reply_calls.lock().unwrap().push(ReplyCall {
            history: history.to_vec(),
            utterance: utterance.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.replies.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(DEFAULT_FAKE_REPLY.to_string()))
    }

    async fn theme_from_image(&self, image: &ImagePayload) -> Result<String, GenerationError> {
        self.theme_calls.lock().unwrap().push(image.clone());
        let scripted = self.themes.lock().unwrap().pop_front();
        scripted.unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

/// One HTTP request as seen by [`serve_once`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

async fn read_http_request(stream: &mut tokio::net::TcpStream) -> Result<CapturedRequest, String> {
    use tokio::io::AsyncReadExt;

    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream.read(&mut chunk).await.map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream.read(&mut chunk).await.map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Accept a single HTTP request on a loopback port and answer it with a JSON
/// `body`. Returns the base URL and a handle yielding the captured request.
pub async fn serve_once(
    status: u16,
    body: String,
) -> (
    String,
    tokio::task::JoinHandle<Result<CapturedRequest, String>>,
) {
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
        let captured = read_http_request(&mut stream).await?;
        let response = format!(
            "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        stream.shutdown().await.map_err(|err| err.to_string())?;
        Ok(captured)
    });

    (format!("http://{addr}"), handle)
}
