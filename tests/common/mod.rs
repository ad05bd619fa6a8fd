//! Shared test fixtures: an in-memory fake transport for codec/handshake
//! tests and a scripted TCP mock admin server for integration tests.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vadm::auth::auth_digest;
use vadm::config::Endpoint;
use vadm::error::{AdminError, Result};
use vadm::transport::Transport;

pub const CHALLENGE: &str = "ixslvvxrgkjptxmcgnnsdxsvdmvfympg";

// =============================================================================
// Fake Transport
// =============================================================================

/// In-memory transport fed with a pre-scripted byte stream
pub struct FakeTransport {
    input: std::io::Cursor<Vec<u8>>,
    written: Arc<Mutex<Vec<u8>>>,
    closed: Arc<Mutex<bool>>,
}

impl FakeTransport {
    /// Build a fake plus handles observing what the code under test wrote
    /// and whether it closed the transport
    pub fn new(input: impl Into<Vec<u8>>) -> (Self, Arc<Mutex<Vec<u8>>>, Arc<Mutex<bool>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(Mutex::new(false));
        let fake = Self {
            input: std::io::Cursor::new(input.into()),
            written: written.clone(),
            closed: closed.clone(),
        };
        (fake, written, closed)
    }
}

impl Transport for FakeTransport {
    fn read_line(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        let n = self
            .input
            .read_until(b'\n', &mut buf)
            .map_err(AdminError::Io)?;
        if n == 0 {
            return Err(AdminError::Protocol("fake stream exhausted".to_string()));
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.input.read_exact(buf).map_err(AdminError::Io)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }

    fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}

/// Frame a reply the way the wire carries it: status line, exact-length
/// body, trailing newline
pub fn frame(status: u32, body: &str) -> String {
    format!("{} {}\n{}\n", status, body.len(), body)
}

// =============================================================================
// Mock Admin Server
// =============================================================================

/// Scripted admin server listening on an ephemeral port
///
/// Speaks the banner (or the 107 challenge when a secret is configured) and
/// a small canned vocabulary. Each accepted connection gets its own thread;
/// `reply_delay` is applied before the banner to simulate a slow server.
pub struct MockServer {
    endpoint: Endpoint,
}

impl MockServer {
    pub fn spawn() -> Self {
        Self::spawn_with(None, Duration::ZERO)
    }

    pub fn spawn_with(secret: Option<&str>, reply_delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        let secret = secret.map(String::from);

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let secret = secret.clone();
                std::thread::spawn(move || serve(stream, secret, reply_delay));
            }
        });

        Self {
            endpoint: Endpoint::builder("127.0.0.1")
                .port(addr.port())
                .timeout(Duration::from_secs(2))
                .build(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint.clone()
    }
}

fn serve(stream: TcpStream, secret: Option<String>, reply_delay: Duration) {
    if !reply_delay.is_zero() {
        std::thread::sleep(reply_delay);
    }
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut writer = stream;

    match secret {
        Some(secret) => {
            let body = format!("{CHALLENGE}\n\nAuthentication required.");
            write_frame(&mut writer, 107, &body);
            let Some(line) = read_request(&mut reader) else {
                return;
            };
            let expected = format!("auth {}", auth_digest(CHALLENGE, &secret));
            if line == expected {
                write_frame(&mut writer, 200, "Welcome");
            } else {
                write_frame(&mut writer, 107, &body);
                return;
            }
        }
        None => write_frame(&mut writer, 200, "Welcome"),
    }

    while let Some(line) = read_request(&mut reader) {
        let verb = line.split_whitespace().next().unwrap_or("");
        match verb {
            "ping" => write_frame(&mut writer, 200, "PONG 1604575303 1.0"),
            "status" => write_frame(&mut writer, 200, "Child in state running"),
            "vcl.list" => write_frame(
                &mut writer,
                200,
                "available       0 old_config\nactive          3 boot\navailable       1 staging",
            ),
            "ban.list" => write_frame(
                &mut writer,
                200,
                "0x7fea4fcb0580 1303835108.618863   131G   req.url ~ /some/url\n\
                 0x7fea4fcb0660 1303835110.102211     0    req.url ~ /other",
            ),
            "stats" => write_frame(
                &mut writer,
                200,
                "      1000  Client connections accepted\n       900  Cache hits",
            ),
            "vcl.use" => {
                let name = line.split_whitespace().nth(1).unwrap_or("");
                if name == "boot" {
                    write_frame(&mut writer, 200, "");
                } else {
                    write_frame(&mut writer, 106, &format!("No VCL named {name} known."));
                }
            }
            "help" => write_frame(&mut writer, 200, "help [command]\nping [timestamp]\nstatus"),
            "quit" => {
                write_frame(&mut writer, 200, "");
                return;
            }
            "start" | "stop" | "ban" | "ban.url" | "param.set" | "param.show" | "vcl.load"
            | "vcl.discard" => write_frame(&mut writer, 200, ""),
            _ => write_frame(&mut writer, 101, &format!("Unknown request: {line}")),
        }
    }
}

fn read_request(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end().to_string()),
    }
}

fn write_frame(writer: &mut TcpStream, status: u32, body: &str) {
    let _ = writer.write_all(frame(status, body).as_bytes());
    let _ = writer.flush();
}
