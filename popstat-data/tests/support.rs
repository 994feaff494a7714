use std::{
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    sync::mpsc::{self, Receiver},
    thread::{self, JoinHandle},
    time::Duration,
};

/// One-shot HTTP server answering a single request with a canned response.
pub struct CannedServer {
    pub base_url: String,
    request_line: Receiver<String>,
    handle: JoinHandle<()>,
}

impl CannedServer {
    /// Serve `body` with the given status line, e.g. `"200 OK"`.
    pub fn respond(status: &'static str, body: &'static str) -> Self {
        Self::spawn(move |mut stream| {
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .unwrap_or_else(|err| panic!("failed to write canned response: {err}"));
        })
    }

    /// Accept the request and hold the connection open without answering.
    pub fn stall(duration: Duration) -> Self {
        Self::spawn(move |_stream| thread::sleep(duration))
    }

    fn spawn(reply: impl FnOnce(TcpStream) + Send + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind canned server: {err}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("failed to read canned server address: {err}"));
        let (sender, request_line) = mpsc::channel();
        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(
                stream
                    .try_clone()
                    .unwrap_or_else(|err| panic!("failed to clone stream: {err}")),
            );
            let mut first = String::new();
            let _ = reader.read_line(&mut first);
            let mut header = String::new();
            while reader.read_line(&mut header).is_ok_and(|read| read > 2) {
                header.clear();
            }
            let _ = sender.send(first.trim_end().to_owned());
            reply(stream);
        });
        Self {
            base_url: format!("http://{address}"),
            request_line,
            handle,
        }
    }

    /// Request line received by the server, e.g. `GET /path?query HTTP/1.1`.
    pub fn request_line(self) -> String {
        let line = self
            .request_line
            .recv_timeout(Duration::from_secs(5))
            .unwrap_or_else(|err| panic!("server saw no request: {err}"));
        let _ = self.handle.join();
        line
    }
}

/// Base URL of a local port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|err| panic!("failed to bind probe listener: {err}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("failed to read probe address: {err}"));
    drop(listener);
    format!("http://{address}")
}
