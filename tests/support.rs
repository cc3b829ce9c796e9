use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Token handed out by the stub API.
pub const STUB_TOKEN: &str = "stub-token";

#[derive(Default)]
pub struct StubCounters {
    pub token_requests: AtomicU64,
    pub task_requests: AtomicU64,
    pub rejected: AtomicU64,
}

pub struct ServerHandle {
    pub counters: Arc<StubCounters>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a stub of the target API.
///
/// `GET /api/token` answers `{"access": STUB_TOKEN}` when the request
/// carries the basic credentials `user:pass`, otherwise 401.
/// `GET /api/users` answers 200 when the request carries `JWT STUB_TOKEN`,
/// otherwise 403.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_api_stub() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let counters = Arc::new(StubCounters::default());
    let server_counters = Arc::clone(&counters);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let counters = Arc::clone(&server_counters);
                    thread::spawn(move || handle_client(stream, &counters));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            counters,
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn handle_client(mut stream: TcpStream, counters: &StubCounters) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut request = Vec::new();
    let mut buffer = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(read) => request.extend_from_slice(buffer.get(..read).unwrap_or_default()),
        }
    }
    let request = String::from_utf8_lossy(&request).into_owned();
    let (status, body) = route(&request, counters);

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn route(request: &str, counters: &StubCounters) -> (&'static str, String) {
    let authorization = request
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_owned())
        .unwrap_or_default();

    if request.starts_with("GET /api/token ") {
        counters.token_requests.fetch_add(1, Ordering::SeqCst);
        // base64("user:pass")
        if authorization == "Basic dXNlcjpwYXNz" {
            return ("200 OK", format!("{{\"access\":\"{}\"}}", STUB_TOKEN));
        }
        counters.rejected.fetch_add(1, Ordering::SeqCst);
        return ("401 Unauthorized", "{}".to_owned());
    }
    if request.starts_with("GET /api/users ") {
        counters.task_requests.fetch_add(1, Ordering::SeqCst);
        if authorization == format!("JWT {}", STUB_TOKEN) {
            return ("200 OK", "[]".to_owned());
        }
        counters.rejected.fetch_add(1, Ordering::SeqCst);
        return ("403 Forbidden", "{}".to_owned());
    }
    ("404 Not Found", "{}".to_owned())
}

/// Run the `swarmstage` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_swarmstage<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = swarmstage_bin()?;
    Command::new(bin)
        .args(args)
        .env("SWARMSTAGE_LOG", "error")
        .env_remove("USER_ITERATIONS")
        .env_remove("API_USERNAME")
        .env_remove("API_PASSWORD")
        .output()
        .map_err(|err| format!("run swarmstage failed: {}", err))
}

fn swarmstage_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_swarmstage").map_or_else(
        || Err("CARGO_BIN_EXE_swarmstage missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

/// Reads `label: <number>` from the run summary.
///
/// # Errors
///
/// Returns an error if the label is missing or not numeric.
pub fn summary_value(stdout: &str, label: &str) -> Result<u64, String> {
    let prefix = format!("{}:", label);
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix(&prefix) {
            return rest
                .trim()
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .parse::<u64>()
                .map_err(|err| format!("Failed to parse {}: {}", label, err));
        }
    }
    Err(format!("Missing {} in output:\n{}", label, stdout))
}
