use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::TaskError;

use super::{Authenticator, Credential, TaskExecutor};

pub(crate) struct StaticAuthenticator {
    fail: bool,
    calls: AtomicU64,
}

impl StaticAuthenticator {
    pub(crate) const fn granting() -> Self {
        Self {
            fail: false,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) const fn refusing() -> Self {
        Self {
            fail: true,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn acquire(&self) -> Result<Credential, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TaskError::credential("token endpoint unavailable"));
        }
        Ok(Credential::new("test-token".to_owned()))
    }
}

/// Counts executions; fails every `fail_every`-th call when set.
pub(crate) struct CountingExecutor {
    calls: AtomicU64,
    fail_every: Option<u64>,
}

impl CountingExecutor {
    pub(crate) const fn succeeding() -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail_every: None,
        }
    }

    pub(crate) const fn failing_every(nth: u64) -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail_every: Some(nth),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskExecutor for CountingExecutor {
    async fn execute(&self, credential: &Credential) -> Result<(), TaskError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        if credential.token() != "test-token" {
            return Err(TaskError::execution("unexpected credential"));
        }
        match self.fail_every {
            Some(nth) if call.checked_rem(nth) == Some(0) => {
                Err(TaskError::execution(format!("call {} rejected", call)))
            }
            Some(_) | None => Ok(()),
        }
    }
}

/// Answers exactly one HTTP request with `status` and `body`, and hands the
/// raw request text back through the join handle.
pub(crate) fn serve_once(
    status: &'static str,
    body: &'static str,
) -> std::io::Result<(String, std::thread::JoinHandle<String>)> {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let handle = std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return String::new();
        };
        let mut request = Vec::new();
        let mut buffer = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(buffer.get(..read).unwrap_or_default()),
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        drop(stream.write_all(response.as_bytes()));
        drop(stream.flush());
        String::from_utf8_lossy(&request).into_owned()
    });
    Ok((format!("http://{}", addr), handle))
}
