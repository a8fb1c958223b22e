//! Telemetry push channel.
//!
//! A background thread owns the websocket and forwards everything it sees as
//! [`EngineEvent`]s over an mpsc channel. The render loop drains that channel
//! without blocking. [`TelemetryLink`] owns the thread: dropping it raises the
//! stop flag and joins, so the reader never outlives the window.
//!
//! | Socket event | Event sent |
//! |--------------|------------|
//! | Handshake done | `Connected` |
//! | Text message | `Frame(text)` |
//! | Close frame / EOF | `Disconnected` |
//! | Any other error | `Error(reason)` |
//! | First failed dial of an outage | `Error(reason)` |
//!
//! After a drop the thread waits [`RECONNECT_DELAY`] and dials again. Dialing
//! never blocks longer than [`CONNECT_TIMEOUT`] per step, so a stop request is
//! seen even while the backend is unreachable. Failed redials stay quiet until
//! the next successful connection.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cluster_common::EngineEvent;
use thiserror::Error;
use tracing::{debug, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Socket read timeout; bounds how long a stop request can go unnoticed.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bound on one TCP connect attempt and on the websocket handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Wait between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Backend websocket address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub path: String,
}

impl Endpoint {
    /// `ws://host:port/path`, or `wss://` when secure.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let slash = if self.path.starts_with('/') { "" } else { "/" };
        format!("{scheme}://{}:{}{slash}{}", self.host, self.port, self.path)
    }
}

/// Shared stop flag, cloned into the worker thread.
#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[inline]
    pub fn raise(&self) { self.0.store(true, Ordering::Release); }

    #[inline]
    pub fn is_raised(&self) -> bool { self.0.load(Ordering::Acquire) }

    /// Sleep up to `total`, returning early if the flag goes up.
    /// Returns `true` if stopped.
    pub fn sleep(
        &self,
        total: Duration,
    ) -> bool {
        let deadline = Instant::now() + total;
        while !self.is_raised() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep((deadline - now).min(POLL_INTERVAL));
        }
        true
    }
}

/// Owner of a background event source thread.
pub struct TelemetryLink {
    stop: StopFlag,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryLink {
    /// Start reading from `endpoint`.
    pub fn connect(
        endpoint: &Endpoint,
        events: Sender<EngineEvent>,
    ) -> std::io::Result<Self> {
        let endpoint = endpoint.clone();
        Self::spawn("telemetry", move |stop| {
            read_loop(&endpoint.url(), |stop| dial(&endpoint, stop), RECONNECT_DELAY, &events, &stop);
        })
    }

    /// Run `worker` on a named thread with a fresh stop flag.
    pub fn spawn<F>(
        name: &str,
        worker: F,
    ) -> std::io::Result<Self>
    where
        F: FnOnce(StopFlag) + Send + 'static,
    {
        let stop = StopFlag::default();
        let flag = stop.clone();
        let handle = thread::Builder::new().name(name.into()).spawn(move || worker(flag))?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Whether the worker has exited on its own.
    #[cfg(test)]
    pub fn is_finished(&self) -> bool { self.handle.as_ref().is_none_or(JoinHandle::is_finished) }
}

impl Drop for TelemetryLink {
    fn drop(&mut self) {
        self.stop.raise();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("telemetry thread panicked");
        }
    }
}

// ============================================================================
// Dialing
// ============================================================================

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Why one dial attempt failed.
#[derive(Debug, Error)]
pub enum DialError {
    #[error("cannot resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("handshake failed: {0}")]
    Handshake(String),
}

/// Open the TCP stream, then run the websocket handshake on it. Both steps
/// are bounded by [`CONNECT_TIMEOUT`]. `Ok(None)` means `stop` went up first.
fn dial(
    endpoint: &Endpoint,
    stop: &StopFlag,
) -> Result<Option<Socket>, DialError> {
    let addrs = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|source| DialError::Resolve {
            host: endpoint.host.clone(),
            port: endpoint.port,
            source,
        })?;

    let mut last = io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no address");
    let mut stream = None;
    for addr in addrs {
        if stop.is_raised() {
            return Ok(None);
        }
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(connected) => {
                stream = Some(connected);
                break;
            }
            Err(err) => last = err,
        }
    }
    let Some(stream) = stream else {
        return Err(DialError::Connect(last));
    };
    if stop.is_raised() {
        return Ok(None);
    }

    stream.set_read_timeout(Some(CONNECT_TIMEOUT)).map_err(DialError::Connect)?;
    stream.set_write_timeout(Some(CONNECT_TIMEOUT)).map_err(DialError::Connect)?;
    let (socket, _response) =
        tungstenite::client_tls(endpoint.url(), stream).map_err(|err| DialError::Handshake(err.to_string()))?;
    Ok(Some(socket))
}

/// Dial, pump, wait `retry`, repeat until stopped.
///
/// A failed dial is sent as `Error` only when nothing has been reported since
/// the last successful connection, so one outage yields one event.
fn read_loop<F>(
    url: &str,
    mut dial: F,
    retry: Duration,
    events: &Sender<EngineEvent>,
    stop: &StopFlag,
) where
    F: FnMut(&StopFlag) -> Result<Option<Socket>, DialError>,
{
    let mut reported = false;
    while !stop.is_raised() {
        match dial(stop) {
            Ok(Some(mut socket)) => {
                info!(url, "telemetry connected");
                reported = false;
                set_read_timeout(&mut socket);
                if events.send(EngineEvent::Connected).is_err() {
                    return;
                }
                let last = pump(&mut socket, events, stop);
                socket.close(None).ok();
                match last {
                    Some(event) => {
                        if events.send(event).is_err() {
                            return;
                        }
                        reported = true;
                    }
                    None => return,
                }
            }
            Ok(None) => return,
            Err(err) if reported => debug!(url, %err, "telemetry still unreachable"),
            Err(err) => {
                debug!(url, %err, "telemetry connect failed");
                reported = true;
                if events.send(EngineEvent::Error(err.to_string())).is_err() {
                    return;
                }
            }
        }
        if stop.sleep(retry) {
            return;
        }
    }
}

/// Forward messages until the socket drops. Returns the event describing the
/// drop, or `None` when stopped or the receiver is gone.
fn pump(
    socket: &mut Socket,
    events: &Sender<EngineEvent>,
    stop: &StopFlag,
) -> Option<EngineEvent> {
    use tungstenite::Error;

    while !stop.is_raised() {
        match socket.read() {
            Ok(Message::Text(text)) => {
                events.send(EngineEvent::Frame(text.to_string())).ok()?;
            }
            Ok(Message::Close(_)) | Err(Error::ConnectionClosed | Error::AlreadyClosed) => {
                return Some(EngineEvent::Disconnected);
            }
            Ok(_) => {}
            Err(Error::Io(err))
                if matches!(err.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {}
            Err(err) => return Some(EngineEvent::Error(err.to_string())),
        }
    }
    None
}

fn set_read_timeout(socket: &mut Socket) {
    let result = match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(POLL_INTERVAL)),
        MaybeTlsStream::Rustls(stream) => stream.sock.set_read_timeout(Some(POLL_INTERVAL)),
        _ => Ok(()),
    };
    if let Err(err) = result {
        warn!(%err, "cannot set socket read timeout; shutdown may lag");
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    use super::*;

    /// A listener that takes connections into its backlog but never answers.
    fn silent_backend() -> (TcpListener, Endpoint) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = Endpoint {
            host: "127.0.0.1".into(),
            port: listener.local_addr().unwrap().port(),
            secure: false,
            path: "/ws".into(),
        };
        (listener, endpoint)
    }

    #[test]
    fn test_endpoint_url() {
        let mut endpoint = Endpoint {
            host: "dash.local".into(),
            port: 5000,
            secure: false,
            path: "/ws".into(),
        };
        assert_eq!(endpoint.url(), "ws://dash.local:5000/ws");
        endpoint.secure = true;
        endpoint.path = "ws".into();
        assert_eq!(endpoint.url(), "wss://dash.local:5000/ws");
    }

    #[test]
    fn test_drop_stops_and_joins_worker() {
        let (tx, rx) = mpsc::channel();
        let link = TelemetryLink::spawn("test", move |stop| {
            while !stop.sleep(Duration::from_millis(5)) {}
            tx.send(EngineEvent::Disconnected).ok();
        })
        .unwrap();
        assert!(!link.is_finished());
        drop(link);
        assert_eq!(rx.try_recv(), Ok(EngineEvent::Disconnected), "worker ran to completion before drop returned");
    }

    #[test]
    fn test_stop_flag_sleep_returns_early() {
        let stop = StopFlag::default();
        stop.raise();
        let started = Instant::now();
        assert!(stop.sleep(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_unreachable_backend_reports_error() {
        let (tx, rx) = mpsc::channel();
        let endpoint = Endpoint {
            host: "127.0.0.1".into(),
            port: 1,
            secure: false,
            path: "/ws".into(),
        };
        let link = TelemetryLink::connect(&endpoint, tx).unwrap();
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(event, EngineEvent::Error(_)), "got {event:?}");
        drop(link);
    }

    #[test]
    fn test_dial_gives_up_on_silent_handshake() {
        let (_listener, endpoint) = silent_backend();
        let started = Instant::now();
        let err = dial(&endpoint, &StopFlag::default()).err();
        assert!(matches!(err, Some(DialError::Handshake(_))), "got {err:?}");
        assert!(started.elapsed() < CONNECT_TIMEOUT * 3, "handshake bounded by the connect timeout");
    }

    #[test]
    fn test_dial_skips_work_once_stopped() {
        let (_listener, endpoint) = silent_backend();
        let stop = StopFlag::default();
        stop.raise();
        assert!(matches!(dial(&endpoint, &stop), Ok(None)));
    }

    #[test]
    fn test_drop_while_connecting_is_bounded() {
        let (_listener, endpoint) = silent_backend();
        let (tx, _rx) = mpsc::channel();
        let link = TelemetryLink::connect(&endpoint, tx).unwrap();
        thread::sleep(Duration::from_millis(100));

        let started = Instant::now();
        drop(link);
        assert!(
            started.elapsed() < CONNECT_TIMEOUT * 3,
            "teardown waited {:?} on a backend that never answers",
            started.elapsed()
        );
    }

    #[test]
    fn test_failed_redials_report_once() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let (tx, rx) = mpsc::channel();
        let link = TelemetryLink::spawn("test", move |stop| {
            let dial = |_: &StopFlag| {
                counter.fetch_add(1, Ordering::Relaxed);
                Err(DialError::Connect(io::ErrorKind::ConnectionRefused.into()))
            };
            read_loop("ws://test/ws", dial, Duration::from_millis(2), &tx, &stop);
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while attempts.load(Ordering::Relaxed) < 5 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        drop(link);

        assert!(attempts.load(Ordering::Relaxed) >= 5, "dialer retried");
        let events: Vec<EngineEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 1, "one outage reported once, got {events:?}");
        assert!(matches!(events[0], EngineEvent::Error(_)));
    }
}
