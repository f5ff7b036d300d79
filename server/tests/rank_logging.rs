//! Rank service failures reach the `log` backend that `main` installs.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use sungbok_server::rank::{RankError, RankResolver, RiotClient};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

struct Capture(Mutex<Vec<(Level, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

/// Answers a single request with a 500.
async fn failing_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = sock.read(&mut buf).await;
        let _ = sock
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            )
            .await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn upstream_failure_is_logged_at_error() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let base = failing_upstream().await;
    let client = RiotClient::new("test-key", &base, &base).unwrap();

    let err = client.resolve("faker", "KR1").await.unwrap_err();
    assert!(matches!(err, RankError::Status { status, .. } if status.as_u16() == 500));

    let logged = CAPTURE.0.lock().unwrap();
    assert!(
        logged
            .iter()
            .any(|(level, msg)| *level == Level::Error && msg.contains("rank service request failed")),
        "{logged:?}"
    );
}
