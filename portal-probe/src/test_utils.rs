//! Local servers standing in for connectivity-check endpoints and portals.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_rustls::TlsAcceptor;

pub const NO_CONTENT: &str = "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n";
pub const PORTAL_REDIRECT: &str = "HTTP/1.1 302 Found\r\nLocation: http://portal.local/login?next=%2F\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
pub const PORTAL_LOCATION: &str = "http://portal.local/login?next=%2F";
pub const PORTAL_REDIRECT_UTF8: &str = "HTTP/1.1 302 Found\r\nLocation: http://portal.local/登录\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
pub const PORTAL_LOCATION_UTF8: &str = "http://portal.local/登录";
pub const OK_EMPTY_SIZED: &str = "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
pub const OK_EMPTY_UNSIZED: &str = "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n";
pub const OK_PAGE_UNSIZED: &str =
    "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n<html>sign in</html>";
pub const OK_PAGE_SIZED: &str =
    "HTTP/1.1 200 OK\r\nContent-Length: 20\r\nConnection: close\r\n\r\n<html>sign in</html>";
pub const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Answer every connection with `response`.
pub async fn serve_canned(response: &'static str) -> SocketAddr {
    serve_canned_after(Duration::ZERO, response).await
}

/// Answer every connection with `response` once `delay` has passed.
pub async fn serve_canned_after(delay: Duration, response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                if read_request_head(&mut stream, delay, response).await.is_none() {
                    log::debug!("test server: client went away");
                }
            });
        }
    });
    addr
}

/// Answer every connection with `response` and forward each request head.
pub async fn serve_capturing(
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(head) = read_request_head(&mut stream, Duration::ZERO, response).await
                {
                    let _ = tx.send(head);
                }
            });
        }
    });
    (addr, rx)
}

/// Accept connections and never answer them.
pub async fn serve_silent() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = stream;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });
    addr
}

/// An address nothing listens on.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Answer every TLS connection with `response`, behind a self-signed certificate
/// issued for a host other than the one the client dials.
pub async fn serve_canned_tls(response: &'static str) -> SocketAddr {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["portal.invalid".to_string()]).unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert.der().clone()], key)
    .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    read_request_head(&mut tls, Duration::ZERO, response).await;
                }
            });
        }
    });
    addr
}

/// Read one request head, wait `delay`, write `response` and close.
async fn read_request_head<S>(
    stream: &mut S,
    delay: Duration,
    response: &'static str,
) -> Option<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }
    tokio::time::sleep(delay).await;
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
    Some(String::from_utf8_lossy(&head).into_owned())
}
