use crate::address::Address;
use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use std::future::Future;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::{self, ClientConfig, RootCertStore, pki_types::ServerName};
use tracing::debug;

/// Retrieves the raw response for an address. Workers hold one behind an `Arc`.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, address: &Address) -> impl Future<Output = Result<String>> + Send;
}

impl<F: Fetcher> Fetcher for Arc<F> {
    fn fetch(&self, address: &Address) -> impl Future<Output = Result<String>> + Send {
        (**self).fetch(address)
    }
}

/// Fetches pages with a hand-written HTTP/1.1 request over a TLS socket.
#[derive(Clone)]
pub struct TlsFetcher {
    connector: TlsConnector,
    port: u16,
    read_timeout: Duration,
}

impl TlsFetcher {
    pub fn new() -> Result<Self> {
        Self::from_config(&CrawlConfig::default())
    }

    pub fn from_config(config: &CrawlConfig) -> Result<Self> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let tls_config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ScanError::Tls(e.to_string()))?
            .with_root_certificates(roots)
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(tls_config)),
            port: config.port,
            read_timeout: config.read_timeout,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

impl Fetcher for TlsFetcher {
    async fn fetch(&self, address: &Address) -> Result<String> {
        debug!("Connecting to {}:{}", address.host(), self.port);

        let tcp = timeout(self.read_timeout, TcpStream::connect((address.host(), self.port)))
            .await
            .map_err(|_| ScanError::fetch_failed(address.key(), "connect timed out"))?
            .map_err(|e| ScanError::fetch_failed(address.key(), e))?;

        let server_name = ServerName::try_from(address.host().to_string())
            .map_err(|e| ScanError::fetch_failed(address.key(), e))?;

        let tls = timeout(self.read_timeout, self.connector.connect(server_name, tcp))
            .await
            .map_err(|_| ScanError::fetch_failed(address.key(), "TLS handshake timed out"))?
            .map_err(|e| ScanError::fetch_failed(address.key(), e))?;

        // The stream is moved into the exchange and closed when it returns, whatever the outcome.
        exchange(tls, address, self.read_timeout).await
    }
}

/// The exact request line and headers sent for `address`.
pub fn request_for(address: &Address) -> String {
    format!(
        "GET {} HTTP/1.1\r\nConnection: close\r\nHost: {}\r\n\r\n",
        address.path(),
        address.host()
    )
}

/// Write the request for `address` to `stream` and read until the peer closes it.
///
/// Each read is bounded by `read_timeout`; an elapsed timeout fails the whole fetch. The
/// response (status line, headers and body) is decoded as lossy UTF-8.
pub async fn exchange<S>(mut stream: S, address: &Address, read_timeout: Duration) -> Result<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = request_for(address);
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| ScanError::fetch_failed(address.key(), e))?;
    stream
        .flush()
        .await
        .map_err(|e| ScanError::fetch_failed(address.key(), e))?;

    let mut response = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        let read = match timeout(read_timeout, stream.read(&mut buffer)).await {
            Err(_) => return Err(ScanError::fetch_failed(address.key(), "read timed out")),
            Ok(Ok(read)) => read,
            // Plenty of servers hang up without sending close_notify.
            Ok(Err(e)) if e.kind() == ErrorKind::UnexpectedEof => 0,
            Ok(Err(e)) => return Err(ScanError::fetch_failed(address.key(), e)),
        };
        if read == 0 {
            break;
        }
        response.extend_from_slice(&buffer[..read]);
    }

    debug!("Read {} bytes from {}", response.len(), address);
    Ok(String::from_utf8_lossy(&response).into_owned())
}
