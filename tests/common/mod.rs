//! Shared utilities for gateway integration tests.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;

use ha_gateway::config::{ConfigCache, MemoryStore};
use ha_gateway::upstream::UpstreamClient;
use ha_gateway::Gateway;

/// Mock Home Assistant upstream recording what the gateway sends it.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    last_headers: Arc<Mutex<Option<HeaderMap>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.last_headers.lock().unwrap().clone()
    }
}

fn recording_app(
    status: u16,
    body: &'static str,
    hits: Arc<AtomicU32>,
    last_headers: Arc<Mutex<Option<HeaderMap>>>,
) -> Router {
    Router::new().fallback(move |request: Request<Body>| {
        let hits = hits.clone();
        let last_headers = last_headers.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            *last_headers.lock().unwrap() = Some(request.headers().clone());
            (
                StatusCode::from_u16(status).unwrap(),
                [("content-type", "application/json")],
                body,
            )
                .into_response()
        }
    })
}

/// Start a mock upstream answering every request with a fixed JSON body.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let last_headers = Arc::new(Mutex::new(None));

    let upstream = MockUpstream {
        addr,
        hits: hits.clone(),
        last_headers: last_headers.clone(),
    };

    let app = recording_app(status, body, hits, last_headers);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    upstream
}

/// TLS mock upstream plus the client configuration that trusts it.
pub struct TlsMockUpstream {
    pub inner: MockUpstream,
    pub base_url: String,
    pub client_tls: rustls::ClientConfig,
}

/// Start a TLS mock upstream behind a freshly minted self-signed
/// certificate for `localhost`.
pub async fn start_tls_mock_upstream(status: u16, body: &'static str) -> TlsMockUpstream {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem(
        certified.cert.pem().into_bytes(),
        certified.key_pair.serialize_pem().into_bytes(),
    )
    .await
    .unwrap();

    let hits = Arc::new(AtomicU32::new(0));
    let last_headers = Arc::new(Mutex::new(None));
    let app = recording_app(status, body, hits.clone(), last_headers.clone());

    let handle = axum_server::Handle::new();
    let serve_handle = handle.clone();
    tokio::spawn(async move {
        axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), tls_config)
            .handle(serve_handle)
            .serve(app.into_make_service())
            .await
            .unwrap();
    });
    let addr = handle.listening().await.unwrap();

    let mut roots = rustls::RootCertStore::empty();
    roots.add(certified.cert.der().clone()).unwrap();
    let client_tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    TlsMockUpstream {
        inner: MockUpstream {
            addr,
            hits,
            last_headers,
        },
        base_url: format!("https://localhost:{}", addr.port()),
        client_tls,
    }
}

/// Secret-store parameters pointing the gateway at `ha_base_url`.
pub fn gateway_params(ha_base_url: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("HA_BASE_URL".to_string(), ha_base_url.to_string()),
        ("ALEXA_SECRET".to_string(), "skill-secret".to_string()),
        ("CF_CLIENT_ID".to_string(), "cf-id.access".to_string()),
        ("CF_CLIENT_SECRET".to_string(), "cf-secret".to_string()),
    ])
}

/// Start a gateway wired to an in-memory secret store.
///
/// `allowed_base_url` is the authorization root; pointing it away from the
/// configured upstream exercises the SSRF denial path.
pub async fn start_gateway(params: BTreeMap<String, String>, allowed_base_url: &str) -> SocketAddr {
    let cache = ConfigCache::new(Arc::new(MemoryStore::new(params)), "/app/config");
    spawn_gateway(Gateway::new(cache, allowed_base_url)).await
}

/// Start a gateway whose upstream client trusts a test-local certificate.
pub async fn start_gateway_with_tls(
    params: BTreeMap<String, String>,
    allowed_base_url: &str,
    client_tls: rustls::ClientConfig,
) -> SocketAddr {
    let cache = ConfigCache::new(Arc::new(MemoryStore::new(params)), "/app/config");
    let upstream = UpstreamClient::with_tls_config(client_tls);
    spawn_gateway(Gateway::with_upstream(cache, allowed_base_url, upstream)).await
}

async fn spawn_gateway(gateway: Gateway) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = gateway.run(listener).await;
    });

    addr
}

/// Non-pooled client so connection reuse never crosses tests.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
