//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{aws_lc_rs, WebPkiSupportedAlgorithms};
use rustls::{DigitallySignedStruct, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use geminid::config::ServerConfig;
use geminid::net::listener::Listener;
use geminid::{Router, Server};

pub const SERVER_CERT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/certs/server-cert.pem");
pub const SERVER_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/certs/server-key.pem");
pub const CLIENT_CERT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/certs/client-cert.pem");
pub const CLIENT_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/certs/client-key.pem");

/// Start a server on an ephemeral port with the fixture identity.
///
/// Returns the bound address and the shared route table, which stays
/// usable for registration after the server task takes off.
pub async fn start_server(mut config: ServerConfig) -> (SocketAddr, Arc<Router>) {
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.tls.cert_path = SERVER_CERT.to_string();
    config.tls.key_path = SERVER_KEY.to_string();

    let server = Server::new(config).expect("fixture identity should load");
    let router = Arc::clone(server.router());

    let listener = Listener::bind(&server.config().listener)
        .await
        .expect("ephemeral bind should succeed");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    (addr, router)
}

/// Issue one raw request line and collect the full response.
///
/// Read errors after partial data (a worker that dropped without a
/// clean close) are ignored so error-path tests still see the bytes
/// that made it out.
pub async fn gemini_request(addr: SocketAddr, request: &str) -> Vec<u8> {
    request_with_config(addr, request, client_config(false)).await
}

/// As [`gemini_request`], but presenting the fixture client certificate.
#[allow(dead_code)]
pub async fn gemini_request_with_cert(addr: SocketAddr, request: &str) -> Vec<u8> {
    request_with_config(addr, request, client_config(true)).await
}

async fn request_with_config(
    addr: SocketAddr,
    request: &str,
    config: rustls::ClientConfig,
) -> Vec<u8> {
    let connector = TlsConnector::from(Arc::new(config));
    let tcp = TcpStream::connect(addr).await.expect("server unreachable");
    let server_name = ServerName::try_from("localhost").unwrap();
    let mut tls = connector
        .connect(server_name, tcp)
        .await
        .expect("TLS handshake should succeed");

    tls.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    let _ = tls.read_to_end(&mut response).await;
    response
}

fn client_config(with_identity: bool) -> rustls::ClientConfig {
    let builder = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(TrustAnyServerCert::new()));

    if with_identity {
        let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(
            std::fs::File::open(CLIENT_CERT).unwrap(),
        ))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
        let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(
            std::fs::File::open(CLIENT_KEY).unwrap(),
        ))
        .unwrap()
        .unwrap();
        builder.with_client_auth_cert(certs, key).unwrap()
    } else {
        builder.with_no_client_auth()
    }
}

/// Client-side verifier that trusts the self-signed fixture identity.
#[derive(Debug)]
struct TrustAnyServerCert {
    algorithms: WebPkiSupportedAlgorithms,
}

impl TrustAnyServerCert {
    fn new() -> Self {
        Self {
            algorithms: aws_lc_rs::default_provider().signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for TrustAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}
