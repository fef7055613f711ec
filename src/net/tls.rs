//! TLS server configuration and client-certificate policy.
//!
//! # Responsibilities
//! - Build the `rustls::ServerConfig` from PEM certificate/key bytes
//! - Restrict protocol versions to TLS 1.2 and 1.3
//! - Request a client certificate without ever rejecting it
//!
//! # Design Decisions
//! - The verifier checks only the handshake signature (proof of key
//!   possession), never chain trust; schemes like trust-on-first-use
//!   pinning live in handlers, which see the raw peer certificate
//! - Certificate parsing failures abort startup, not individual
//!   connections

use std::sync::Arc;

use rustls::client::danger::HandshakeSignatureValid;
use rustls::crypto::{aws_lc_rs, WebPkiSupportedAlgorithms};
use rustls::server::danger::{ClientCertVerified, ClientCertVerifier};
use rustls::{DigitallySignedStruct, DistinguishedName, SignatureScheme};
use rustls_pki_types::{CertificateDer, UnixTime};

use crate::error::ServerError;

/// Build a `rustls::ServerConfig` from PEM-encoded certificate and
/// private key bytes.
///
/// The resulting config speaks TLS 1.2 and 1.3 only and requests (but
/// never requires or validates) a client certificate.
pub fn build_server_config(
    cert_pem: &[u8],
    key_pem: &[u8],
) -> Result<Arc<rustls::ServerConfig>, ServerError> {
    let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Tls(format!("failed to parse certificate chain: {e}")))?;
    if certs.is_empty() {
        return Err(ServerError::Tls("no certificate found in PEM data".into()));
    }

    let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(key_pem))
        .map_err(|e| ServerError::Tls(format!("failed to read private key: {e}")))?
        .ok_or_else(|| ServerError::Tls("no private key found in PEM data".into()))?;

    let config = rustls::ServerConfig::builder_with_protocol_versions(&[
        &rustls::version::TLS13,
        &rustls::version::TLS12,
    ])
    .with_client_cert_verifier(Arc::new(AcceptAnyClientCert::new()))
    .with_single_cert(certs, key)
    .map_err(|e| ServerError::Tls(format!("rustls rejected the configuration: {e}")))?;

    Ok(Arc::new(config))
}

/// Client-certificate verifier that requests a certificate and accepts
/// any chain, or none at all.
///
/// The transport layer never rejects a client on trust grounds. Only
/// the handshake signature is verified, so a presented certificate is
/// guaranteed to belong to a key the client holds.
#[derive(Debug)]
pub struct AcceptAnyClientCert {
    algorithms: WebPkiSupportedAlgorithms,
}

impl AcceptAnyClientCert {
    pub fn new() -> Self {
        Self {
            algorithms: aws_lc_rs::default_provider().signature_verification_algorithms,
        }
    }
}

impl Default for AcceptAnyClientCert {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCertVerifier for AcceptAnyClientCert {
    fn offer_client_auth(&self) -> bool {
        true
    }

    fn client_auth_mandatory(&self) -> bool {
        false
    }

    fn root_hint_subjects(&self) -> &[DistinguishedName] {
        &[]
    }

    fn verify_client_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _now: UnixTime,
    ) -> Result<ClientCertVerified, rustls::Error> {
        Ok(ClientCertVerified::assertion())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_pem() {
        let result = build_server_config(b"", b"");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_garbage_pem() {
        let result = build_server_config(b"not a pem", b"also not a pem");
        assert!(result.is_err());
    }

    #[test]
    fn verifier_accepts_without_trust_roots() {
        let verifier = AcceptAnyClientCert::new();
        assert!(!verifier.client_auth_mandatory());
        assert!(verifier.offer_client_auth());
        assert!(verifier.root_hint_subjects().is_empty());

        let cert = CertificateDer::from(vec![0u8; 16]);
        let verdict = verifier.verify_client_cert(&cert, &[], UnixTime::now());
        assert!(verdict.is_ok());
    }
}
