//! NTLMSSP authentication (component E, SessionSetup).
//!
//! NTLM blob parsing and the MD4/DES math underlying NTLMv1 are leaf dependencies per the
//! purpose statement's scope cut, modeled as injected trait objects rather than hand-rolled
//! here. HMAC-MD5 (NTLMv2) and the session-key KDF are in scope and implemented directly.

use hmac::{Hmac, Mac};
use md5::Md5;

type HmacMd5 = Hmac<Md5>;

/// Parses `NEGOTIATE_MESSAGE`/`AUTHENTICATE_MESSAGE` blobs. A leaf dependency: this core
/// only needs the fields below, not a full NTLMSSP implementation.
pub trait NtlmMessageCodec: Send + Sync {
    fn parse_authenticate(&self, blob: &[u8]) -> Option<AuthenticateFields>;
    fn build_challenge(&self, server_challenge: [u8; 8], target_name: &str) -> Vec<u8>;
}

/// Fields extracted from a client `AUTHENTICATE_MESSAGE` needed to verify a login.
pub struct AuthenticateFields {
    pub user_name: String,
    pub domain_name: String,
    pub nt_challenge_response: Vec<u8>,
}

/// NTLMv1's `DES(expand(NTHash || 5x0), challenge)` step and the MD4 hash of a password; a
/// leaf dependency (MD4/DES math) per the purpose statement.
pub trait NtHashCipher: Send + Sync {
    /// `DES(expand(key16 || 5x0), challenge)`, split into three 8-byte DES-ECB blocks as
    /// MS-NLMP 3.3.1 describes, producing the 24-byte NTLMv1 response.
    fn des_long(&self, key16: &[u8; 16], challenge: &[u8; 8]) -> [u8; 24];
}

/// `HMAC-MD5(NTHash, UNICODE(upper(username) || domain))` — the NTLMv2 per-user key.
pub fn ntlmv2_key(nt_hash: &[u8; 16], username: &str, domain: &str) -> [u8; 16] {
    let mut mac = HmacMd5::new_from_slice(nt_hash).expect("HMAC accepts any key length");
    let upper_user: Vec<u16> = username.to_uppercase().encode_utf16().collect();
    for u in &upper_user {
        mac.update(&u.to_le_bytes());
    }
    let domain_units: Vec<u16> = domain.encode_utf16().collect();
    for u in &domain_units {
        mac.update(&u.to_le_bytes());
    }
    mac.finalize().into_bytes().into()
}

/// Verifies an NTLMv2 response: `HMAC-MD5(key, challenge || blob)`, compared against the
/// first 16 bytes of `nt_challenge_response`.
pub fn verify_ntlmv2(
    nt_hash: &[u8; 16],
    username: &str,
    domain: &str,
    server_challenge: &[u8; 8],
    nt_challenge_response: &[u8],
) -> bool {
    if nt_challenge_response.len() < 16 {
        return false;
    }
    let (client_hmac, blob) = nt_challenge_response.split_at(16);
    let key = ntlmv2_key(nt_hash, username, domain);
    let mut mac = HmacMd5::new_from_slice(&key).expect("HMAC accepts any key length");
    mac.update(server_challenge);
    mac.update(blob);
    let expected = mac.finalize().into_bytes();
    expected.as_slice() == client_hmac
}

/// Verifies an NTLMv1 response (exactly 24 bytes: three DES-ECB blocks).
pub fn verify_ntlmv1(
    cipher: &dyn NtHashCipher,
    nt_hash: &[u8; 16],
    server_challenge: &[u8; 8],
    nt_challenge_response: &[u8],
) -> bool {
    if nt_challenge_response.len() != 24 {
        return false;
    }
    cipher.des_long(nt_hash, server_challenge).as_slice() == nt_challenge_response
}

/// The 16-byte session key derived once authentication succeeds: `HMAC-MD5(ntlmv2_key,
/// nt_proof_str)` for NTLMv2, or the NT hash itself for NTLMv1 (no key exchange negotiated).
pub fn session_key_v2(key: &[u8; 16], nt_proof_str: &[u8]) -> [u8; 16] {
    let mut mac = HmacMd5::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(nt_proof_str);
    mac.finalize().into_bytes().into()
}

/// A codec that parses nothing and builds an empty challenge; the SPNEGO/NTLMSSP ASN.1
/// framing this trait abstracts over is a leaf dependency with no default worth faking, so
/// a deployment that wants real authentication must inject its own codec (mirrors
/// [`crate::pipe::NullPipeHandler`]'s role for `PipeHandler`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNtlmCodec;

impl NtlmMessageCodec for NullNtlmCodec {
    fn parse_authenticate(&self, _blob: &[u8]) -> Option<AuthenticateFields> {
        None
    }

    fn build_challenge(&self, _server_challenge: [u8; 8], _target_name: &str) -> Vec<u8> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntlmv2_key_is_deterministic() {
        let hash = [0x11u8; 16];
        let a = ntlmv2_key(&hash, "alice", "WORKGROUP");
        let b = ntlmv2_key(&hash, "alice", "WORKGROUP");
        assert_eq!(a, b);
    }

    #[test]
    fn ntlmv2_key_depends_on_username_case() {
        let hash = [0x11u8; 16];
        let a = ntlmv2_key(&hash, "alice", "WORKGROUP");
        let b = ntlmv2_key(&hash, "bob", "WORKGROUP");
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_short_ntlmv2_response() {
        let hash = [0u8; 16];
        assert!(!verify_ntlmv2(&hash, "alice", "WORKGROUP", &[0u8; 8], &[0u8; 8]));
    }

    #[test]
    fn verify_ntlmv2_round_trip() {
        let hash = [0x42u8; 16];
        let challenge = [0x01u8; 8];
        let key = ntlmv2_key(&hash, "alice", "WORKGROUP");
        let blob = b"client-blob-bytes".to_vec();
        let mut mac = HmacMd5::new_from_slice(&key).unwrap();
        mac.update(&challenge);
        mac.update(&blob);
        let proof = mac.finalize().into_bytes();
        let mut response = proof.to_vec();
        response.extend_from_slice(&blob);
        assert!(verify_ntlmv2(&hash, "alice", "WORKGROUP", &challenge, &response));
    }

    #[test]
    fn null_codec_parses_nothing() {
        let codec = NullNtlmCodec;
        assert!(codec.parse_authenticate(b"anything").is_none());
        assert!(codec.build_challenge([0; 8], "SERVER").is_empty());
    }
}
