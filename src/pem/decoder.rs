use ring::signature::{KeyPair, RsaKeyPair};
use simple_asn1::ASN1Block;

use crate::error::{ErrorDetails, Result, SignError};

/// Supported PEM files for RSA Public and Private Keys
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum PemType {
    RsaPublic,
    RsaPrivate,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Standard {
    Pkcs1,
    // Also covers X.509 certificates, whose public key is a SubjectPublicKeyInfo
    Pkcs8,
}

fn key_error(desc: impl Into<String>) -> crate::error::Error {
    SignError::KeyParseFailure(ErrorDetails::new(desc)).into()
}

/// An RSA key read from PEM encoded key material
///
/// PEM public private keys are encoded PKCS#1 or PKCS#8
/// You will find that with PKCS#8 RSA keys that the PKCS#1 content
/// is embedded inside. This is what is handed to ring.
/// Documentation about these formats is at
/// PKCS#1: https://tools.ietf.org/html/rfc8017
/// PKCS#8: https://tools.ietf.org/html/rfc5958
#[derive(Debug)]
pub(crate) struct PemEncodedKey {
    content: Vec<u8>,
    asn1: Vec<ASN1Block>,
    pem_type: PemType,
    standard: Standard,
}

impl PemEncodedKey {
    /// Read the PEM file for later key use
    pub fn new(input: &[u8]) -> Result<PemEncodedKey> {
        let content = pem::parse(input).map_err(|e| {
            SignError::KeyParseFailure(ErrorDetails::map("Failed to parse PEM file", Box::new(e)))
        })?;
        let asn1 = simple_asn1::from_der(content.contents()).map_err(|e| {
            SignError::KeyParseFailure(ErrorDetails::map("Failed to parse PEM file", Box::new(e)))
        })?;

        let (pem_type, standard) = match content.tag() {
            "RSA PRIVATE KEY" => (PemType::RsaPrivate, Standard::Pkcs1),
            "RSA PUBLIC KEY" => (PemType::RsaPublic, Standard::Pkcs1),

            // PKCS#8 wraps the key with an algorithm identifier which has to be RSA
            tag @ ("PRIVATE KEY" | "PUBLIC KEY" | "CERTIFICATE") => {
                if !is_rsa(&asn1) {
                    return Err(key_error("Expected an RSA key in PKCS#8 PEM file"));
                }
                let pem_type = if tag == "PRIVATE KEY" {
                    PemType::RsaPrivate
                } else {
                    PemType::RsaPublic
                };
                (pem_type, Standard::Pkcs8)
            }

            "EC PRIVATE KEY" => return Err(key_error("EC keys are not supported")),
            _ => {
                return Err(key_error(
                    "Failed to recognize PKCS#1 or PKCS#8 markers in PEM file",
                ))
            }
        };

        Ok(PemEncodedKey {
            content: content.into_contents(),
            asn1,
            pem_type,
            standard,
        })
    }

    pub fn is_private(&self) -> bool {
        self.pem_type == PemType::RsaPrivate
    }

    /// The DER encoded RSAPublicKey
    pub fn as_rsa_public_key(&self) -> Result<&[u8]> {
        match (self.pem_type, self.standard) {
            (PemType::RsaPublic, Standard::Pkcs1) => Ok(self.content.as_slice()),
            (PemType::RsaPublic, Standard::Pkcs8) => extract_first_bitstring(&self.asn1),
            _ => Err(key_error("PEM key type mismatch (expected RSA public key)")),
        }
    }

    /// The DER encoded RSAPrivateKey
    pub fn as_rsa_private_key(&self) -> Result<&[u8]> {
        match (self.pem_type, self.standard) {
            (PemType::RsaPrivate, Standard::Pkcs1) => Ok(self.content.as_slice()),
            (PemType::RsaPrivate, Standard::Pkcs8) => extract_first_bitstring(&self.asn1),
            _ => Err(key_error("PEM key type mismatch (expected RSA private key)")),
        }
    }

    pub fn rsa_key_pair(&self) -> Result<RsaKeyPair> {
        RsaKeyPair::from_der(self.as_rsa_private_key()?).map_err(|e| {
            SignError::KeyParseFailure(ErrorDetails::map(
                "Failed to create RSA key pair",
                Box::new(e),
            ))
            .into()
        })
    }

    /// The DER encoded RSAPublicKey, derived from the private key if that's what we have
    pub fn rsa_public_key(&self) -> Result<Vec<u8>> {
        if self.is_private() {
            let key_pair = self.rsa_key_pair()?;
            Ok(key_pair.public_key().as_ref().to_vec())
        } else {
            Ok(self.as_rsa_public_key()?.to_vec())
        }
    }
}

// This really just finds and returns the first bitstring or octet string
// Which is the DER contents of an RSA key for PKCS#8 and SubjectPublicKeyInfo
fn extract_first_bitstring(asn1: &[ASN1Block]) -> Result<&[u8]> {
    for asn1_entry in asn1.iter() {
        match asn1_entry {
            ASN1Block::Sequence(_, entries) => {
                if let Ok(result) = extract_first_bitstring(entries) {
                    return Ok(result);
                }
            }
            ASN1Block::BitString(_, _, value) => {
                return Ok(value.as_ref());
            }
            ASN1Block::OctetString(_, value) => {
                return Ok(value.as_ref());
            }
            _ => (),
        }
    }

    Err(key_error("Failed to extract ASN.1 bit string"))
}

/// Whether the rsaEncryption OID appears in the key's algorithm identifier
fn is_rsa(asn1: &[ASN1Block]) -> bool {
    let rsa_public_key_oid = simple_asn1::oid!(1, 2, 840, 113_549, 1, 1, 1);

    asn1.iter().any(|asn1_entry| match asn1_entry {
        ASN1Block::Sequence(_, entries) => is_rsa(entries),
        ASN1Block::ObjectIdentifier(_, oid) => *oid == rsa_public_key_oid,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn garbage_is_a_key_parse_failure() {
        assert!(matches!(
            PemEncodedKey::new(b"not a pem file"),
            Err(Error::Sign(SignError::KeyParseFailure(_)))
        ));
    }

    #[test]
    fn unknown_pem_tag() {
        let input = b"-----BEGIN SOMETHING ELSE-----\nMAA=\n-----END SOMETHING ELSE-----\n";
        assert!(matches!(
            PemEncodedKey::new(input),
            Err(Error::Sign(SignError::KeyParseFailure(_)))
        ));
    }
}
