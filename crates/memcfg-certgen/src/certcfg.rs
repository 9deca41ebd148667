//! Certificate configuration and issuance
//!
//! The TOML configuration names the issuer key, the subject key (or
//! asks for a fresh one), the distinguished names and a few extensions;
//! issuance itself is rcgen.

use std::fs;
use std::path::{Path, PathBuf};

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose, SerialNumber,
};
use time::{Duration, OffsetDateTime};

/// Error type of the certgen tool
#[derive(Debug, thiserror::Error)]
pub enum CertError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// rcgen refused the key or parameters
    #[error("certificate generation failed: {0}")]
    Rcgen(#[from] rcgen::Error),
    /// PEM decoding failed
    #[error("PEM error: {0}")]
    Pem(#[from] pem::PemError),
    /// Configuration file problem
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Verification failed
    #[error("verification failed: {0}")]
    Verify(String),
}

/// TOML certificate description
#[derive(Debug, serde::Deserialize)]
pub struct CertConfig {
    /// Path to the issuer private key (PEM), relative to the config file
    pub issuer_private_key: PathBuf,
    /// Path to the subject private key (PEM); a fresh key pair is
    /// generated when absent
    pub subject_key: Option<PathBuf>,
    /// Certificate serial number
    pub serial_number: Option<u64>,
    /// Validity window in days (default 3650)
    pub duration_days: Option<u32>,
    /// Issuer distinguished name components
    pub issuer: toml::Table,
    /// Subject distinguished name components
    pub subject: toml::Table,
    /// Certificate extensions
    #[serde(default)]
    pub extensions: Extensions,
}

/// Supported certificate extensions
#[derive(Debug, Default, serde::Deserialize)]
pub struct Extensions {
    /// Mark the certificate as a CA (basic constraints)
    #[serde(default)]
    pub ca: bool,
    /// Optional CA path length constraint
    pub path_length: Option<u8>,
    /// Key usage purposes
    #[serde(default)]
    pub key_usage: Vec<String>,
}

/// Result of an issuance
pub struct Issued {
    /// The signed certificate
    pub certificate: Certificate,
    /// PEM of the generated subject key, when none was configured
    pub generated_subject_key: Option<String>,
}

/// Issue a certificate, loading keys relative to `base`
pub fn issue(cfg: &CertConfig, base: &Path) -> Result<Issued, CertError> {
    let issuer_key = load_key(&base.join(&cfg.issuer_private_key))?;
    let (subject_key, generated) = match &cfg.subject_key {
        Some(path) => (load_key(&base.join(path))?, None),
        None => {
            log::info!("No subject key configured, generating a fresh key pair");
            let key = KeyPair::generate()?;
            let pem = key.serialize_pem();
            (key, Some(pem))
        }
    };
    let certificate = issue_with_keys(cfg, &issuer_key, &subject_key)?;
    Ok(Issued {
        certificate,
        generated_subject_key: generated,
    })
}

/// Issue a certificate from in-memory keys
pub fn issue_with_keys(
    cfg: &CertConfig,
    issuer_key: &KeyPair,
    subject_key: &KeyPair,
) -> Result<Certificate, CertError> {
    // rcgen signs against an issuer certificate; build an ephemeral
    // self-signed one carrying the configured issuer name.
    let mut issuer_params = CertificateParams::default();
    issuer_params.distinguished_name = build_name(&cfg.issuer)?;
    issuer_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let issuer_cert = issuer_params.self_signed(issuer_key)?;

    let params = build_params(cfg)?;
    Ok(params.signed_by(subject_key, &issuer_cert, issuer_key)?)
}

/// Build the subject certificate parameters from the configuration
pub fn build_params(cfg: &CertConfig) -> Result<CertificateParams, CertError> {
    let mut params = CertificateParams::default();
    params.distinguished_name = build_name(&cfg.subject)?;

    let not_before = OffsetDateTime::now_utc() - Duration::minutes(5);
    let days = cfg.duration_days.unwrap_or(3650);
    if days == 0 {
        return Err(CertError::Config(
            "duration_days must be greater than zero".to_string(),
        ));
    }
    params.not_before = not_before;
    params.not_after = not_before + Duration::days(days.into());

    if let Some(serial) = cfg.serial_number {
        params.serial_number = Some(SerialNumber::from(serial.to_be_bytes().to_vec()));
    }

    params.is_ca = match (cfg.extensions.ca, cfg.extensions.path_length) {
        (true, Some(depth)) => IsCa::Ca(BasicConstraints::Constrained(depth)),
        (true, None) => IsCa::Ca(BasicConstraints::Unconstrained),
        (false, _) => IsCa::ExplicitNoCa,
    };
    params.key_usages = cfg
        .extensions
        .key_usage
        .iter()
        .map(|name| key_usage(name))
        .collect::<Result<_, _>>()?;
    Ok(params)
}

/// Map configuration DN keys onto X.509 name components
fn build_name(components: &toml::Table) -> Result<DistinguishedName, CertError> {
    let mut dn = DistinguishedName::new();
    for (key, value) in components {
        let dn_type = match key.as_str() {
            "COMMON_NAME" => DnType::CommonName,
            "COUNTRY_NAME" => DnType::CountryName,
            "LOCALITY_NAME" => DnType::LocalityName,
            "STATE_OR_PROVINCE_NAME" => DnType::StateOrProvinceName,
            "ORGANIZATION_NAME" => DnType::OrganizationName,
            "ORGANIZATION_UNIT_NAME" => DnType::OrganizationalUnitName,
            other => {
                return Err(CertError::Config(format!(
                    "unknown name component '{other}'"
                )))
            }
        };
        let toml::Value::String(value) = value else {
            return Err(CertError::Config(format!(
                "name component '{key}' must be a string"
            )));
        };
        dn.push(dn_type, value.clone());
    }
    Ok(dn)
}

fn key_usage(name: &str) -> Result<KeyUsagePurpose, CertError> {
    Ok(match name {
        "digital_signature" => KeyUsagePurpose::DigitalSignature,
        "content_commitment" => KeyUsagePurpose::ContentCommitment,
        "key_encipherment" => KeyUsagePurpose::KeyEncipherment,
        "data_encipherment" => KeyUsagePurpose::DataEncipherment,
        "key_agreement" => KeyUsagePurpose::KeyAgreement,
        "key_cert_sign" => KeyUsagePurpose::KeyCertSign,
        "crl_sign" => KeyUsagePurpose::CrlSign,
        other => {
            return Err(CertError::Config(format!(
                "unknown key usage '{other}'"
            )))
        }
    })
}

fn load_key(path: &Path) -> Result<KeyPair, CertError> {
    let pem = fs::read_to_string(path)?;
    Ok(KeyPair::from_pem(&pem)?)
}

/// Annotated configuration template written by `get-template`
pub const CONFIG_TEMPLATE: &str = r#"# Certificate generation configuration.
# Paths are resolved relative to this file.

# Private key (PEM) used to sign the certificate.
issuer_private_key = "ca.key.pem"
# Private key (PEM) of the certificate holder. Remove this line to have
# a fresh key pair generated next to the output certificate.
subject_key = "subject.key.pem"
# Certificate serial number. Remove for an unset serial.
serial_number = 12345678
# Validity window in days.
duration_days = 3650

[issuer]
COMMON_NAME = "Example CA"
COUNTRY_NAME = "US"
ORGANIZATION_NAME = "Example Corp"

[subject]
COMMON_NAME = "Example Subject"
COUNTRY_NAME = "US"
ORGANIZATION_NAME = "Example Corp"

[extensions]
# Basic constraints: CA flag and optional path length.
ca = true
path_length = 3
# Any of: digital_signature, content_commitment, key_encipherment,
# data_encipherment, key_agreement, key_cert_sign, crl_sign.
key_usage = ["digital_signature", "key_cert_sign", "crl_sign"]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use x509_parser::prelude::{FromDer, SubjectPublicKeyInfo, X509Certificate};

    fn template_config() -> CertConfig {
        toml::from_str(CONFIG_TEMPLATE).unwrap()
    }

    #[test]
    fn template_parses() {
        let cfg = template_config();
        assert_eq!(cfg.duration_days, Some(3650));
        assert_eq!(cfg.serial_number, Some(12345678));
        assert!(cfg.extensions.ca);
        assert_eq!(cfg.extensions.key_usage.len(), 3);
    }

    #[test]
    fn unknown_name_component_is_rejected() {
        let mut components = toml::Table::new();
        components.insert(
            "FAVOURITE_COLOUR".to_string(),
            toml::Value::String("blue".to_string()),
        );
        assert!(matches!(
            build_name(&components),
            Err(CertError::Config(_))
        ));
    }

    #[test]
    fn unknown_key_usage_is_rejected() {
        let mut cfg = template_config();
        cfg.extensions.key_usage.push("teleportation".to_string());
        assert!(matches!(build_params(&cfg), Err(CertError::Config(_))));
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let cfg = template_config();
        let issuer_key = KeyPair::generate().unwrap();
        let subject_key = KeyPair::generate().unwrap();

        let issued = issue_with_keys(&cfg, &issuer_key, &subject_key).unwrap();
        let issued_der = issued.der().as_ref().to_vec();
        let (_, cert) = X509Certificate::from_der(&issued_der).unwrap();
        assert!(cert.is_ca());

        // the issuer's public key validates the signature
        let mut issuer_params = CertificateParams::default();
        issuer_params.distinguished_name = build_name(&cfg.issuer).unwrap();
        let issuer_cert = issuer_params.self_signed(&issuer_key).unwrap();
        let issuer_der = issuer_cert.der().as_ref().to_vec();
        let (_, issuer_parsed) = X509Certificate::from_der(&issuer_der).unwrap();
        let spki_der = issuer_parsed.public_key().raw.to_vec();
        let (_, spki) = SubjectPublicKeyInfo::from_der(&spki_der).unwrap();
        cert.verify_signature(Some(&spki)).unwrap();

        // while the subject's public key does not
        let wrong = subject_key_spki(&subject_key, &cfg);
        let (_, wrong_spki) = SubjectPublicKeyInfo::from_der(&wrong).unwrap();
        assert!(cert.verify_signature(Some(&wrong_spki)).is_err());
    }

    /// Extract a key pair's SPKI DER via a throwaway self-signed cert
    fn subject_key_spki(key: &KeyPair, cfg: &CertConfig) -> Vec<u8> {
        let mut params = CertificateParams::default();
        params.distinguished_name = build_name(&cfg.subject).unwrap();
        let cert = params.self_signed(key).unwrap();
        let der = cert.der().as_ref().to_vec();
        let (_, parsed) = X509Certificate::from_der(&der).unwrap();
        parsed.public_key().raw.to_vec()
    }
}
