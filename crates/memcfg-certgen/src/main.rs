//! certgen - certificate generation and verification CLI
//!
//! Thin glue over rcgen and x509-parser: issues X.509 certificates from
//! a TOML description, verifies signatures and public keys of existing
//! certificates, and converts between PEM and DER encodings.

mod certcfg;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use x509_parser::prelude::{FromDer, SubjectPublicKeyInfo, X509Certificate};

use certcfg::{CertConfig, CertError, CONFIG_TEMPLATE};

#[derive(Parser)]
#[command(name = "certgen")]
#[command(author, version, about = "X.509 certificate generator and verifier", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Certificate file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Encoding {
    /// PEM ("-----BEGIN CERTIFICATE-----")
    Pem,
    /// Raw DER bytes
    Der,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a certificate from a TOML configuration
    Generate {
        /// Configuration file (see get-template)
        #[arg(short, long)]
        config: PathBuf,

        /// Output certificate path
        #[arg(short, long)]
        output: PathBuf,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = Encoding::Pem)]
        encoding: Encoding,
    },

    /// Verify the signature or the public key of a certificate
    Verify {
        /// Certificate to verify (PEM or DER)
        #[arg(short, long)]
        certificate: PathBuf,

        /// Public key (PEM) to verify the certificate signature with
        #[arg(short, long)]
        sign: Option<PathBuf>,

        /// Public key (PEM) to compare against the certificate's key
        #[arg(short, long)]
        puk: Option<PathBuf>,
    },

    /// Convert a certificate between PEM and DER
    Convert {
        /// Target encoding
        #[arg(short, long, value_enum)]
        encoding: Encoding,

        /// Input certificate (PEM or DER)
        #[arg(short, long)]
        input: PathBuf,

        /// Output certificate path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write an annotated configuration template
    GetTemplate {
        /// Output template path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.verbose {
        0 => {}
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let result = match cli.command {
        Commands::Generate {
            config,
            output,
            encoding,
        } => generate(&config, &output, encoding),
        Commands::Verify {
            certificate,
            sign,
            puk,
        } => verify(&certificate, sign.as_deref(), puk.as_deref()),
        Commands::Convert {
            encoding,
            input,
            output,
        } => convert(encoding, &input, &output),
        Commands::GetTemplate { output } => get_template(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(config: &Path, output: &Path, encoding: Encoding) -> Result<(), CertError> {
    log::info!("Loading configuration from {}", config.display());
    let text = fs::read_to_string(config)?;
    let cfg: CertConfig =
        toml::from_str(&text).map_err(|e| CertError::Config(e.to_string()))?;

    // Key paths are resolved relative to the configuration file.
    let base = config.parent().unwrap_or_else(|| Path::new("."));
    let issued = certcfg::issue(&cfg, base)?;

    match encoding {
        Encoding::Pem => fs::write(output, issued.certificate.pem())?,
        Encoding::Der => fs::write(output, issued.certificate.der().as_ref())?,
    }
    if let Some(key_pem) = issued.generated_subject_key {
        let key_path = output.with_extension("key.pem");
        fs::write(&key_path, key_pem)?;
        println!("The subject key file has been created: {}", key_path.display());
    }
    println!("The certificate file has been created: {}", output.display());
    Ok(())
}

fn verify(certificate: &Path, sign: Option<&Path>, puk: Option<&Path>) -> Result<(), CertError> {
    if sign.is_none() && puk.is_none() {
        return Err(CertError::Config(
            "nothing to verify, pass --sign and/or --puk".to_string(),
        ));
    }

    log::info!("Loading certificate from {}", certificate.display());
    let der = read_certificate_der(certificate)?;
    let (_, cert) = X509Certificate::from_der(&der)
        .map_err(|e| CertError::Verify(format!("malformed certificate: {e}")))?;

    if let Some(key_path) = sign {
        let spki_der = read_public_key_der(key_path)?;
        let (_, spki) = SubjectPublicKeyInfo::from_der(&spki_der)
            .map_err(|e| CertError::Verify(format!("malformed public key: {e}")))?;
        cert.verify_signature(Some(&spki))
            .map_err(|_| CertError::Verify("invalid signature".to_string()))?;
        println!("Signature is OK");
    }

    if let Some(key_path) = puk {
        let spki_der = read_public_key_der(key_path)?;
        if cert.public_key().raw == spki_der.as_slice() {
            println!("Public key in certificate matches the input");
        } else {
            return Err(CertError::Verify(
                "public key in certificate differs from the input".to_string(),
            ));
        }
    }
    Ok(())
}

fn convert(encoding: Encoding, input: &Path, output: &Path) -> Result<(), CertError> {
    let der = read_certificate_der(input)?;
    match encoding {
        Encoding::Der => fs::write(output, der)?,
        Encoding::Pem => {
            let block = pem::Pem::new("CERTIFICATE", der);
            fs::write(output, pem::encode(&block))?;
        }
    }
    println!("The certificate file has been created: {}", output.display());
    Ok(())
}

fn get_template(output: &Path) -> Result<(), CertError> {
    fs::write(output, CONFIG_TEMPLATE)?;
    println!(
        "The configuration template file has been created: {}",
        output.display()
    );
    Ok(())
}

/// Read a certificate file as raw DER, unwrapping PEM when present
fn read_certificate_der(path: &Path) -> Result<Vec<u8>, CertError> {
    let bytes = fs::read(path)?;
    if bytes.starts_with(b"-----BEGIN") {
        let block = pem::parse(&bytes)?;
        Ok(block.into_contents())
    } else {
        Ok(bytes)
    }
}

/// Read a PEM public key file as raw SubjectPublicKeyInfo DER
fn read_public_key_der(path: &Path) -> Result<Vec<u8>, CertError> {
    let bytes = fs::read(path)?;
    let block = pem::parse(&bytes)?;
    if block.tag() != "PUBLIC KEY" {
        return Err(CertError::Config(format!(
            "{} is not a public key file (found '{}' block)",
            path.display(),
            block.tag()
        )));
    }
    Ok(block.into_contents())
}
