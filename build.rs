use dotenv::dotenv;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

struct AppMetadata {
    file: std::fs::File,
}

impl AppMetadata {
    pub fn new() -> io::Result<Self> {
        let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
        let dest_path = Path::new(&out_dir).join("app_metadata.rs");
        let file = File::create(&dest_path)?;
        Ok(Self { file })
    }

    pub fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        writeln!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &str = {:?};",
            &key.to_uppercase(),
            value
        )
    }

    pub fn write_bytes(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        write!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &[",
            &key.to_uppercase(),
            value.len()
        )?;

        for (i, byte) in value.iter().enumerate() {
            if i > 0 {
                write!(self.file, ", ")?;
            }
            write!(self.file, "{}", byte)?;
        }

        writeln!(self.file, "];")
    }
}

/// Pads or truncates `seed` to exactly `len` bytes.
fn fixed_len(mut seed: String, len: usize) -> Vec<u8> {
    seed.truncate(len);
    while seed.len() < len {
        seed.push('!');
    }
    seed.into_bytes()
}

fn main() -> io::Result<()> {
    // Load .env file if it exists
    let _ = dotenv();
    println!("cargo:rerun-if-env-changed=TODOER_ENCRYPTION_KEY");
    println!("cargo:rerun-if-env-changed=TODOER_ENCRYPTION_IV");

    let package_name = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "todoer".to_string());
    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    let mut app_metadata = AppMetadata::new()?;
    app_metadata.write("NAME", &package_name)?;
    app_metadata.write("VERSION", &package_version)?;

    // The persisted session is encrypted with these; they must be stable across builds.
    let (encryption_key, encryption_iv) = match (env::var("TODOER_ENCRYPTION_KEY"), env::var("TODOER_ENCRYPTION_IV")) {
        (Ok(key), Ok(iv)) => {
            if key.len() != 32 {
                panic!("TODOER_ENCRYPTION_KEY must be exactly 32 bytes long, got {} bytes", key.len());
            }
            if iv.len() != 16 {
                panic!("TODOER_ENCRYPTION_IV must be exactly 16 bytes long, got {} bytes", iv.len());
            }
            (key.into_bytes(), iv.into_bytes())
        }
        _ => {
            println!("cargo:warning=TODOER_ENCRYPTION_KEY or TODOER_ENCRYPTION_IV not found in environment.");
            println!("cargo:warning=Using package-derived keys for the session vault.");
            (
                fixed_len(format!("{}_session_vault_key", package_name), 32),
                fixed_len(format!("{}_vault_iv", package_name), 16),
            )
        }
    };

    app_metadata.write_bytes("ENCRYPTION_KEY", &encryption_key)?;
    app_metadata.write_bytes("ENCRYPTION_IV", &encryption_iv)?;

    Ok(())
}
