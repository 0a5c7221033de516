use std::{
    fs::File,
    io::{ErrorKind, Read},
    path::Path,
};

use crate::error::ConfigError;

static PEPPER: &str = "pandas_gallery_pepper";
static COOKIE_KEY: &str = "pandas_gallery_cookie_key";

/// Key material kept out of the environment and the database.
pub struct Secrets {
    pub pepper: [u8; 32],
    pub cookie_key: [u8; 32],
}

impl Secrets {
    // these secret values are loaded from /run/secrets (or SECRETS_DIR) at runtime
    pub fn load(dir: &Path) -> Result<Secrets, ConfigError> {
        Ok(Secrets {
            pepper: secret(dir, PEPPER)?,
            cookie_key: secret(dir, COOKIE_KEY)?,
        })
    }

    // we don't have access to Docker secrets in the test environment, so we hardcode
    // a different set of secrets to be used in test builds.
    #[cfg(test)]
    pub fn for_tests() -> Secrets {
        Secrets {
            pepper: *b"NAqdplo5YPcZ84UbCCvWH9OOTJOXAEzr",
            cookie_key: *b"ChzeqPjoSsrdO5xZ14gMoaW67yMn5Ev1",
        }
    }
}

/// Read the first 32 bytes of the named secret file.
fn secret(dir: &Path, name: &str) -> Result<[u8; 32], ConfigError> {
    let path = dir.join(name);

    let mut f = File::open(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::MissingSecret {
            name: name.to_string(),
            path: path.clone(),
        },
        _ => ConfigError::Secret {
            path: path.clone(),
            source: e,
        },
    })?;

    let mut data = [0; 32];
    f.read_exact(&mut data)
        .map_err(|source| ConfigError::Secret { path, source })?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_both_secrets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PEPPER), [7u8; 40]).unwrap();
        fs::write(dir.path().join(COOKIE_KEY), [9u8; 32]).unwrap();

        let secrets = Secrets::load(dir.path()).unwrap();
        assert_eq!(secrets.pepper, [7u8; 32]);
        assert_eq!(secrets.cookie_key, [9u8; 32]);
    }

    #[test]
    fn missing_secret_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PEPPER), [7u8; 32]).unwrap();

        match Secrets::load(dir.path()) {
            Err(ConfigError::MissingSecret { name, .. }) => assert_eq!(name, COOKIE_KEY),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("loaded without a cookie key"),
        }
    }

    #[test]
    fn short_secret_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PEPPER), b"too short").unwrap();
        fs::write(dir.path().join(COOKIE_KEY), [9u8; 32]).unwrap();

        assert!(matches!(
            Secrets::load(dir.path()),
            Err(ConfigError::Secret { .. })
        ));
    }
}
