use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jobwatch_core::CompanyRegistry;
use jobwatch_logging::{watch_info, watch_warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read company registry {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("company registry {path:?} is not a name-to-url object: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the watched companies from a JSON object of `name -> career page url`.
///
/// A missing file yields an empty registry. A file that exists but does not
/// parse is an error.
pub fn load_registry(path: &Path) -> Result<CompanyRegistry, RegistryError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            watch_warn!("Company registry {:?} not found; nothing to watch", path);
            return Ok(CompanyRegistry::new());
        }
        Err(source) => {
            return Err(RegistryError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let registry: CompanyRegistry =
        serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    watch_info!("Loaded {} companies from {:?}", registry.len(), path);
    Ok(registry)
}
