use anyhow::{Context, Result};
use common::{LoadOptions, ReplayError, ReplayStore};
use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub struct ReplayReader;

impl ReplayReader {
    /// Loads `path` into `store`, leaving the store untouched on failure.
    ///
    /// Files ending in `.gz` are decompressed on the fly.
    pub fn load_into(store: &mut ReplayStore, path: &Path) -> Result<(), ReplayError> {
        if !Self::is_gzipped(path) {
            return store.load(path);
        }

        debug!("Reading gzip-compressed replay {:?}", path);
        let file = File::open(path).map_err(|source| ReplayError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(GzDecoder::new(file));
        store.load_from_reader(path.display().to_string(), reader)
    }

    pub fn load_replay(path: &Path, options: LoadOptions) -> Result<ReplayStore> {
        let mut store = ReplayStore::with_options(options);
        Self::load_into(&mut store, path)
            .with_context(|| format!("Failed to load replay file: {:?}", path))?;
        Ok(store)
    }

    fn is_gzipped(path: &Path) -> bool {
        path.extension() == Some(OsStr::new("gz"))
    }
}
