//! Memoized loading of the tile set and the dictionary.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;
use tracing::{debug, info};
use wordgrid_core::{Dictionary, PieceSet};

/// Location of the tile frequency table below an asset root.
pub const PIECES_PATH: &str = "data/pieces.json";
/// Location of the word list below an asset root.
pub const DICTIONARY_PATH: &str = "data/dictionary.txt";

/// Failure to obtain a game asset. Fatal to starting a game.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset does not exist.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    /// The asset exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// Path of the asset.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The tile frequency table is malformed.
    #[error("failed to parse {}", path.display())]
    Pieces {
        /// Path of the asset.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Raw text provider for the game assets.
pub trait AssetSource {
    /// Fetches the asset stored at `relative`.
    fn fetch(&self, relative: &Path) -> Result<String, AssetError>;
}

/// Reads assets from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the assets are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, relative: &Path) -> Result<String, AssetError> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AssetError::NotFound(path)
            } else {
                AssetError::Read { path, source }
            }
        })
    }
}

/// Loads each asset at most once after its first success.
///
/// Failed loads are not cached, so a later call retries the source.
#[derive(Debug)]
pub struct AssetLoader<S> {
    source: S,
    pieces: Option<Arc<PieceSet>>,
    dictionary: Option<Arc<Dictionary>>,
}

impl<S: AssetSource> AssetLoader<S> {
    /// Creates a loader with an empty cache.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            pieces: None,
            dictionary: None,
        }
    }

    /// Source backing the loader.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Tile frequency table, fetched on first use.
    pub fn pieces(&mut self) -> Result<Arc<PieceSet>, AssetError> {
        if let Some(pieces) = &self.pieces {
            return Ok(Arc::clone(pieces));
        }

        let path = Path::new(PIECES_PATH);
        let text = self.source.fetch(path)?;
        let pieces: PieceSet =
            serde_json::from_str(&text).map_err(|source| AssetError::Pieces {
                path: path.to_path_buf(),
                source,
            })?;
        info!(tiles = pieces.total_tiles(), "loaded pieces");
        let pieces = Arc::new(pieces);
        self.pieces = Some(Arc::clone(&pieces));
        Ok(pieces)
    }

    /// Word list, fetched on first use.
    pub fn dictionary(&mut self) -> Result<Arc<Dictionary>, AssetError> {
        if let Some(dictionary) = &self.dictionary {
            return Ok(Arc::clone(dictionary));
        }

        let text = self.source.fetch(Path::new(DICTIONARY_PATH))?;
        let dictionary = Arc::new(Dictionary::from_word_list(&text));
        info!(words = dictionary.len(), "loaded dictionary");
        self.dictionary = Some(Arc::clone(&dictionary));
        Ok(dictionary)
    }

    /// Both assets, pieces first.
    pub fn load(&mut self) -> Result<(Arc<PieceSet>, Arc<Dictionary>), AssetError> {
        let pieces = self.pieces()?;
        let dictionary = self.dictionary()?;
        debug!("assets ready");
        Ok((pieces, dictionary))
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap};

    use super::*;

    #[derive(Default)]
    struct CountingSource {
        files: HashMap<PathBuf, String>,
        fetches: RefCell<Vec<PathBuf>>,
    }

    impl CountingSource {
        fn with(mut self, path: &str, text: &str) -> Self {
            let _ = self.files.insert(PathBuf::from(path), text.to_owned());
            self
        }

        fn fetch_count(&self, path: &str) -> usize {
            self.fetches
                .borrow()
                .iter()
                .filter(|fetched| fetched.as_path() == Path::new(path))
                .count()
        }
    }

    impl AssetSource for CountingSource {
        fn fetch(&self, relative: &Path) -> Result<String, AssetError> {
            self.fetches.borrow_mut().push(relative.to_path_buf());
            self.files
                .get(relative)
                .cloned()
                .ok_or_else(|| AssetError::NotFound(relative.to_path_buf()))
        }
    }

    #[test]
    fn assets_are_fetched_at_most_once() {
        let source = CountingSource::default()
            .with(PIECES_PATH, r#"{"pieces":[{"letter":"A","amount":2,"value":1}]}"#)
            .with(DICTIONARY_PATH, "at\n");
        let mut loader = AssetLoader::new(source);

        let first = loader.load().expect("assets load");
        let second = loader.load().expect("assets load");

        assert!(Arc::ptr_eq(&first.0, &second.0));
        assert!(Arc::ptr_eq(&first.1, &second.1));
        assert_eq!(loader.source().fetch_count(PIECES_PATH), 1);
        assert_eq!(loader.source().fetch_count(DICTIONARY_PATH), 1);
        assert!(first.1.contains("AT"));
    }

    #[test]
    fn failures_are_not_cached() {
        let mut loader = AssetLoader::new(CountingSource::default());

        assert!(matches!(loader.dictionary(), Err(AssetError::NotFound(_))));
        assert!(matches!(loader.dictionary(), Err(AssetError::NotFound(_))));
        assert_eq!(loader.source().fetch_count(DICTIONARY_PATH), 2);
    }

    #[test]
    fn malformed_pieces_report_the_path() {
        let source = CountingSource::default().with(PIECES_PATH, "{\"pieces\": 3}");
        let error = AssetLoader::new(source).pieces().unwrap_err();

        assert!(matches!(error, AssetError::Pieces { .. }));
        assert_eq!(error.to_string(), "failed to parse data/pieces.json");
    }

    #[test]
    fn filesystem_source_maps_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = FsAssetSource::new(dir.path());

        let error = source.fetch(Path::new(PIECES_PATH)).unwrap_err();
        assert!(matches!(error, AssetError::NotFound(path) if path.ends_with(PIECES_PATH)));
    }
}
