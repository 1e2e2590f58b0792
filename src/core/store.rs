use std::{
    fs::{create_dir_all, File, OpenOptions},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{
    core::{comparison::Comparison, utils::maybe_warn},
    error::Error,
};

/// Saves finished [`Comparison`]s into a directory as Python pickle files and loads them back.
///
/// File names come from [`ExperimentSettings::file_stem`](`crate::core::ExperimentSettings::file_stem`),
/// so a result's location is predictable from its settings alone. Files are claimed with
/// exclusive creation and never overwritten; when the deterministic name is taken, a numeric
/// suffix is appended until a free name is found.
pub struct ResultStore {
    directory: PathBuf,
}

impl ResultStore {
    /// Creates a store rooted at the given directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self, Error> {
        create_dir_all(&directory)?;
        Ok(Self {
            directory: directory.as_ref().to_path_buf(),
        })
    }
    /// The directory results are saved into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
    /// Saves a comparison under its deterministic name, returning the path actually written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if no file could be created or written, or [`Error::Pickle`] if
    /// the comparison could not be serialized.
    pub fn save(&self, comparison: &Comparison) -> Result<PathBuf, Error> {
        let (file, path) = self.claim(&comparison.settings.file_stem())?;
        let mut writer = BufWriter::new(file);
        serde_pickle::to_writer(&mut writer, comparison, Default::default())?;
        writer.flush()?;
        Ok(path)
    }
    /// Loads a comparison saved by [`ResultStore::save`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or [`Error::Pickle`] if its contents
    /// do not decode to a [`Comparison`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Comparison, Error> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_pickle::from_reader(reader, Default::default())?)
    }

    fn claim(&self, stem: &str) -> Result<(File, PathBuf), Error> {
        let mut attempt = 0_usize;
        loop {
            let name = if attempt == 0 {
                format!("{stem}.pkl")
            } else {
                format!("{stem}-{attempt}.pkl")
            };
            let path = self.directory.join(name);
            // create_new makes the claim atomic, so two saves can never share a file
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    if attempt > 0 {
                        maybe_warn(&format!(
                            "'{stem}.pkl' already exists, saving as '{}'",
                            path.display()
                        ));
                    }
                    return Ok((file, path));
                }
                Err(error) if error.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(error) => return Err(error.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::RandomSearch,
        benchmarks::BenchmarkRegistry,
        core::{ExperimentSettings, OptimizationRunner},
        traits::OptionsTemplate,
    };

    fn small_comparison() -> Comparison {
        let registry = BenchmarkRegistry::standard();
        let settings = ExperimentSettings::new("branin", 0.01, 3, 5);
        let mut runner = OptimizationRunner::new(&registry, settings).unwrap();
        runner.register("random", RandomSearch::default(), OptionsTemplate::new(1));
        runner.run()
    }

    #[test]
    fn test_save_uses_deterministic_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path()).unwrap();
        let path = store.save(&small_comparison()).unwrap();
        assert_eq!(path, dir.path().join("Compare-branin-0.01-3.pkl"));
        assert!(path.is_file());
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path()).unwrap();
        let comparison = small_comparison();
        let first = store.save(&comparison).unwrap();
        let second = store.save(&comparison).unwrap();
        let third = store.save(&comparison).unwrap();
        assert_eq!(first, dir.path().join("Compare-branin-0.01-3.pkl"));
        assert_eq!(second, dir.path().join("Compare-branin-0.01-3-1.pkl"));
        assert_eq!(third, dir.path().join("Compare-branin-0.01-3-2.pkl"));
        assert!(first.is_file() && second.is_file() && third.is_file());
    }

    #[test]
    fn test_saved_comparisons_load_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path()).unwrap();
        let comparison = small_comparison();
        let path = store.save(&comparison).unwrap();
        let loaded = ResultStore::load(path).unwrap();
        assert_eq!(loaded, comparison);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ResultStore::load(dir.path().join("nope.pkl")),
            Err(Error::Io(_))
        ));
    }
}
