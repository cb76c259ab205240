//! ZIP packaging for dataset downloads
//!
//! Three shapes of archive leave the server:
//!
//! - a single dataset's directory, zipped recursively ([`zip_directory`])
//! - a hand-picked set of stored files, zipped in memory ([`zip_files`])
//! - the bulk export of every synchronized dataset, with each UVL file
//!   accompanied by its DIMACS/SPLOT/Glencoe conversions and non-UVL files
//!   sorted into extension buckets ([`export_datasets`])
//!
//! Callers own the lifetime of any temp directory the archive is written
//! into; a `tempfile::TempDir` guard removes it on success and failure alike.

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use uvlhub_fm::{parser, writers};

#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Zip a directory recursively. Archive names are relative to `dir`.
pub fn zip_directory(dir: &Path, zip_path: &Path) -> Result<(), PackagingError> {
    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| std::io::Error::other("path outside archive root"))?;
        zip.start_file(relative.to_string_lossy(), options)?;
        let mut input = File::open(entry.path())?;
        std::io::copy(&mut input, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// Zip a list of `(path, archive_name)` pairs in memory.
pub fn zip_files(files: &[(std::path::PathBuf, String)]) -> Result<Vec<u8>, PackagingError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (path, name) in files {
        zip.start_file(name, options)?;
        let mut input = File::open(path)?;
        let mut contents = Vec::new();
        input.read_to_end(&mut contents)?;
        zip.write_all(&contents)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Build the bulk export archive from a set of dataset directories.
///
/// Each `.uvl` file lands under `uvl/`, with its three conversions written
/// directly into `cnf/`, `splot/`, and `glencoe/` as `<name>_<format>.txt`.
/// Stored `.cnf`/`.splot`/`.glencoe` files go to the matching bucket; any
/// other extension is skipped. A file that fails to parse or convert is
/// logged and skipped without aborting the export.
pub fn export_datasets(dataset_dirs: &[std::path::PathBuf], zip_path: &Path) -> Result<(), PackagingError> {
    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for dir in dataset_dirs {
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let ext = entry
                .path()
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();

            match ext.as_str() {
                "uvl" => {
                    zip.start_file(format!("uvl/{}", name), options)?;
                    let mut input = File::open(entry.path())?;
                    std::io::copy(&mut input, &mut zip)?;

                    if let Err(e) = add_conversions(&mut zip, entry.path(), &name, options) {
                        tracing::error!(file = %name, error = %e, "Conversion failed, skipping");
                    }
                },
                "cnf" | "splot" | "glencoe" => {
                    zip.start_file(format!("{}/{}", ext, name), options)?;
                    let mut input = File::open(entry.path())?;
                    std::io::copy(&mut input, &mut zip)?;
                },
                _ => {},
            }
        }
    }

    zip.finish()?;
    Ok(())
}

fn add_conversions(
    zip: &mut ZipWriter<File>,
    path: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> Result<(), PackagingError> {
    let model = match parser::read_model(path) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!(file = %name, error = %e, "Unparseable UVL file in export");
            return Ok(());
        },
    };

    let outputs = [
        ("cnf", writers::dimacs::to_string(&model)),
        ("splot", writers::splot::to_string(&model)),
        ("glencoe", writers::glencoe::to_string(&model)),
    ];

    for (format, rendered) in outputs {
        match rendered {
            Ok(text) => {
                zip.start_file(format!("{}/{}_{}.txt", format, name, format), options)?;
                zip.write_all(text.as_bytes())?;
            },
            Err(e) => {
                tracing::error!(file = %name, format, error = %e, "Writer failed, skipping output");
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    const MODEL: &str = "features\n    A\n        optional\n            B\n";

    fn archive_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_zip_directory_preserves_relative_names() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(data.join("nested")).unwrap();
        std::fs::write(data.join("a.uvl"), MODEL).unwrap();
        std::fs::write(data.join("nested/b.uvl"), MODEL).unwrap();

        let zip_path = dir.path().join("out.zip");
        zip_directory(&data, &zip_path).unwrap();

        let mut names = archive_names(&zip_path);
        names.sort();
        assert_eq!(names, vec!["a.uvl", "nested/b.uvl"]);
    }

    #[test]
    fn test_zip_files_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.uvl");
        std::fs::write(&path, MODEL).unwrap();

        let bytes = zip_files(&[(path, "m.uvl".to_string())]).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 1);
        let mut contents = String::new();
        archive.by_index(0).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, MODEL);
    }

    #[test]
    fn test_export_converts_uvl_and_buckets_others() {
        let dir = tempfile::tempdir().unwrap();
        let ds = dir.path().join("dataset_1");
        std::fs::create_dir_all(&ds).unwrap();
        std::fs::write(ds.join("model.uvl"), MODEL).unwrap();
        std::fs::write(ds.join("extra.cnf"), "p cnf 0 0\n").unwrap();
        std::fs::write(ds.join("notes.txt"), "ignored").unwrap();

        let zip_path = dir.path().join("all_datasets.zip");
        export_datasets(&[ds], &zip_path).unwrap();

        let mut names = archive_names(&zip_path);
        names.sort();
        assert_eq!(
            names,
            vec![
                "cnf/extra.cnf",
                "cnf/model.uvl_cnf.txt",
                "glencoe/model.uvl_glencoe.txt",
                "splot/model.uvl_splot.txt",
                "uvl/model.uvl",
            ]
        );
    }

    #[test]
    fn test_export_skips_unparseable_files() {
        let dir = tempfile::tempdir().unwrap();
        let ds = dir.path().join("dataset_2");
        std::fs::create_dir_all(&ds).unwrap();
        std::fs::write(ds.join("good.uvl"), MODEL).unwrap();
        std::fs::write(ds.join("bad.uvl"), "not a model").unwrap();

        let zip_path = dir.path().join("all_datasets.zip");
        export_datasets(&[ds], &zip_path).unwrap();

        let names = archive_names(&zip_path);
        assert!(names.contains(&"cnf/good.uvl_cnf.txt".to_string()));
        assert!(names.contains(&"uvl/bad.uvl".to_string()));
        assert!(!names.iter().any(|n| n.contains("bad.uvl_cnf")));
    }
}
