//! Zip extraction over the game folder

use crate::error::{InstallerError, Result};
use std::path::{Path, PathBuf};

/// Extract every entry of `archive` into `dest`, overwriting existing files.
///
/// Not transactional: an error part way through leaves earlier entries in
/// place. Returns the files written.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let zip_err = |source| InstallerError::Archive {
        path: archive.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(archive).map_err(|e| InstallerError::fs(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(zip_err)?;

    let mut written = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(zip_err)?;
        let relative = sanitize_path(entry.name());
        if relative.is_empty() {
            continue;
        }
        let outpath = dest.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| InstallerError::fs(&outpath, e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent).map_err(|e| InstallerError::fs(parent, e))?;
        }
        let mut outfile =
            std::fs::File::create(&outpath).map_err(|e| InstallerError::fs(&outpath, e))?;
        std::io::copy(&mut entry, &mut outfile).map_err(|e| InstallerError::fs(&outpath, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // owner write stays set so a later install can overwrite the file
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode | 0o200))
                    .map_err(|e| InstallerError::fs(&outpath, e))?;
            }
        }

        tracing::debug!("Extracted {}", relative);
        written.push(outpath);
    }

    Ok(written)
}

/// Sanitize path to prevent directory traversal
fn sanitize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Build a zip in memory for tests.
#[cfg(test)]
pub(crate) fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    zip_bytes_with_mode(entries, 0o644)
}

#[cfg(test)]
pub(crate) fn zip_bytes_with_mode(entries: &[(&str, &str)], mode: u32) -> Vec<u8> {
    use std::io::Write;

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default().unix_permissions(mode);
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}
