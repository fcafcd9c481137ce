use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success, warning};
use crate::utils::path::expand_tilde;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally zip it.
    /// Returns the final backup path, or `None` if the user declined to overwrite.
    pub fn backup(
        db_path: &str,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(db_path);
        let dest = expand_tilde(dest_file);

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 3️⃣ Existing destination → confirmation unless forced
        if dest.exists()
            && !force
            && !confirm(&format!("The file '{}' already exists. Overwrite it?", dest.display()))
        {
            warning("Backup cancelled by user.");
            return Ok(None);
        }

        // 4️⃣ Copy database
        fs::copy(src, &dest)?;
        success(format!("Backup created: {}", dest.display()));

        // 5️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_backup(&dest)?;
            if let Err(e) = fs::remove_file(&dest) {
                warning(format!("Failed to remove uncompressed backup: {}", e));
            } else {
                info(format!("Removed uncompressed backup: {}", dest.display()));
            }
            compressed
        } else {
            dest
        };

        // 6️⃣ Log in DB
        let conn = Connection::open(src)?;
        ttlog(
            &conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(Some(final_path))
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rtimesheet.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    success(format!("Compressed: {}", zip_path.display()));

    Ok(zip_path)
}
