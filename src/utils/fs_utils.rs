use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, Write};
use std::path::Path;

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn ask_confirmation(prompt: &str) -> AppResult<bool> {
    warning(prompt);
    print!("Confirm [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Ask before replacing an existing file. True when the file may be written.
pub fn confirm_overwrite(path: &Path, force: bool) -> AppResult<bool> {
    if !path.exists() || force {
        return Ok(true);
    }

    let ok = ask_confirmation(&format!(
        "The file '{}' already exists. Overwrite it?",
        path.display()
    ))?;
    if ok {
        info("Existing file will be overwritten.");
    }
    Ok(ok)
}

/// Like [`confirm_overwrite`] but a refusal is an error.
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if confirm_overwrite(path, force)? {
        Ok(())
    } else {
        Err(AppError::from(io::Error::other(
            "Export cancelled: existing file not overwritten",
        )))
    }
}
