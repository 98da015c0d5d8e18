//! Home directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Platform user home: `%USERPROFILE%` on Windows, `$HOME` elsewhere.
fn user_home() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Expand a leading `~` or `~/` against `home`. Other paths are returned unchanged.
pub fn expand_tilde(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = match raw.strip_prefix('~') {
        None => return Ok(PathBuf::from(raw)),
        Some(rest) => rest,
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        bail!("'~user' paths are not supported: {raw}");
    }
    let Some(home) = home else {
        bail!("cannot expand '{raw}': user home directory is unknown");
    };
    Ok(home.join(rest.trim_start_matches(['/', '\\'])))
}

/// Resolve the application home directory to an absolute path.
///
/// `configured` wins when present (with `~` expanded and relative paths taken
/// from the current directory); otherwise `<user home>/<default_subdir>` is used.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let home = user_home();
    let path = match configured {
        Some(raw) => expand_tilde(raw.trim(), home.as_deref())?,
        None => match home {
            Some(h) => h.join(default_subdir),
            None => bail!("no home_dir configured and the user home directory is unknown"),
        },
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir {}", path.display()))?;
    }
    Ok(path)
}
