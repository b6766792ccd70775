use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = ".glacier.toml";

/// Settings file content together with where it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Find the settings file: `.glacier.toml` in the working directory, then in `$HOME`
///
/// The first file that exists wins. If it cannot be read the lookup stops
/// there with a warning rather than moving on to the next location, so a
/// broken project file never silently picks up the user's home settings.
pub fn load_config_file() -> Option<ConfigSource> {
    load_first(&candidate_paths())
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    paths
}

fn load_first(paths: &[PathBuf]) -> Option<ConfigSource> {
    for path in paths {
        match read_if_present(path) {
            Ok(Some(content)) => {
                log::debug!("Loaded settings from {}", path.display());
                return Some(ConfigSource {
                    path: path.clone(),
                    content,
                });
            }
            Ok(None) => log::trace!("No settings at {}", path.display()),
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}", path.display(), e);
                return None;
            }
        }
    }
    None
}

/// `Ok(None)` when the file does not exist
fn read_if_present(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
