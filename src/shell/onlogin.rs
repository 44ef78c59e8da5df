//! Login script lines of active profiles.
use crate::config::profiles::Profile;
use crate::error::{ConfigError, FilesystemError};
use crate::logging::Log;

/// Collect the lines of every `onlogin` script of `active`, in order.
///
/// Scripts that cannot be read are reported as warnings and skipped.
///
/// # Errors
///
/// Returns [`ConfigError`] if an `onlogin` field is not a list of strings.
pub fn login_lines(active: &[&Profile], log: &dyn Log) -> Result<Vec<String>, ConfigError> {
    let mut lines = Vec::new();
    for profile in active {
        for script in profile.onlogin()? {
            let path = profile.path.join(&script);
            match std::fs::read_to_string(&path) {
                Ok(text) => lines.extend(text.lines().map(str::to_string)),
                Err(source) => {
                    log.warn(&FilesystemError::Read { path, source }.to_string());
                }
            }
        }
    }
    Ok(lines)
}
