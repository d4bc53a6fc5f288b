//! Session configuration validation and middleware construction.
//!
//! Reads the signing key named by [`AppSettings`], enforcing a minimum key
//! length in release builds. Debug builds, or deployments that opt in with
//! `session_allow_ephemeral`, fall back to a generated key; sessions signed
//! with it do not survive a restart.

use std::io;
use std::path::{Path, PathBuf};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;
use zeroize::Zeroizing;

use crate::settings::AppSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
const KEY_DERIVE_MIN_LEN: usize = 32;
const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate short or missing keys.
    Debug,
    /// Release builds require a full-length key file.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mimir::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Build session settings from application settings and build mode.
///
/// # Examples
///
/// ```rust
/// use mimir::inbound::http::session_config::{BuildMode, session_settings};
/// use mimir::settings::AppSettings;
///
/// let settings = AppSettings {
///     session_key_file: Some("/nonexistent/session_key".into()),
///     session_allow_ephemeral: true,
///     ..AppSettings::default()
/// };
/// let session = session_settings(&settings, BuildMode::Release).expect("ephemeral key");
/// assert!(session.cookie_secure);
/// ```
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = session_key(
        settings.session_key_file(),
        mode,
        settings.session_allow_ephemeral(),
    )?;
    if !settings.session_cookie_secure() {
        warn!("session cookies are not marked Secure");
    }
    Ok(SessionSettings {
        key,
        cookie_secure: settings.session_cookie_secure(),
    })
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match read_key_file(path) {
        Ok(bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            // `Key::derive_from` panics below this length.
            if length < KEY_DERIVE_MIN_LEN {
                warn!(
                    path = %path.display(),
                    length,
                    "session key too short to derive from; using temporary key (dev only)"
                );
                return Ok(Key::generate());
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}

/// Read the key through a capability on its parent directory.
///
/// The buffer is wiped when dropped.
fn read_key_file(path: &Path) -> io::Result<Zeroizing<Vec<u8>>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "session key path must be a file")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(Path::new(file_name)).map(Zeroizing::new)
}

/// Cookie session middleware for the API scope.
///
/// Cookies are private (encrypted and signed), HTTP-only, `SameSite=Lax`
/// and expire after two hours.
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}
