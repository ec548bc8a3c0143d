//! Hands picked files to an external viewer or player

use crate::config::Settings;
use crate::error::LaunchError;
use crate::media::MediaKind;
use std::io;
use std::path::Path;
use tracing::warn;

/// How a file ended up being opened
#[derive(Debug, Clone)]
pub struct Launched {
    /// The app that took the file; `None` when the platform default did
    pub app: Option<String>,
}

/// The configured command for a media kind
pub fn viewer_for<'a>(kind: MediaKind, settings: &'a Settings) -> &'a str {
    match kind {
        MediaKind::Image => settings.image_viewer(),
        MediaKind::Video => settings.video_player(),
    }
}

/// Opens `path` with the configured app for its kind.
///
/// On failure, retries once with no app constraint so the platform picks a
/// default handler. If that also fails the selection stays committed and
/// the caller gets `NoHandler` naming the app that was intended.
pub fn open_media(
    path: &Path,
    kind: MediaKind,
    settings: &Settings,
) -> Result<Launched, LaunchError> {
    open_media_via(path, kind, settings, |p, a| open::with(p, a), |p| open::that(p))
}

fn open_media_via<W, T>(
    path: &Path,
    kind: MediaKind,
    settings: &Settings,
    with_app: W,
    with_default: T,
) -> Result<Launched, LaunchError>
where
    W: FnOnce(&Path, &str) -> io::Result<()>,
    T: FnOnce(&Path) -> io::Result<()>,
{
    let app = viewer_for(kind, settings);

    match with_app(path, app) {
        Ok(()) => Ok(Launched {
            app: Some(app.to_string()),
        }),
        Err(e) => {
            warn!(app, mime = kind.mime(), error = %e, "configured app failed, trying default handler");
            match with_default(path) {
                Ok(()) => Ok(Launched { app: None }),
                Err(e) => {
                    warn!(error = %e, "default handler failed too");
                    Err(LaunchError::NoHandler {
                        app: app.to_string(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_routing_by_kind() {
        let mut settings = Settings::default();
        settings.set("image-viewer", "eog").unwrap();
        settings.set("video-player", "vlc").unwrap();
        assert_eq!(viewer_for(MediaKind::Image, &settings), "eog");
        assert_eq!(viewer_for(MediaKind::Video, &settings), "vlc");
    }

    #[test]
    fn test_viewer_defaults_when_unset() {
        let settings = Settings::default();
        assert_eq!(
            viewer_for(MediaKind::Image, &settings),
            crate::config::DEFAULT_IMAGE_VIEWER
        );
        assert_eq!(
            viewer_for(MediaKind::Video, &settings),
            crate::config::DEFAULT_VIDEO_PLAYER
        );
    }

    mod fallback_tests {
        use super::*;

        fn fail(_: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such app"))
        }

        #[test]
        fn test_configured_app_wins_when_it_works() {
            let mut default_tried = false;
            let result = open_media_via(
                Path::new("/r/1.png"),
                MediaKind::Image,
                &Settings::default(),
                |_, _| Ok(()),
                |p| {
                    default_tried = true;
                    fail(p)
                },
            );
            assert_eq!(result.unwrap().app.as_deref(), Some("feh"));
            assert!(!default_tried);
        }

        #[test]
        fn test_falls_back_to_default_handler() {
            let result = open_media_via(
                Path::new("/r/1.png"),
                MediaKind::Image,
                &Settings::default(),
                |p, _| fail(p),
                |_| Ok(()),
            );
            assert!(result.unwrap().app.is_none());
        }

        #[test]
        fn test_no_handler_names_the_intended_app() {
            let mut settings = Settings::default();
            settings.set("video-player", "vlc").unwrap();
            let err = open_media_via(
                Path::new("/r/2.mp4"),
                MediaKind::Video,
                &settings,
                |p, _| fail(p),
                fail,
            )
            .unwrap_err();
            assert!(matches!(err, LaunchError::NoHandler { app } if app == "vlc"));
        }
    }
}
