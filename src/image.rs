//! Capabilities used to show `<img>` elements.
//!
//! Fetching a URL and displaying a picture both happen outside the
//! renderer.  The driver fetches the bytes with a [`Fetch`], saves them to
//! a temporary file and hands the path to an [`ImageViewer`].

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Retrieve the bytes at a URL.
pub trait Fetch {
    /// Fetch `url`.
    fn fetch(&mut self, url: &str) -> io::Result<Vec<u8>>;
}

impl<F> Fetch for F
where
    F: FnMut(&str) -> io::Result<Vec<u8>>,
{
    fn fetch(&mut self, url: &str) -> io::Result<Vec<u8>> {
        self(url)
    }
}

/// Display an image file in the terminal.
pub trait ImageViewer {
    /// Show the image stored at `path`.
    fn display(&mut self, path: &Path) -> io::Result<()>;
}

impl<F> ImageViewer for F
where
    F: FnMut(&Path) -> io::Result<()>,
{
    fn display(&mut self, path: &Path) -> io::Result<()> {
        self(path)
    }
}

/// A viewer which shows nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoViewer;

impl ImageViewer for NoViewer {
    fn display(&mut self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Runs an external program with the image path as its only argument,
/// e.g. `imgcat`.  The exit status is ignored.
#[derive(Clone, Debug)]
pub struct CommandViewer {
    program: OsString,
}

impl CommandViewer {
    /// Use `program` to display images.
    pub fn new(program: impl Into<OsString>) -> CommandViewer {
        CommandViewer {
            program: program.into(),
        }
    }
}

impl Default for CommandViewer {
    fn default() -> CommandViewer {
        CommandViewer::new("imgcat")
    }
}

impl ImageViewer for CommandViewer {
    fn display(&mut self, path: &Path) -> io::Result<()> {
        let status = Command::new(&self.program).arg(path).status()?;
        log::debug!("{:?} exited with {}", self.program, status);
        Ok(())
    }
}

/// Fetch `url` into a temporary file and pass it to `viewer`.  The file is
/// removed again once the viewer returns.
pub(crate) fn show_image(
    url: &str,
    fetcher: &mut dyn Fetch,
    viewer: &mut dyn ImageViewer,
) -> Result<()> {
    let bytes = fetcher.fetch(url).map_err(|source| Error::Fetch {
        url: url.into(),
        source,
    })?;
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(&bytes)?;
    file.flush()?;
    log::debug!("showing {} ({} bytes) from {:?}", url, bytes.len(), file.path());
    viewer.display(file.path())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_is_written_before_display() {
        let mut fetcher = |url: &str| -> io::Result<Vec<u8>> {
            assert_eq!(url, "https://x.org/a.png");
            Ok(b"PNGDATA".to_vec())
        };
        let mut seen = Vec::new();
        let mut viewer = |path: &Path| -> io::Result<()> {
            seen.push(std::fs::read(path)?);
            Ok(())
        };
        show_image("https://x.org/a.png", &mut fetcher, &mut viewer).unwrap();
        assert_eq!(seen, vec![b"PNGDATA".to_vec()]);
    }

    #[test]
    fn fetch_failure_is_reported() {
        let mut fetcher =
            |_: &str| -> io::Result<Vec<u8>> { Err(io::Error::new(io::ErrorKind::Other, "down")) };
        let err = show_image("https://x.org/a.png", &mut fetcher, &mut NoViewer).unwrap_err();
        assert_eq!(
            err,
            Error::Fetch {
                url: "https://x.org/a.png".into(),
                source: io::Error::new(io::ErrorKind::Other, "down"),
            }
        );
    }
}
