//! Audio transcoding through the `ffmpeg` command-line tool.
//!
//! Shelling out keeps the crate free of codec bindings and supports every
//! format ffmpeg was built with.
//!
//! Install ffmpeg:
//! - Windows: `winget install Gyan.FFmpeg`
//! - macOS: `brew install ffmpeg`
//! - Linux: `apt install ffmpeg` or equivalent

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::ConversionConfig;
use crate::error::{Error, Result};

/// Formats accepted as a conversion target.
///
/// `alac` is a codec rather than a container: it produces an `.m4a` file.
pub const SUPPORTED_TARGETS: &[&str] = &["m4a", "mp3", "alac", "flac", "aiff", "aif", "ogg"];

/// Whether `format` (case-insensitive) can be passed as a target.
pub fn is_supported_target(format: &str) -> bool {
    SUPPORTED_TARGETS.contains(&format.to_ascii_lowercase().as_str())
}

/// A validated conversion request.
#[derive(Debug, Clone)]
pub struct Converter {
    ffmpeg: PathBuf,
    target: String,
    bitrate: Option<u32>,
}

impl Converter {
    /// Build a converter for `target`.
    ///
    /// An unknown target is a configuration error. A zero bitrate means
    /// "ffmpeg's default".
    pub fn new(target: &str, bitrate: Option<u32>, ffmpeg: impl Into<PathBuf>) -> Result<Self> {
        let target = target.trim().to_ascii_lowercase();
        if !is_supported_target(&target) {
            return Err(Error::config(format!(
                "unsupported conversion format '{target}' (expected one of: {})",
                SUPPORTED_TARGETS.join(", ")
            )));
        }
        let ffmpeg = ffmpeg.into();
        Ok(Self {
            ffmpeg: if ffmpeg.as_os_str().is_empty() {
                PathBuf::from("ffmpeg")
            } else {
                ffmpeg
            },
            target,
            bitrate: bitrate.filter(|&b| b > 0),
        })
    }

    /// The converter described by the config, or `None` when conversion is off.
    pub fn from_config(config: &ConversionConfig) -> Result<Option<Self>> {
        config
            .format
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(|f| Self::new(f, config.bitrate, config.ffmpeg.clone()))
            .transpose()
    }

    /// Extension of the files this converter produces
    pub fn output_extension(&self) -> &str {
        match self.target.as_str() {
            "alac" => "m4a",
            other => other,
        }
    }

    /// Check that the ffmpeg executable can be run
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Whether `path` already is in the target format.
    pub fn is_noop_for(&self, path: &Path) -> bool {
        let ext = extension_of(path);
        ext == self.target || (self.target != "alac" && ext == self.output_extension())
    }

    /// Arguments placed between the input and the output file
    fn codec_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.target == "alac" {
            args.extend(["-acodec".to_string(), "alac".to_string()]);
        }
        if let Some(kbps) = self.bitrate {
            args.extend(["-b:a".to_string(), format!("{kbps}k")]);
        }
        args
    }

    /// Where the converted copy of `path` is written
    pub fn output_path(&self, path: &Path) -> PathBuf {
        let out = path.with_extension(self.output_extension());
        if out == path {
            // ALAC into an existing .m4a: keep input and output apart
            path.with_extension(format!("{}.{}", self.target, self.output_extension()))
        } else {
            out
        }
    }

    /// Convert `path` into the target format, returning the new file.
    ///
    /// The input is left in place. A file already in the target format is
    /// returned unchanged.
    pub fn convert(&self, path: &Path) -> Result<PathBuf> {
        if self.is_noop_for(path) {
            return Ok(path.to_path_buf());
        }
        if !path.exists() {
            return Err(Error::not_found(path));
        }

        let output = self.output_path(path);
        tracing::info!(input = %path.display(), target = %self.target, "Converting");

        let result = Command::new(&self.ffmpeg)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(path)
            .arg("-vn")
            .args(self.codec_args())
            .arg(&output)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                Error::conversion(format!(
                    "failed to run {}: {e}",
                    self.ffmpeg.display()
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let _ = std::fs::remove_file(&output);
            return Err(Error::conversion(format!("ffmpeg failed: {}", stderr.trim())));
        }

        Ok(output)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_target_is_config_error() {
        let err = Converter::new("wma", None, "ffmpeg").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_fatal_for_run());
    }

    #[test]
    fn test_target_is_case_insensitive() {
        let c = Converter::new(" MP3 ", None, "ffmpeg").unwrap();
        assert_eq!(c.target, "mp3");
    }

    #[test]
    fn test_from_config() {
        let mut config = ConversionConfig::default();
        assert!(Converter::from_config(&config).unwrap().is_none());

        config.format = Some("flac".to_string());
        let c = Converter::from_config(&config).unwrap().unwrap();
        assert_eq!(c.ffmpeg, PathBuf::from("ffmpeg"));

        config.format = Some("opus".to_string());
        assert!(Converter::from_config(&config).is_err());
    }

    #[test]
    fn test_alac_writes_m4a() {
        let c = Converter::new("alac", Some(256), "ffmpeg").unwrap();
        assert_eq!(c.output_extension(), "m4a");
        assert_eq!(c.codec_args(), vec!["-acodec", "alac", "-b:a", "256k"]);
        assert_eq!(c.output_path(Path::new("/tmp/a.flac")), PathBuf::from("/tmp/a.m4a"));
        assert_eq!(
            c.output_path(Path::new("/tmp/a.m4a")),
            PathBuf::from("/tmp/a.alac.m4a")
        );
        assert!(!c.is_noop_for(Path::new("a.m4a")));
    }

    #[test]
    fn test_zero_bitrate_ignored() {
        let c = Converter::new("mp3", Some(0), "ffmpeg").unwrap();
        assert!(c.codec_args().is_empty());
    }

    #[test]
    fn test_same_extension_is_noop() {
        let c = Converter::new("flac", None, "/nonexistent/ffmpeg").unwrap();
        let path = Path::new("/nonexistent/song.FLAC");
        assert_eq!(c.convert(path).unwrap(), path);
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let c = Converter::new("mp3", None, "ffmpeg").unwrap();
        let err = c.convert(Path::new("/nonexistent/song.flac")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_missing_ffmpeg_is_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("song.flac");
        std::fs::write(&input, b"not audio").unwrap();

        let c = Converter::new("mp3", None, dir.path().join("no-such-ffmpeg")).unwrap();
        assert!(!c.is_available());
        let err = c.convert(&input).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }
}
