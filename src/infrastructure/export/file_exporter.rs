//! WAV exporter writing to the local filesystem

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{DestinationPicker, ExportError, WavExporter};
use crate::domain::audio::WavFile;
use crate::domain::export::WAV_FILTER;

/// Saves recordings into a directory.
///
/// With a picker, the user chooses the destination (and may cancel).
/// Without one, the suggested name is used directly and never
/// overwrites an existing file.
pub struct FileExporter {
    output_dir: PathBuf,
    picker: Option<Box<dyn DestinationPicker>>,
}

impl FileExporter {
    /// Direct-save exporter
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            picker: None,
        }
    }

    /// Ask `picker` for every destination
    pub fn with_picker(mut self, picker: impl DestinationPicker + 'static) -> Self {
        self.picker = Some(Box::new(picker));
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.picker.is_some()
    }

    /// Write to the picked path, which may replace an existing file
    async fn write_picked(
        &self,
        picker: &dyn DestinationPicker,
        wav: &WavFile,
        suggested_name: &str,
    ) -> Result<PathBuf, ExportError> {
        let suggested = self.output_dir.join(suggested_name);
        let chosen = picker
            .choose(&suggested, &WAV_FILTER)
            .await
            .ok_or(ExportError::SaveCanceled)?;
        let target = with_wav_extension(chosen);

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent).await?;
        }
        fs::write(&target, wav.bytes())
            .await
            .map_err(|e| write_failed(&target, e))?;
        Ok(target)
    }

    /// Claim the first free name with `create_new`, so a file that appears
    /// between two attempts is skipped rather than replaced
    async fn write_new(
        &self,
        wav: &WavFile,
        suggested_name: &str,
    ) -> Result<PathBuf, ExportError> {
        create_dir(&self.output_dir).await?;

        for n in 0u32.. {
            let target = self.output_dir.join(numbered_name(suggested_name, n));
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(write_failed(&target, e)),
            };

            file.write_all(wav.bytes())
                .await
                .map_err(|e| write_failed(&target, e))?;
            file.flush().await.map_err(|e| write_failed(&target, e))?;
            return Ok(target);
        }

        Err(ExportError::WriteFailed {
            path: self.output_dir.join(suggested_name).display().to_string(),
            message: "no free file name left".to_string(),
        })
    }
}

/// Append `.wav` unless the name already ends with it
pub fn with_wav_extension(path: PathBuf) -> PathBuf {
    let has_ext = path
        .file_name()
        .map(|name| WAV_FILTER.matches(&name.to_string_lossy()))
        .unwrap_or(false);
    if has_ext {
        return path;
    }

    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(WAV_FILTER.extension);
    path.with_file_name(name)
}

/// `name` for 0, then `stem (n).ext`
fn numbered_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{stem} ({n}){ext}")
}

async fn create_dir(dir: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| write_failed(dir, e))
}

fn write_failed(path: &Path, e: std::io::Error) -> ExportError {
    ExportError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl WavExporter for FileExporter {
    async fn export(&self, wav: &WavFile, suggested_name: &str) -> Result<PathBuf, ExportError> {
        let target = match &self.picker {
            Some(picker) => self.write_picked(picker.as_ref(), wav, suggested_name).await?,
            None => self.write_new(wav, suggested_name).await?,
        };

        tracing::debug!(
            path = %target.display(),
            bytes = wav.size_bytes(),
            "wav written"
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::encode_wav_mono16;
    use crate::domain::export::FileFilter;

    struct FixedPicker(Option<PathBuf>);

    #[async_trait]
    impl DestinationPicker for FixedPicker {
        async fn choose(&self, _suggested: &Path, _filter: &FileFilter) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    fn wav() -> WavFile {
        encode_wav_mono16(&[0.0; 10], 48000).unwrap()
    }

    #[test]
    fn wav_extension_appended_once() {
        assert_eq!(with_wav_extension("take".into()), PathBuf::from("take.wav"));
        assert_eq!(with_wav_extension("take.wav".into()), PathBuf::from("take.wav"));
        assert_eq!(with_wav_extension("TAKE.WAV".into()), PathBuf::from("TAKE.WAV"));
        assert_eq!(
            with_wav_extension("dir/take.mp3".into()),
            PathBuf::from("dir/take.mp3.wav")
        );
    }

    #[tokio::test]
    async fn direct_save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());

        let first = exporter.export(&wav(), "acid_x.wav").await.unwrap();
        let second = exporter.export(&wav(), "acid_x.wav").await.unwrap();
        let third = exporter.export(&wav(), "acid_x.wav").await.unwrap();

        assert_eq!(first, dir.path().join("acid_x.wav"));
        assert_eq!(second, dir.path().join("acid_x (1).wav"));
        assert_eq!(third, dir.path().join("acid_x (2).wav"));
        assert_eq!(std::fs::read(&third).unwrap().len(), 64);
    }

    #[tokio::test]
    async fn existing_file_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let taken = dir.path().join("acid_x.wav");
        std::fs::write(&taken, b"keep").unwrap();

        let path = FileExporter::new(dir.path())
            .export(&wav(), "acid_x.wav")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("acid_x (1).wav"));
        assert_eq!(std::fs::read(&taken).unwrap(), b"keep");
        assert_eq!(std::fs::read(&path).unwrap().len(), 64);
    }

    #[test]
    fn numbered_names_keep_the_extension() {
        assert_eq!(numbered_name("acid.wav", 0), "acid.wav");
        assert_eq!(numbered_name("acid.wav", 3), "acid (3).wav");
        assert_eq!(numbered_name("acid", 1), "acid (1)");
    }

    #[tokio::test]
    async fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let path = FileExporter::new(&nested)
            .export(&wav(), "acid.wav")
            .await
            .unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn picker_cancel_is_save_canceled() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path()).with_picker(FixedPicker(None));
        assert!(exporter.is_interactive());

        let err = exporter.export(&wav(), "acid.wav").await.unwrap_err();
        assert_eq!(err, ExportError::SaveCanceled);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn picked_name_gets_extension() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = dir.path().join("my take");
        let exporter = FileExporter::new(dir.path()).with_picker(FixedPicker(Some(chosen)));

        let path = exporter.export(&wav(), "acid.wav").await.unwrap();
        assert_eq!(path, dir.path().join("my take.wav"));
    }

    #[tokio::test]
    async fn unwritable_target_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        // A regular file cannot act as a directory
        let err = FileExporter::new(blocker.join("sub"))
            .export(&wav(), "acid.wav")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::WriteFailed { .. }));
    }
}
