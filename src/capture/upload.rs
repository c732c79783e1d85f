use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use image::ImageFormat;

use super::{CapturedImage, ImageSource};
use crate::{Result, UploadError, MAX_UPLOAD_BYTES};

/// Reads a user-selected image file. The size limit is checked against file
/// metadata, so oversized files are refused without being read.
pub fn load_upload<P: AsRef<Path>>(path: P) -> Result<CapturedImage> {
    let path = path.as_ref();
    let size = fs::metadata(path)?.len();
    if size > MAX_UPLOAD_BYTES {
        log::debug!("Refusing {} ({} bytes)", path.display(), size);
        return Err(UploadError::TooLarge { size }.into());
    }
    if size == 0 {
        return Err(UploadError::Empty.into());
    }

    let bytes = read_limited(File::open(path)?, MAX_UPLOAD_BYTES)?;
    let format =
        image::guess_format(&bytes).map_err(|_| UploadError::NotAnImage)?;
    let mime = mime_of(format).ok_or(UploadError::NotAnImage)?;
    log::debug!("Loaded {} as {} ({} bytes)", path.display(), mime, size);

    Ok(CapturedImage::from_bytes(&bytes, mime, ImageSource::Upload))
}

/// Reads at most `limit` bytes, refusing a source that turns out longer
/// than its metadata said.
fn read_limited<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(limit + 1).read_to_end(&mut bytes)?;
    let size = bytes.len() as u64;
    if size > limit {
        return Err(UploadError::TooLarge { size }.into());
    }
    Ok(bytes)
}

fn mime_of(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttendError;
    use image::{Rgb, RgbImage};
    use std::io;
    use tempdir::TempDir;

    #[test]
    fn png_upload_keeps_its_media_type() {
        let dir = TempDir::new("faceattend_upload").unwrap();
        let path = dir.path().join("face.png");
        RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])).save(&path).unwrap();

        let image = load_upload(&path).unwrap();
        assert_eq!(image.source(), ImageSource::Upload);
        assert_eq!(image.mime(), "image/png");
        assert_eq!(image.decode().unwrap().bytes, fs::read(&path).unwrap());
    }

    #[test]
    fn oversized_file_is_refused() {
        let dir = TempDir::new("faceattend_upload").unwrap();
        let path = dir.path().join("huge.jpg");
        File::create(&path)
            .unwrap()
            .set_len(MAX_UPLOAD_BYTES + 1)
            .unwrap();

        match load_upload(&path) {
            Err(AttendError::Upload(UploadError::TooLarge { size })) => {
                assert_eq!(size, MAX_UPLOAD_BYTES + 1)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn limit_is_inclusive() {
        let dir = TempDir::new("faceattend_upload").unwrap();
        let path = dir.path().join("exact.bin");
        File::create(&path)
            .unwrap()
            .set_len(MAX_UPLOAD_BYTES)
            .unwrap();

        // Passes the size gate, then fails format sniffing.
        assert!(matches!(
            load_upload(&path),
            Err(AttendError::Upload(UploadError::NotAnImage))
        ));
    }

    #[test]
    fn empty_and_non_image_files_are_refused() {
        let dir = TempDir::new("faceattend_upload").unwrap();
        let empty = dir.path().join("empty.jpg");
        File::create(&empty).unwrap();
        assert!(matches!(
            load_upload(&empty),
            Err(AttendError::Upload(UploadError::Empty))
        ));

        let text = dir.path().join("notes.txt");
        fs::write(&text, "definitely not a face").unwrap();
        assert!(matches!(
            load_upload(&text),
            Err(AttendError::Upload(UploadError::NotAnImage))
        ));
    }

    #[test]
    fn reading_stops_past_the_limit() {
        let grown = io::Cursor::new(vec![7u8; 64]);
        match read_limited(grown, 16) {
            Err(AttendError::Upload(UploadError::TooLarge { size })) => {
                assert_eq!(size, 17)
            }
            other => panic!("unexpected {:?}", other),
        }

        let fits = io::Cursor::new(vec![7u8; 16]);
        assert_eq!(read_limited(fits, 16).unwrap().len(), 16);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new("faceattend_upload").unwrap();
        assert!(matches!(
            load_upload(dir.path().join("nope.png")),
            Err(AttendError::Io(_))
        ));
    }
}
