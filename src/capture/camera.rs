use std::io;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageError, RgbImage};

use super::{CapturedImage, ImageSource};
use crate::{CameraError, Result};

/// Square side of the frames sent for recognition.
pub const FRAME_SIDE: u32 = 720;
pub const JPEG_QUALITY: u8 = 92;

/// A live video feed that can hand out its current frame.
pub trait FrameSource {
    fn grab(&mut self) -> Result<RgbImage>;

    /// Stops the feed. Called once, when the owning handle is closed.
    fn release(&mut self) {}
}

/// Something that can be asked for a video feed. Opening may be refused by
/// the user or the platform.
pub trait CameraDevice {
    type Source: FrameSource;

    fn open(&self) -> Result<Self::Source>;
}

/// Scoped access to an opened camera. The feed is released when the handle
/// is closed or dropped, whichever comes first.
pub struct CameraHandle<S: FrameSource> {
    source: Option<S>,
    side: u32,
}

impl<S: FrameSource> CameraHandle<S> {
    pub fn open<D>(device: &D) -> Result<Self>
    where
        D: CameraDevice<Source = S>,
    {
        let source = device.open()?;
        log::debug!("Camera opened");
        Ok(Self {
            source: Some(source),
            side: FRAME_SIDE,
        })
    }

    pub fn with_side(mut self, side: u32) -> Self {
        self.side = side;
        self
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Takes one frame from the feed and encodes it as JPEG.
    pub fn capture(&mut self) -> Result<CapturedImage> {
        let source = self.source.as_mut().ok_or(CameraError::Released)?;
        let frame = square_frame(source.grab()?, self.side);
        let jpeg = encode_jpeg(&frame)?;
        log::debug!(
            "Captured {}x{} frame ({} bytes)",
            frame.width(),
            frame.height(),
            jpeg.len()
        );

        Ok(CapturedImage::from_jpeg_bytes(&jpeg, ImageSource::Camera))
    }

    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            log::debug!("Camera released");
        }
    }
}

impl<S: FrameSource> Drop for CameraHandle<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Center-crops to a square and scales it to `side`.
pub fn square_frame(frame: RgbImage, side: u32) -> RgbImage {
    let (width, height) = frame.dimensions();
    let edge = width.min(height);
    let cropped = if width == height {
        frame
    } else {
        let x = (width - edge) / 2;
        let y = (height - edge) / 2;
        imageops::crop_imm(&frame, x, y, edge, edge).to_image()
    };

    if edge == side {
        cropped
    } else {
        imageops::resize(&cropped, side, side, FilterType::Triangle)
    }
}

pub fn encode_jpeg(frame: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder =
            JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
        encoder.encode(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            ColorType::Rgb8,
        )?;
    }
    Ok(buffer)
}

/// Camera fed by an external capture process that keeps overwriting a
/// single image file with the latest frame (e.g. a `v4l2` or `ffmpeg`
/// snapshot loop writing to tmpfs).
#[derive(Debug, Clone)]
pub struct FrameFileCamera {
    path: PathBuf,
}

impl FrameFileCamera {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CameraDevice for FrameFileCamera {
    type Source = FrameFileSource;

    fn open(&self) -> Result<FrameFileSource> {
        std::fs::metadata(&self.path)
            .map_err(|e| camera_error(&self.path, &e))?;
        Ok(FrameFileSource {
            path: self.path.clone(),
        })
    }
}

pub struct FrameFileSource {
    path: PathBuf,
}

impl FrameSource for FrameFileSource {
    fn grab(&mut self) -> Result<RgbImage> {
        match image::open(&self.path) {
            Ok(frame) => Ok(frame.to_rgb8()),
            Err(ImageError::IoError(e)) => {
                Err(camera_error(&self.path, &e).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn camera_error(path: &Path, e: &io::Error) -> CameraError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
        _ => CameraError::Unavailable(format!("{}: {}", path.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttendError;
    use image::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempdir::TempDir;

    struct SolidFeed {
        width: u32,
        height: u32,
        releases: Arc<AtomicUsize>,
    }

    impl FrameSource for SolidFeed {
        fn grab(&mut self) -> Result<RgbImage> {
            Ok(RgbImage::from_pixel(self.width, self.height, Rgb([200, 120, 80])))
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct SolidCamera {
        width: u32,
        height: u32,
        releases: Arc<AtomicUsize>,
    }

    impl CameraDevice for SolidCamera {
        type Source = SolidFeed;

        fn open(&self) -> Result<SolidFeed> {
            Ok(SolidFeed {
                width: self.width,
                height: self.height,
                releases: self.releases.clone(),
            })
        }
    }

    fn camera(width: u32, height: u32) -> (SolidCamera, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let camera = SolidCamera {
            width,
            height,
            releases: releases.clone(),
        };
        (camera, releases)
    }

    #[test]
    fn snapshot_is_a_square_jpeg() {
        let (device, _) = camera(1280, 720);
        let mut handle = CameraHandle::open(&device).unwrap();

        let image = handle.capture().unwrap();
        assert_eq!(image.source(), ImageSource::Camera);
        assert!(image.data_uri().starts_with("data:image/jpeg;base64,"));

        let face = image.decode().unwrap();
        let decoded = image::load_from_memory(&face.bytes).unwrap();
        assert_eq!(decoded.width(), FRAME_SIDE);
        assert_eq!(decoded.height(), FRAME_SIDE);
    }

    #[test]
    fn feed_is_released_once() {
        let (device, releases) = camera(64, 64);
        {
            let mut handle =
                CameraHandle::open(&device).unwrap().with_side(64);
            handle.capture().unwrap();
            handle.close();
            assert!(!handle.is_open());
            assert!(matches!(
                handle.capture(),
                Err(AttendError::Camera(CameraError::Released))
            ));
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        {
            let _handle = CameraHandle::open(&device).unwrap();
        }
        assert_eq!(releases.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn portrait_frames_are_center_cropped() {
        let mut frame = RgbImage::from_pixel(4, 8, Rgb([0, 0, 0]));
        for x in 0..4 {
            for y in 2..6 {
                frame.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let square = square_frame(frame, 4);
        assert_eq!(square.dimensions(), (4, 4));
        assert!(square.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn frame_file_camera_reads_latest_frame() {
        let dir = TempDir::new("faceattend_camera").unwrap();
        let path = dir.path().join("frame.png");
        RgbImage::from_pixel(32, 32, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let device = FrameFileCamera::new(&path);
        let mut handle = CameraHandle::open(&device).unwrap().with_side(32);
        let image = handle.capture().unwrap();
        assert_eq!(image.mime(), "image/jpeg");
    }

    #[test]
    fn missing_frame_file_means_no_camera() {
        let dir = TempDir::new("faceattend_camera").unwrap();
        let device = FrameFileCamera::new(dir.path().join("absent.jpg"));
        assert!(matches!(
            CameraHandle::open(&device),
            Err(AttendError::Camera(CameraError::Unavailable(_)))
        ));
    }

    #[test]
    fn permission_denied_is_recognized() {
        let e = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(
            camera_error(Path::new("/dev/video0"), &e),
            CameraError::PermissionDenied
        );
    }
}
