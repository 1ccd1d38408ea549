//! Background fetch of the map tile used as ground texture

use std::sync::mpsc::{self, Receiver, TryRecvError};

use shared::TileSource;

/// Decoded tile, RGBA8 rows top to bottom
#[derive(Clone)]
pub struct TileImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for TileImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Where the tile fetch stands
#[derive(Debug, Clone, PartialEq)]
pub enum TileStatus {
    Disabled,
    Loading,
    Ready,
    Failed(String),
}

/// One-shot tile fetch on a worker thread, polled from the UI loop
pub struct TileLoader {
    rx: Option<Receiver<Result<TileImage, String>>>,
    status: TileStatus,
}

impl TileLoader {
    /// Loader that never produces a tile
    pub fn disabled() -> Self {
        Self {
            rx: None,
            status: TileStatus::Disabled,
        }
    }

    /// Start fetching `source` in the background
    pub fn spawn(source: &TileSource, user_agent: &str) -> Self {
        let url = source.url();
        let user_agent = user_agent.to_string();
        let (tx, rx) = mpsc::channel();

        tracing::info!("Fetching map tile {url}");
        let spawned = std::thread::Builder::new()
            .name("tile-fetch".to_string())
            .spawn(move || {
                let result = fetch_blocking(&url, &user_agent).and_then(|bytes| decode_tile(&bytes));
                // Receiver may be gone if the app already quit
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => Self {
                rx: Some(rx),
                status: TileStatus::Loading,
            },
            Err(e) => {
                tracing::error!("Failed to start tile fetch thread: {e}");
                Self {
                    rx: None,
                    status: TileStatus::Failed(e.to_string()),
                }
            }
        }
    }

    pub fn status(&self) -> &TileStatus {
        &self.status
    }

    /// Non-blocking check for the fetched tile. Yields the image at most once.
    pub fn poll(&mut self) -> Option<TileImage> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err("Tile fetch thread exited".to_string()),
        };
        self.rx = None;

        match result {
            Ok(image) => {
                tracing::info!("Map tile ready ({}x{})", image.width, image.height);
                self.status = TileStatus::Ready;
                Some(image)
            }
            Err(e) => {
                tracing::warn!("Map tile unavailable: {e}");
                self.status = TileStatus::Failed(e);
                None
            }
        }
    }
}

fn fetch_blocking(url: &str, user_agent: &str) -> Result<Vec<u8>, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;
    runtime.block_on(fetch_tile(url, user_agent))
}

async fn fetch_tile(url: &str, user_agent: &str) -> Result<Vec<u8>, String> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| format!("HTTP client error: {e}"))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Request to {url} failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Tile server error: {e}"))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("Failed to read tile body: {e}"))?;
    Ok(bytes.to_vec())
}

/// Decode PNG/JPEG bytes into RGBA8
pub fn decode_tile(bytes: &[u8]) -> Result<TileImage, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode tile: {e}"))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(TileImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8, y as u8, 7, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let tile = decode_tile(&png_bytes(4, 3)).unwrap();
        assert_eq!((tile.width, tile.height), (4, 3));
        assert_eq!(tile.rgba.len(), 4 * 3 * 4);
        // pixel (1, 2)
        let i = ((2 * 4 + 1) * 4) as usize;
        assert_eq!(&tile.rgba[i..i + 4], &[1, 2, 7, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_tile(b"definitely not a png").is_err());
    }

    #[test]
    fn test_disabled_loader() {
        let mut loader = TileLoader::disabled();
        assert_eq!(loader.status(), &TileStatus::Disabled);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_poll_reports_failure_once() {
        let (tx, rx) = mpsc::channel();
        let mut loader = TileLoader {
            rx: Some(rx),
            status: TileStatus::Loading,
        };
        assert!(loader.poll().is_none());
        assert_eq!(loader.status(), &TileStatus::Loading);

        tx.send(Err("offline".to_string())).unwrap();
        assert!(loader.poll().is_none());
        assert_eq!(loader.status(), &TileStatus::Failed("offline".to_string()));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_poll_yields_image() {
        let (tx, rx) = mpsc::channel();
        let mut loader = TileLoader {
            rx: Some(rx),
            status: TileStatus::Loading,
        };
        tx.send(decode_tile(&png_bytes(2, 2))).unwrap();
        let tile = loader.poll().unwrap();
        assert_eq!(tile.width, 2);
        assert_eq!(loader.status(), &TileStatus::Ready);
        assert!(loader.poll().is_none());
    }
}
