//! Flag icon cache.
//!
//! Flags arrive as SVGs from the daemon (`/flags/{id}.svg`). A worker
//! thread downloads and rasterizes each id once; the render loop uploads
//! finished pixels as textures when it pumps the cache. A missing or
//! malformed flag is remembered as failed and simply never drawn.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use macroquad::prelude::*;
use tracing::warn;

/// Rasterized at twice the drawn size so downscaling stays crisp.
const SUPERSAMPLE: f32 = 2.0;

struct RasterFlag {
    width: u16,
    height: u16,
    rgba: Vec<u8>,
}

enum FlagSlot {
    Pending,
    Ready(Texture2D),
    Failed,
}

pub struct FlagCache {
    slots: HashMap<String, FlagSlot>,
    tx_req: mpsc::Sender<(String, u32, u32)>,
    rx_done: mpsc::Receiver<(String, Result<RasterFlag, String>)>,
}

impl FlagCache {
    pub fn new(base_url: String) -> Self {
        let (tx_req, rx_req) = mpsc::channel::<(String, u32, u32)>();
        let (tx_done, rx_done) = mpsc::channel();

        thread::spawn(move || {
            while let Ok((id, w, h)) = rx_req.recv() {
                let res = fetch_and_rasterize(&base_url, &id, w, h);
                if tx_done.send((id, res)).is_err() {
                    break;
                }
            }
        });

        Self {
            slots: HashMap::new(),
            tx_req,
            rx_done,
        }
    }

    /// Queue a download for `id` at the given on-screen size, once.
    pub fn request(&mut self, id: &str, draw_w: f32, draw_h: f32) {
        if self.slots.contains_key(id) {
            return;
        }
        let w = (draw_w * SUPERSAMPLE).ceil().max(1.0) as u32;
        let h = (draw_h * SUPERSAMPLE).ceil().max(1.0) as u32;
        if self.tx_req.send((id.to_string(), w, h)).is_ok() {
            self.slots.insert(id.to_string(), FlagSlot::Pending);
        }
    }

    /// Upload any finished rasters as textures. Call once per frame.
    pub fn pump(&mut self) {
        while let Ok((id, res)) = self.rx_done.try_recv() {
            let slot = match res {
                Ok(raster) => {
                    let tex = Texture2D::from_rgba8(raster.width, raster.height, &raster.rgba);
                    tex.set_filter(FilterMode::Linear);
                    FlagSlot::Ready(tex)
                }
                Err(e) => {
                    warn!("flag {id} unavailable: {e}");
                    FlagSlot::Failed
                }
            };
            self.slots.insert(id, slot);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Texture2D> {
        match self.slots.get(id) {
            Some(FlagSlot::Ready(tex)) => Some(tex),
            _ => None,
        }
    }
}

fn fetch_and_rasterize(
    base_url: &str,
    id: &str,
    width: u32,
    height: u32,
) -> Result<RasterFlag, String> {
    let url = format!("{base_url}/flags/{id}.svg");
    let response = reqwest::blocking::get(&url).map_err(|e| format!("request failed: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("server returned {}", response.status()));
    }
    let bytes = response.bytes().map_err(|e| format!("read failed: {e}"))?;

    let tree = usvg::Tree::from_data(&bytes, &usvg::Options::default())
        .map_err(|e| format!("svg parse failed: {e}"))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| "failed to allocate pixmap".to_string())?;
    let sx = width as f32 / tree.size().width();
    let sy = height as f32 / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia keeps premultiplied pixels; textures want straight alpha.
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for p in pixmap.pixels() {
        let c = p.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    Ok(RasterFlag {
        width: width as u16,
        height: height as u16,
        rgba,
    })
}
