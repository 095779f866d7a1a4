//! Flattening the editor into a single image.
//!
//! The host hides its controls, asks the viewport for a screenshot and hands the result
//! here; the canvas region is cut out and written next to the source photo.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{EditorError, Result};

pub fn annotated_path(image_path: &Path) -> PathBuf {
    image_path.with_file_name(format!(
        "{}_annotated.png",
        image_path
            .file_stem()
            .unwrap_or_default()
            .to_str()
            .unwrap_or("out")
    ))
}

/// Cuts `region` (in points) out of a screenshot taken at `pixels_per_point`.
pub fn crop_snapshot(
    snapshot: &egui::ColorImage,
    region: egui::Rect,
    pixels_per_point: f32,
) -> Result<RgbaImage> {
    let [w, h] = snapshot.size;
    let clamp_x = |v: f32| ((v * pixels_per_point).round().max(0.0) as usize).min(w);
    let clamp_y = |v: f32| ((v * pixels_per_point).round().max(0.0) as usize).min(h);
    let (x0, x1) = (clamp_x(region.min.x), clamp_x(region.max.x));
    let (y0, y1) = (clamp_y(region.min.y), clamp_y(region.max.y));
    if x1 <= x0 || y1 <= y0 {
        return Err(EditorError::EmptySnapshot);
    }

    let mut out = RgbaImage::new((x1 - x0) as u32, (y1 - y0) as u32);
    for y in y0..y1 {
        for x in x0..x1 {
            let c = snapshot.pixels[y * w + x];
            out.put_pixel(
                (x - x0) as u32,
                (y - y0) as u32,
                image::Rgba(c.to_srgba_unmultiplied()),
            );
        }
    }
    Ok(out)
}

pub fn save_flattened(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save(path)?;
    log::info!("Exported to {}", path.display());
    Ok(())
}
