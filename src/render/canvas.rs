//! CPU drawing surface with sketch-style shape operations.
//!
//! Shapes are built from vertices and quadratic vertices into a tiny-skia
//! path, filled with the even-odd rule and stroked with round joins.

use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use tiny_skia::{Color, FillRule, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::blob::{parse_svg_path, to_path_commands, BlobSpec, Hsb, PathCommand};
use crate::error::{Error, Result};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Raster canvas plus the current drawing state
pub struct Canvas {
    pixmap: Pixmap,
    fill: Rgba<u8>,
    stroke: Rgba<u8>,
    stroke_weight: f32,
    translation: Vec2,
    /// Outline of the shape being built (untranslated)
    shape: PathBuilder,
}

fn black_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| Error::Render(format!("Canvas {}x{} is too large", width, height)))?;
    pixmap.fill(Color::BLACK);
    Ok(pixmap)
}

fn paint(colour: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(colour[0], colour[1], colour[2], colour[3]);
    paint.anti_alias = true;
    paint
}

impl Canvas {
    /// Black canvas of the given size
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            pixmap: black_pixmap(width, height)?,
            fill: Rgba([255, 255, 255, 255]),
            stroke: BLACK,
            stroke_weight: 1.0,
            translation: Vec2::ZERO,
            shape: PathBuilder::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha copy of the pixels
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    /// Encode the canvas as an image file (format from the extension)
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }

    /// Reallocate at a new size; previous content is discarded
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixmap = black_pixmap(width, height)?;
        Ok(())
    }

    /// Overwrite every pixel
    pub fn background(&mut self, colour: Rgba<u8>) {
        self.pixmap
            .fill(Color::from_rgba8(colour[0], colour[1], colour[2], colour[3]));
    }

    pub fn fill(&mut self, colour: Rgba<u8>) {
        self.fill = colour;
    }

    pub fn stroke(&mut self, colour: Rgba<u8>) {
        self.stroke = colour;
    }

    /// Outline width (pixels); 0 disables stroking
    pub fn stroke_weight(&mut self, weight: f32) {
        self.stroke_weight = weight.max(0.0);
    }

    /// Offset applied to shapes closed from now on (cumulative)
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.translation += Vec2::new(dx, dy);
    }

    pub fn begin_shape(&mut self) {
        self.shape.clear();
    }

    pub fn vertex(&mut self, x: f32, y: f32) {
        if self.shape.is_empty() {
            self.shape.move_to(x, y);
        } else {
            self.shape.line_to(x, y);
        }
    }

    /// Quadratic curve from the last vertex through `(cx, cy)` to `(x, y)`
    pub fn quadratic_vertex(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        if self.shape.is_empty() {
            self.shape.move_to(x, y);
            return;
        }
        self.shape.quad_to(cx, cy, x, y);
    }

    /// Fill and stroke the current shape as a closed outline
    pub fn end_shape_close(&mut self) {
        let mut builder = std::mem::take(&mut self.shape);
        builder.close();
        // Fewer than two distinct points has no area and no outline
        let Some(path) = builder.finish() else {
            return;
        };
        let transform = Transform::from_translate(self.translation.x, self.translation.y);

        self.pixmap.fill_path(
            &path,
            &paint(self.fill),
            FillRule::EvenOdd,
            transform,
            None,
        );
        if self.stroke_weight > 0.0 {
            let stroke = Stroke {
                width: self.stroke_weight,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(self.stroke), &stroke, transform, None);
        }
    }

    /// Replay path commands between a begin-shape and a closing end-shape
    pub fn draw_path(&mut self, commands: &[PathCommand]) {
        self.begin_shape();
        for command in commands {
            match *command {
                PathCommand::MoveTo(p) => self.vertex(p.x, p.y),
                PathCommand::QuadTo { ctrl, to } => {
                    self.quadratic_vertex(ctrl.x, ctrl.y, to.x, to.y)
                }
                PathCommand::Close => {}
            }
        }
        self.end_shape_close();
    }

    /// Draw one blob centred on `(x, y)`: translucent fill, opaque stroke
    pub fn draw_blob(&mut self, x: f32, y: f32, spec: &BlobSpec, colour: Hsb, fill_alpha: f32) {
        let path = crate::blob::blob_svg_path(spec);
        let commands = to_path_commands(&parse_svg_path(&path));

        let offset = Vec2::new(x - spec.size / 2.0, y - spec.size / 2.0);
        self.translate(offset.x, offset.y);
        self.fill(colour.to_rgba(fill_alpha));
        self.stroke(colour.to_rgba(1.0));
        self.draw_path(&commands);
        self.translate(-offset.x, -offset.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn square(canvas: &mut Canvas, x0: f32, y0: f32, x1: f32, y1: f32) {
        canvas.begin_shape();
        canvas.vertex(x0, y0);
        canvas.vertex(x1, y0);
        canvas.vertex(x1, y1);
        canvas.vertex(x0, y1);
        canvas.end_shape_close();
    }

    fn fill_only(width: u32, height: u32, colour: Rgba<u8>) -> Canvas {
        let mut canvas = Canvas::new(width, height).unwrap();
        canvas.stroke_weight(0.0);
        canvas.fill(colour);
        canvas
    }

    fn pixel(canvas: &Canvas, x: u32, y: u32) -> Rgba<u8> {
        *canvas.to_image().get_pixel(x, y)
    }

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(4, 3).unwrap();
        assert!(canvas.to_image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_fill_covers_the_inside_only() {
        let mut canvas = fill_only(10, 10, RED);
        square(&mut canvas, 2.0, 2.0, 6.0, 6.0);

        assert_eq!(pixel(&canvas, 2, 2), RED);
        assert_eq!(pixel(&canvas, 5, 5), RED);
        assert_eq!(pixel(&canvas, 1, 1), BLACK);
        assert_eq!(pixel(&canvas, 7, 7), BLACK);
    }

    #[test]
    fn test_half_alpha_fill_blends_with_black() {
        let mut canvas = fill_only(4, 4, Rgba([200, 100, 0, 128]));
        square(&mut canvas, 0.0, 0.0, 4.0, 4.0);

        let p = pixel(&canvas, 1, 1);
        assert!((p[0] as i32 - 100).abs() <= 1, "{p:?}");
        assert!((p[1] as i32 - 50).abs() <= 1, "{p:?}");
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_stroke_outlines_a_transparent_fill() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.fill(CLEAR);
        canvas.stroke(RED);
        canvas.stroke_weight(2.0);
        square(&mut canvas, 5.0, 5.0, 15.0, 15.0);

        assert_eq!(pixel(&canvas, 10, 5), RED);
        assert_eq!(pixel(&canvas, 10, 10), BLACK);
    }

    #[test]
    fn test_translate_offsets_shapes() {
        let mut canvas = fill_only(10, 10, RED);
        canvas.translate(5.0, 5.0);
        square(&mut canvas, 0.0, 0.0, 2.0, 2.0);

        assert_eq!(pixel(&canvas, 5, 5), RED);
        assert_eq!(pixel(&canvas, 1, 1), BLACK);
    }

    #[test]
    fn test_shapes_are_clipped_to_canvas() {
        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.fill(RED);
        canvas.stroke(RED);
        square(&mut canvas, -10.0, -10.0, 50.0, 50.0);
        assert!(canvas.to_image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_quadratic_vertex_bulges_towards_control_point() {
        let mut canvas = fill_only(20, 20, RED);
        canvas.begin_shape();
        canvas.vertex(0.0, 0.0);
        // Peak at t = 0.5 is y = 10
        canvas.quadratic_vertex(10.0, 20.0, 20.0, 0.0);
        canvas.end_shape_close();

        assert_eq!(pixel(&canvas, 10, 5), RED);
        assert_eq!(pixel(&canvas, 10, 14), BLACK);
    }

    #[test]
    fn test_degenerate_shape_draws_nothing() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.begin_shape();
        canvas.vertex(1.0, 1.0);
        canvas.end_shape_close();
        assert!(canvas.to_image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_draw_blob_is_centred() {
        let mut canvas = Canvas::new(100, 100).unwrap();
        canvas.stroke_weight(2.0);
        let spec = BlobSpec {
            size: 40.0,
            growth: 6,
            edges: 8,
            seed: 1,
        };
        canvas.draw_blob(50.0, 50.0, &spec, Hsb::vivid(0.0), 0.5);

        assert_ne!(pixel(&canvas, 50, 50), BLACK);
        assert_eq!(pixel(&canvas, 5, 5), BLACK);
        assert_eq!(pixel(&canvas, 95, 95), BLACK);
        // Translation is restored
        assert_eq!(canvas.translation, Vec2::ZERO);
    }

    #[test]
    fn test_resize_discards_content() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.background(RED);
        canvas.resize(8, 2).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (8, 2));
        assert!(canvas.to_image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        assert!(matches!(Canvas::new(u32::MAX, u32::MAX), Err(Error::Render(_))));
    }

    #[test]
    fn test_save_png_writes_the_frame() {
        let path = std::env::temp_dir().join(format!("blobs-canvas-{}.png", std::process::id()));
        let mut canvas = Canvas::new(6, 4).unwrap();
        canvas.background(RED);
        canvas.save_png(&path).unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (6, 4));
        assert_eq!(*saved.get_pixel(3, 2), RED);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_png_reports_image_errors() {
        let canvas = Canvas::new(2, 2).unwrap();
        let path = std::env::temp_dir().join("blobs-canvas-no-such-dir").join("frame.png");
        assert!(matches!(canvas.save_png(&path), Err(Error::Image(_))));
    }
}
