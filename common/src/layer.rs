//! Off-screen pixel layer with transparency.
//!
//! The static scale (ticks and labels) only changes with the theme or scale
//! factor, so it is drawn once into a `PixelLayer` and blitted every frame.
//! Untouched pixels stay transparent and are skipped when blitting.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Row-major RGB buffer where `None` means transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelLayer {
    size: Size,
    pixels: Vec<Option<Rgb888>>,
}

impl PixelLayer {
    /// Fully transparent layer.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![None; size.width as usize * size.height as usize],
        }
    }

    /// Pixel at `point`, `None` if transparent or out of bounds.
    pub fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb888> {
        self.index(point.x, point.y).and_then(|idx| self.pixels[idx])
    }

    /// Number of pixels painted exactly `color`.
    pub fn count(
        &self,
        color: Rgb888,
    ) -> usize {
        self.pixels.iter().filter(|p| **p == Some(color)).count()
    }

    /// Number of non-transparent pixels.
    pub fn opaque_len(&self) -> usize { self.pixels.iter().filter(|p| p.is_some()).count() }

    /// Copy the opaque pixels onto `target`.
    pub fn blit<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let width = self.size.width as usize;
        target.draw_iter(self.pixels.iter().enumerate().filter_map(|(idx, p)| {
            p.map(|color| Pixel(Point::new((idx % width) as i32, (idx / width) as i32), color))
        }))
    }

    #[inline]
    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.size.width && (y as u32) < self.size.height {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl OriginDimensions for PixelLayer {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for PixelLayer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point.x, point.y) {
                self.pixels[idx] = Some(color);
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }

        let width = self.size.width as usize;
        let x_start = drawable_area.top_left.x as usize;
        let x_end = x_start + drawable_area.size.width as usize;
        for y in drawable_area.rows() {
            let row = y as usize * width;
            self.pixels[row + x_start..row + x_end].fill(Some(color));
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels.fill(Some(color));
        Ok(())
    }
}
