//! Contains the Camera struct, which describes a relationship between
//! a rectangle on the integral plane with an origin at 0,0 in the
//! upper-left corner, and a rectangle on the complex plane described
//! by its center and its height.
use itertools::iproduct;
use num::Complex;

use error::BrocoliError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size(pub usize, pub usize);

/// Describes the column, row of a pixel.  Row 0 is the top of the
/// image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// Maps the pixels of an image onto the complex plane.  The camera is
/// an immutable value: zooming or panning produces a new one.  A camera
/// assembled from its fields instead of `Camera::new` may be empty, in
/// which case no point has a pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The complex number in the middle of the view.
    pub center: Complex<f64>,
    /// The height of the view on the complex plane.  The width
    /// follows from the aspect ratio of `size`.
    pub height: f64,
    /// The size of the image in pixels.
    pub size: Size,
}

impl Camera {
    /// Constructor.  Refuses empty pixel grids and views without a
    /// positive height, since neither maps to anything.
    pub fn new(size: Size, center: Complex<f64>, height: f64) -> Result<Camera, BrocoliError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(BrocoliError::InvalidSize(size.0, size.1));
        }
        if !(height > 0.0) || !height.is_finite() {
            return Err(BrocoliError::InvalidHeight(height));
        }
        Ok(Camera {
            center,
            height,
            size,
        })
    }

    /// The width of the view on the complex plane.
    pub fn width(&self) -> f64 {
        self.height * (self.size.0 as f64) / (self.size.1 as f64)
    }

    /// The distance between two neighbouring pixels on the complex
    /// plane.  Pixels are square, so this is true in both directions.
    pub fn step(&self) -> f64 {
        self.width() / (self.size.0 as f64)
    }

    /// Width and height of the view as a single complex number.
    pub fn complex_size(&self) -> Complex<f64> {
        Complex::new(self.width(), self.height)
    }

    /// The complex number under the bottom-left pixel.
    pub fn bottom_left(&self) -> Complex<f64> {
        self.center - self.complex_size() / 2.0
    }

    /// The total number of pixels.  Used to calculate memory needs.
    pub fn len(&self) -> usize {
        self.size.0 * self.size.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.size.0 == 0 || self.size.1 == 0
    }

    /// Every pixel of the image, row after row, top to bottom.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(0..self.size.1, 0..self.size.0).map(|(row, column)| Pixel(column, row))
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// complex number it shows.  Rows grow downwards while the
    /// imaginary axis grows upwards, hence the flip.
    pub fn pixel_to_complex(&self, pixel: &Pixel) -> Complex<f64> {
        let bottom = self.size.1.saturating_sub(1);
        let flipped = (bottom - pixel.1.min(bottom)) as f64;
        self.bottom_left() + Complex::new(pixel.0 as f64, flipped) * self.step()
    }

    /// Given a complex number, find the pixel showing it, rounding to
    /// the nearest one.  Points that land outside of the image have no
    /// pixel.
    pub fn complex_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        if self.is_empty() {
            return None;
        }
        let cpixel = (point - self.bottom_left()) / self.step();
        let (left, flipped) = (cpixel.re.round(), cpixel.im.round());
        if !(left >= 0.0 && flipped >= 0.0)
            || left > (self.size.0 - 1) as f64
            || flipped > (self.size.1 - 1) as f64
        {
            return None;
        }
        Some(Pixel(left as usize, self.size.1 - 1 - flipped as usize))
    }

    /// A camera moved so that `point` is shown by `pixel`.
    pub fn pin(&self, pixel: &Pixel, point: Complex<f64>) -> Camera {
        let mut camera = *self;
        camera.center -= self.pixel_to_complex(pixel) - point;
        camera
    }

    /// Multiply the height of the view by `factor`, keeping the point
    /// under `pivot` where it is.  A factor below one zooms in.
    pub fn zoom(&self, factor: f64, pivot: &Pixel) -> Camera {
        let before = self.pixel_to_complex(pivot);
        let mut camera = *self;
        camera.height *= factor;
        camera.pin(pivot, before)
    }

    /// The same view on a differently sized image.
    pub fn resized(&self, size: Size) -> Result<Camera, BrocoliError> {
        Camera::new(size, self.center, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn camera_fails_on_bad_shape() {
        assert_eq!(
            Camera::new(Size(0, 4), Complex::new(0.0, 0.0), 2.0),
            Err(BrocoliError::InvalidSize(0, 4))
        );
        assert_eq!(
            Camera::new(Size(4, 4), Complex::new(0.0, 0.0), -1.0),
            Err(BrocoliError::InvalidHeight(-1.0))
        );
    }

    #[test]
    fn camera_derives_width_and_step() {
        let camera = Camera::new(Size(8, 4), Complex::new(0.0, 0.0), 2.0).unwrap();
        assert_eq!(camera.width(), 4.0);
        assert_eq!(camera.step(), 0.5);
        assert_eq!(camera.bottom_left(), Complex::new(-2.0, -1.0));
        assert_eq!(camera.len(), 32);
        assert!(!camera.is_empty());
    }

    #[test]
    fn pixel_to_complex_flips_rows() {
        let camera = Camera::new(Size(4, 4), Complex::new(0.0, 0.0), 4.0).unwrap();
        assert_eq!(camera.pixel_to_complex(&Pixel(0, 3)), Complex::new(-2.0, -2.0));
        assert_eq!(camera.pixel_to_complex(&Pixel(0, 0)), Complex::new(-2.0, 1.0));
        assert_eq!(camera.pixel_to_complex(&Pixel(2, 1)), Complex::new(0.0, 0.0));
    }

    #[test]
    fn complex_to_pixel_inverts_pixel_to_complex() {
        let camera = Camera::new(Size(37, 21), Complex::new(-0.75, 0.1), 2.5).unwrap();
        for pixel in camera.pixels() {
            let point = camera.pixel_to_complex(&pixel);
            assert_eq!(camera.complex_to_pixel(&point), Some(pixel));
        }
    }

    #[test]
    fn complex_to_pixel_rounds_to_nearest() {
        let camera = Camera::new(Size(4, 4), Complex::new(0.0, 0.0), 4.0).unwrap();
        assert_eq!(camera.complex_to_pixel(&Complex::new(0.4, -0.4)), Some(Pixel(2, 1)));
        assert_eq!(camera.complex_to_pixel(&Complex::new(0.6, 0.6)), Some(Pixel(3, 0)));
    }

    #[test]
    fn complex_to_pixel_outside_is_none() {
        let camera = Camera::new(Size(4, 4), Complex::new(0.0, 0.0), 4.0).unwrap();
        assert_eq!(camera.complex_to_pixel(&Complex::new(-3.0, 0.0)), None);
        assert_eq!(camera.complex_to_pixel(&Complex::new(0.0, 2.0)), None);
        assert_eq!(camera.complex_to_pixel(&Complex::new(2.0, 0.0)), None);
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let camera = Camera::new(Size(64, 48), Complex::new(-0.75, 0.0), 3.0).unwrap();
        let pivot = Pixel(10, 40);
        let before = camera.pixel_to_complex(&pivot);
        let zoomed = camera.zoom(0.25, &pivot);
        assert_eq!(zoomed.height, 0.75);
        assert!(close(zoomed.pixel_to_complex(&pivot), before));
        assert!(!close(zoomed.center, camera.center));
    }

    #[test]
    fn pin_moves_point_under_pixel() {
        let camera = Camera::new(Size(10, 10), Complex::new(0.0, 0.0), 1.0).unwrap();
        let target = Complex::new(0.3, -0.2);
        let pinned = camera.pin(&Pixel(0, 0), target);
        assert!(close(pinned.pixel_to_complex(&Pixel(0, 0)), target));
        assert_eq!(pinned.height, camera.height);
    }

    #[test]
    fn pixels_are_row_major() {
        let camera = Camera::new(Size(3, 2), Complex::new(0.0, 0.0), 1.0).unwrap();
        let pixels: Vec<Pixel> = camera.pixels().collect();
        assert_eq!(pixels.len(), 6);
        assert_eq!(pixels[0], Pixel(0, 0));
        assert_eq!(pixels[1], Pixel(1, 0));
        assert_eq!(pixels[3], Pixel(0, 1));
    }

    #[test]
    fn empty_camera_maps_nothing() {
        let camera = Camera {
            center: Complex::new(0.0, 0.0),
            height: 1.0,
            size: Size(0, 3),
        };
        assert_eq!(camera.complex_to_pixel(&Complex::new(0.0, 0.0)), None);
        let flat = Camera {
            size: Size(3, 0),
            ..camera
        };
        assert_eq!(flat.complex_to_pixel(&Complex::new(0.0, 0.0)), None);
        let _ = flat.pixel_to_complex(&Pixel(0, 0));
        assert_eq!(flat.pixels().count(), 0);
    }

    #[test]
    fn resized_keeps_view() {
        let camera = Camera::new(Size(3, 2), Complex::new(1.0, 1.0), 1.0).unwrap();
        let resized = camera.resized(Size(30, 20)).unwrap();
        assert_eq!(resized.center, camera.center);
        assert_eq!(resized.height, camera.height);
        assert!(camera.resized(Size(0, 20)).is_err());
    }
}
