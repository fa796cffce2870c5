use image::{RgbaImage, imageops};

use crate::error::IcropperError;

/// Alpha statistics of a buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelCount {
    /// Pixels with alpha > 0
    pub solid: u64,
    /// Pixels with alpha == 255
    pub opaque: u64,
    pub total: u64,
}

impl PixelCount {
    pub fn of(image: &RgbaImage) -> Self {
        let mut count = PixelCount {
            total: u64::from(image.width()) * u64::from(image.height()),
            ..PixelCount::default()
        };

        for pixel in image.pixels() {
            let alpha = pixel[3];
            if alpha > 0 {
                count.solid += 1;
                if alpha == 255 {
                    count.opaque += 1;
                }
            }
        }

        count
    }

    pub fn solid_ratio(&self) -> f32 {
        ratio(self.solid, self.total)
    }

    pub fn opaque_ratio(&self) -> f32 {
        ratio(self.opaque, self.total)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        part as f32 / total as f32
    }
}

/// True if no pixel has a non-zero alpha.
pub fn is_fully_transparent(image: &RgbaImage) -> bool {
    !image.pixels().any(|pixel| pixel[3] > 0)
}

/// Quarter-turn rotation applied to fragments the compositor places turned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Negative angles turn clockwise, positive counter-clockwise.
    pub fn from_degrees(degrees: f32) -> Result<Self, IcropperError> {
        let quarter = degrees / 90.0;
        if quarter.fract() != 0.0 {
            return Err(IcropperError::InvalidRotation(degrees));
        }

        #[allow(clippy::cast_possible_truncation)]
        match (quarter as i64).rem_euclid(4) {
            1 => Ok(Rotation::CounterClockwise),
            3 => Ok(Rotation::Clockwise),
            _ => Err(IcropperError::InvalidRotation(degrees)),
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }

    pub fn apply(self, image: &RgbaImage) -> RgbaImage {
        match self {
            Rotation::Clockwise => imageops::rotate90(image),
            Rotation::CounterClockwise => imageops::rotate270(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_pixel_count() {
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 128]));
        img.put_pixel(2, 1, Rgba([255, 255, 255, 1]));

        let count = PixelCount::of(&img);
        assert_eq!(count.total, 8);
        assert_eq!(count.solid, 3);
        assert_eq!(count.opaque, 1);
        assert!((count.solid_ratio() - 0.375).abs() < f32::EPSILON);
        assert!((count.opaque_ratio() - 0.125).abs() < f32::EPSILON);
    }

    #[test]
    fn test_color_without_alpha_is_transparent() {
        let mut img = RgbaImage::new(3, 3);
        img.put_pixel(1, 1, Rgba([255, 0, 0, 0]));
        assert!(is_fully_transparent(&img));

        img.put_pixel(2, 2, Rgba([0, 0, 0, 1]));
        assert!(!is_fully_transparent(&img));
    }

    #[test]
    fn test_empty_buffer_ratios() {
        let count = PixelCount::of(&RgbaImage::new(0, 0));
        assert_eq!(count.solid_ratio(), 0.0);
        assert!(is_fully_transparent(&RgbaImage::new(0, 5)));
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(-90.0).unwrap(), Rotation::Clockwise);
        assert_eq!(Rotation::from_degrees(270.0).unwrap(), Rotation::Clockwise);
        assert_eq!(
            Rotation::from_degrees(90.0).unwrap(),
            Rotation::CounterClockwise
        );
        assert_eq!(
            Rotation::from_degrees(-270.0).unwrap(),
            Rotation::CounterClockwise
        );
        assert!(Rotation::from_degrees(0.0).is_err());
        assert!(Rotation::from_degrees(180.0).is_err());
        assert!(Rotation::from_degrees(45.0).is_err());
    }

    #[test]
    fn test_rotation_round_trip_restores_pixels() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
        img.put_pixel(2, 1, Rgba([4, 5, 6, 255]));

        let turned = Rotation::Clockwise.apply(&img);
        assert_eq!(turned.dimensions(), (2, 3));
        // top-left lands top-right after a clockwise turn
        assert_eq!(turned.get_pixel(1, 0), &Rgba([1, 2, 3, 255]));

        let restored = Rotation::Clockwise.inverse().apply(&turned);
        assert_eq!(restored, img);
    }
}
