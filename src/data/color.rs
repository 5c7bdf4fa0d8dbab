//! Colors.

/// A straight-alpha RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color {
        r: 0.,
        g: 0.,
        b: 0.,
        a: 1.,
    };

    /// Opaque white.
    pub const WHITE: Color = Color {
        r: 1.,
        g: 1.,
        b: 1.,
        a: 1.,
    };

    /// The same color with zero alpha. Used for the outer edge of fade geometry so that blending
    /// interpolates towards the same hue instead of towards black.
    pub fn transparent(self) -> Color {
        Color { a: 0., ..self }
    }
}

/// An opaque RGB paint color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.,
        g: 0.,
        b: 0.,
    };

    pub const RED: Rgb = Rgb {
        r: 1.,
        g: 0.,
        b: 0.,
    };

    /// Creates a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Rgb {
        Rgb {
            r: f32::from(r) / 255.,
            g: f32::from(g) / 255.,
            b: f32::from(b) / 255.,
        }
    }

    /// Creates a color from a packed `0xRRGGBB` value.
    pub fn from_u32(rgb: u32) -> Rgb {
        Rgb::from_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Attaches an opacity, clamped to [0, 1].
    pub fn with_opacity(self, opacity: f32) -> Color {
        Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: opacity.max(0.).min(1.),
        }
    }
}

#[test]
fn packed_rgb() {
    let c = Rgb::from_u32(0xff8000);
    assert_eq!(c.r, 1.);
    assert!((c.g - 128. / 255.).abs() < 1e-6);
    assert_eq!(c.b, 0.);
}

#[test]
fn opacity_is_clamped() {
    assert_eq!(Rgb::RED.with_opacity(2.).a, 1.);
    assert_eq!(Rgb::RED.with_opacity(-1.).a, 0.);
    assert_eq!(Rgb::RED.with_opacity(0.25).transparent().a, 0.);
}
