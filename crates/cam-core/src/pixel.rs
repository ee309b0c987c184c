use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Pixel ARGB empaqueté : `(a << 24) | (r << 16) | (g << 8) | b`.
///
/// Représentation canonique d'une couleur dans le pipeline. L'alpha est
/// transporté et moyenné, jamais utilisé pour du blending.
///
/// # Example
/// ```
/// use cam_core::pixel::Argb;
/// let px = Argb::pack(255, 18, 52, 86);
/// assert_eq!(px.0, 0xFF12_3456);
/// assert_eq!(px.channels(), (255, 18, 52, 86));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Argb(pub u32);

impl Argb {
    /// Noir opaque.
    pub const BLACK: Argb = Argb(0xFF00_0000);
    /// Blanc opaque.
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    /// Pixel entièrement nul.
    pub const TRANSPARENT: Argb = Argb(0);

    /// Combine quatre canaux 0–255 en un pixel empaqueté.
    ///
    /// # Example
    /// ```
    /// use cam_core::pixel::Argb;
    /// assert_eq!(Argb::pack(0xAA, 0xBB, 0xCC, 0xDD).0, 0xAABB_CCDD);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Canal alpha.
    #[inline(always)]
    #[must_use]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Canal rouge.
    #[inline(always)]
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Canal vert.
    #[inline(always)]
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Canal bleu.
    #[inline(always)]
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Dépaquette les quatre canaux → (a, r, g, b).
    ///
    /// # Example
    /// ```
    /// use cam_core::pixel::Argb;
    /// let (a, r, g, b) = Argb::pack(1, 2, 3, 4).channels();
    /// assert_eq!((a, r, g, b), (1, 2, 3, 4));
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn channels(self) -> (u8, u8, u8, u8) {
        (self.a(), self.r(), self.g(), self.b())
    }

    /// Luminance relative sRGB dans [0.0, 1.0].
    ///
    /// Décode chaque canal par la fonction de transfert sRGB standard
    /// (segment linéaire sous 0.04045, puissance 2.4 au-dessus) puis pondère
    /// `0.2126·R + 0.7152·G + 0.0722·B`. La rampe de densité est calibrée
    /// sur ces constantes exactes.
    ///
    /// # Example
    /// ```
    /// use cam_core::pixel::Argb;
    /// assert_eq!(Argb::BLACK.luminance(), 0.0);
    /// assert!((Argb::WHITE.luminance() - 1.0).abs() < 1e-6);
    /// ```
    #[inline]
    #[must_use]
    pub fn luminance(self) -> f32 {
        0.2126 * srgb_to_linear(self.r())
            + 0.7152 * srgb_to_linear(self.g())
            + 0.0722 * srgb_to_linear(self.b())
    }

    /// Parse `#RRGGBB` (alpha opaque) ou `#AARRGGBB`.
    ///
    /// # Errors
    /// `CoreError::InvalidColor` si la chaîne n'a pas ce format.
    ///
    /// # Example
    /// ```
    /// use cam_core::pixel::Argb;
    /// assert_eq!(Argb::from_hex("#FFFFFF").unwrap(), Argb::WHITE);
    /// assert_eq!(Argb::from_hex("#80FF0000").unwrap().a(), 0x80);
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| CoreError::InvalidColor(s.to_string()))?;
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| CoreError::InvalidColor(s.to_string()))?;
        match digits.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(CoreError::InvalidColor(s.to_string())),
        }
    }

    /// Format `#AARRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:08X}", self.0)
    }
}

impl TryFrom<String> for Argb {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Argb> for String {
    fn from(px: Argb) -> Self {
        px.to_hex()
    }
}

/// LUT sRGB → linéaire, 256 entrées, construite au premier accès.
fn srgb_lut() -> &'static [f32; 256] {
    static LUT: OnceLock<[f32; 256]> = OnceLock::new();
    LUT.get_or_init(|| {
        let mut table = [0.0f32; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            let c = i as f32 / 255.0;
            *slot = if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            };
        }
        table
    })
}

/// Décode un canal sRGB 0–255 en intensité linéaire [0.0, 1.0].
#[inline(always)]
#[must_use]
pub fn srgb_to_linear(channel: u8) -> f32 {
    srgb_lut()[channel as usize]
}

/// Moyenne arithmétique canal par canal d'une séquence de pixels empaquetés.
///
/// Chaque canal est sommé indépendamment puis divisé par le nombre de pixels
/// en division entière. La troncature est une quantization volontaire et
/// reproductible.
///
/// # Panics
/// Si `colors` est vide.
///
/// # Example
/// ```
/// use cam_core::pixel::{average, Argb};
/// let avg = average(&[Argb::pack(255, 0, 0, 0), Argb::pack(255, 255, 0, 0)]);
/// assert_eq!(avg, Argb::pack(255, 127, 0, 0));
/// ```
#[must_use]
pub fn average(colors: &[Argb]) -> Argb {
    assert!(!colors.is_empty(), "Moyenne d'une séquence de pixels vide");
    let mut sums = [0u64; 4];
    for px in colors {
        let (a, r, g, b) = px.channels();
        sums[0] += u64::from(a);
        sums[1] += u64::from(r);
        sums[2] += u64::from(g);
        sums[3] += u64::from(b);
    }
    let n = colors.len() as u64;
    Argb::pack(
        (sums[0] / n) as u8,
        (sums[1] / n) as u8,
        (sums[2] / n) as u8,
        (sums[3] / n) as u8,
    )
}

/// Convertit un buffer brut (R,G,B,A par pixel) en pixels empaquetés.
///
/// # Example
/// ```
/// use cam_core::pixel::{rgba_to_packed, Argb};
/// let raw = [10u8, 20, 30, 40];
/// let mut packed = [Argb::TRANSPARENT];
/// rgba_to_packed(&raw, &mut packed);
/// assert_eq!(packed[0], Argb::pack(40, 10, 20, 30));
/// ```
pub fn rgba_to_packed(src: &[u8], dst: &mut [Argb]) {
    debug_assert_eq!(src.len(), dst.len() * 4, "buffer RGBA mal dimensionné");
    for (quad, px) in src.chunks_exact(4).zip(dst.iter_mut()) {
        *px = Argb::pack(quad[3], quad[0], quad[1], quad[2]);
    }
}

/// Convertit des pixels empaquetés vers le buffer brut (R,G,B,A par pixel).
///
/// # Example
/// ```
/// use cam_core::pixel::{packed_to_rgba, Argb};
/// let packed = [Argb::pack(40, 10, 20, 30)];
/// let mut raw = [0u8; 4];
/// packed_to_rgba(&packed, &mut raw);
/// assert_eq!(raw, [10, 20, 30, 40]);
/// ```
pub fn packed_to_rgba(src: &[Argb], dst: &mut [u8]) {
    debug_assert_eq!(src.len() * 4, dst.len(), "buffer RGBA mal dimensionné");
    for (px, quad) in src.iter().zip(dst.chunks_exact_mut(4)) {
        let (a, r, g, b) = px.channels();
        quad[0] = r;
        quad[1] = g;
        quad[2] = b;
        quad[3] = a;
    }
}
