//! Hex → OKLCH 変換
//!
//! sRGB(ガンマ) → リニアsRGB → OKLAB → OKLCH の順に変換する。

use crate::error::{Error, Result};

/// 彩度がこれ未満なら無彩色として `0 0` で出力する
pub const ACHROMATIC_CHROMA: f64 = 0.004;

/// OKLCH色（L: 0-1, C: 0-, H: 度 [0, 360)）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub lightness: f64,
    pub chroma: f64,
    pub hue: f64,
}

impl Oklch {
    /// CSS表記 `oklch(L C H)`
    ///
    /// L・Cは小数2桁、Hは整数度。無彩色は `oklch(L 0 0)`。
    pub fn to_css(&self) -> String {
        if self.chroma < ACHROMATIC_CHROMA {
            return format!("oklch({:.2} 0 0)", self.lightness);
        }
        format!(
            "oklch({:.2} {:.2} {:.0})",
            self.lightness, self.chroma, self.hue
        )
    }
}

impl std::fmt::Display for Oklch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_css())
    }
}

/// `#rgb` / `#rgba` / `#rrggbb` / `#rrggbbaa` を 0-1 のsRGBに変換（アルファは無視）
pub fn hex_to_srgb(hex_color: &str) -> Result<(f64, f64, f64)> {
    let h = hex_color.trim().trim_start_matches('#');
    if !h.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Parse(format!("不正なカラーコード: {}", hex_color)));
    }

    let expanded: String = match h.len() {
        3 | 4 => h.chars().take(3).flat_map(|c| [c, c]).collect(),
        6 | 8 => h[..6].to_string(),
        _ => return Err(Error::Parse(format!("不正なカラーコード: {}", hex_color))),
    };

    let channel = |i: usize| -> Result<f64> {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map(|v| v as f64 / 255.0)
            .map_err(|e| Error::Parse(format!("不正なカラーコード: {} ({})", hex_color, e)))
    };

    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// sRGBガンマを外す
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// リニアsRGB → OKLAB
pub fn linear_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    // cbrt は符号を保つ
    let (l, m, s) = (l.cbrt(), m.cbrt(), s.cbrt());

    (
        0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
        1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
        0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
    )
}

/// OKLAB → OKLCH
pub fn oklab_to_oklch(l: f64, a: f64, b: f64) -> Oklch {
    Oklch {
        lightness: l,
        chroma: a.hypot(b),
        hue: b.atan2(a).to_degrees().rem_euclid(360.0),
    }
}

/// Hexカラーを OKLCH に変換
pub fn hex_to_oklch(hex_color: &str) -> Result<Oklch> {
    let (r, g, b) = hex_to_srgb(hex_color)?;
    let (l, a, b) = linear_to_oklab(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    Ok(oklab_to_oklch(l, a, b))
}
