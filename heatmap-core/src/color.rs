//! Thang màu: chọn miền theo chế độ và nội suy giữa hai màu.

use serde::{Deserialize, Serialize};

use crate::HeatmapError;

/// Kiểu thang màu (mã số cũ: 1 = linear, 2 = sqrt, 3 = cubehelix).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Linear,
    #[default]
    Sqrt,
    CubeHelix,
}

impl ColorMode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ColorMode::Linear),
            2 => Some(ColorMode::Sqrt),
            3 => Some(ColorMode::CubeHelix),
            _ => None,
        }
    }

    /// Vị trí chuẩn hoá `[0, 1]` của `value` trong miền của thang.
    ///
    /// Linear và CubeHelix dùng miền `[min, max]`; Sqrt dùng `[0, max]` trên
    /// căn bậc hai. Miền suy biến trả về điểm giữa `0.5`.
    pub fn position(self, min: f64, max: f64, value: f64) -> f64 {
        let (low, high, value) = match self {
            ColorMode::Sqrt => (0.0, signed_sqrt(max), signed_sqrt(value)),
            ColorMode::Linear | ColorMode::CubeHelix => (min, max, value),
        };
        let span = high - low;
        if span == 0.0 || !span.is_finite() {
            return 0.5;
        }
        ((value - low) / span).clamp(0.0, 1.0)
    }
}

impl std::str::FromStr for ColorMode {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "1" => Ok(ColorMode::Linear),
            "sqrt" | "2" => Ok(ColorMode::Sqrt),
            "cubehelix" | "cube_helix" | "3" => Ok(ColorMode::CubeHelix),
            other => Err(HeatmapError::InvalidConfig(format!(
                "colorMode không hợp lệ: {other}"
            ))),
        }
    }
}

fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}

/// Ánh xạ giá trị sang màu, do lớp vẽ cung cấp.
pub trait ColorScale {
    fn resolve(&self, min: f64, max: f64, value: f64, mode: ColorMode) -> String;
}

/// Thang hai màu mặc định, trả về `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    from: Rgb,
    to: Rgb,
}

impl Gradient {
    pub fn new(min_color: &str, max_color: &str) -> Result<Self, HeatmapError> {
        Ok(Self {
            from: Rgb::parse(min_color)?,
            to: Rgb::parse(max_color)?,
        })
    }
}

impl ColorScale for Gradient {
    fn resolve(&self, min: f64, max: f64, value: f64, mode: ColorMode) -> String {
        let t = mode.position(min, max, value);
        let color = match mode {
            ColorMode::Linear | ColorMode::Sqrt => self.from.lerp(self.to, t),
            ColorMode::CubeHelix => {
                CubeHelix::from_rgb(self.from)
                    .interpolate(CubeHelix::from_rgb(self.to), t)
                    .to_rgb()
            }
        };
        color.to_hex()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb {
    r: f64,
    g: f64,
    b: f64,
}

impl Rgb {
    /// Nhận `#rgb`, `#rrggbb` hoặc `rgb(r, g, b)`.
    fn parse(input: &str) -> Result<Self, HeatmapError> {
        let invalid = || HeatmapError::InvalidConfig(format!("màu không hợp lệ: {input}"));
        let text = input.trim();

        if let Some(hex) = text.strip_prefix('#') {
            let channel = |s: &str| u8::from_str_radix(s, 16).map(f64::from).map_err(|_| invalid());
            return match hex.len() {
                3 if hex.is_ascii() => {
                    let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                    Ok(Rgb {
                        r: expand(0)?,
                        g: expand(1)?,
                        b: expand(2)?,
                    })
                }
                6 if hex.is_ascii() => Ok(Rgb {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                }),
                _ => Err(invalid()),
            };
        }

        let inner = text
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let channels = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>().map(f64::from).map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb {
                r: *r,
                g: *g,
                b: *b,
            }),
            _ => Err(invalid()),
        }
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    fn to_hex(self) -> String {
        let channel = |v: f64| if v.is_nan() { 0 } else { v.round().clamp(0.0, 255.0) as u8 };
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

const A: f64 = -0.14861;
const B: f64 = 1.78277;
const C: f64 = -0.29227;
const D: f64 = -0.90649;
const E: f64 = 1.97294;

/// Màu trong không gian cubehelix (Green 2011); `h` và `s` có thể là NaN với màu xám.
#[derive(Debug, Clone, Copy)]
struct CubeHelix {
    h: f64,
    s: f64,
    l: f64,
}

impl CubeHelix {
    fn from_rgb(color: Rgb) -> Self {
        let (r, g, b) = (color.r / 255.0, color.g / 255.0, color.b / 255.0);
        let ed = E * D;
        let eb = E * B;
        let bc_da = B * C - D * A;

        let l = (bc_da * b + ed * r - eb * g) / (bc_da + ed - eb);
        let bl = b - l;
        let k = (E * (g - l) - C * bl) / D;
        let s = (k * k + bl * bl).sqrt() / (E * l * (1.0 - l));
        let s = if s.is_finite() { s } else { f64::NAN };
        let h = if s.is_nan() || s == 0.0 {
            f64::NAN
        } else {
            let h = k.atan2(bl).to_degrees() - 120.0;
            if h < 0.0 {
                h + 360.0
            } else {
                h
            }
        };

        Self { h, s, l }
    }

    /// Gamma 1, sắc độ đi theo cung ngắn nhất.
    fn interpolate(self, other: CubeHelix, t: f64) -> CubeHelix {
        CubeHelix {
            h: interpolate_hue(self.h, other.h, t),
            s: interpolate_plain(self.s, other.s, t),
            l: interpolate_plain(self.l, other.l, t),
        }
    }

    fn to_rgb(self) -> Rgb {
        let h = if self.h.is_nan() {
            0.0
        } else {
            (self.h + 120.0).to_radians()
        };
        let l = self.l;
        let a = if self.s.is_nan() {
            0.0
        } else {
            self.s * l * (1.0 - l)
        };
        let (cos_h, sin_h) = (h.cos(), h.sin());

        Rgb {
            r: 255.0 * (l + a * (A * cos_h + B * sin_h)),
            g: 255.0 * (l + a * (C * cos_h + D * sin_h)),
            b: 255.0 * (l + a * (E * cos_h)),
        }
    }
}

fn interpolate_hue(a: f64, b: f64, t: f64) -> f64 {
    let d = b - a;
    if d.is_nan() || d == 0.0 {
        return if a.is_nan() { b } else { a };
    }
    let d = if d > 180.0 || d < -180.0 {
        d - 360.0 * (d / 360.0).round()
    } else {
        d
    };
    a + t * d
}

fn interpolate_plain(a: f64, b: f64, t: f64) -> f64 {
    let d = b - a;
    if d.is_nan() || d == 0.0 {
        return if a.is_nan() { b } else { a };
    }
    a + t * d
}
