use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// True if neither dimension exceeds `cap`
    pub fn fits_within(&self, cap: Resolution) -> bool {
        self.width <= cap.width && self.height <= cap.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = anyhow::Error;

    /// Parses `WIDTHxHEIGHT`, e.g. `1920x1080`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .with_context(|| format!("Expected WIDTHxHEIGHT, got '{}'", s))?;

        let width: u32 = w.trim().parse().with_context(|| format!("Invalid width '{}'", w))?;
        let height: u32 = h.trim().parse().with_context(|| format!("Invalid height '{}'", h))?;

        if width == 0 || height == 0 {
            bail!("Resolution must be positive, got {}x{}", width, height);
        }

        Ok(Self { width, height })
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Pick the largest supported resolution that fits under `cap`
///
/// Among entries no wider and no taller than `cap`, the one with the largest
/// area wins; on equal area the earlier entry is kept. When nothing fits,
/// the first supported entry is returned as-is.
///
/// Returns `None` only when `supported` is empty.
pub fn select_resolution(supported: &[Resolution], cap: Resolution) -> Option<Resolution> {
    let first = *supported.first()?;

    let best = supported
        .iter()
        .filter(|r| r.fits_within(cap))
        .fold(None::<Resolution>, |best, &candidate| match best {
            Some(current) if current.area() >= candidate.area() => Some(current),
            _ => Some(candidate),
        });

    Some(best.unwrap_or(first))
}
