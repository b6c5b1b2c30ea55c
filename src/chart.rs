/// Linear mapping from a value domain onto a percentage band of a chart
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    min: f64,
    max: f64,
}

impl Scale {
    /// Build a scale covering every value. Returns `None` for empty input.
    pub fn covering<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |scale, value| match scale {
            None => Some(Self {
                min: value,
                max: value,
            }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(value),
                max: max.max(value),
            }),
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the domain. A flat domain reports 1 so callers never divide by
    /// zero.
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 { 1.0 } else { range }
    }

    /// `base + (value - min) / range * span`
    pub fn percent(&self, value: f64, base: f64, span: f64) -> f64 {
        base + (value - self.min) / self.range() * span
    }
}

/// Format a percentage for a CSS height, dropping useless decimals
pub fn css_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}%")
}
