use std::fmt;

/// Identity the map widget assigns to a container when it is initialised.
///
/// Registry entries are keyed by this value; the controller never mints one
/// itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    pub const fn new(n: u64) -> Self {
        WidgetId(n)
    }

    /// Widget ids arrive from JavaScript as numbers; anything that is not a
    /// non-negative integer is treated as unassigned.
    pub fn from_js_number(n: f64) -> Option<Self> {
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 {
            Some(WidgetId(n as u64))
        } else {
            None
        }
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::WidgetId;

    #[test]
    fn accepts_only_integral_js_numbers() {
        assert_eq!(WidgetId::from_js_number(42.0), Some(WidgetId::new(42)));
        assert_eq!(WidgetId::from_js_number(0.0), Some(WidgetId::new(0)));
        assert_eq!(WidgetId::from_js_number(1.5), None);
        assert_eq!(WidgetId::from_js_number(-3.0), None);
        assert_eq!(WidgetId::from_js_number(f64::NAN), None);
    }
}
