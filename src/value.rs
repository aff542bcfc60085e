//! Textual encodings for typed reads and writes.

/// Types that can be written as a config value.
pub trait ToConfigValue {
    fn to_config_value(&self) -> String;
}

/// Types that can be read back from a config value.
pub trait FromConfigValue: Sized {
    /// Name used in conversion errors.
    const TYPE_NAME: &'static str;

    /// Parse `text`, returning None when it does not match the format.
    fn from_config_value(text: &str) -> Option<Self>;
}

impl ToConfigValue for str {
    fn to_config_value(&self) -> String {
        self.to_string()
    }
}

impl ToConfigValue for String {
    fn to_config_value(&self) -> String {
        self.clone()
    }
}

impl<T: ToConfigValue + ?Sized> ToConfigValue for &T {
    fn to_config_value(&self) -> String {
        (**self).to_config_value()
    }
}

impl FromConfigValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_config_value(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

macro_rules! integer_value {
    ($ty:ty, $name:literal) => {
        impl ToConfigValue for $ty {
            fn to_config_value(&self) -> String {
                self.to_string()
            }
        }

        impl FromConfigValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_config_value(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }
    };
}

integer_value!(i32, "32-bit integer");
integer_value!(i64, "64-bit integer");

impl ToConfigValue for bool {
    fn to_config_value(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

impl FromConfigValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_config_value(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Shortest text that parses back to the same bits; NaN and the infinities
/// get fixed spellings.
impl ToConfigValue for f64 {
    fn to_config_value(&self) -> String {
        if self.is_nan() {
            "NaN".to_string()
        } else if self.is_infinite() {
            let text = if *self > 0.0 { "Infinity" } else { "-Infinity" };
            text.to_string()
        } else {
            format!("{:?}", self)
        }
    }
}

impl FromConfigValue for f64 {
    const TYPE_NAME: &'static str = "double";

    fn from_config_value(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: f64) -> f64 {
        f64::from_config_value(&value.to_config_value()).unwrap()
    }

    #[test]
    fn doubles_round_trip_bit_exact() {
        for value in [
            42.42,
            std::f64::consts::PI,
            1.0 / 3.0,
            1.0 / 7.0,
            f64::MIN,
            f64::MAX,
            f64::MIN_POSITIVE,
            f64::EPSILON,
            -0.0,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ] {
            assert_eq!(round_trip(value).to_bits(), value.to_bits(), "{}", value);
        }
        assert!(round_trip(f64::NAN).is_nan());
    }

    #[test]
    fn special_doubles_have_fixed_spelling() {
        assert_eq!(f64::NAN.to_config_value(), "NaN");
        assert_eq!(f64::INFINITY.to_config_value(), "Infinity");
        assert_eq!(f64::NEG_INFINITY.to_config_value(), "-Infinity");
        assert_eq!(f64::from_config_value("inf"), Some(f64::INFINITY));
    }

    #[test]
    fn integers_accept_sign_and_reject_garbage() {
        assert_eq!(i32::from_config_value("+42"), Some(42));
        assert_eq!(i32::from_config_value(&i32::MIN.to_config_value()), Some(i32::MIN));
        assert_eq!(i64::from_config_value(&i64::MAX.to_config_value()), Some(i64::MAX));
        assert_eq!(i32::from_config_value("4294967296"), None);
        assert_eq!(i32::from_config_value("forty-two"), None);
    }

    #[test]
    fn booleans() {
        assert_eq!(true.to_config_value(), "true");
        assert_eq!(false.to_config_value(), "false");
        assert_eq!(bool::from_config_value("TRUE"), Some(true));
        assert_eq!(bool::from_config_value(" False "), Some(false));
        for other in ["yes", "on", "1", "no", "off", "0", "maybe", ""] {
            assert_eq!(bool::from_config_value(other), None, "{:?}", other);
        }
    }
}
