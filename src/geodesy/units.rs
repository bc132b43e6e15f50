//! Measurement units and human-readable formatting.

use serde::{Deserialize, Serialize};

/// Unit for segment lengths and perimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Feet,
    Yards,
    Miles,
}

impl DistanceUnit {
    pub fn all() -> &'static [DistanceUnit] {
        &[
            DistanceUnit::Meters,
            DistanceUnit::Kilometers,
            DistanceUnit::Feet,
            DistanceUnit::Yards,
            DistanceUnit::Miles,
        ]
    }

    /// Short label used in the toolbar and export headers.
    pub fn label(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Feet => "ft",
            DistanceUnit::Yards => "yd",
            DistanceUnit::Miles => "mi",
        }
    }

    /// Meters per one of this unit.
    fn meters_per_unit(&self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::Feet => 0.3048,
            DistanceUnit::Yards => 0.9144,
            DistanceUnit::Miles => 1609.344,
        }
    }

    /// Fixed decimal precision per unit.
    fn decimals(&self) -> usize {
        match self {
            DistanceUnit::Meters => 1,
            DistanceUnit::Kilometers => 2,
            DistanceUnit::Feet => 1,
            DistanceUnit::Yards => 1,
            DistanceUnit::Miles => 2,
        }
    }
}

/// Unit for enclosed polygon areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AreaUnit {
    #[default]
    SquareMeters,
    Hectares,
    Acres,
    SquareFeet,
    Guntas,
}

impl AreaUnit {
    pub fn all() -> &'static [AreaUnit] {
        &[
            AreaUnit::SquareMeters,
            AreaUnit::Hectares,
            AreaUnit::Acres,
            AreaUnit::SquareFeet,
            AreaUnit::Guntas,
        ]
    }

    /// Short label used in the toolbar and export output.
    pub fn label(&self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "sq.m",
            AreaUnit::Hectares => "ha",
            AreaUnit::Acres => "ac",
            AreaUnit::SquareFeet => "sq.ft",
            AreaUnit::Guntas => "guntas",
        }
    }

    /// Square meters per one of this unit.
    fn sq_meters_per_unit(&self) -> f64 {
        match self {
            AreaUnit::SquareMeters => 1.0,
            AreaUnit::Hectares => 10_000.0,
            AreaUnit::Acres => 4046.856_422_4,
            AreaUnit::SquareFeet => 0.092_903_04,
            // 40 guntas to the acre
            AreaUnit::Guntas => 4046.856_422_4 / 40.0,
        }
    }

    /// Fixed decimal precision per unit.
    fn decimals(&self) -> usize {
        match self {
            AreaUnit::SquareMeters => 1,
            AreaUnit::Hectares => 3,
            AreaUnit::Acres => 3,
            AreaUnit::SquareFeet => 1,
            AreaUnit::Guntas => 2,
        }
    }
}

/// Format a length in meters as a short human string, e.g. `"1.50 km"`.
pub fn format_distance(meters: f64, unit: DistanceUnit) -> String {
    let value = meters / unit.meters_per_unit();
    format!("{:.*} {}", unit.decimals(), value, unit.label())
}

/// Format an area in square meters as a short human string, e.g. `"2.471 ac"`.
pub fn format_area(sq_meters: f64, unit: AreaUnit) -> String {
    let value = sq_meters / unit.sq_meters_per_unit();
    format!("{:.*} {}", unit.decimals(), value, unit.label())
}

/// Map a 0-360 bearing into quadrant notation: the nearest meridian
/// (N or S), the acute angle toward it, and the turning direction (E or W).
fn quadrant(bearing_deg: f64) -> (char, f64, char) {
    let b = bearing_deg.rem_euclid(360.0);
    if b < 90.0 {
        ('N', b, 'E')
    } else if b < 180.0 {
        ('S', 180.0 - b, 'E')
    } else if b < 270.0 {
        ('S', b - 180.0, 'W')
    } else {
        ('N', 360.0 - b, 'W')
    }
}

/// Quadrant bearing with minutes, e.g. `"N 32° 15' E"`.
pub fn format_bearing(bearing_deg: f64) -> String {
    let (ns, acute, ew) = quadrant(bearing_deg);
    let mut degrees = acute.trunc() as u32;
    let mut minutes = ((acute - acute.trunc()) * 60.0).round() as u32;
    if minutes == 60 {
        degrees += 1;
        minutes = 0;
    }
    format!("{ns} {degrees}\u{b0} {minutes}' {ew}")
}

/// Compact quadrant bearing, e.g. `"N32°E"`. Always matches
/// `[NS]\d{1,2}°[EW]`.
pub fn format_bearing_compact(bearing_deg: f64) -> String {
    let (ns, acute, ew) = quadrant(bearing_deg);
    format!("{ns}{}\u{b0}{ew}", acute.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_meters_to_kilometers() {
        assert_eq!(format_distance(1500.0, DistanceUnit::Meters), "1500.0 m");
        assert_eq!(format_distance(1500.0, DistanceUnit::Kilometers), "1.50 km");
    }

    #[test]
    fn test_format_distance_imperial() {
        assert_eq!(format_distance(0.3048, DistanceUnit::Feet), "1.0 ft");
        assert_eq!(format_distance(0.9144, DistanceUnit::Yards), "1.0 yd");
        assert_eq!(format_distance(1609.344, DistanceUnit::Miles), "1.00 mi");
    }

    #[test]
    fn test_format_area_units() {
        assert_eq!(format_area(10_000.0, AreaUnit::SquareMeters), "10000.0 sq.m");
        assert_eq!(format_area(10_000.0, AreaUnit::Hectares), "1.000 ha");
        assert_eq!(format_area(4046.8564224, AreaUnit::Acres), "1.000 ac");
        assert_eq!(format_area(4046.8564224, AreaUnit::Guntas), "40.00 guntas");
        assert_eq!(format_area(0.09290304, AreaUnit::SquareFeet), "1.0 sq.ft");
    }

    #[test]
    fn test_format_bearing_quadrants() {
        assert_eq!(format_bearing(32.25), "N 32\u{b0} 15' E");
        assert_eq!(format_bearing(147.75), "S 32\u{b0} 15' E");
        assert_eq!(format_bearing(212.25), "S 32\u{b0} 15' W");
        assert_eq!(format_bearing(327.75), "N 32\u{b0} 15' W");
    }

    #[test]
    fn test_format_bearing_minute_carry() {
        // 44.9999 degrees rounds its minutes up to 60, which must carry
        assert_eq!(format_bearing(44.99999), "N 45\u{b0} 0' E");
    }

    #[test]
    fn test_format_bearing_compact_pattern() {
        // Sampled across the whole circle, output always matches
        // [NS]\d{1,2}°[EW]
        for i in 0..720 {
            let s = format_bearing_compact(i as f64 * 0.5);
            let chars: Vec<char> = s.chars().collect();
            assert!(matches!(chars[0], 'N' | 'S'), "bad start in {s}");
            assert!(matches!(*chars.last().unwrap(), 'E' | 'W'), "bad end in {s}");
            assert_eq!(chars[chars.len() - 2], '\u{b0}', "missing degree sign in {s}");
            let digits = &chars[1..chars.len() - 2];
            assert!(
                !digits.is_empty() && digits.len() <= 2 && digits.iter().all(|c| c.is_ascii_digit()),
                "bad digits in {s}"
            );
        }
    }

    #[test]
    fn test_format_bearing_compact_cardinals() {
        assert_eq!(format_bearing_compact(0.0), "N0\u{b0}E");
        assert_eq!(format_bearing_compact(90.0), "S90\u{b0}E");
        assert_eq!(format_bearing_compact(180.0), "S0\u{b0}W");
        assert_eq!(format_bearing_compact(270.0), "N90\u{b0}W");
        assert_eq!(format_bearing_compact(360.0), "N0\u{b0}E");
    }

    #[test]
    fn test_unit_serde_round_trip() {
        for unit in DistanceUnit::all() {
            let json = serde_json::to_string(unit).unwrap();
            let parsed: DistanceUnit = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, *unit);
        }
        for unit in AreaUnit::all() {
            let json = serde_json::to_string(unit).unwrap();
            let parsed: AreaUnit = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, *unit);
        }
    }
}
