/// Minimum non-saturated pressure output, 10 % of the 14-bit range.
pub const PRESSURE_MIN_COUNTS: u16 = 1638;
/// Maximum non-saturated pressure output, 90 % of the 14-bit range.
pub const PRESSURE_MAX_COUNTS: u16 = 14745;
/// Largest value the 14-bit pressure field can hold.
pub const PRESSURE_FIELD_MAX: u16 = 0x3FFF;
/// Zero-pressure output of differential parts.
pub const PRESSURE_MIDDLE_COUNTS: u16 = 8192;

const TEMPERATURE_RANGE_C: f32 = 200.0;
const TEMPERATURE_OFFSET_C: f32 = -50.0;

/// Whether a part measures in one direction or both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Output spans `[0, FS]`.
    Unidirectional,
    /// Output spans `[-FS, FS]`.
    Differential,
}

/// Calibrated pressure span of a variant, in pascals.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    pub min_pa: f32,
    pub max_pa: f32,
}

/// Pressure range of the sensor.
///
/// The 5 V / 3.3 V supply options (700 / 730) and port styles share the same transfer
/// function and are not distinguished here. Picking the wrong variant silently scales
/// every reading wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// 0.5 kPa / 2 inH2O, differential
    Npa02WD,
    /// 1.25 kPa / 5 inH2O, differential
    Npa05WD,
    /// 2.49 kPa / 10 inH2O, differential
    Npa10WD,
    /// 6.89 kPa / 1 PSI, differential
    Npa001D,
    /// 34.47 kPa / 5 PSI, differential
    Npa005D,
    /// 103.42 kPa / 15 PSI, differential
    Npa015D,
    /// 206.84 kPa / 30 PSI, differential
    Npa030D,
    /// 6.89 kPa / 1 PSI, gauge
    Npa001G,
    /// 34.47 kPa / 5 PSI, gauge
    Npa005G,
    /// 103.42 kPa / 15 PSI, gauge
    Npa015G,
    /// 206.84 kPa / 30 PSI, gauge
    Npa030G,
    /// 103.42 kPa / 15 PSI, absolute
    Npa015A,
    /// 206.84 kPa / 30 PSI, absolute
    Npa030A,
}

impl Variant {
    pub const ALL: [Variant; 13] = [
        Variant::Npa02WD,
        Variant::Npa05WD,
        Variant::Npa10WD,
        Variant::Npa001D,
        Variant::Npa005D,
        Variant::Npa015D,
        Variant::Npa030D,
        Variant::Npa001G,
        Variant::Npa005G,
        Variant::Npa015G,
        Variant::Npa030G,
        Variant::Npa015A,
        Variant::Npa030A,
    ];

    /// Full-scale pressure magnitude in pascals.
    pub fn full_scale_pa(&self) -> u32 {
        match *self {
            Variant::Npa02WD => 500,
            Variant::Npa05WD => 1250,
            Variant::Npa10WD => 2490,
            Variant::Npa001D | Variant::Npa001G => 6890,
            Variant::Npa005D | Variant::Npa005G => 34470,
            Variant::Npa015D | Variant::Npa015G | Variant::Npa015A => 103420,
            Variant::Npa030D | Variant::Npa030G | Variant::Npa030A => 206840,
        }
    }

    pub fn direction(&self) -> Direction {
        match *self {
            Variant::Npa02WD
            | Variant::Npa05WD
            | Variant::Npa10WD
            | Variant::Npa001D
            | Variant::Npa005D
            | Variant::Npa015D
            | Variant::Npa030D => Direction::Differential,
            Variant::Npa001G
            | Variant::Npa005G
            | Variant::Npa015G
            | Variant::Npa030G
            | Variant::Npa015A
            | Variant::Npa030A => Direction::Unidirectional,
        }
    }

    pub fn span(&self) -> Span {
        let max_pa = self.full_scale_pa() as f32;
        let min_pa = match self.direction() {
            Direction::Unidirectional => 0.0,
            Direction::Differential => -max_pa,
        };
        Span { min_pa, max_pa }
    }

    /// Pressure represented by one output count, in pascals.
    pub fn resolution_pa(&self) -> f32 {
        let span = self.span();
        (span.max_pa - span.min_pa) / (PRESSURE_MAX_COUNTS - PRESSURE_MIN_COUNTS) as f32
    }

    /// P = Pmin + (OUT - OUTmin) / (OUTmax - OUTmin) * (Pmax - Pmin)
    ///
    /// Saturated counts are extrapolated along the same line.
    pub fn pressure_from_counts(&self, counts: u16) -> f32 {
        let span = self.span();
        let out = counts as f32 - PRESSURE_MIN_COUNTS as f32;
        let out_range = (PRESSURE_MAX_COUNTS - PRESSURE_MIN_COUNTS) as f32;
        span.min_pa + out / out_range * (span.max_pa - span.min_pa)
    }

    /// Inverse of [`Variant::pressure_from_counts`], rounded to the nearest count and clamped
    /// to the 14-bit output field.
    pub fn counts_from_pressure(&self, pressure_pa: f32) -> u16 {
        let span = self.span();
        let out_range = (PRESSURE_MAX_COUNTS - PRESSURE_MIN_COUNTS) as f32;
        let counts = PRESSURE_MIN_COUNTS as f32
            + (pressure_pa - span.min_pa) / (span.max_pa - span.min_pa) * out_range;
        // `as` saturates at the integer bounds, NaN maps to 0.
        let rounded = (counts + 0.5) as i32;
        rounded.clamp(0, PRESSURE_FIELD_MAX as i32) as u16
    }
}

/// Returns true outside the calibrated output window.
pub fn is_saturated(counts: u16) -> bool {
    !(PRESSURE_MIN_COUNTS..=PRESSURE_MAX_COUNTS).contains(&counts)
}

/// Temperature field width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureResolution {
    /// 8 bits, `Read_DF3`
    Low,
    /// 11 bits, `Read_DF4`
    High,
}

impl TemperatureResolution {
    pub fn bits(&self) -> u8 {
        match *self {
            TemperatureResolution::Low => 8,
            TemperatureResolution::High => 11,
        }
    }

    pub fn max_counts(&self) -> u16 {
        (1u16 << self.bits()) - 1
    }

    /// T = counts / (2^n - 1) * 200 - 50
    pub fn celsius_from_counts(&self, counts: u16) -> f32 {
        counts as f32 / self.max_counts() as f32 * TEMPERATURE_RANGE_C + TEMPERATURE_OFFSET_C
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        let diff = if actual > expected { actual - expected } else { expected - actual };
        assert!(diff <= tolerance, "{} != {} (tolerance {})", actual, expected, tolerance);
    }

    #[test]
    fn check_endpoints_map_to_span() {
        for variant in Variant::ALL {
            let span = variant.span();
            let tolerance = variant.full_scale_pa() as f32 * 1e-5;
            assert_close(variant.pressure_from_counts(PRESSURE_MIN_COUNTS), span.min_pa, tolerance);
            assert_close(variant.pressure_from_counts(PRESSURE_MAX_COUNTS), span.max_pa, tolerance);
        }
    }

    #[test]
    fn check_differential_span_is_symmetric() {
        let span = Variant::Npa001D.span();
        assert_eq!(span.min_pa, -6890.0);
        assert_eq!(span.max_pa, 6890.0);

        let span = Variant::Npa015A.span();
        assert_eq!(span.min_pa, 0.0);
        assert_eq!(span.max_pa, 103420.0);
    }

    #[test]
    fn check_middle_count_is_near_zero_for_differential_parts() {
        for variant in Variant::ALL {
            if variant.direction() == Direction::Differential {
                assert_close(
                    variant.pressure_from_counts(PRESSURE_MIDDLE_COUNTS),
                    0.0,
                    variant.resolution_pa(),
                );
            }
        }
    }

    #[test]
    fn check_counts_round_trip_within_one_lsb() {
        for variant in Variant::ALL {
            let span = variant.span();
            let steps = 37;
            for i in 0..=steps {
                let pressure =
                    span.min_pa + (span.max_pa - span.min_pa) * i as f32 / steps as f32;
                let counts = variant.counts_from_pressure(pressure);
                let decoded = variant.pressure_from_counts(counts);
                assert_close(decoded, pressure, variant.resolution_pa());
            }
        }
    }

    #[test]
    fn check_counts_from_pressure_clamps_to_field() {
        let variant = Variant::Npa02WD;
        assert_eq!(variant.counts_from_pressure(1.0e9), PRESSURE_FIELD_MAX);
        assert_eq!(variant.counts_from_pressure(-1.0e9), 0);
    }

    #[test]
    fn check_saturation_window() {
        assert!(is_saturated(0));
        assert!(is_saturated(PRESSURE_MIN_COUNTS - 1));
        assert!(!is_saturated(PRESSURE_MIN_COUNTS));
        assert!(!is_saturated(PRESSURE_MIDDLE_COUNTS));
        assert!(!is_saturated(PRESSURE_MAX_COUNTS));
        assert!(is_saturated(PRESSURE_MAX_COUNTS + 1));
        assert!(is_saturated(PRESSURE_FIELD_MAX));
    }

    #[test]
    fn check_temperature_endpoints() {
        for resolution in [TemperatureResolution::Low, TemperatureResolution::High] {
            assert_close(resolution.celsius_from_counts(0), -50.0, 1e-4);
            assert_close(resolution.celsius_from_counts(resolution.max_counts()), 150.0, 1e-4);
        }
        assert_eq!(TemperatureResolution::Low.max_counts(), 255);
        assert_eq!(TemperatureResolution::High.max_counts(), 2047);
    }
}
