use crate::error::{require_positive, Result};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

pub const HOURS_PER_DAY: f64 = 24.0;

/// Default sampling interval of daily position solutions, in hours.
pub const DAILY_SAMPLING_HOURS: f64 = 24.0;

/// Number of draconitic harmonics kept per constellation.
pub const DRACONITIC_HARMONICS: usize = 15;

/// Number of harmonics of the annual (Earth orbital) frequency.
pub const ANNUAL_HARMONICS: usize = 12;

/// Below this magnitude the denominator of equation 7 is treated as zero.
pub const DEGENERATE_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
}

impl Constellation {
    pub fn name(&self) -> &'static str {
        match self {
            Constellation::Gps => "gps",
            Constellation::Glonass => "glonass",
            Constellation::Galileo => "galileo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Constellation::Gps => "GPS",
            Constellation::Glonass => "GLONASS",
            Constellation::Galileo => "Galileo",
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthConstants {
    /// Sidereal rotation period T_E, in hours.
    pub rotation_period_hours: f64,
    /// ω_E, in cpd.
    pub angular_speed: f64,
    /// f_E, in cpd.
    pub orbital_frequency: f64,
}

impl EarthConstants {
    pub fn validate(&self) -> Result<()> {
        require_positive("earth.rotation_period_hours", self.rotation_period_hours)?;
        require_positive("earth.angular_speed", self.angular_speed)?;
        require_positive("earth.orbital_frequency", self.orbital_frequency)?;
        Ok(())
    }
}

impl Default for EarthConstants {
    fn default() -> Self {
        *EARTH
    }
}

/// Physical parameters of one constellation. Frequencies are in cpd.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationConstants {
    pub constellation: Constellation,
    /// Satellite revolution period T_S, in hours.
    pub satellite_period_hours: f64,
    pub orbital_frequency: f64,
    /// Negative for the prograde-inclined MEO orbits of all three systems.
    pub nodal_precession_frequency: f64,
    pub ground_repeat_frequency: f64,
    pub draconitic_frequency: f64,
    /// Only known for the constellations whose orbital peaks are tabulated.
    pub sun_arg_lat_frequency: Option<f64>,
}

impl ConstellationConstants {
    pub fn validate(&self) -> Result<()> {
        let name = self.constellation.name();
        require_positive(&format!("{name}.satellite_period_hours"), self.satellite_period_hours)?;
        require_positive(&format!("{name}.orbital_frequency"), self.orbital_frequency)?;
        require_positive(&format!("{name}.ground_repeat_frequency"), self.ground_repeat_frequency)?;
        require_positive(&format!("{name}.draconitic_frequency"), self.draconitic_frequency)?;
        if let Some(f_u) = self.sun_arg_lat_frequency {
            require_positive(&format!("{name}.sun_arg_lat_frequency"), f_u)?;
        }
        if !self.nodal_precession_frequency.is_finite() {
            return Err(crate::error::FrequencyError::invalid_constant(
                format!("{name}.nodal_precession_frequency"),
                self.nodal_precession_frequency,
            ));
        }
        Ok(())
    }

    /// The scalar base frequencies in catalog order, as (name, cpd).
    pub fn base_frequencies(&self) -> Vec<(&'static str, f64)> {
        let mut base = vec![
            ("orbital_frequency", self.orbital_frequency),
            ("nodal_precession_frequency", self.nodal_precession_frequency),
            ("ground_repeat_frequency", self.ground_repeat_frequency),
        ];
        if let Some(f_u) = self.sun_arg_lat_frequency {
            base.push(("sun_arg_lat_frequency", f_u));
        }
        base.push(("draconitic_frequency", self.draconitic_frequency));
        base
    }
}

/// A named tidal constituent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tide {
    pub name: String,
    pub frequency: f64,
}

impl Tide {
    pub fn new(name: &str, frequency: f64) -> Self {
        Tide {
            name: name.to_string(),
            frequency,
        }
    }
}

lazy_static! {
    pub static ref EARTH: EarthConstants = EarthConstants {
        rotation_period_hours: 23.9345,
        angular_speed: 1.0027378,
        orbital_frequency: 0.0027378,
    };

    pub static ref GPS: ConstellationConstants = ConstellationConstants {
        constellation: Constellation::Gps,
        satellite_period_hours: 11.967,
        orbital_frequency: 2.0057014,
        nodal_precession_frequency: -0.0001075,
        ground_repeat_frequency: 1.0028507,
        draconitic_frequency: 0.0028453,
        sun_arg_lat_frequency: None,
    };

    pub static ref GLONASS: ConstellationConstants = ConstellationConstants {
        constellation: Constellation::Glonass,
        satellite_period_hours: 11.264,
        orbital_frequency: 2.1310182,
        nodal_precession_frequency: -0.0000922,
        ground_repeat_frequency: 0.1253540,
        draconitic_frequency: 0.0028300,
        sun_arg_lat_frequency: Some(2.1281882),
    };

    pub static ref GALILEO: ConstellationConstants = ConstellationConstants {
        constellation: Constellation::Galileo,
        satellite_period_hours: 14.077,
        orbital_frequency: 1.7267000,
        nodal_precession_frequency: -0.0000726,
        ground_repeat_frequency: 0.1015706,
        draconitic_frequency: 0.0028104,
        sun_arg_lat_frequency: Some(1.7238896),
    };

    pub static ref CONSTELLATIONS: Vec<ConstellationConstants> = vec![*GPS, *GLONASS, *GALILEO];

    pub static ref TIDES: Vec<Tide> = vec![
        Tide::new("145_545", 0.9293886),
        Tide::new("OO_1", 0.9294198),
        Tide::new("O_1", 0.9295357),
        Tide::new("2N_2", 1.8596904),
        Tide::new("μ_2", 1.8645473),
        Tide::new("M_2", 1.9322734),
        Tide::new("M_m", 0.0362920),
        Tide::new("M_f", 0.0732027),
    ];
}

#[test]
fn test_builtin_constants_are_valid() {
    EARTH.validate().unwrap();
    for constants in CONSTELLATIONS.iter() {
        constants.validate().unwrap();
    }
}

#[test]
fn test_zero_satellite_period_is_rejected() {
    let mut broken = *GPS;
    broken.satellite_period_hours = 0.0;
    match broken.validate() {
        Err(crate::error::FrequencyError::InvalidConstant { name, value }) => {
            assert_eq!(name, "gps.satellite_period_hours");
            assert_eq!(value, 0.0);
        }
        other => panic!("expected InvalidConstant, got {other:?}"),
    }
}

#[test]
fn test_sun_arg_lat_is_orbital_minus_draconitic() {
    // f_u = f_orb - f_d for the constellations where it is tabulated
    for constants in [*GLONASS, *GALILEO] {
        let f_u = constants.sun_arg_lat_frequency.unwrap();
        approx::assert_abs_diff_eq!(
            f_u,
            constants.orbital_frequency - constants.draconitic_frequency,
            epsilon = 1e-7
        );
    }
}

#[test]
fn test_base_frequencies_order() {
    let names: Vec<&str> = GLONASS.base_frequencies().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        [
            "orbital_frequency",
            "nodal_precession_frequency",
            "ground_repeat_frequency",
            "sun_arg_lat_frequency",
            "draconitic_frequency"
        ]
    );
    assert_eq!(GPS.base_frequencies().len(), 4);
}
