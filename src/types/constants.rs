/// Reserved value for cells without a region or density (air, unclassified).
pub const NO_DATA: f64 = -100.0;

/// Newtonian gravitational constant (m^3 kg^-1 s^-2).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

/// g/cc -> kg/m^3.
pub const GCC_TO_KG_M3: f64 = 1.0e3;

/// m/s^2 -> mGal.
pub const SI_TO_MGAL: f64 = 1.0e5;

pub const DEFAULT_NOISE_SEED: u64 = 518_936;
